//! Human-readable lists for error messages.

use std::fmt::Display;

/// Render items as `"a, b or c"`.
///
/// A single item is returned as-is and an empty input yields an empty string.
pub fn summarize<T: Display>(items: &[T]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(|i| i.to_string()).collect();
            format!("{} or {}", head.join(", "), last)
        }
    }
}
