//! Placeholder dialects.
//!
//! Operators always emit the anonymous `?` token. Once the whole fragment is
//! joined, [`Placeholder::rewrite`] converts it to the target database's
//! positional syntax.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// The token operators emit for every bound argument.
pub const TOKEN: char = '?';

/// How placeholders appear in the final SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placeholder {
    /// `?`, for MySQL, MariaDB and SQLite.
    #[default]
    Anonymous,
    /// `:1, :2, ...`, Oracle style.
    Colon,
    /// `$1, $2, ...`, for PostgreSQL.
    Dollar,
}

impl Placeholder {
    /// Rewrite every `?` in `sql`, numbering from `offset`.
    ///
    /// The scan is purely textual: a `?` inside a quoted SQL literal is
    /// rewritten as well.
    ///
    /// ```
    /// use queryfilter::Placeholder;
    ///
    /// let sql = Placeholder::Dollar.rewrite("name = ? AND color = ?", 1);
    /// assert_eq!(sql, "name = $1 AND color = $2");
    /// ```
    pub fn rewrite(&self, sql: &str, offset: usize) -> String {
        let prefix = match self {
            Placeholder::Anonymous => return sql.to_string(),
            Placeholder::Colon => ':',
            Placeholder::Dollar => '$',
        };

        let mut out = String::with_capacity(sql.len() + 8);
        // u128: offset plus the placeholder count never overflows.
        let mut n = offset as u128;
        let mut remaining = sql;

        while let Some(idx) = remaining.find(TOKEN) {
            out.push_str(&remaining[..idx]);
            out.push(prefix);
            out.push_str(&n.to_string());
            n += 1;
            remaining = &remaining[idx + TOKEN.len_utf8()..];
        }
        out.push_str(remaining);

        out
    }

    /// The dialect a database URL expects.
    pub fn for_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Placeholder::Dollar
        } else {
            Placeholder::Anonymous
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Anonymous => write!(f, "anonymous"),
            Placeholder::Colon => write!(f, "colon"),
            Placeholder::Dollar => write!(f, "dollar"),
        }
    }
}

impl FromStr for Placeholder {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anonymous" | "question" | "?" => Ok(Placeholder::Anonymous),
            "colon" | ":" => Ok(Placeholder::Colon),
            "dollar" | "$" => Ok(Placeholder::Dollar),
            other => Err(FilterError::Config(format!(
                "unknown placeholder dialect '{}'. Expected: anonymous, colon or dollar",
                other
            ))),
        }
    }
}

/// A comma-joined list of `n` anonymous placeholders.
///
/// Never empty: `n = 0` still yields a single `?`, so callers handle empty
/// sequences themselves.
pub fn placeholder_list(n: usize) -> String {
    if n <= 1 {
        return TOKEN.to_string();
    }
    vec![TOKEN.to_string(); n].join(",")
}
