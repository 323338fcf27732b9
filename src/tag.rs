//! Field tag parser using nom.
//!
//! # Grammar
//!
//! ```text
//! age,op=gte
//! ─┬─ ───┬──
//!  │     └── operator (optional, defaults to eq)
//!  └── column (verbatim)
//! ```

use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{char, multispace0},
    combinator::rest,
    sequence::{delimited, preceded},
    IResult,
};

use crate::error::{FilterError, FilterResult};

/// Operator used when a tag names only a column.
pub const DEFAULT_OPERATOR: &str = "eq";

/// A parsed field tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub column: String,
    pub operator: String,
}

/// Parse a tag of the form `column` or `column,op=name`.
pub fn parse_tag(input: &str) -> FilterResult<Tag> {
    let malformed = || FilterError::MalformedTag(input.to_string());

    let (remaining, column) = parse_column(input).map_err(|_| malformed())?;
    if remaining.is_empty() {
        return Ok(Tag {
            column: column.to_string(),
            operator: DEFAULT_OPERATOR.to_string(),
        });
    }

    let (_, operator) = parse_operator_segment(remaining).map_err(|_| malformed())?;
    let operator = operator.trim();
    if operator.is_empty() {
        return Err(malformed());
    }

    Ok(Tag {
        column: column.to_string(),
        operator: operator.to_string(),
    })
}

/// Everything up to the first comma.
fn parse_column(input: &str) -> IResult<&str, &str> {
    take_till(|c| c == ',')(input)
}

/// `,op=<name>`, returning the untrimmed name.
fn parse_operator_segment(input: &str) -> IResult<&str, &str> {
    let (input, _) = char(',')(input)?;
    let (input, _) = delimited(multispace0, tag("op"), multispace0)(input)?;
    preceded(char('='), rest)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_only() {
        let t = parse_tag("color").unwrap();
        assert_eq!(t.column, "color");
        assert_eq!(t.operator, "eq");
    }

    #[test]
    fn test_column_and_operator() {
        let t = parse_tag("age,op=gte").unwrap();
        assert_eq!(t.column, "age");
        assert_eq!(t.operator, "gte");
    }

    #[test]
    fn test_operator_is_trimmed() {
        let t = parse_tag("status, op = not-in ").unwrap();
        assert_eq!(t.column, "status");
        assert_eq!(t.operator, "not-in");
    }

    #[test]
    fn test_column_is_verbatim() {
        let t = parse_tag(" due_date ,op=gt").unwrap();
        assert_eq!(t.column, " due_date ");
    }

    #[test]
    fn test_malformed() {
        for raw in ["age,gte", "age,", "age,op=", "age,kind=gte", "age,op"] {
            let err = parse_tag(raw).unwrap_err();
            assert_eq!(err.to_string(), format!("incorrectly formatted tag: {}", raw));
        }
    }
}
