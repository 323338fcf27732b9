//! Clause rendering and the `to_sql` pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clause::{build_clauses, Clause};
use crate::config;
use crate::error::{FilterError, FilterResult};
use crate::operator::Registry;
use crate::placeholder::Placeholder;
use crate::reflect::Reflect;
use crate::value::Value;

/// Boolean joiner placed between rendered clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connective {
    #[default]
    #[serde(alias = "and")]
    And,
    #[serde(alias = "or")]
    Or,
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connective::And => write!(f, "AND"),
            Connective::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for Connective {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(Connective::And),
            "OR" => Ok(Connective::Or),
            other => Err(FilterError::Config(format!(
                "unknown connective '{}'. Expected: AND or OR",
                other
            ))),
        }
    }
}

/// SQL text plus the values bound to its placeholders, in order.
///
/// Operators return one for their own piece of a clause; `to_sql` returns
/// one for the whole predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fragment {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

/// Per-call options.
///
/// `Options::default()` copies the process-wide defaults (see
/// [`crate::config`]); the builder methods override them for one call.
///
/// ```
/// use queryfilter::{Connective, Options, Placeholder};
///
/// let opts = Options::default()
///     .connective(Connective::Or)
///     .placeholder(Placeholder::Dollar)
///     .placeholder_offset(3);
/// assert_eq!(opts.placeholder_offset, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub connective: Connective,
    pub placeholder: Placeholder,
    pub placeholder_offset: usize,
    pub tag_name: String,
}

impl Default for Options {
    fn default() -> Self {
        let defaults = config::defaults();
        Self {
            connective: defaults.connective,
            placeholder: defaults.placeholder,
            placeholder_offset: defaults.placeholder_offset,
            tag_name: defaults.tag_name,
        }
    }
}

impl Options {
    pub fn connective(mut self, connective: Connective) -> Self {
        self.connective = connective;
        self
    }

    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn placeholder_offset(mut self, offset: usize) -> Self {
        self.placeholder_offset = offset;
        self
    }

    pub fn tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }
}

impl Registry {
    /// Render `record` with the operators of this registry.
    pub fn to_sql<R: Reflect + ?Sized>(&self, record: &R, opts: &Options) -> FilterResult<Fragment> {
        let clauses = build_clauses(record.reflect(), &opts.tag_name)?;
        let joined = self.render(&clauses, opts.connective)?;
        Ok(Fragment {
            sql: opts.placeholder.rewrite(&joined.sql, opts.placeholder_offset),
            args: joined.args,
        })
    }

    /// Render clauses into one fragment with anonymous placeholders.
    ///
    /// Unset clauses contribute nothing. The first operator failure aborts
    /// the whole render.
    pub fn render(&self, clauses: &[Clause], connective: Connective) -> FilterResult<Fragment> {
        let mut segments: Vec<String> = Vec::with_capacity(clauses.len());
        let mut args: Vec<Value> = Vec::new();

        for clause in clauses {
            if !clause.is_set() {
                tracing::trace!(column = %clause.column, operator = %clause.operator, "skipping unset clause");
                continue;
            }

            let operator = self.require(&clause.operator)?;
            let fragment = operator(clause)?;

            segments.push(format!("{} {}", clause.column, fragment.sql));
            args.extend(fragment.args);
        }

        tracing::debug!(
            clauses = clauses.len(),
            rendered = segments.len(),
            args = args.len(),
            "rendered filter"
        );

        let joiner = format!(" {} ", connective);
        Ok(Fragment::new(segments.join(&joiner), args))
    }
}
