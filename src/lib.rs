//! # queryfilter
//!
//! > **Declare your filters. Get a parameterized `WHERE` fragment back.**
//!
//! queryfilter walks a tagged struct and renders every field that holds a
//! value into a SQL predicate plus the ordered list of values to bind.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use queryfilter::prelude::*;
//!
//! #[derive(Reflect)]
//! struct TaskFilter {
//!     #[tag(filter = "status,op=in")]
//!     status: Option<Vec<String>>,
//!     #[tag(filter = "story_points,op=gte")]
//!     min_points: Option<i32>,
//!     #[tag(filter = "story_points,op=lte")]
//!     max_points: Option<i32>,
//! }
//!
//! let filter = TaskFilter {
//!     status: Some(vec!["todo".into(), "doing".into()]),
//!     min_points: Some(2),
//!     max_points: None,
//! };
//!
//! let q = queryfilter::to_sql_with(&filter, &Options::default().placeholder(Placeholder::Dollar))?;
//! // q.sql  => "status IN($1,$2) AND story_points >= $3"
//! // q.args => ["todo", "doing", 2]
//! ```
//!
//! ## Tags
//!
//! | Tag                  | SQL                         |
//! |----------------------|-----------------------------|
//! | `col` / `col,op=eq`  | `col = ?`                   |
//! | `col,op=gt`          | `col > ?` (also gte, lt, lte) |
//! | `col,op=in`          | `col IN(?,?,...)`           |
//! | `col,op=not-in`      | `col NOT IN(?,?,...)`       |
//! | `col,op=between`     | `col BETWEEN ? AND ?`       |
//! | `col,op=is-null`     | `col IS NULL` / `IS NOT NULL` |
//! | `col,op=not-null`    | `col IS NOT NULL` / `IS NULL` |
//!
//! Unset `Option` fields are left out. New operators are added with
//! [`register_operator`].

pub mod clause;
pub mod config;
pub mod engine;
pub mod error;
pub mod operator;
pub mod placeholder;
pub mod query;
pub mod reflect;
pub mod summarize;
pub mod tag;
pub mod value;

pub use clause::Clause;
pub use error::{FilterError, FilterResult};
pub use operator::{simple_operator, Operator, Registry};
pub use placeholder::Placeholder;
pub use query::{Connective, Fragment, Options};
pub use queryfilter_derive::Reflect;
pub use reflect::{Field, Reflect, Reflected};
pub use value::{Kind, Value};

pub mod prelude {
    pub use crate::clause::Clause;
    pub use crate::config::{defaults, set_defaults, Defaults};
    pub use crate::engine::FilterDB;
    pub use crate::error::*;
    pub use crate::operator::{simple_operator, Registry};
    pub use crate::placeholder::Placeholder;
    pub use crate::query::{Connective, Fragment, Options};
    pub use crate::reflect::{Field, Reflected};
    pub use crate::value::{Kind, Value};
    pub use crate::{register_operator, to_sql, to_sql_with, Reflect};
}

/// Render a filter record with the process-wide defaults and operators.
///
/// # Example
///
/// ```
/// use queryfilter::{Field, Reflect, Reflected};
///
/// let record = Reflected::Record(vec![
///     Field::new("min_age", Some(18i32).reflect()).with_tag("filter", "age,op=gte"),
///     Field::new("color", None::<String>.reflect()).with_tag("filter", "color"),
/// ]);
///
/// let q = queryfilter::to_sql(&record).unwrap();
/// assert_eq!(q.sql, "age >= ?");
/// assert_eq!(q.args, vec![queryfilter::Value::Int(18)]);
/// ```
pub fn to_sql<R: Reflect + ?Sized>(record: &R) -> FilterResult<Fragment> {
    to_sql_with(record, &Options::default())
}

/// Render a filter record with per-call options.
pub fn to_sql_with<R: Reflect + ?Sized>(record: &R, opts: &Options) -> FilterResult<Fragment> {
    Registry::global().to_sql(record, opts)
}

/// Register an operator on the process-wide registry.
///
/// Registering an existing name replaces it without warning.
///
/// ```
/// use queryfilter::Fragment;
///
/// queryfilter::register_operator("like", |c| Ok(Fragment::new("LIKE ?", vec![c.value.clone()])));
/// ```
pub fn register_operator<F>(name: impl Into<String>, op: F)
where
    F: Fn(&Clause) -> FilterResult<Fragment> + Send + Sync + 'static,
{
    Registry::global().register(name, op);
}
