//! Operators and the operator registry.
//!
//! An operator receives a [`Clause`] and returns the SQL that follows the
//! column name plus the values to bind. The renderer prepends the column.
//!
//! Custom operators are registered by name and referenced from tags:
//!
//! ```
//! use queryfilter::{Fragment, Registry};
//!
//! let registry = Registry::with_builtins();
//! registry.register("like", |c| Ok(Fragment::new("LIKE ?", vec![c.value.clone()])));
//! // usable as #[tag(filter = "title,op=like")]
//! assert!(registry.lookup("like").is_some());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::clause::Clause;
use crate::error::{FilterError, FilterResult};
use crate::placeholder::placeholder_list;
use crate::query::Fragment;
use crate::value::Kind;

/// A rendering function for one clause.
pub type Operator = Arc<dyn Fn(&Clause) -> FilterResult<Fragment> + Send + Sync>;

/// Kinds accepted by the sequence operators.
const SEQUENCE: &[Kind] = &[Kind::Slice, Kind::Array];

/// Named operators, shared across threads.
///
/// Registration takes a write lock and rendering takes read locks, so
/// operators may be added while other threads render. Registering an
/// existing name replaces it for every later lookup.
pub struct Registry {
    operators: RwLock<HashMap<String, Operator>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            operators: RwLock::new(HashMap::new()),
        }
    }

    /// A registry holding the built-in operators.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        register_builtins(&registry);
        registry
    }

    /// The process-wide registry used by [`crate::to_sql`].
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::with_builtins)
    }

    /// Insert or overwrite the operator called `name`.
    pub fn register<F>(&self, name: impl Into<String>, op: F)
    where
        F: Fn(&Clause) -> FilterResult<Fragment> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut operators = self.operators.write().unwrap_or_else(PoisonError::into_inner);
        if operators.insert(name.clone(), Arc::new(op)).is_some() {
            tracing::debug!(operator = %name, "replaced operator");
        } else {
            tracing::debug!(operator = %name, "registered operator");
        }
    }

    /// Find the operator called `name` (exact match).
    pub fn lookup(&self, name: &str) -> Option<Operator> {
        self.operators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Like [`Registry::lookup`], failing for unknown names.
    pub fn require(&self, name: &str) -> FilterResult<Operator> {
        self.lookup(name)
            .ok_or_else(|| FilterError::UnknownOperator(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .operators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("operators", &self.names())
            .finish()
    }
}

/// An operator binding the clause value to a single placeholder.
///
/// `simple_operator("> ?")` renders `"> ?"` with the clause value as its
/// only argument.
pub fn simple_operator(sql: &'static str) -> impl Fn(&Clause) -> FilterResult<Fragment> + Send + Sync + 'static {
    move |c: &Clause| Ok(Fragment::new(sql, vec![c.value.clone()]))
}

fn register_builtins(registry: &Registry) {
    registry.register("eq", simple_operator("= ?"));
    registry.register("gt", simple_operator("> ?"));
    registry.register("gte", simple_operator(">= ?"));
    registry.register("lt", simple_operator("< ?"));
    registry.register("lte", simple_operator("<= ?"));

    registry.register("in", |c| membership(c, "IN"));
    registry.register("not-in", |c| membership(c, "NOT IN"));
    registry.register("between", between);

    registry.register("is-null", |c| Ok(null_check(c.flag()?)));
    registry.register("not-null", |c| Ok(null_check(!c.flag()?)));
}

fn membership(c: &Clause, keyword: &str) -> FilterResult<Fragment> {
    c.assert_kind_one_of(SEQUENCE)?;

    if c.is_empty() {
        return Ok(Fragment::new(format!("{}(NULL)", keyword), Vec::new()));
    }

    let args = c.elements()?;
    Ok(Fragment::new(
        format!("{}({})", keyword, placeholder_list(args.len())),
        args,
    ))
}

// Extra elements past the second are ignored.
fn between(c: &Clause) -> FilterResult<Fragment> {
    c.assert_kind_one_of(SEQUENCE)?;

    if c.len() < 2 {
        return Err(FilterError::Arity {
            operator: c.operator.clone(),
            expected: 2,
            actual: c.len(),
        });
    }

    let mut args = c.elements()?;
    args.truncate(2);
    Ok(Fragment::new("BETWEEN ? AND ?", args))
}

fn null_check(is_null: bool) -> Fragment {
    if is_null {
        Fragment::new("IS NULL", Vec::new())
    } else {
        Fragment::new("IS NOT NULL", Vec::new())
    }
}
