//! Clauses and the clause builder.
//!
//! A [`Clause`] is one `column / operator / value` unit taken from a tagged
//! field. Custom operators receive a `&Clause` and use its helpers to check
//! the field's kind and read its elements.

use crate::error::{FilterError, FilterResult};
use crate::reflect::Reflected;
use crate::summarize::summarize;
use crate::tag::parse_tag;
use crate::value::{extract, Kind, Value};

/// One predicate unit parsed from a tagged field.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// The database column the operation works on.
    pub column: String,

    /// Registry key of the operator (eq, gt, in, ...).
    pub operator: String,

    /// Normalized field value. `Value::Null` means the filter is not applied.
    pub value: Value,

    // dereferenced field value, kept for kind assertions and element reads
    reflected: Reflected,
}

impl Clause {
    /// Build a clause, normalizing `reflected` once.
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        reflected: Reflected,
    ) -> FilterResult<Self> {
        let value = extract(&reflected)?;
        Ok(Self {
            column: column.into(),
            operator: operator.into(),
            value,
            reflected,
        })
    }

    /// Whether the field carries a value. Unset clauses are never rendered.
    pub fn is_set(&self) -> bool {
        !self.value.is_null()
    }

    /// Kind of the underlying field value.
    pub fn kind(&self) -> Kind {
        self.reflected.kind()
    }

    /// Check that the field is one of `kinds`.
    ///
    /// ```
    /// use queryfilter::{Clause, Kind, Reflect};
    ///
    /// let clause = Clause::new("title", "in", "uh-oh".reflect()).unwrap();
    /// let err = clause.assert_kind_one_of(&[Kind::Slice, Kind::Array]).unwrap_err();
    /// assert_eq!(err.to_string(), "expected slice or array; got string for operation in");
    /// ```
    pub fn assert_kind_one_of(&self, kinds: &[Kind]) -> FilterResult<()> {
        let actual = self.kind();
        if kinds.contains(&actual) {
            return Ok(());
        }
        Err(FilterError::mismatch(summarize(kinds), actual, &self.operator))
    }

    /// Number of elements of a sequence field; zero for scalars.
    pub fn len(&self) -> usize {
        self.reflected.elements().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements of a sequence field, each normalized on its own so numeric
    /// sequences bind numbers rather than text.
    pub fn elements(&self) -> FilterResult<Vec<Value>> {
        self.reflected.elements().iter().map(extract).collect()
    }

    /// The field as a boolean, failing with a type mismatch otherwise.
    pub fn flag(&self) -> FilterResult<bool> {
        match self.reflected {
            Reflected::Bool(b) => Ok(b),
            _ => Err(FilterError::mismatch(Kind::Bool.to_string(), self.kind(), &self.operator)),
        }
    }
}

/// Walk a record's fields and build one clause per field tagged under `tag_name`.
///
/// Fields without that tag are skipped without reading their value.
pub fn build_clauses(record: Reflected, tag_name: &str) -> FilterResult<Vec<Clause>> {
    let fields = match record {
        Reflected::Record(fields) => fields,
        other => return Err(FilterError::NotARecord(other.kind())),
    };

    let mut clauses = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(raw) = field.tag(tag_name) else {
            continue;
        };
        let tag = parse_tag(raw)?;
        clauses.push(Clause::new(tag.column, tag.operator, field.value)?);
    }

    Ok(clauses)
}
