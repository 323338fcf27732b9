//! Runtime view of filter records.
//!
//! Rust has no runtime struct reflection, so a filter type describes itself
//! through [`Reflect`]. Most types get it from `#[derive(Reflect)]`:
//!
//! ```rust,ignore
//! use queryfilter::Reflect;
//!
//! #[derive(Reflect)]
//! struct TaskFilter {
//!     #[tag(filter = "status,op=in")]
//!     status: Option<Vec<String>>,
//!     #[tag(filter = "story_points,op=gte")]
//!     min_points: Option<i32>,
//!     // untagged: never read
//!     page: usize,
//! }
//! ```
//!
//! Hand-built records work too, see [`Field`].

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::value::Kind;

/// A value that can describe its own shape at runtime.
pub trait Reflect {
    /// Produce an owned view of this value.
    fn reflect(&self) -> Reflected;
}

/// The closed set of shapes a filter value can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Reflected {
    /// An unset optional value.
    Absent,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    /// A growable sequence (`Vec<T>`, `&[T]`).
    Slice(Vec<Reflected>),
    /// A fixed-size sequence (`[T; N]`).
    Array(Vec<Reflected>),
    /// A structured record with named fields, in declaration order.
    Record(Vec<Field>),
    /// Anything else. Carries its kind so errors can name it.
    Opaque(Kind),
}

impl Reflected {
    /// The kind of this value, as seen by type assertions.
    pub fn kind(&self) -> Kind {
        match self {
            Reflected::Absent => Kind::Invalid,
            Reflected::Bool(_) => Kind::Bool,
            Reflected::Int(_) => Kind::Int,
            Reflected::Uint(_) => Kind::Uint,
            Reflected::Float(_) => Kind::Float,
            Reflected::String(_) => Kind::String,
            Reflected::Timestamp(_) => Kind::Timestamp,
            Reflected::Slice(_) => Kind::Slice,
            Reflected::Array(_) => Kind::Array,
            Reflected::Record(_) => Kind::Struct,
            Reflected::Opaque(kind) => *kind,
        }
    }

    /// Elements of a slice or array; empty for every other shape.
    pub fn elements(&self) -> &[Reflected] {
        match self {
            Reflected::Slice(items) | Reflected::Array(items) => items,
            _ => &[],
        }
    }

    /// String form of a value, used when a sequence is normalized to text.
    pub fn to_text(&self) -> String {
        match self {
            Reflected::Absent => String::new(),
            Reflected::Bool(b) => b.to_string(),
            Reflected::Int(n) => n.to_string(),
            Reflected::Uint(n) => n.to_string(),
            Reflected::Float(f) => f.to_string(),
            Reflected::String(s) => s.clone(),
            Reflected::Timestamp(t) => t.to_rfc3339(),
            other => format!("<{} value>", other.kind()),
        }
    }
}

/// One field of a [`Reflected::Record`].
///
/// ```
/// use queryfilter::{Field, Reflect, Reflected};
///
/// let record = Reflected::Record(vec![
///     Field::new("min_age", 18i32.reflect()).with_tag("filter", "age,op=gte"),
///     Field::opaque("page"),
/// ]);
/// # let _ = record;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub tags: Vec<(String, String)>,
    pub value: Reflected,
}

impl Field {
    pub fn new(name: impl Into<String>, value: Reflected) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            value,
        }
    }

    /// A field whose value is never inspected.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self::new(name, Reflected::Opaque(Kind::Invalid))
    }

    /// Attach a tag text under `key`.
    pub fn with_tag(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.tags.push((key.into(), text.into()));
        self
    }

    /// Look up the tag text stored under `key`.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, text)| text.as_str())
    }
}

macro_rules! reflect_as {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(
            impl Reflect for $t {
                fn reflect(&self) -> Reflected {
                    Reflected::$variant(*self as $target)
                }
            }
        )*
    };
}

reflect_as!(Int, i64: i8, i16, i32, i64, isize);
reflect_as!(Uint, u64: u8, u16, u32, u64, usize);
reflect_as!(Float, f64: f32, f64);

impl Reflect for bool {
    fn reflect(&self) -> Reflected {
        Reflected::Bool(*self)
    }
}

impl Reflect for str {
    fn reflect(&self) -> Reflected {
        Reflected::String(self.to_string())
    }
}

impl Reflect for String {
    fn reflect(&self) -> Reflected {
        Reflected::String(self.clone())
    }
}

impl Reflect for DateTime<Utc> {
    fn reflect(&self) -> Reflected {
        Reflected::Timestamp(*self)
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Reflected {
        match self {
            Some(v) => v.reflect(),
            None => Reflected::Absent,
        }
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect(&self) -> Reflected {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn reflect(&self) -> Reflected {
        (**self).reflect()
    }
}

impl<T: Reflect> Reflect for [T] {
    fn reflect(&self) -> Reflected {
        Reflected::Slice(self.iter().map(Reflect::reflect).collect())
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Reflected {
        self.as_slice().reflect()
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> Reflected {
        Reflected::Array(self.iter().map(Reflect::reflect).collect())
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S> {
    fn reflect(&self) -> Reflected {
        Reflected::Opaque(Kind::Map)
    }
}

impl<K, V> Reflect for BTreeMap<K, V> {
    fn reflect(&self) -> Reflected {
        Reflected::Opaque(Kind::Map)
    }
}

impl Reflect for serde_json::Value {
    fn reflect(&self) -> Reflected {
        use serde_json::Value as Json;

        match self {
            Json::Null => Reflected::Absent,
            Json::Bool(b) => Reflected::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Reflected::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Reflected::Uint(u)
                } else {
                    Reflected::Float(n.as_f64().unwrap_or_default())
                }
            }
            Json::String(s) => Reflected::String(s.clone()),
            Json::Array(items) => Reflected::Slice(items.iter().map(Reflect::reflect).collect()),
            Json::Object(_) => Reflected::Opaque(Kind::Map),
        }
    }
}

impl Reflect for Reflected {
    fn reflect(&self) -> Reflected {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_widen() {
        assert_eq!(7i8.reflect(), Reflected::Int(7));
        assert_eq!((-3isize).reflect(), Reflected::Int(-3));
        assert_eq!(9u16.reflect(), Reflected::Uint(9));
        assert_eq!(1.5f32.reflect(), Reflected::Float(1.5));
    }

    #[test]
    fn test_option_deref() {
        let none: Option<i32> = None;
        assert_eq!(none.reflect(), Reflected::Absent);
        assert_eq!(Some("bobby").reflect(), Reflected::String("bobby".to_string()));
    }

    #[test]
    fn test_sequences() {
        let v = vec!["a", "b"];
        assert_eq!(v.reflect().kind(), Kind::Slice);
        assert_eq!([1i32, 2, 3].reflect().kind(), Kind::Array);
        assert_eq!([1i32, 2, 3].reflect().elements().len(), 3);
        assert!(Reflected::Bool(true).elements().is_empty());
    }

    #[test]
    fn test_maps_are_opaque() {
        let m: HashMap<String, i32> = HashMap::new();
        assert_eq!(m.reflect(), Reflected::Opaque(Kind::Map));
    }

    #[test]
    fn test_json() {
        let v = serde_json::json!([1, "two", null, 2.5]);
        assert_eq!(
            v.reflect(),
            Reflected::Slice(vec![
                Reflected::Int(1),
                Reflected::String("two".to_string()),
                Reflected::Absent,
                Reflected::Float(2.5),
            ])
        );
        assert_eq!(serde_json::json!({"a": 1}).reflect().kind(), Kind::Map);
    }

    #[test]
    fn test_field_tags() {
        let field = Field::new("min_age", Reflected::Int(18))
            .with_tag("json", "minAge")
            .with_tag("filter", "age,op=gte");
        assert_eq!(field.tag("filter"), Some("age,op=gte"));
        assert_eq!(field.tag("qf"), None);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Reflected::Int(42).to_text(), "42");
        assert_eq!(Reflected::Float(10.21).to_text(), "10.21");
        assert_eq!(Reflected::Slice(vec![]).to_text(), "<slice value>");
    }
}
