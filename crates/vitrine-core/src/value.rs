use crate::record::RepresentedRecord;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

///
/// Value
///
/// Attribute value produced by mode transforms and consumed by the
/// serialization layer. Scalars, nested records, and lists thereof;
/// nothing here is tied to a storage representation.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Record(Box<RepresentedRecord>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Uint(n) if *n <= i64::MAX as u64 => Some(*n as i64),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(n) => Some(*n),
            Self::Int(n) if *n >= 0 => Some(*n as u64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Compare two values for ordering purposes.
    ///
    /// Numeric variants compare across families (`Int`/`Uint` via i128
    /// widening, floats via f64). Text and bool compare within their
    /// own family. Everything else is unordered.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (a, b) => match (a.numeric_repr(), b.numeric_repr()) {
                (Some(x), Some(y)) => x.compare(y),
                _ => None,
            },
        }
    }

    const fn numeric_repr(&self) -> Option<NumericRepr> {
        match self {
            Self::Int(n) => Some(NumericRepr::Exact(*n as i128)),
            Self::Uint(n) => Some(NumericRepr::Exact(*n as i128)),
            Self::Float(n) => Some(NumericRepr::Approx(*n)),
            _ => None,
        }
    }
}

///
/// NumericRepr
///

#[derive(Clone, Copy)]
enum NumericRepr {
    Exact(i128),
    Approx(f64),
}

impl NumericRepr {
    #[expect(clippy::cast_precision_loss)]
    fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => Some(a.cmp(&b)),
            (Self::Exact(a), Self::Approx(b)) => (a as f64).partial_cmp(&b),
            (Self::Approx(a), Self::Exact(b)) => a.partial_cmp(&(b as f64)),
            (Self::Approx(a), Self::Approx(b)) => a.partial_cmp(&b),
        }
    }
}

///
/// Conversions
///

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Uint(u64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<RepresentedRecord> for Value {
    fn from(value: RepresentedRecord) -> Self {
        Self::Record(Box::new(value))
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

///
/// Serialization
///
/// Output-only: represented data flows one way, towards the serializer.
///

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Uint(n) => serializer.serialize_u64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(values) => values.serialize(serializer),
            Self::Record(record) => record.serialize(serializer),
        }
    }
}

///
/// TESTS
///
