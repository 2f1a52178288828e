use crate::{
    error::{Error, ErrorClass},
    predicate::Predicate,
    value::Value,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// SourceError
///

#[derive(Debug, ThisError)]
pub enum SourceError {
    #[error("missing attribute '{attribute}'")]
    MissingAttribute { attribute: String },

    #[error("query source load failed: {message}")]
    Load { message: String },
}

impl SourceError {
    #[must_use]
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingAttribute { .. } => ErrorClass::NotFound,
            Self::Load { .. } => ErrorClass::Internal,
        }
    }
}

///
/// Direction
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Asc,
    Desc,
}

///
/// QuerySource
///
/// Capability over the collaborator's query machinery. The engine
/// never inspects storage; it only composes these operations and
/// triggers `load` once bounds are in place.
///

pub trait QuerySource: Send {
    fn filter(&mut self, predicate: Predicate);

    fn order_by(&mut self, field: &str, direction: Direction);

    fn limit(&mut self, limit: u64);

    fn offset(&mut self, offset: u64);

    /// Execute the shaped query. The only blocking point in the engine.
    fn load(&mut self) -> Result<Vec<BoxedRecord>, SourceError>;
}

pub type BoxedSource = Box<dyn QuerySource>;

impl fmt::Debug for dyn QuerySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QuerySource")
    }
}

///
/// SourceRecord
///
/// Raw record capability: attribute access plus the concrete-type tag
/// consulted by dispatch.
///

pub trait SourceRecord: Send {
    fn get(&self, attribute: &str) -> Option<Value>;

    /// Concrete type tag. For plain record types this equals the
    /// registered record type name; for subtype-tagged rows it names
    /// the subtype.
    fn type_tag(&self) -> &str;
}

pub type BoxedRecord = Box<dyn SourceRecord>;

impl fmt::Debug for dyn SourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRecord")
            .field("type_tag", &self.type_tag())
            .finish()
    }
}

///
/// SourceRecordExt
/// Fallible attribute access for transforms.
///

pub trait SourceRecordExt: SourceRecord {
    /// Fetch an attribute, failing with the attribute name on a miss.
    fn fetch(&self, attribute: &str) -> Result<Value, Error> {
        self.get(attribute).ok_or_else(|| {
            SourceError::MissingAttribute {
                attribute: attribute.to_string(),
            }
            .into()
        })
    }

    /// Fetch an attribute, falling back to `default` on a miss.
    fn fetch_or(&self, attribute: &str, default: impl Into<Value>) -> Value {
        self.get(attribute).unwrap_or_else(|| default.into())
    }
}

impl<R: SourceRecord + ?Sized> SourceRecordExt for R {}

///
/// TESTS
///
