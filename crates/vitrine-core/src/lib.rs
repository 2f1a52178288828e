//! Core runtime for Vitrine: the representation and pagination engine.
//!
//! Record types register named modes (record-to-output transforms),
//! optional dataset modifiers, and pagination strategies during a boot
//! phase; at request time the registry resolves and applies them for
//! single records or whole query handles, including concrete-subtype
//! dispatch for tagged rows.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod collection;
pub mod definition;
pub mod error;
pub mod obs;
pub mod paginate;
pub mod plugin;
pub mod predicate;
pub mod record;
pub mod registry;
pub mod source;
pub mod value;

pub(crate) mod dispatch;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;

///
/// CONSTANTS
///

/// Page size used when the request carries no `limit`.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Hard cap on the page size a request may ask for.
pub const MAX_PAGE_SIZE: u64 = 100;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No sinks, helpers, or error internals are re-exported here.
///

pub mod prelude {
    pub use crate::{
        collection::RepresentableCollection,
        definition::{
            ModeContext, RecordType, RepresentOptions, RepresentTarget, Represented,
            RepresenterDefinition,
        },
        error::Error,
        paginate::PageParams,
        predicate::{Cmp, FieldRef, Predicate},
        record::RepresentedRecord,
        registry::RepresenterRegistry,
        source::{BoxedRecord, BoxedSource, Direction, QuerySource, SourceRecord, SourceRecordExt as _},
        value::Value,
    };
}
