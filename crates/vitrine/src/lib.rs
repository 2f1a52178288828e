//! Vitrine: a declarative representation and pagination engine.
//!
//! ## Crate layout
//! - `core`: the engine — registry, definitions, collections, values,
//!   paginators, and the tracing seam.
//!
//! The `prelude` module mirrors the surface used by embedding code:
//! register definitions during boot, then represent records and
//! queries per request.

pub use vitrine_core as core;

pub use vitrine_core::{
    DEFAULT_PAGE_SIZE, Error, MAX_PAGE_SIZE,
    registry::RepresenterRegistry,
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use vitrine_core::prelude::*;
    pub use vitrine_core::{
        definition::{HelperFn, ModifierFn, TransformFn, helper},
        obs::{TraceEvent, TraceSink, with_trace_sink},
        paginate::{self, PaginatorFn},
        plugin::PluginDescriptor,
    };
}
