//! Engine tracing boundary.
//!
//! Tracing is optional, injected by the embedder, and must not affect
//! representation semantics. Events flow through `TraceSink`; the
//! default sink discards them.

use std::{cell::RefCell, rc::Rc};

///
/// TraceEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TraceEvent<'a> {
    /// A mode transform was resolved for one record, possibly
    /// delegated to a concrete subtype's definition.
    ModeDispatched {
        record_type: &'a str,
        mode: &'a str,
        delegated_to: Option<&'a str>,
    },

    /// A dataset modifier shaped a query handle.
    DatasetModified { record_type: &'a str, mode: &'a str },

    /// A collection executed its load call.
    CollectionLoaded { rows: u64 },

    /// A paginator ran against a loaded collection.
    PaginatorApplied {
        record_type: &'a str,
        paginator: &'a str,
        rows: u64,
    },
}

///
/// TraceSink
///

pub trait TraceSink {
    fn on_event(&self, event: TraceEvent<'_>);
}

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn TraceSink>>> = const { RefCell::new(None) };
}

/// Emit one event to the scoped sink, if any is installed.
pub(crate) fn record(event: TraceEvent<'_>) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    if let Some(sink) = sink {
        sink.on_event(event);
    }
}

/// Run a closure with a scoped trace sink override.
///
/// The previous sink is restored on all exits, including unwind.
pub fn with_trace_sink<T>(sink: Rc<dyn TraceSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn TraceSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
