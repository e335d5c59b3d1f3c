//! Query event sink boundary.
//!
//! Builder and projection code never touch `obs::metrics` directly.
//! Every event flows through `QueryEvent` and `QuerySink`; this module is
//! the only bridge between construction logic and the metrics state.

use crate::{error::ErrorClass, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn QuerySink>> = RefCell::new(None);
}

///
/// QueryEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryEvent {
    Built {
        entity: &'static str,
        predicates: u64,
        alternatives: u64,
    },
    Rejected {
        entity: &'static str,
        class: ErrorClass,
    },
    Projected {
        entity: &'static str,
    },
    Copied {
        entity: &'static str,
    },
}

///
/// QuerySink
///

pub trait QuerySink {
    fn record(&self, event: QueryEvent);
}

/// GlobalQuerySink
/// Default sink writing into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalQuerySink;

impl QuerySink for GlobalQuerySink {
    fn record(&self, event: QueryEvent) {
        match event {
            QueryEvent::Built {
                entity,
                predicates,
                alternatives,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.queries_built = m.ops.queries_built.saturating_add(1);
                    m.ops.predicates_built = m.ops.predicates_built.saturating_add(predicates);
                    m.ops.alternatives_built =
                        m.ops.alternatives_built.saturating_add(alternatives);

                    let entry = m.entities.entry(entity.to_string()).or_default();
                    entry.queries_built = entry.queries_built.saturating_add(1);
                });
            }

            QueryEvent::Rejected { entity, class } => {
                metrics::with_state_mut(|m| {
                    m.ops.queries_rejected = m.ops.queries_rejected.saturating_add(1);

                    let counter = match class {
                        ErrorClass::TypeMismatch => &mut m.ops.type_mismatches,
                        ErrorClass::InvalidOperand => &mut m.ops.invalid_operands,
                        ErrorClass::Contradiction => &mut m.ops.contradictions,
                        ErrorClass::InvalidLimit => &mut m.ops.invalid_limits,
                        ErrorClass::UnknownColumn => &mut m.ops.unknown_columns,
                        ErrorClass::Unsupported => &mut m.ops.unsupported,
                    };
                    *counter = counter.saturating_add(1);

                    let entry = m.entities.entry(entity.to_string()).or_default();
                    entry.queries_rejected = entry.queries_rejected.saturating_add(1);
                });
            }

            QueryEvent::Projected { entity } => {
                metrics::with_state_mut(|m| {
                    m.ops.record_projections = m.ops.record_projections.saturating_add(1);
                    let entry = m.entities.entry(entity.to_string()).or_default();
                    entry.record_projections = entry.record_projections.saturating_add(1);
                });
            }

            QueryEvent::Copied { entity } => {
                metrics::with_state_mut(|m| {
                    m.ops.copies = m.ops.copies.saturating_add(1);
                    let entry = m.entities.entry(entity.to_string()).or_default();
                    entry.copies = entry.copies.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_QUERY_SINK: GlobalQuerySink = GlobalQuerySink;

pub(crate) fn record(event: QueryEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // Preconditions:
        // - `ptr` was produced from a valid `&dyn QuerySink` in `with_query_sink`.
        // - `with_query_sink` always restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        //
        // Aliasing:
        // - Only a shared reference is materialized, matching the shared borrow
        //   used to install the override.
        //
        // What would break this:
        // - A restore path that skips `Guard`, leaving `ptr` dangling.
        // - Storing or dispatching `ptr` asynchronously.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_QUERY_SINK.record(event);
    }
}

/// Snapshot the current query metrics.
#[must_use]
pub fn metrics_report() -> metrics::QueryMetrics {
    metrics::report()
}

/// Reset all query metrics.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary query sink override.
///
/// Events recorded on this thread while `f` runs go to `sink` instead of the
/// global metrics state. Overrides nest; the previous sink is restored on
/// return and on unwind.
pub fn with_query_sink<T>(sink: &dyn QuerySink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn QuerySink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // Preconditions:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    //
    // Aliasing:
    // - The lifetime is erased to a raw pointer but access stays shared.
    //
    // What would break this:
    // - Any deferred use of `sink_ptr` beyond this scope.
    // - Any path that bypasses Guard restoration.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn QuerySink, *const dyn QuerySink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}
