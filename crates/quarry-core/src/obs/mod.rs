//! Observability: builder telemetry and sink abstractions.
//!
//! Nothing here influences query construction; events are recorded after
//! the outcome is decided.

pub(crate) mod metrics;
pub(crate) mod sink;


// re-exports
pub use metrics::{EntityCounters, QueryMetrics, QueryOps};
pub use sink::{QueryEvent, QuerySink, metrics_report, metrics_reset_all, with_query_sink};
