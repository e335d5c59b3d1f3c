use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

///
/// QueryMetrics
/// Ephemeral, in-memory counters for builder activity.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct QueryMetrics {
    pub ops: QueryOps,
    pub entities: BTreeMap<String, EntityCounters>,
}

///
/// QueryOps
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct QueryOps {
    // Builder outcomes
    pub queries_built: u64,
    pub queries_rejected: u64,

    // Shape of built subjects
    pub predicates_built: u64,
    pub alternatives_built: u64,

    // Rejections by class
    pub type_mismatches: u64,
    pub invalid_operands: u64,
    pub contradictions: u64,
    pub invalid_limits: u64,
    pub unknown_columns: u64,
    pub unsupported: u64,

    // Conversions
    pub record_projections: u64,
    pub copies: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EntityCounters {
    pub queries_built: u64,
    pub queries_rejected: u64,
    pub record_projections: u64,
    pub copies: u64,
}

thread_local! {
    static QUERY_METRICS: RefCell<QueryMetrics> = RefCell::new(QueryMetrics::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&QueryMetrics) -> R) -> R {
    QUERY_METRICS.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut QueryMetrics) -> R) -> R {
    QUERY_METRICS.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = QueryMetrics::default());
}

/// Snapshot the current counters.
pub(crate) fn report() -> QueryMetrics {
    with_state(Clone::clone)
}
