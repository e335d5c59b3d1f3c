//! Core of Quarry: typed entity-query construction, the predicate compiler,
//! and the generic record-query form consumed by storage engines.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod model;
pub mod obs;
pub mod query;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Prelude contains only the vocabulary needed to write queries.
/// No errors, sinks or config types are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{Column, TypedColumn},
        query::{EntityQuery, OrderDirection, QueryBuilder, RecordQuery},
        traits::{ColumnValue, EntityId, EntityState, RecordView},
        value::Value,
    };
}
