//! ## Crate layout
//! - `config`: builder policies (order conflicts, range checks), TOML loading.
//! - `error`: stable error classification shared by every layer.
//! - `model`: column identifiers, typed and generic.
//! - `obs`: query event sink and per-thread metrics.
//! - `query`: the typed builder, `EntityQuery`, and the generic `RecordQuery`.
//! - `traits`: column values, entity-state shapes, record views.
//! - `value`: the runtime value model.
//!
//! Entity-state shapes and their column value types are declared with
//! `#[derive(EntityState)]` and `#[derive(ColumnValue)]`:
//!
//! ```
//! use quarry::prelude::*;
//!
//! #[derive(ColumnValue, Clone, Copy)]
//! pub enum Status {
//!     Started,
//!     Done,
//! }
//!
//! #[derive(EntityState)]
//! pub struct Task {
//!     pub status: Status,
//!     pub days_open: u32,
//! }
//!
//! let query = Task::new_query::<u64>()
//!     .status()
//!     .is_not(Status::Done)
//!     .days_open()
//!     .is_greater_than(30)
//!     .build()
//!     .expect("valid query");
//!
//! assert_eq!(query.subject().predicate_count(), 2);
//! ```

pub use quarry_core::{config, error, model, obs, query, traits, value};
pub use quarry_derive::{ColumnValue, EntityState};

// generated code refers to `::quarry` paths
extern crate self as quarry;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///
/// Query vocabulary plus both derives. Traits are imported so generated
/// accessor traits and `EntityState::new_query` resolve without further
/// imports.
///

pub mod prelude {
    pub use quarry_core::prelude::*;
    pub use quarry_derive::{ColumnValue, EntityState};
}
