//! Module: query
//! Responsibility: typed query construction and the two frozen query forms.
//!
//! Flow: `EntityState::new_query()` → column criteria / `either` / ordering /
//! mask / limit on `QueryBuilder` → `build()` → `EntityQuery` →
//! `to_record_query()` → `RecordQuery` for the storage engine.

mod builder;
mod entity;
mod limit;
mod mask;
mod order;
pub mod predicate;
mod record;
mod subject;


use crate::error::ErrorClass;
use thiserror::Error as ThisError;

// re-exports
pub use builder::{BuilderError, Criterion, Either, IdCriterion, QueryBuilder};
pub use entity::EntityQuery;
pub use limit::Limit;
pub use mask::Mask;
pub use order::{OrderDirection, OrderSpec};
pub use predicate::{CompareOp, ContradictionError, Operand, Predicate, PredicateError};
pub use record::RecordQuery;
pub use subject::{IdFilter, PredicateGroup, Subject};

///
/// QueryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("{0}")]
    Predicate(#[from] PredicateError),

    #[error("{0}")]
    Contradiction(#[from] ContradictionError),

    #[error("{0}")]
    Builder(#[from] BuilderError),
}

impl QueryError {
    /// Stable classification of this failure.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Predicate(err) => match err {
                PredicateError::TypeMismatch { .. } | PredicateError::UnsupportedOperator { .. } => {
                    ErrorClass::TypeMismatch
                }
                PredicateError::OperandShape { .. } | PredicateError::EmptyOperandSet { .. } => {
                    ErrorClass::InvalidOperand
                }
                PredicateError::UnknownColumn { .. } => ErrorClass::UnknownColumn,
            },
            Self::Contradiction(_) => ErrorClass::Contradiction,
            Self::Builder(err) => match err {
                BuilderError::InvalidLimit { .. } => ErrorClass::InvalidLimit,
                BuilderError::DuplicateOrder { .. }
                | BuilderError::UnorderableColumn { .. }
                | BuilderError::BranchNotFilterOnly { .. } => ErrorClass::Unsupported,
            },
        }
    }
}
