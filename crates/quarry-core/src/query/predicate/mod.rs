//! Module: query::predicate
//! Responsibility: single-comparison predicates, their evaluation, and the
//! per-column satisfiability checks used by the builder.
//! Does not own: logical composition (see `query::subject`).

mod ast;
pub(crate) mod domain;
mod eval;


use crate::value::ValueType;
use thiserror::Error as ThisError;

pub use ast::{CompareOp, Operand, Predicate};

///
/// PredicateError
///
/// Failures constructing a single predicate or resolving its column.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PredicateError {
    #[error("column '{column}' expects {expected} operands, got {found}")]
    TypeMismatch {
        column: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("operator '{op}' is not supported on column '{column}' of type {value_type}")]
    UnsupportedOperator {
        column: String,
        op: CompareOp,
        value_type: ValueType,
    },

    #[error("operator '{op}' on column '{column}' received the wrong operand shape")]
    OperandShape { column: String, op: CompareOp },

    #[error("set operand for column '{column}' must not be empty")]
    EmptyOperandSet { column: String },

    #[error("column '{column}' does not belong to entity '{entity}'")]
    UnknownColumn {
        entity: &'static str,
        column: String,
    },
}

///
/// ContradictionError
///
/// Predicates in one conjunction scope that no record can satisfy.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ContradictionError {
    #[error("equality constraints on column '{column}' cannot all hold")]
    ConflictingEquality { column: String },

    #[error("range constraints on column '{column}' admit no value")]
    EmptyRange { column: String },

    #[error("id selections do not share any identifier")]
    DisjointIdSelection,

    #[error("every alternative of the disjunction is contradictory")]
    AllAlternativesEmpty,
}
