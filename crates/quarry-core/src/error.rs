use serde::Serialize;
use std::fmt;

///
/// ErrorClass
///
/// Stable classification of query-construction failures.
/// Every construction error maps to exactly one class; none of them are
/// retryable, the caller fixes the input and rebuilds.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ErrorClass {
    /// Operand type or operator does not fit the column value type.
    TypeMismatch,

    /// Operand shape is invalid (empty `in` set, single vs set mismatch).
    InvalidOperand,

    /// Predicates in one conjunction scope cannot all hold.
    Contradiction,

    /// Non-positive result limit.
    InvalidLimit,

    /// Column does not belong to the queried entity-state shape.
    UnknownColumn,

    /// Structurally unsupported builder usage.
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TypeMismatch => "type_mismatch",
            Self::InvalidOperand => "invalid_operand",
            Self::Contradiction => "contradiction",
            Self::InvalidLimit => "invalid_limit",
            Self::UnknownColumn => "unknown_column",
            Self::Unsupported => "unsupported",
        };

        f.write_str(label)
    }
}
