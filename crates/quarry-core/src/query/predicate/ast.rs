use crate::{
    model::{Column, ColumnId},
    query::predicate::PredicateError,
    value::Value,
};
use serde::Serialize;
use std::{collections::BTreeSet, fmt};

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    NotIn,
}

impl CompareOp {
    /// Return true for the range operators.
    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(self, Self::Gt | Self::Lt | Self::Gte | Self::Lte)
    }

    /// Return true for operators taking a value set operand.
    #[must_use]
    pub const fn takes_set(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

///
/// Operand
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Operand {
    Single(Value),
    Set(BTreeSet<Value>),
}

impl Operand {
    /// Iterate every value carried by this operand.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        let (single, set) = match self {
            Self::Single(value) => (Some(value), None),
            Self::Set(values) => (None, Some(values.iter())),
        };

        single.into_iter().chain(set.into_iter().flatten())
    }
}

///
/// Predicate
///
/// One resolved comparison: column, operator, operand.
/// Construction through `Predicate::new` guarantees the operand shape fits
/// the operator and every operand value fits the column value type.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Predicate<C = Column> {
    column: C,
    op: CompareOp,
    operand: Operand,
}

impl<C: ColumnId> Predicate<C> {
    /// Build a checked predicate.
    pub fn new(column: C, op: CompareOp, operand: Operand) -> Result<Self, PredicateError> {
        let value_type = column.value_type();

        match (&operand, op.takes_set()) {
            (Operand::Single(_), false) => {}
            (Operand::Set(values), true) => {
                if values.is_empty() {
                    return Err(PredicateError::EmptyOperandSet {
                        column: column.name().to_string(),
                    });
                }
            }
            _ => {
                return Err(PredicateError::OperandShape {
                    column: column.name().to_string(),
                    op,
                });
            }
        }

        if op.is_range() && !value_type.supports_ordering() {
            return Err(PredicateError::UnsupportedOperator {
                column: column.name().to_string(),
                op,
                value_type,
            });
        }

        if let Some(value) = operand.values().find(|value| !value_type.accepts(value)) {
            return Err(PredicateError::TypeMismatch {
                column: column.name().to_string(),
                expected: value_type,
                found: value.value_type(),
            });
        }

        Ok(Self {
            column,
            op,
            operand,
        })
    }

    /// Single-value comparison.
    pub fn compare(column: C, op: CompareOp, value: Value) -> Result<Self, PredicateError> {
        Self::new(column, op, Operand::Single(value))
    }

    /// Set membership (`in`).
    pub fn in_set<It>(column: C, values: It) -> Result<Self, PredicateError>
    where
        It: IntoIterator<Item = Value>,
    {
        Self::new(column, CompareOp::In, Operand::Set(values.into_iter().collect()))
    }

    /// Set exclusion (`not in`).
    pub fn not_in_set<It>(column: C, values: It) -> Result<Self, PredicateError>
    where
        It: IntoIterator<Item = Value>,
    {
        Self::new(
            column,
            CompareOp::NotIn,
            Operand::Set(values.into_iter().collect()),
        )
    }

    /// Swap the column representation, keeping operator and operand.
    #[must_use]
    pub fn map_column<D>(self, f: impl FnOnce(C) -> D) -> Predicate<D> {
        Predicate {
            column: f(self.column),
            op: self.op,
            operand: self.operand,
        }
    }

    // Typed construction path: the column/value pairing is already fixed
    // by the type system, only operand emptiness remains to check.
    pub(crate) const fn from_parts(column: C, op: CompareOp, operand: Operand) -> Self {
        Self {
            column,
            op,
            operand,
        }
    }
}

impl<C> Predicate<C> {
    #[must_use]
    pub const fn column(&self) -> &C {
        &self.column
    }

    #[must_use]
    pub const fn op(&self) -> CompareOp {
        self.op
    }

    #[must_use]
    pub const fn operand(&self) -> &Operand {
        &self.operand
    }
}

impl<C: fmt::Display> fmt::Display for Predicate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.column, self.op)?;

        match &self.operand {
            Operand::Single(value) => write!(f, "{value}"),
            Operand::Set(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}
