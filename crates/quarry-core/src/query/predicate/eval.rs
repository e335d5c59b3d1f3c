use crate::{
    model::ColumnId,
    query::predicate::ast::{CompareOp, Operand, Predicate},
    traits::RecordView,
    value::Value,
};
use std::cmp::Ordering;

impl<C: ColumnId> Predicate<C> {
    /// Evaluate this predicate against one record.
    ///
    /// Absent fields never match, not even under `!=` or `not in`.
    #[must_use]
    pub fn matches<R: RecordView + ?Sized>(&self, record: &R) -> bool {
        let Some(actual) = record.value(self.column().name()) else {
            return false;
        };

        eval_compare(&actual, self.op(), self.operand())
    }
}

fn eval_compare(actual: &Value, op: CompareOp, operand: &Operand) -> bool {
    match (op, operand) {
        (CompareOp::Eq, Operand::Single(expected)) => actual == expected,
        (CompareOp::Ne, Operand::Single(expected)) => actual != expected,
        (CompareOp::Gt, Operand::Single(expected)) => {
            actual.compare(expected) == Some(Ordering::Greater)
        }
        (CompareOp::Lt, Operand::Single(expected)) => {
            actual.compare(expected) == Some(Ordering::Less)
        }
        (CompareOp::Gte, Operand::Single(expected)) => matches!(
            actual.compare(expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        (CompareOp::Lte, Operand::Single(expected)) => matches!(
            actual.compare(expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        (CompareOp::In, Operand::Set(values)) => values.contains(actual),
        (CompareOp::NotIn, Operand::Set(values)) => !values.contains(actual),
        _ => false,
    }
}
