//! Per-column satisfiability checks for one conjunction scope.
//!
//! A column's predicates are folded into a `ColumnDomain`: the finite set of
//! allowed values (from `=` / `in`), the excluded values (from `!=` /
//! `not in`), and the tightest lower and upper range bounds.

use crate::{
    config::RangeCheck,
    model::ColumnId,
    query::predicate::{
        ContradictionError,
        ast::{CompareOp, Operand, Predicate},
    },
    value::Value,
};
use std::{cmp::Ordering, collections::BTreeSet};

///
/// Bound
///

#[derive(Clone, Copy, Debug)]
struct Bound<'a> {
    value: &'a Value,
    inclusive: bool,
}

///
/// ColumnDomain
///

#[derive(Debug, Default)]
pub(crate) struct ColumnDomain<'a> {
    allowed: Option<BTreeSet<&'a Value>>,
    excluded: BTreeSet<&'a Value>,
    lower: Option<Bound<'a>>,
    upper: Option<Bound<'a>>,
}

impl<'a> ColumnDomain<'a> {
    /// Fold the predicates of one column into its domain.
    pub(crate) fn fold<C: 'a>(predicates: impl IntoIterator<Item = &'a Predicate<C>>) -> Self {
        let mut domain = Self::default();
        for predicate in predicates {
            domain.add(predicate.op(), predicate.operand());
        }

        domain
    }

    fn add(&mut self, op: CompareOp, operand: &'a Operand) {
        match (op, operand) {
            (CompareOp::Eq, Operand::Single(value)) => self.allow([value].into_iter().collect()),
            (CompareOp::In, Operand::Set(values)) => self.allow(values.iter().collect()),
            (CompareOp::Ne, Operand::Single(value)) => {
                self.excluded.insert(value);
            }
            (CompareOp::NotIn, Operand::Set(values)) => self.excluded.extend(values.iter()),
            (CompareOp::Gt | CompareOp::Gte, Operand::Single(value)) => {
                let bound = Bound {
                    value,
                    inclusive: op == CompareOp::Gte,
                };
                self.lower = Some(tighter(self.lower, bound, Ordering::Greater));
            }
            (CompareOp::Lt | CompareOp::Lte, Operand::Single(value)) => {
                let bound = Bound {
                    value,
                    inclusive: op == CompareOp::Lte,
                };
                self.upper = Some(tighter(self.upper, bound, Ordering::Less));
            }
            // shape is guaranteed by Predicate construction
            _ => {}
        }
    }

    fn allow(&mut self, values: BTreeSet<&'a Value>) {
        self.allowed = Some(match self.allowed.take() {
            Some(existing) => existing.intersection(&values).copied().collect(),
            None => values,
        });
    }

    /// True when the equality-family predicates admit no value.
    pub(crate) fn equality_empty(&self) -> bool {
        self.allowed
            .as_ref()
            .is_some_and(|allowed| allowed.iter().all(|value| self.excluded.contains(value)))
    }

    /// True when the range bounds (together with any finite allowed set)
    /// admit no value.
    pub(crate) fn range_empty(&self) -> bool {
        if let (Some(lower), Some(upper)) = (self.lower, self.upper) {
            match lower.value.compare(upper.value) {
                Some(Ordering::Greater) => return true,
                Some(Ordering::Equal) if !(lower.inclusive && upper.inclusive) => return true,
                _ => {}
            }
        }

        self.allowed.as_ref().is_some_and(|allowed| {
            !allowed
                .iter()
                .any(|value| !self.excluded.contains(value) && self.within(value))
        })
    }

    fn within(&self, value: &Value) -> bool {
        let above = self.lower.is_none_or(|lower| match value.compare(lower.value) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => lower.inclusive,
            Some(Ordering::Less) => false,
            None => true,
        });
        let below = self.upper.is_none_or(|upper| match value.compare(upper.value) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => upper.inclusive,
            Some(Ordering::Greater) => false,
            None => true,
        });

        above && below
    }
}

// Keep whichever bound is stricter; `wanted` is the ordering a stricter
// bound has relative to the current one (Greater for lower bounds).
fn tighter<'a>(current: Option<Bound<'a>>, candidate: Bound<'a>, wanted: Ordering) -> Bound<'a> {
    let Some(current) = current else {
        return candidate;
    };

    match candidate.value.compare(current.value) {
        Some(ordering) if ordering == wanted => candidate,
        Some(Ordering::Equal) => Bound {
            value: current.value,
            inclusive: current.inclusive && candidate.inclusive,
        },
        _ => current,
    }
}

/// Check the equality-family predicates of one column in one scope.
/// Runs each time a predicate is added.
pub(crate) fn check_equality<'a, C, P>(predicates: P, column: &C) -> Result<(), ContradictionError>
where
    C: ColumnId + 'a,
    P: IntoIterator<Item = &'a Predicate<C>>,
{
    let domain = ColumnDomain::fold(predicates.into_iter().filter(|p| p.column() == column));

    if domain.equality_empty() {
        return Err(ContradictionError::ConflictingEquality {
            column: column.name().to_string(),
        });
    }

    Ok(())
}

/// Check every column of one scope when it is frozen.
pub(crate) fn check_group<'a, C, P>(predicates: P, range: RangeCheck) -> Result<(), ContradictionError>
where
    C: ColumnId + 'a,
    P: IntoIterator<Item = &'a Predicate<C>> + Copy,
{
    let columns: BTreeSet<&C> = predicates.into_iter().map(Predicate::column).collect();

    for column in columns {
        let domain =
            ColumnDomain::fold(predicates.into_iter().filter(|p| p.column() == column));

        if domain.equality_empty() {
            return Err(ContradictionError::ConflictingEquality {
                column: column.name().to_string(),
            });
        }
        if range == RangeCheck::AtBuild && domain.range_empty() {
            return Err(ContradictionError::EmptyRange {
                column: column.name().to_string(),
            });
        }
    }

    Ok(())
}
