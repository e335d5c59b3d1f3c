//! Module: query::subject
//! Responsibility: the frozen logical filter of a query: one conjunction
//! group, optional alternative groups, and the id selection.
//! Does not own: contradiction detection (see `query::predicate::domain`).

mod id;


use crate::{
    model::{Column, ColumnId},
    query::predicate::Predicate,
    traits::RecordView,
};
use derive_more::{Deref, IntoIterator};
use serde::Serialize;
use std::collections::BTreeSet;

pub use id::IdFilter;

///
/// PredicateGroup
///
/// Predicates that must all hold together. Set semantics: insertion order
/// and duplicates never affect equality.
///

#[derive(Clone, Debug, Deref, Eq, Hash, IntoIterator, Ord, PartialEq, PartialOrd, Serialize)]
#[into_iterator(owned, ref)]
pub struct PredicateGroup<C = Column>(BTreeSet<Predicate<C>>);

impl<C> PredicateGroup<C> {
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeSet::new())
    }
}

impl<C: ColumnId> PredicateGroup<C> {
    #[must_use]
    pub fn new(predicates: impl IntoIterator<Item = Predicate<C>>) -> Self {
        Self(predicates.into_iter().collect())
    }

    /// True when every predicate holds for `record`; an empty group always holds.
    #[must_use]
    pub fn matches<R: RecordView + ?Sized>(&self, record: &R) -> bool {
        self.0.iter().all(|predicate| predicate.matches(record))
    }

    #[must_use]
    pub fn map_columns<D: Ord>(self, f: impl Fn(C) -> D) -> PredicateGroup<D> {
        PredicateGroup(self.0.into_iter().map(|p| p.map_column(&f)).collect())
    }

    pub(crate) fn insert(&mut self, predicate: Predicate<C>) -> bool {
        self.0.insert(predicate)
    }

    /// Union of two groups: both must hold.
    #[must_use]
    pub(crate) fn and(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }
}

impl<C> Default for PredicateGroup<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: ColumnId> FromIterator<Predicate<C>> for PredicateGroup<C> {
    fn from_iter<T: IntoIterator<Item = Predicate<C>>>(iter: T) -> Self {
        Self::new(iter)
    }
}

///
/// Subject
///
/// Satisfied by a record iff the conjunction holds and, when alternatives
/// exist, at least one alternative group holds.
///
/// Normal form: `alternatives` is either empty or holds at least two
/// non-empty groups. A single alternative is folded into the conjunction,
/// and an empty alternative makes the whole disjunction trivially true.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Subject<C = Column> {
    conjunction: PredicateGroup<C>,
    alternatives: BTreeSet<PredicateGroup<C>>,
}

impl<C: ColumnId> Subject<C> {
    #[must_use]
    pub fn new(
        mut conjunction: PredicateGroup<C>,
        alternatives: impl IntoIterator<Item = PredicateGroup<C>>,
    ) -> Self {
        let mut alternatives: BTreeSet<_> = alternatives.into_iter().collect();

        if alternatives.iter().any(|group| group.is_empty()) {
            alternatives.clear();
        }
        if alternatives.len() == 1 {
            for group in std::mem::take(&mut alternatives) {
                conjunction = conjunction.and(&group);
            }
        }

        Self {
            conjunction,
            alternatives,
        }
    }

    #[must_use]
    pub const fn conjunction(&self) -> &PredicateGroup<C> {
        &self.conjunction
    }

    #[must_use]
    pub const fn alternatives(&self) -> &BTreeSet<PredicateGroup<C>> {
        &self.alternatives
    }

    /// True when the subject places no constraint on records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conjunction.is_empty() && self.alternatives.is_empty()
    }

    /// Total number of predicates across the conjunction and every alternative.
    #[must_use]
    pub fn predicate_count(&self) -> usize {
        self.conjunction.len() + self.alternatives.iter().map(|g| g.len()).sum::<usize>()
    }

    #[must_use]
    pub fn matches<R: RecordView + ?Sized>(&self, record: &R) -> bool {
        self.conjunction.matches(record)
            && (self.alternatives.is_empty()
                || self.alternatives.iter().any(|group| group.matches(record)))
    }

    /// Swap the column representation of every predicate.
    #[must_use]
    pub fn map_columns<D: ColumnId>(self, f: impl Fn(C) -> D) -> Subject<D> {
        Subject {
            conjunction: self.conjunction.map_columns(&f),
            alternatives: self
                .alternatives
                .into_iter()
                .map(|group| group.map_columns(&f))
                .collect(),
        }
    }

    /// Fallible column swap; the first failure wins.
    pub fn try_map_columns<D, E>(self, f: impl Fn(&C) -> Result<D, E>) -> Result<Subject<D>, E>
    where
        D: ColumnId,
    {
        let map_group = |group: PredicateGroup<C>| -> Result<PredicateGroup<D>, E> {
            group
                .into_iter()
                .map(|predicate| {
                    let column = f(predicate.column())?;
                    Ok(predicate.map_column(|_| column))
                })
                .collect()
        };

        Ok(Subject {
            conjunction: map_group(self.conjunction)?,
            alternatives: self
                .alternatives
                .into_iter()
                .map(map_group)
                .collect::<Result<_, E>>()?,
        })
    }

    // Builder path: parts already satisfy the normal form.
    pub(crate) const fn from_parts(
        conjunction: PredicateGroup<C>,
        alternatives: BTreeSet<PredicateGroup<C>>,
    ) -> Self {
        Self {
            conjunction,
            alternatives,
        }
    }
}

impl<C> Default for Subject<C> {
    fn default() -> Self {
        Self {
            conjunction: PredicateGroup::default(),
            alternatives: BTreeSet::new(),
        }
    }
}
