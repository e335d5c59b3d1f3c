//! Disjunction support for the builder.
//!
//! Each branch is evaluated on a fresh sub-builder and reduced to its
//! disjunctive groups: the branch conjunction alone, or the branch
//! conjunction joined with each of the branch's own alternatives. The
//! parent then keeps its flat "conjunction + alternatives" shape:
//!
//! - no groups (zero branches) leaves the parent untouched;
//! - an empty group makes the disjunction trivially true, also a no-op;
//! - exactly one group is folded into the parent conjunction;
//! - otherwise the groups are crossed with the parent's existing
//!   alternatives and unsatisfiable products are dropped.

use crate::{
    config::QueryConfig,
    query::{QueryError, builder::QueryBuilder, subject::PredicateGroup},
    traits::{EntityId, EntityState},
};
use std::{collections::BTreeSet, marker::PhantomData};

///
/// Either
///
/// Collector for the branches of one `either` call.
///

#[must_use]
pub struct Either<I, S> {
    config: QueryConfig,
    groups: Vec<PredicateGroup>,
    error: Option<QueryError>,
    _marker: PhantomData<fn() -> (I, S)>,
}

impl<I: EntityId, S: EntityState> Either<I, S> {
    pub(super) const fn new(config: QueryConfig) -> Self {
        Self {
            config,
            groups: Vec::new(),
            error: None,
            _marker: PhantomData,
        }
    }

    /// Add one alternative. The branch only sees its own sub-builder.
    pub fn or<F>(mut self, branch: F) -> Self
    where
        F: FnOnce(QueryBuilder<I, S>) -> QueryBuilder<I, S>,
    {
        if self.error.is_some() {
            return self;
        }

        let sub = branch(QueryBuilder::branch(self.config));
        match sub.into_groups() {
            Ok(groups) => self.groups.extend(groups),
            Err(err) => self.error = Some(err),
        }
        self
    }
}

impl<I: EntityId, S: EntityState> QueryBuilder<I, S> {
    // Merge a completed disjunction into this builder.
    pub(super) fn absorb(mut self, either: Either<I, S>) -> Self {
        if self.error.is_some() {
            return self;
        }
        if let Some(err) = either.error {
            self.latch(err);
            return self;
        }

        let groups: BTreeSet<PredicateGroup> = either.groups.into_iter().collect();
        if groups.is_empty() || groups.iter().any(|group| group.is_empty()) {
            return self;
        }

        if groups.len() == 1 {
            for predicate in groups.into_iter().flatten() {
                self.push(predicate);
            }
            return self;
        }

        let product: Vec<PredicateGroup> = if self.alternatives.is_empty() {
            groups.into_iter().collect()
        } else {
            self.alternatives
                .iter()
                .flat_map(|existing| groups.iter().map(|group| existing.and(group)))
                .collect()
        };

        match self.prune(product) {
            Ok(kept) if kept.len() == 1 => {
                self.alternatives.clear();
                for predicate in kept.into_iter().flatten() {
                    self.push(predicate);
                }
            }
            Ok(kept) => self.alternatives = kept,
            Err(err) => self.latch(err),
        }

        self
    }

    // Reduce a finished branch to its disjunctive groups.
    fn into_groups(self) -> Result<Vec<PredicateGroup>, QueryError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let (conjunction, alternatives) = self.freeze_scope()?;
        if alternatives.is_empty() {
            return Ok(vec![conjunction]);
        }

        Ok(alternatives
            .iter()
            .map(|group| conjunction.and(group))
            .collect())
    }
}
