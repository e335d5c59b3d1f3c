//! Module: query::builder
//! Responsibility: typed, by-value accumulation of criteria, ordering, mask
//! and limit, frozen into an `EntityQuery` by `build()`.
//! Does not own: predicate validity (see `query::predicate`) or the frozen
//! query value types.

mod criterion;
mod either;


use crate::{
    config::{QueryConfig, RangeCheck},
    model::{ColumnOf, TypedColumn},
    obs::sink::{self, QueryEvent},
    query::{
        QueryError,
        entity::EntityQuery,
        limit::Limit,
        mask::Mask,
        order::{OrderDirection, OrderSpec},
        predicate::{ContradictionError, Predicate, PredicateError, domain},
        subject::{IdFilter, PredicateGroup, Subject},
    },
    traits::{EntityId, EntityState},
};
use std::{collections::BTreeSet, marker::PhantomData};
use thiserror::Error as ThisError;

pub use criterion::{Criterion, IdCriterion};
pub use either::Either;

///
/// BuilderError
///
/// Structural misuse of the builder, independent of predicate content.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum BuilderError {
    #[error("limit must be positive, got {limit}")]
    InvalidLimit { limit: u32 },

    #[error("column '{column}' is already ordered")]
    DuplicateOrder { column: String },

    #[error("column '{column}' has no ordering")]
    UnorderableColumn { column: String },

    #[error("'{operation}' is not allowed inside an either branch")]
    BranchNotFilterOnly { operation: &'static str },
}

///
/// Scope
/// Root builders own the whole query; branch builders only contribute
/// predicates to one alternative of an `either`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Scope {
    Root,
    Branch,
}

///
/// QueryBuilder
///
/// Single-use accumulator for one typed query over entity state `S` keyed
/// by `I`. Every method takes and returns the builder by value; the first
/// error encountered is latched and returned from `build()`.
///

#[must_use]
pub struct QueryBuilder<I, S> {
    config: QueryConfig,
    scope: Scope,
    replayed_unchecked: bool,
    ids: IdFilter<I>,
    conjunction: PredicateGroup,
    alternatives: BTreeSet<PredicateGroup>,
    order: OrderSpec,
    mask: Mask,
    limit: Option<Limit>,
    error: Option<QueryError>,
    _marker: PhantomData<fn() -> S>,
}

impl<I: EntityId, S: EntityState> QueryBuilder<I, S> {
    /// Fresh builder with the default config.
    pub fn new() -> Self {
        Self::with_scope(QueryConfig::default(), Scope::Root)
    }

    const fn with_scope(config: QueryConfig, scope: Scope) -> Self {
        Self {
            config,
            scope,
            replayed_unchecked: false,
            ids: IdFilter::all(),
            conjunction: PredicateGroup::empty(),
            alternatives: BTreeSet::new(),
            order: OrderSpec::new(),
            mask: Mask::empty(),
            limit: None,
            error: None,
            _marker: PhantomData,
        }
    }

    // Sub-builder for one `either` branch; inherits the parent's config.
    const fn branch(config: QueryConfig) -> Self {
        Self::with_scope(config, Scope::Branch)
    }

    /// Replace the builder policies. Later calls win.
    pub const fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> QueryConfig {
        self.config
    }

    // Predicates replayed from a query built without the range check were
    // already accepted; this builder then freezes without it too.
    pub(crate) const fn replaying(mut self, built_under: RangeCheck) -> Self {
        if matches!(built_under, RangeCheck::Deferred) {
            self.replayed_unchecked = true;
        }
        self
    }

    // Range policy in force for this builder's scopes.
    const fn range_check(&self) -> RangeCheck {
        if self.replayed_unchecked {
            RangeCheck::Deferred
        } else {
            self.config.range_check
        }
    }

    // ------------------------------------------------------------------
    // Criteria
    // ------------------------------------------------------------------

    /// Start a criterion on one typed column.
    ///
    /// Generated per-column accessors delegate here.
    pub const fn column<V>(self, column: TypedColumn<S, V>) -> Criterion<I, S, V> {
        Criterion::new(self, column.column())
    }

    /// Start an id-selection criterion.
    pub const fn id(self) -> IdCriterion<I, S> {
        IdCriterion::new(self)
    }

    /// Add an untyped predicate to the current conjunction.
    ///
    /// The predicate's column must belong to `S`; predicates built through
    /// `Predicate::new` already carry a type-checked operand.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        match ColumnOf::<S>::resolve(*predicate.column()) {
            Ok(_) => self.push(predicate),
            Err(err) => self.latch(err),
        }
        self
    }

    /// Combine alternative branches into a disjunction.
    ///
    /// ```ignore
    /// let query = ProjectState::new_query::<u64>()
    ///     .status().is(Status::Started)
    ///     .either(|e| {
    ///         e.or(|b| b.days_since_started().is_greater_than(30))
    ///             .or(|b| b.archived().is(true))
    ///     })
    ///     .build()?;
    /// ```
    pub fn either<F>(self, f: F) -> Self
    where
        F: FnOnce(Either<I, S>) -> Either<I, S>,
    {
        let either = f(Either::new(
            self.config.with_range_check(self.range_check()),
        ));
        self.absorb(either)
    }

    /// Variadic form of `either` for branches sharing one closure type.
    pub fn either_all<It, F>(self, branches: It) -> Self
    where
        It: IntoIterator<Item = F>,
        F: FnOnce(Self) -> Self,
    {
        self.either(|either| branches.into_iter().fold(either, Either::or))
    }

    // ------------------------------------------------------------------
    // Shape
    // ------------------------------------------------------------------

    /// Add a sort key. A column that is already ordered is replaced in place
    /// or rejected, depending on `QueryConfig::order_conflict`.
    ///
    /// Only columns whose value type supports ordering can be sort keys.
    pub fn order_by(mut self, column: impl ColumnOf<S>, direction: OrderDirection) -> Self {
        if !self.allow_in_scope("order_by") {
            return self;
        }

        match column.resolve() {
            Ok(column) => {
                if let Err(err) = self.order.push(column, direction, self.config.order_conflict) {
                    self.latch(err);
                }
            }
            Err(err) => self.latch(err),
        }
        self
    }

    /// Union `columns` into the projection mask.
    pub fn with_mask(mut self, columns: impl IntoIterator<Item = impl ColumnOf<S>>) -> Self {
        if !self.allow_in_scope("with_mask") {
            return self;
        }

        let mut resolved = Vec::new();
        for column in columns {
            match column.resolve() {
                Ok(column) => resolved.push(column),
                Err(err) => {
                    self.latch(err);
                    return self;
                }
            }
        }
        self.mask.extend(resolved);

        self
    }

    /// Set the result limit. Zero is rejected; later calls overwrite.
    pub fn limit(mut self, max_results: u32) -> Self {
        if !self.allow_in_scope("limit") {
            return self;
        }

        match Limit::new(max_results) {
            Some(limit) => self.limit = Some(limit),
            None => self.latch(BuilderError::InvalidLimit {
                limit: max_results,
            }),
        }
        self
    }

    // ------------------------------------------------------------------
    // Build
    // ------------------------------------------------------------------

    /// Freeze the accumulated state into an immutable `EntityQuery`.
    pub fn build(self) -> Result<EntityQuery<I, S>, QueryError> {
        let result = self.freeze();

        let event = match &result {
            Ok(query) => QueryEvent::Built {
                entity: S::ENTITY_NAME,
                predicates: count(query.subject().predicate_count()),
                alternatives: count(query.subject().alternatives().len()),
            },
            Err(err) => QueryEvent::Rejected {
                entity: S::ENTITY_NAME,
                class: err.class(),
            },
        };
        sink::record(event);

        result
    }

    fn freeze(self) -> Result<EntityQuery<I, S>, QueryError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let (conjunction, alternatives) = self.freeze_scope()?;

        let range_check = self.range_check();

        Ok(EntityQuery::from_parts(
            self.ids,
            Subject::from_parts(conjunction, alternatives),
            self.mask,
            self.order,
            self.limit,
            range_check,
        ))
    }

    // Check the conjunction as a whole and drop alternatives that
    // contradict it. Returns the normalized (conjunction, alternatives).
    fn freeze_scope(
        &self,
    ) -> Result<(PredicateGroup, BTreeSet<PredicateGroup>), ContradictionError> {
        domain::check_group(&*self.conjunction, self.range_check())?;

        let mut conjunction = self.conjunction.clone();
        let mut alternatives = self.prune(self.alternatives.iter().cloned())?;

        if alternatives.len() == 1 {
            for group in std::mem::take(&mut alternatives) {
                conjunction = conjunction.and(&group);
            }
        }

        Ok((conjunction, alternatives))
    }

    // Keep the groups that are satisfiable together with the conjunction.
    // Returns `AllAlternativesEmpty` when groups were given and none survive.
    fn prune(
        &self,
        groups: impl IntoIterator<Item = PredicateGroup>,
    ) -> Result<BTreeSet<PredicateGroup>, ContradictionError> {
        let mut offered = false;
        let mut kept = BTreeSet::new();

        for group in groups {
            offered = true;
            let combined = self.conjunction.and(&group);
            if domain::check_group(&*combined, self.range_check()).is_ok() {
                kept.insert(group);
            }
        }

        if offered && kept.is_empty() {
            return Err(ContradictionError::AllAlternativesEmpty);
        }

        Ok(kept)
    }

    // ------------------------------------------------------------------
    // Accumulation
    // ------------------------------------------------------------------

    // Append one predicate to the current conjunction, checking the
    // equality family of its column immediately.
    fn push(&mut self, predicate: Predicate) {
        if self.error.is_some() {
            return;
        }

        let column = *predicate.column();
        if !self.conjunction.insert(predicate) {
            return;
        }

        if let Err(err) = domain::check_equality(&*self.conjunction, &column) {
            self.latch(err);
        }
    }

    fn restrict_ids(&mut self, ids: BTreeSet<I>) {
        if self.error.is_some() || !self.allow_in_scope("id") {
            return;
        }

        if ids.is_empty() {
            self.latch(PredicateError::EmptyOperandSet {
                column: "id".to_string(),
            });
            return;
        }

        if let Err(err) = self.ids.restrict(ids) {
            self.latch(err);
        }
    }

    fn allow_in_scope(&mut self, operation: &'static str) -> bool {
        if self.scope == Scope::Branch {
            self.latch(BuilderError::BranchNotFilterOnly { operation });
            return false;
        }

        true
    }

    // First error wins.
    fn latch(&mut self, err: impl Into<QueryError>) {
        if self.error.is_none() {
            self.error = Some(err.into());
        }
    }
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

impl<I: EntityId, S: EntityState> Default for QueryBuilder<I, S> {
    fn default() -> Self {
        Self::new()
    }
}
