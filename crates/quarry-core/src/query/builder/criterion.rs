use crate::{
    model::Column,
    query::{
        builder::QueryBuilder,
        predicate::{CompareOp, Operand, Predicate, PredicateError},
    },
    traits::{ColumnValue, EntityId, EntityState, OrderedValue},
};
use std::{collections::BTreeSet, marker::PhantomData};

///
/// Criterion
///
/// A column bound to the builder under construction, awaiting an operator.
/// The operand type is fixed by `V`; range operators only exist when `V` is
/// an `OrderedValue`.
///

#[must_use]
pub struct Criterion<I, S, V> {
    builder: QueryBuilder<I, S>,
    column: Column,
    _marker: PhantomData<fn() -> V>,
}

impl<I, S, V> Criterion<I, S, V> {
    pub(super) const fn new(builder: QueryBuilder<I, S>, column: Column) -> Self {
        Self {
            builder,
            column,
            _marker: PhantomData,
        }
    }

    /// Column this criterion constrains.
    #[must_use]
    pub const fn target(&self) -> Column {
        self.column
    }
}

impl<I: EntityId, S: EntityState, V: ColumnValue> Criterion<I, S, V> {
    // ------------------------------------------------------------------
    // Equality family
    // ------------------------------------------------------------------

    /// `column = value`
    pub fn is(self, value: V) -> QueryBuilder<I, S> {
        self.single(CompareOp::Eq, &value)
    }

    /// `column != value`
    pub fn is_not(self, value: V) -> QueryBuilder<I, S> {
        self.single(CompareOp::Ne, &value)
    }

    /// `column in values`; an empty set fails the build.
    pub fn is_in(self, values: impl IntoIterator<Item = V>) -> QueryBuilder<I, S> {
        self.set(CompareOp::In, values)
    }

    /// `column not in values`; an empty set fails the build.
    pub fn is_not_in(self, values: impl IntoIterator<Item = V>) -> QueryBuilder<I, S> {
        self.set(CompareOp::NotIn, values)
    }

    fn single(self, op: CompareOp, value: &V) -> QueryBuilder<I, S> {
        let Self {
            mut builder,
            column,
            ..
        } = self;

        builder.push(Predicate::from_parts(
            column,
            op,
            Operand::Single(value.to_value()),
        ));
        builder
    }

    fn set(self, op: CompareOp, values: impl IntoIterator<Item = V>) -> QueryBuilder<I, S> {
        let Self {
            mut builder,
            column,
            ..
        } = self;

        let values: BTreeSet<_> = values.into_iter().map(|v| v.to_value()).collect();
        if values.is_empty() {
            builder.latch(PredicateError::EmptyOperandSet {
                column: column.name().to_string(),
            });
            return builder;
        }

        builder.push(Predicate::from_parts(column, op, Operand::Set(values)));
        builder
    }
}

impl<I: EntityId, S: EntityState, V: OrderedValue> Criterion<I, S, V> {
    // ------------------------------------------------------------------
    // Range family
    // ------------------------------------------------------------------

    /// `column > value`
    pub fn is_greater_than(self, value: V) -> QueryBuilder<I, S> {
        self.single(CompareOp::Gt, &value)
    }

    /// `column < value`
    pub fn is_less_than(self, value: V) -> QueryBuilder<I, S> {
        self.single(CompareOp::Lt, &value)
    }

    /// `column >= value`
    pub fn is_greater_or_equal_to(self, value: V) -> QueryBuilder<I, S> {
        self.single(CompareOp::Gte, &value)
    }

    /// `column <= value`
    pub fn is_less_or_equal_to(self, value: V) -> QueryBuilder<I, S> {
        self.single(CompareOp::Lte, &value)
    }
}

///
/// IdCriterion
///
/// Id selection on the builder under construction. Repeated selections
/// intersect; an empty intersection fails the build.
///

#[must_use]
pub struct IdCriterion<I, S> {
    builder: QueryBuilder<I, S>,
}

impl<I, S> IdCriterion<I, S> {
    pub(super) const fn new(builder: QueryBuilder<I, S>) -> Self {
        Self { builder }
    }
}

impl<I: EntityId, S: EntityState> IdCriterion<I, S> {
    /// Select exactly one id.
    pub fn is(self, id: I) -> QueryBuilder<I, S> {
        self.is_in([id])
    }

    /// Select any of `ids`.
    pub fn is_in(self, ids: impl IntoIterator<Item = I>) -> QueryBuilder<I, S> {
        let mut builder = self.builder;
        builder.restrict_ids(ids.into_iter().collect());
        builder
    }
}
