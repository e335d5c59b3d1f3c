//! Module: query::entity
//! Responsibility: the immutable typed query produced by `build()`, and its
//! conversions to and from the generic `RecordQuery`.
//! Does not own: accumulation or validation of builder input.

#[cfg(test)]
mod tests;

use crate::{
    config::RangeCheck,
    model::{Column, ColumnId, FieldRef},
    obs::sink::{self, QueryEvent},
    query::{
        QueryError,
        builder::QueryBuilder,
        limit::Limit,
        mask::Mask,
        order::{OrderSpec, check_orderable},
        predicate::PredicateError,
        record::RecordQuery,
        subject::{IdFilter, Subject},
    },
    traits::{EntityId, EntityState, RecordView},
};
use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

///
/// EntityQuery
///
/// Immutable query bound to entity state `S`. Equality compares the id
/// selection, subject, mask, ordering and limit; predicate sets compare
/// order-independently. The range policy it was built under is carried for
/// replay but is not part of equality.
///

pub struct EntityQuery<I, S> {
    ids: IdFilter<I>,
    subject: Subject,
    mask: Mask,
    order: OrderSpec,
    limit: Option<Limit>,
    range_check: RangeCheck,
    _marker: PhantomData<fn() -> S>,
}

impl<I: EntityId, S: EntityState> EntityQuery<I, S> {
    pub(crate) const fn from_parts(
        ids: IdFilter<I>,
        subject: Subject,
        mask: Mask,
        order: OrderSpec,
        limit: Option<Limit>,
        range_check: RangeCheck,
    ) -> Self {
        Self {
            ids,
            subject,
            mask,
            order,
            limit,
            range_check,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn ids(&self) -> &IdFilter<I> {
        &self.ids
    }

    #[must_use]
    pub const fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub const fn mask(&self) -> &Mask {
        &self.mask
    }

    #[must_use]
    pub const fn ordering(&self) -> &OrderSpec {
        &self.order
    }

    #[must_use]
    pub const fn limit(&self) -> Option<Limit> {
        self.limit
    }

    /// Range policy the subject was validated under. `Deferred` for queries
    /// rebound from a `RecordQuery`, whose predicates are taken as is.
    #[must_use]
    pub const fn range_check(&self) -> RangeCheck {
        self.range_check
    }

    /// True when the record with id `id` satisfies the id selection and
    /// the subject.
    #[must_use]
    pub fn matches<R: RecordView + ?Sized>(&self, id: &I, record: &R) -> bool {
        self.ids.matches(id) && self.subject.matches(record)
    }

    // ------------------------------------------------------------------
    // Conversions
    // ------------------------------------------------------------------

    /// Project into the backend-facing form, swapping typed columns for
    /// their `(name, value type)` form.
    #[must_use]
    pub fn to_record_query(&self) -> RecordQuery<I, S> {
        sink::record(QueryEvent::Projected {
            entity: S::ENTITY_NAME,
        });

        RecordQuery::new(
            self.ids.clone(),
            self.subject.clone().map_columns(FieldRef::from),
            self.mask.clone().map_columns(FieldRef::from),
            self.order.clone().map_columns(FieldRef::from),
            self.limit,
        )
    }

    /// Replay this query into `builder` as if the same builder calls had
    /// been made. The builder keeps its own config, except that a query
    /// built without the range check is not range-checked again.
    pub fn copy_to(&self, builder: QueryBuilder<I, S>) -> QueryBuilder<I, S> {
        sink::record(QueryEvent::Copied {
            entity: S::ENTITY_NAME,
        });

        let mut builder = builder.replaying(self.range_check);
        if let Some(ids) = self.ids.ids() {
            builder = builder.id().is_in(ids.iter().cloned());
        }

        builder = self
            .subject
            .conjunction()
            .iter()
            .cloned()
            .fold(builder, QueryBuilder::filter);

        builder = builder.either_all(self.subject.alternatives().iter().map(|group| {
            move |branch: QueryBuilder<I, S>| {
                group.iter().cloned().fold(branch, QueryBuilder::filter)
            }
        }));

        for (column, direction) in self.order.fields() {
            builder = builder.order_by(*column, *direction);
        }
        if !self.mask.is_all() {
            builder = builder.with_mask(self.mask.iter().copied());
        }
        if let Some(limit) = self.limit {
            builder = builder.limit(limit.get());
        }

        builder
    }

    /// Rebind a generic query to `S`.
    ///
    /// Every column is resolved by name against `S::COLUMNS`; an unknown
    /// name or a differing value type fails, as does a sort key without
    /// ordering. Predicate content is taken as is.
    pub fn try_from_record(record: &RecordQuery<I, S>) -> Result<Self, QueryError> {
        let subject = record.subject().clone().try_map_columns(resolve::<S>)?;
        let order = OrderSpec::from_fields(
            record
                .ordering()
                .fields()
                .iter()
                .map(|(field, direction)| {
                    let column = resolve::<S>(field)?;
                    check_orderable(&column)?;

                    Ok((column, *direction))
                })
                .collect::<Result<Vec<_>, QueryError>>()?,
        );
        let mask = Mask::new(
            record
                .mask()
                .iter()
                .map(resolve::<S>)
                .collect::<Result<Vec<_>, PredicateError>>()?,
        );

        Ok(Self::from_parts(
            record.ids().clone(),
            subject,
            mask,
            order,
            record.limit(),
            RangeCheck::Deferred,
        ))
    }
}

fn resolve<S: EntityState>(field: &FieldRef) -> Result<Column, PredicateError> {
    let column = S::column(field.as_str()).ok_or_else(|| PredicateError::UnknownColumn {
        entity: S::ENTITY_NAME,
        column: field.as_str().to_string(),
    })?;

    if column.value_type() != field.value_type() {
        return Err(PredicateError::TypeMismatch {
            column: field.as_str().to_string(),
            expected: column.value_type(),
            found: field.value_type(),
        });
    }

    Ok(column)
}

impl<I: EntityId, S: EntityState> TryFrom<&RecordQuery<I, S>> for EntityQuery<I, S> {
    type Error = QueryError;

    fn try_from(record: &RecordQuery<I, S>) -> Result<Self, Self::Error> {
        Self::try_from_record(record)
    }
}

impl<I: EntityId, S: EntityState> From<&EntityQuery<I, S>> for RecordQuery<I, S> {
    fn from(query: &EntityQuery<I, S>) -> Self {
        query.to_record_query()
    }
}

// ----------------------------------------------------------------------
// Value semantics; `S` is a type witness only.
// ----------------------------------------------------------------------

impl<I: Clone, S> Clone for EntityQuery<I, S> {
    fn clone(&self) -> Self {
        Self {
            ids: self.ids.clone(),
            subject: self.subject.clone(),
            mask: self.mask.clone(),
            order: self.order.clone(),
            limit: self.limit,
            range_check: self.range_check,
            _marker: PhantomData,
        }
    }
}

impl<I: PartialEq, S> PartialEq for EntityQuery<I, S> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
            && self.subject == other.subject
            && self.mask == other.mask
            && self.order == other.order
            && self.limit == other.limit
    }
}

impl<I: Eq, S> Eq for EntityQuery<I, S> {}

impl<I: Hash, S> Hash for EntityQuery<I, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ids.hash(state);
        self.subject.hash(state);
        self.mask.hash(state);
        self.order.hash(state);
        self.limit.hash(state);
    }
}

impl<I: fmt::Debug, S: EntityState> fmt::Debug for EntityQuery<I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityQuery")
            .field("entity", &S::ENTITY_NAME)
            .field("ids", &self.ids)
            .field("subject", &self.subject)
            .field("mask", &self.mask)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .field("range_check", &self.range_check)
            .finish()
    }
}
