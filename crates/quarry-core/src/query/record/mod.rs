//! Module: query::record
//! Responsibility: the storage-facing query value, carrying generic
//! `FieldRef` columns instead of typed ones, plus a reference in-memory
//! execution used by tests and simple backends.
//! Does not own: index selection or storage access.


use crate::{
    model::FieldRef,
    query::{
        limit::Limit,
        mask::Mask,
        order::OrderSpec,
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
/// RecordQuery
///
/// Backend-facing query over records of `S` keyed by `I`. Pure data; `S`
/// only names the entity.
///

pub struct RecordQuery<I, S> {
    ids: IdFilter<I>,
    subject: Subject<FieldRef>,
    mask: Mask<FieldRef>,
    order: OrderSpec<FieldRef>,
    limit: Option<Limit>,
    _marker: PhantomData<fn() -> S>,
}

impl<I: EntityId, S: EntityState> RecordQuery<I, S> {
    /// Assemble a query directly from its parts.
    #[must_use]
    pub const fn new(
        ids: IdFilter<I>,
        subject: Subject<FieldRef>,
        mask: Mask<FieldRef>,
        order: OrderSpec<FieldRef>,
        limit: Option<Limit>,
    ) -> Self {
        Self {
            ids,
            subject,
            mask,
            order,
            limit,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn entity_name(&self) -> &'static str {
        S::ENTITY_NAME
    }

    #[must_use]
    pub const fn ids(&self) -> &IdFilter<I> {
        &self.ids
    }

    #[must_use]
    pub const fn subject(&self) -> &Subject<FieldRef> {
        &self.subject
    }

    #[must_use]
    pub const fn mask(&self) -> &Mask<FieldRef> {
        &self.mask
    }

    #[must_use]
    pub const fn ordering(&self) -> &OrderSpec<FieldRef> {
        &self.order
    }

    #[must_use]
    pub const fn limit(&self) -> Option<Limit> {
        self.limit
    }

    #[must_use]
    pub fn matches<R: RecordView + ?Sized>(&self, id: &I, record: &R) -> bool {
        self.ids.matches(id) && self.subject.matches(record)
    }

    /// Execute against an in-memory row set: filter, stable sort by the
    /// ordering, then truncate to the limit. Projection is left to the caller
    /// (`Mask::projects`).
    pub fn apply<R, It>(&self, rows: It) -> Vec<(I, R)>
    where
        R: RecordView,
        It: IntoIterator<Item = (I, R)>,
    {
        let mut rows: Vec<(I, R)> = rows
            .into_iter()
            .filter(|(id, record)| self.matches(id, record))
            .collect();

        if !self.order.is_empty() {
            rows.sort_by(|(_, a), (_, b)| self.order.compare(a, b));
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit.as_usize());
        }

        rows
    }
}

impl<I: Clone, S> Clone for RecordQuery<I, S> {
    fn clone(&self) -> Self {
        Self {
            ids: self.ids.clone(),
            subject: self.subject.clone(),
            mask: self.mask.clone(),
            order: self.order.clone(),
            limit: self.limit,
            _marker: PhantomData,
        }
    }
}

impl<I: PartialEq, S> PartialEq for RecordQuery<I, S> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
            && self.subject == other.subject
            && self.mask == other.mask
            && self.order == other.order
            && self.limit == other.limit
    }
}

impl<I: Eq, S> Eq for RecordQuery<I, S> {}

impl<I: Hash, S> Hash for RecordQuery<I, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ids.hash(state);
        self.subject.hash(state);
        self.mask.hash(state);
        self.order.hash(state);
        self.limit.hash(state);
    }
}

impl<I: fmt::Debug, S: EntityState> fmt::Debug for RecordQuery<I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordQuery")
            .field("entity", &S::ENTITY_NAME)
            .field("ids", &self.ids)
            .field("subject", &self.subject)
            .field("mask", &self.mask)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .finish()
    }
}
