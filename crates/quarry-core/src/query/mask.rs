use crate::model::{Column, ColumnId};
use derive_more::{Deref, IntoIterator};
use serde::Serialize;
use std::collections::BTreeSet;

///
/// Mask
///
/// Columns projected into the result. Empty means every column.
///

#[derive(Clone, Debug, Deref, Eq, Hash, IntoIterator, PartialEq, Serialize)]
#[into_iterator(owned, ref)]
pub struct Mask<C = Column>(BTreeSet<C>);

impl<C> Mask<C> {
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeSet::new())
    }
}

impl<C: ColumnId> Mask<C> {
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = C>) -> Self {
        Self(columns.into_iter().collect())
    }

    /// True when no projection is requested.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `column` appears in the projected result.
    #[must_use]
    pub fn projects(&self, column: &C) -> bool {
        self.is_all() || self.0.contains(column)
    }

    /// Set union with `columns`.
    pub(crate) fn extend(&mut self, columns: impl IntoIterator<Item = C>) {
        self.0.extend(columns);
    }

    #[must_use]
    pub fn map_columns<D: ColumnId>(self, f: impl Fn(C) -> D) -> Mask<D> {
        Mask(self.0.into_iter().map(f).collect())
    }
}

impl<C> Default for Mask<C> {
    fn default() -> Self {
        Self::empty()
    }
}
