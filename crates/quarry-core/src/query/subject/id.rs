use crate::query::predicate::ContradictionError;
use serde::Serialize;
use std::collections::BTreeSet;

///
/// IdFilter
///
/// Identifier selection of a query. `None` selects every id; a set selects
/// exactly those ids. Restrictions intersect, so the selection only narrows.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct IdFilter<I> {
    ids: Option<BTreeSet<I>>,
}

impl<I: Ord> IdFilter<I> {
    /// Selection admitting every id.
    #[must_use]
    pub const fn all() -> Self {
        Self { ids: None }
    }

    /// Selection admitting exactly `ids`.
    #[must_use]
    pub fn only(ids: impl IntoIterator<Item = I>) -> Self {
        Self {
            ids: Some(ids.into_iter().collect()),
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        self.ids.is_none()
    }

    #[must_use]
    pub const fn ids(&self) -> Option<&BTreeSet<I>> {
        self.ids.as_ref()
    }

    #[must_use]
    pub fn matches(&self, id: &I) -> bool {
        self.ids.as_ref().is_none_or(|ids| ids.contains(id))
    }

    /// Narrow the selection to its intersection with `ids`.
    pub(crate) fn restrict(&mut self, ids: BTreeSet<I>) -> Result<(), ContradictionError> {
        let narrowed = match self.ids.take() {
            Some(mut existing) => {
                existing.retain(|id| ids.contains(id));
                existing
            }
            None => ids,
        };

        let disjoint = narrowed.is_empty();
        self.ids = Some(narrowed);

        if disjoint {
            return Err(ContradictionError::DisjointIdSelection);
        }

        Ok(())
    }
}

impl<I> Default for IdFilter<I> {
    fn default() -> Self {
        Self { ids: None }
    }
}
