use crate::{
    config::OrderConflict,
    model::{Column, ColumnId},
    query::builder::BuilderError,
    traits::RecordView,
};
use derive_more::Display;
use serde::Serialize;
use std::cmp::Ordering;

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum OrderDirection {
    #[display("asc")]
    Asc,
    #[display("desc")]
    Desc,
}

///
/// OrderSpec
///
/// Requested sort sequence. No column appears twice; an empty spec leaves
/// the result order to the storage engine.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct OrderSpec<C = Column> {
    fields: Vec<(C, OrderDirection)>,
}

impl<C: ColumnId> OrderSpec<C> {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Build a spec from `(column, direction)` pairs; a repeated column
    /// keeps its first position and its last direction.
    #[must_use]
    pub fn from_fields(fields: impl IntoIterator<Item = (C, OrderDirection)>) -> Self {
        let mut spec = Self::new();
        for (column, direction) in fields {
            spec.replace(column, direction);
        }

        spec
    }

    #[must_use]
    pub fn fields(&self) -> &[(C, OrderDirection)] {
        &self.fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Direction requested for `column`, if it is ordered.
    #[must_use]
    pub fn direction(&self, column: &C) -> Option<OrderDirection> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == column)
            .map(|(_, direction)| *direction)
    }

    /// Add one sort key under the given conflict policy.
    pub(crate) fn push(
        &mut self,
        column: C,
        direction: OrderDirection,
        policy: OrderConflict,
    ) -> Result<(), BuilderError> {
        check_orderable(&column)?;

        if policy == OrderConflict::Reject && self.direction(&column).is_some() {
            return Err(BuilderError::DuplicateOrder {
                column: column.name().to_string(),
            });
        }

        self.replace(column, direction);

        Ok(())
    }

    fn replace(&mut self, column: C, direction: OrderDirection) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == column) {
            Some(entry) => entry.1 = direction,
            None => self.fields.push((column, direction)),
        }
    }

    #[must_use]
    pub fn map_columns<D: ColumnId>(self, f: impl Fn(C) -> D) -> OrderSpec<D> {
        OrderSpec {
            fields: self
                .fields
                .into_iter()
                .map(|(column, direction)| (f(column), direction))
                .collect(),
        }
    }

    /// Compare two records by this spec.
    ///
    /// Keys are compared left to right; absent or incomparable values tie on
    /// that key.
    pub fn compare<R: RecordView + ?Sized>(&self, left: &R, right: &R) -> Ordering {
        for (column, direction) in &self.fields {
            let ordering = match (left.value(column.name()), right.value(column.name())) {
                (Some(a), Some(b)) => a.compare(&b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            };
            let ordering = match direction {
                OrderDirection::Asc => ordering,
                OrderDirection::Desc => ordering.reverse(),
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    }
}

/// Reject sort keys whose values have no total order.
pub(crate) fn check_orderable<C: ColumnId>(column: &C) -> Result<(), BuilderError> {
    if column.value_type().supports_ordering() {
        Ok(())
    } else {
        Err(BuilderError::UnorderableColumn {
            column: column.name().to_string(),
        })
    }
}

impl<C> Default for OrderSpec<C> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{ProjectState, Status, project};

    fn days() -> Column {
        ProjectState::DAYS_SINCE_STARTED.column()
    }

    fn title() -> Column {
        ProjectState::TITLE.column()
    }

    #[test]
    fn replace_policy_keeps_position_and_takes_last_direction() {
        let mut spec = OrderSpec::new();
        spec.push(days(), OrderDirection::Asc, OrderConflict::Replace)
            .expect("first");
        spec.push(title(), OrderDirection::Asc, OrderConflict::Replace)
            .expect("second");
        spec.push(days(), OrderDirection::Desc, OrderConflict::Replace)
            .expect("replace");

        assert_eq!(
            spec.fields(),
            &[(days(), OrderDirection::Desc), (title(), OrderDirection::Asc)]
        );
    }

    #[test]
    fn reject_policy_refuses_second_entry_for_column() {
        let mut spec = OrderSpec::new();
        spec.push(days(), OrderDirection::Asc, OrderConflict::Reject)
            .expect("first");

        let err = spec
            .push(days(), OrderDirection::Asc, OrderConflict::Reject)
            .expect_err("duplicate");

        assert_eq!(
            err,
            BuilderError::DuplicateOrder {
                column: "days_since_started".to_string()
            }
        );
        assert_eq!(spec.fields().len(), 1);
    }

    #[test]
    fn columns_without_ordering_are_not_sort_keys() {
        let mut spec = OrderSpec::new();

        for column in [
            ProjectState::STATUS.column(),
            ProjectState::ARCHIVED.column(),
            ProjectState::PROJECT_NAME.column(),
        ] {
            let err = spec
                .push(column, OrderDirection::Asc, OrderConflict::Replace)
                .expect_err("unorderable");
            assert_eq!(
                err,
                BuilderError::UnorderableColumn {
                    column: column.name().to_string()
                }
            );
        }
        assert!(spec.is_empty());
    }

    #[test]
    fn compare_uses_keys_left_to_right() {
        let spec = OrderSpec::from_fields([
            (days(), OrderDirection::Desc),
            (title(), OrderDirection::Asc),
        ]);

        let mut a = project(Status::Started, 10);
        a.title = "b".to_string();
        let mut b = project(Status::Started, 10);
        b.title = "a".to_string();
        let c = project(Status::Started, 20);

        assert_eq!(spec.compare(&c, &a), Ordering::Less);
        assert_eq!(spec.compare(&a, &b), Ordering::Greater);
        assert_eq!(spec.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn direction_display_is_lowercase() {
        assert_eq!(OrderDirection::Asc.to_string(), "asc");
        assert_eq!(OrderDirection::Desc.to_string(), "desc");
    }
}
