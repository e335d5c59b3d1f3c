use crate::{
    query::PredicateError,
    traits::{ColumnValue, EntityState},
    value::ValueType,
};
use serde::Serialize;
use std::{
    fmt::{self, Debug},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

///
/// ColumnId
///
/// Shared surface of the typed (`Column`) and generic (`FieldRef`) column
/// representations. Predicates, subjects, orderings and masks are generic
/// over it so projecting between the two is a structural map.
///

pub trait ColumnId: Clone + Debug + Eq + Hash + Ord {
    fn name(&self) -> &str;

    fn value_type(&self) -> ValueType;
}

///
/// Column
///
/// Identifier and value-type descriptor for one field of an entity-state
/// shape. Emitted as a constant by generated code; a pure value.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Column {
    name: &'static str,
    value_type: ValueType,
}

impl Column {
    #[must_use]
    pub const fn new(name: &'static str, value_type: ValueType) -> Self {
        Self { name, value_type }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn value_type(self) -> ValueType {
        self.value_type
    }
}

impl ColumnId for Column {
    fn name(&self) -> &str {
        self.name
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

///
/// FieldRef
///
/// Generic `(name, value type)` column form used by `RecordQuery`.
/// Carries no link to any entity-state shape.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct FieldRef {
    name: String,
    value_type: ValueType,
}

impl FieldRef {
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl ColumnId for FieldRef {
    fn name(&self) -> &str {
        &self.name
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }
}

impl From<Column> for FieldRef {
    fn from(column: Column) -> Self {
        Self::new(column.name(), column.value_type())
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

///
/// TypedColumn
///
/// `Column` bound at compile time to its entity-state shape `S` and its
/// Rust value type `V`. Operator availability on the resulting criterion is
/// decided by `V`.
///

pub struct TypedColumn<S, V> {
    column: Column,
    _marker: PhantomData<fn() -> (S, V)>,
}

impl<S, V: ColumnValue> TypedColumn<S, V> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            column: Column::new(name, V::VALUE_TYPE),
            _marker: PhantomData,
        }
    }
}

impl<S, V> TypedColumn<S, V> {
    #[must_use]
    pub const fn column(self) -> Column {
        self.column
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.column.name()
    }
}

impl<S, V> Clone for TypedColumn<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for TypedColumn<S, V> {}

impl<S, V> PartialEq for TypedColumn<S, V> {
    fn eq(&self, other: &Self) -> bool {
        self.column == other.column
    }
}

impl<S, V> Eq for TypedColumn<S, V> {}

impl<S, V> Hash for TypedColumn<S, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.column.hash(state);
    }
}

impl<S, V> Debug for TypedColumn<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedColumn").field(&self.column).finish()
    }
}

impl<S, V> From<TypedColumn<S, V>> for Column {
    fn from(column: TypedColumn<S, V>) -> Self {
        column.column
    }
}

///
/// ColumnOf
///
/// Anything that resolves to a column of shape `S`.
/// Typed columns resolve statically; bare `Column` values are checked
/// against `S::COLUMNS`.
///

pub trait ColumnOf<S: EntityState> {
    fn resolve(self) -> Result<Column, PredicateError>;
}

impl<S: EntityState, V> ColumnOf<S> for TypedColumn<S, V> {
    fn resolve(self) -> Result<Column, PredicateError> {
        Ok(self.column)
    }
}

impl<S: EntityState> ColumnOf<S> for Column {
    fn resolve(self) -> Result<Column, PredicateError> {
        if S::owns(self) {
            Ok(self)
        } else {
            Err(PredicateError::UnknownColumn {
                entity: S::ENTITY_NAME,
                column: self.name().to_string(),
            })
        }
    }
}
