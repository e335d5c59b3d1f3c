use crate::{
    model::Column,
    query::QueryBuilder,
    value::{Float64, Value, ValueType},
};
use std::{collections::BTreeMap, fmt::Debug, hash::Hash};

// ============================================================================
// COLUMN VALUES
// ============================================================================

///
/// ColumnValue
///
/// Rust types that can sit on the right-hand side of a predicate.
/// `VALUE_TYPE` must agree with the variant produced by `to_value`.
///

pub trait ColumnValue {
    const VALUE_TYPE: ValueType;

    fn to_value(&self) -> Value;
}

///
/// OrderedValue
///
/// Marker for column value types that admit range operators.
/// Only implemented where `ValueType::supports_ordering` holds.
///

pub trait OrderedValue: ColumnValue {}

macro_rules! impl_column_value {
    ($variant:ident, $value_type:ident, $wide:ty; $($ty:ty),* $(,)?) => {
        $(
            impl ColumnValue for $ty {
                const VALUE_TYPE: ValueType = ValueType::$value_type;

                fn to_value(&self) -> Value {
                    Value::$variant(<$wide>::from(*self))
                }
            }

            impl OrderedValue for $ty {}
        )*
    };
}

impl_column_value!(Int, Int, i64; i8, i16, i32, i64);
impl_column_value!(Uint, Uint, u64; u8, u16, u32, u64);
impl_column_value!(Float, Float, Float64; f32, f64);

impl ColumnValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ColumnValue for String {
    const VALUE_TYPE: ValueType = ValueType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl OrderedValue for String {}

impl ColumnValue for &str {
    const VALUE_TYPE: ValueType = ValueType::Text;

    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl OrderedValue for &str {}

impl ColumnValue for Vec<u8> {
    const VALUE_TYPE: ValueType = ValueType::Bytes;

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

// ============================================================================
// ENTITY SHAPES
// ============================================================================

///
/// EntityId
///
/// Identifier type of an entity. Blanket-implemented; exists to keep the
/// builder bounds readable.
///

pub trait EntityId: Clone + Debug + Eq + Hash + Ord + ColumnValue + 'static {}

impl<T> EntityId for T where T: Clone + Debug + Eq + Hash + Ord + ColumnValue + 'static {}

///
/// EntityState
///
/// Closed, compile-time column set of one entity-state shape.
/// Implemented by `#[derive(EntityState)]`.
///

pub trait EntityState: Sized + 'static {
    const ENTITY_NAME: &'static str;
    const COLUMNS: &'static [Column];

    /// Resolve a column by name.
    #[must_use]
    fn column(name: &str) -> Option<Column> {
        Self::COLUMNS
            .iter()
            .copied()
            .find(|column| column.name() == name)
    }

    /// Return true when `column` belongs to this shape (name and type).
    #[must_use]
    fn owns(column: Column) -> bool {
        Self::COLUMNS.contains(&column)
    }

    /// Start a fresh query over this shape.
    #[must_use]
    fn new_query<I: EntityId>() -> QueryBuilder<I, Self> {
        QueryBuilder::new()
    }
}

///
/// RecordView
///
/// Read access to one candidate record's field values, by column name.
/// `None` means the field is absent; absent fields never satisfy a predicate.
///

pub trait RecordView {
    fn value(&self, column: &str) -> Option<Value>;
}

impl RecordView for BTreeMap<String, Value> {
    fn value(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

impl RecordView for BTreeMap<&'static str, Value> {
    fn value(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

impl<R: RecordView + ?Sized> RecordView for &R {
    fn value(&self, column: &str) -> Option<Value> {
        (**self).value(column)
    }
}
