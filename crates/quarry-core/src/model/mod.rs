//! Column model: typed column constants, the generic field form, and the
//! resolution trait tying both to an entity-state shape.

mod column;


pub use column::{Column, ColumnId, ColumnOf, FieldRef, TypedColumn};
