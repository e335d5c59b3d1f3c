mod float;


use serde::Serialize;
use std::{cmp::Ordering, collections::BTreeMap, fmt};

// re-exports
pub use float::Float64;

///
/// ValueType
///
/// Value-type tag carried by every column.
/// Enum and message tags carry the Rust type name so two distinct enums
/// never compare as the same column type.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ValueType {
    Bool,
    Int,
    Uint,
    Float,
    Text,
    Bytes,
    Enum(&'static str),
    Message(&'static str),
}

impl ValueType {
    /// Return true when range operators (`>`, `<`, `>=`, `<=`) apply.
    #[must_use]
    pub const fn supports_ordering(self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Float | Self::Text)
    }

    /// Return true when `value` is a legal operand for a column of this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        self == value.value_type()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Uint => f.write_str("uint"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("text"),
            Self::Bytes => f.write_str("bytes"),
            Self::Enum(name) => write!(f, "enum {name}"),
            Self::Message(name) => write!(f, "message {name}"),
        }
    }
}

///
/// EnumValue
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct EnumValue {
    pub type_name: &'static str,
    pub variant: &'static str,
}

impl EnumValue {
    #[must_use]
    pub const fn new(type_name: &'static str, variant: &'static str) -> Self {
        Self { type_name, variant }
    }
}

///
/// MessageValue
///
/// Nested-message operand. Field order is canonical (sorted by name), so a
/// default instance always compares equal to any other default instance of
/// the same type.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct MessageValue {
    pub type_name: &'static str,
    pub fields: BTreeMap<&'static str, Value>,
}

impl MessageValue {
    #[must_use]
    pub const fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: BTreeMap::new(),
        }
    }

    /// Set one field, replacing any earlier value under the same name.
    #[must_use]
    pub fn with_field(mut self, name: &'static str, value: Value) -> Self {
        self.fields.insert(name, value);
        self
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

///
/// Value
///
/// Operand and record-field value.
/// The derived `Ord` is structural and only used for canonical set layout;
/// semantic range comparison goes through `Value::compare`.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(Float64),
    Text(String),
    Bytes(Vec<u8>),
    Enum(EnumValue),
    Message(MessageValue),
}

impl Value {
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Uint(_) => ValueType::Uint,
            Self::Float(_) => ValueType::Float,
            Self::Text(_) => ValueType::Text,
            Self::Bytes(_) => ValueType::Bytes,
            Self::Enum(value) => ValueType::Enum(value.type_name),
            Self::Message(value) => ValueType::Message(value.type_name),
        }
    }

    /// Semantic ordering between two values of the same orderable variant.
    ///
    /// Returns `None` for mixed variants and for types without an ordering
    /// (bool, bytes, enums, messages).
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Uint(a), Self::Uint(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.get().partial_cmp(&b.get()),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => write!(f, "bytes[{}]", v.len()),
            Self::Enum(v) => write!(f, "{}::{}", v.type_name, v.variant),
            Self::Message(v) => {
                write!(f, "{} {{", v.type_name)?;
                for (i, (name, value)) in v.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {name}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}
