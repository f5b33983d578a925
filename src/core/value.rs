//! Dynamic values produced by record decomposition.
//!
//! A record is flattened into a [`FieldMap`] before validation. Leaves become
//! one of the closed [`Value`] variants, embedded sub-records become nested
//! maps. Every variant has a zero representation, which is what `required`
//! and the `optional` skip of the built-in rules test against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use uuid::Uuid;

/// Decomposed record: export name to value.
pub type FieldMap = BTreeMap<String, Value>;

/// A decomposed field value.
///
/// Serializes as plain JSON. Deserializing only ever yields the JSON kinds
/// (`Absent`, `Bool`, `Int`, `Float`, `Text`, `List`, `Map`): timestamps and
/// UUIDs come back as their `Text` form, embedded records as `Map`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value: a `None`, or a path that did not resolve in the subject.
    #[default]
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    #[serde(skip_deserializing)]
    Timestamp(DateTime<Utc>),
    #[serde(skip_deserializing)]
    Uuid(Uuid),
    List(Vec<Value>),
    /// A map-like leaf such as a `HashMap` field.
    Map(FieldMap),
    /// An embedded sub-record, zero when every member is zero.
    #[serde(skip_deserializing)]
    Record(FieldMap),
}

impl Value {
    /// Kind of a present value, `None` when absent.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Absent => None,
            Value::Bool(_) => Some(ValueKind::Bool),
            Value::Int(_) => Some(ValueKind::Int),
            Value::Float(_) => Some(ValueKind::Float),
            Value::Text(_) => Some(ValueKind::Text),
            Value::Timestamp(_) => Some(ValueKind::Timestamp),
            Value::Uuid(_) => Some(ValueKind::Uuid),
            Value::List(_) => Some(ValueKind::List),
            Value::Map(_) | Value::Record(_) => Some(ValueKind::Map),
        }
    }

    /// Whether this is the zero representation of its kind.
    ///
    /// Absent values, `false`, `0`, `0.0`, empty text, the Unix epoch, the
    /// nil UUID, and empty lists and maps are all zero. An embedded record is
    /// zero when all of its members are.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Absent => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Text(s) => s.is_empty(),
            Value::Timestamp(t) => *t == DateTime::<Utc>::default(),
            Value::Uuid(u) => u.is_nil(),
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::Record(fields) => fields.values().all(Value::is_zero),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FieldMap> {
        match self {
            Value::Map(map) | Value::Record(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

/// Static kind of a field type, known at registration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Timestamp,
    Uuid,
    List,
    Map,
}

impl ValueKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Uuid => "uuid",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric bound used by `min` and `max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Compare a decomposed value against this bound in the value's own kind.
    ///
    /// Returns `None` for non-numeric values and NaN.
    pub fn compare(&self, value: &Value) -> Option<Ordering> {
        match (value, self) {
            (Value::Int(v), Number::Int(n)) => Some(v.cmp(n)),
            (Value::Int(v), Number::Float(n)) => (*v as f64).partial_cmp(n),
            (Value::Float(v), Number::Int(n)) => v.partial_cmp(&(*n as f64)),
            (Value::Float(v), Number::Float(n)) => v.partial_cmp(n),
            _ => None,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

macro_rules! int_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(i: $ty) -> Self {
                    Number::Int(i64::from(i))
                }
            }
        )*
    };
}

int_number!(i8, i16, i32, i64, u8, u16, u32);

// Wider than i64: saturate, as leaf decomposition does.
macro_rules! saturating_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(i: $ty) -> Self {
                    Number::Int(i64::try_from(i).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

saturating_number!(isize, u64, usize);

impl From<f32> for Number {
    fn from(x: f32) -> Self {
        Number::Float(f64::from(x))
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

/// A leaf field type that decomposes into a [`Value`].
pub trait FieldValue: 'static {
    /// Kind of every present value of this type.
    fn kind() -> ValueKind;

    fn to_value(&self) -> Value;
}

macro_rules! int_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn kind() -> ValueKind {
                    ValueKind::Int
                }

                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }
            }
        )*
    };
}

int_field_value!(i8, i16, i32, i64, isize, u8, u16, u32);

impl FieldValue for u64 {
    fn kind() -> ValueKind {
        ValueKind::Int
    }

    fn to_value(&self) -> Value {
        Value::Int(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl FieldValue for usize {
    fn kind() -> ValueKind {
        ValueKind::Int
    }

    fn to_value(&self) -> Value {
        Value::Int(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl FieldValue for f32 {
    fn kind() -> ValueKind {
        ValueKind::Float
    }

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl FieldValue for f64 {
    fn kind() -> ValueKind {
        ValueKind::Float
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FieldValue for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FieldValue for String {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FieldValue for char {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl FieldValue for DateTime<Utc> {
    fn kind() -> ValueKind {
        ValueKind::Timestamp
    }

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl FieldValue for Uuid {
    fn kind() -> ValueKind {
        ValueKind::Uuid
    }

    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn kind() -> ValueKind {
        T::kind()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Absent,
        }
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn kind() -> ValueKind {
        T::kind()
    }

    fn to_value(&self) -> Value {
        self.as_ref().to_value()
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn kind() -> ValueKind {
        ValueKind::List
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(|item| item.to_value()).collect())
    }
}

impl<T: FieldValue> FieldValue for BTreeMap<String, T> {
    fn kind() -> ValueKind {
        ValueKind::Map
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

impl<T: FieldValue> FieldValue for HashMap<String, T> {
    fn kind() -> ValueKind {
        ValueKind::Map
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}
