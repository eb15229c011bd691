//! Runtime values produced by resolvers and consumed by scalars.
//!
//! Every variant corresponds to exactly one runtime type. Scalars check the
//! variant, never the numeric magnitude, so an `f64` is never accepted where
//! an `i32` is expected.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::language::ValueNode;

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RuntimeValue {
    #[default]
    Null,
    Boolean(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    DateTime(OffsetDateTime),
    Date(Date),
    Uuid(Uuid),
    List(Vec<RuntimeValue>),
    Object(ObjectValue),
}

impl RuntimeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The runtime type name of this value, used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "bool",
            Self::Byte(_) => "u8",
            Self::Short(_) => "i16",
            Self::Int(_) => "i32",
            Self::Long(_) => "i64",
            Self::Float(_) => "f64",
            Self::Decimal(_) => "Decimal",
            Self::String(_) => "String",
            Self::DateTime(_) => "OffsetDateTime",
            Self::Date(_) => "Date",
            Self::Uuid(_) => "Uuid",
            Self::List(_) => "List",
            Self::Object(object) => object.type_name().unwrap_or("Object"),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for RuntimeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for RuntimeValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for RuntimeValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for RuntimeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for RuntimeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for RuntimeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<ObjectValue> for RuntimeValue {
    fn from(value: ObjectValue) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<RuntimeValue>> From<Option<T>> for RuntimeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Converts JSON into runtime values; numbers become `Long` or `Float`.
impl From<serde_json::Value> for RuntimeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Long(i)
                } else {
                    n.as_f64().map_or(Self::Null, Self::Float)
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(ObjectValue {
                type_name: None,
                fields: map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            }),
        }
    }
}

/// Converts a literal without a type to coerce it against.
///
/// Integers become `Int` when they fit, `Long` otherwise. Enum values become
/// strings.
impl From<&ValueNode> for RuntimeValue {
    fn from(literal: &ValueNode) -> Self {
        match literal {
            ValueNode::Null => Self::Null,
            ValueNode::Boolean(b) => Self::Boolean(*b),
            ValueNode::Int(digits) => digits
                .parse::<i32>()
                .map(Self::Int)
                .or_else(|_| digits.parse::<i64>().map(Self::Long))
                .unwrap_or_else(|_| Self::String(digits.clone())),
            ValueNode::Float(text) => text
                .parse::<f64>()
                .map_or_else(|_| Self::String(text.clone()), Self::Float),
            ValueNode::String(s) | ValueNode::Enum(s) => Self::String(s.clone()),
            ValueNode::List(items) => Self::List(items.iter().map(Self::from).collect()),
            ValueNode::Object(fields) => Self::Object(ObjectValue {
                type_name: None,
                fields: fields
                    .iter()
                    .map(|(name, value)| (name.clone(), Self::from(value)))
                    .collect(),
            }),
        }
    }
}

/// An object produced by a resolver, optionally tagged with its runtime type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectValue {
    type_name: Option<String>,
    fields: IndexMap<String, RuntimeValue>,
}

impl ObjectValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an object of the given runtime type.
    pub fn typed(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            fields: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<RuntimeValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&RuntimeValue> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: RuntimeValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn fields(&self) -> &IndexMap<String, RuntimeValue> {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untyped_literal_conversion() {
        assert_eq!(RuntimeValue::from(&ValueNode::int(18)), RuntimeValue::Int(18));
        assert_eq!(
            RuntimeValue::from(&ValueNode::int(5_000_000_000_i64)),
            RuntimeValue::Long(5_000_000_000)
        );
        assert_eq!(
            RuntimeValue::from(&ValueNode::Enum("ADMIN".into())),
            RuntimeValue::String("ADMIN".into())
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(RuntimeValue::Int(1).type_name(), "i32");
        assert_eq!(RuntimeValue::Float(1.0).type_name(), "f64");
        assert_eq!(
            RuntimeValue::Object(ObjectValue::typed("User")).type_name(),
            "User"
        );
    }

    #[test]
    fn test_from_json() {
        let value = RuntimeValue::from(serde_json::json!({"name": "Ada", "age": 36}));
        let object = value.as_object().expect("object");
        assert_eq!(object.get("name"), Some(&RuntimeValue::String("Ada".into())));
        assert_eq!(object.get("age"), Some(&RuntimeValue::Long(36)));
    }

    #[test]
    fn test_option_conversion() {
        let none: Option<i32> = None;
        assert_eq!(RuntimeValue::from(none), RuntimeValue::Null);
        assert_eq!(RuntimeValue::from(Some(3)), RuntimeValue::Int(3));
    }
}
