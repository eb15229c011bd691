use crate::error::ScalarError;
use crate::language::{ValueKind, ValueNode};
use crate::types::runtime::RuntimeType;
use crate::value::RuntimeValue;

use super::ScalarType;

/// The built-in `String` scalar.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl ScalarType for StringType {
    fn name(&self) -> &str {
        "String"
    }

    fn description(&self) -> Option<&str> {
        Some("The `String` scalar type represents textual data, represented as UTF-8 character sequences.")
    }

    fn runtime_type(&self) -> Option<RuntimeType> {
        Some(RuntimeType::string())
    }

    fn accepts_literal(&self, kind: ValueKind) -> bool {
        kind == ValueKind::String
    }

    fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError> {
        match literal {
            ValueNode::Null => Ok(RuntimeValue::Null),
            ValueNode::String(value) => Ok(RuntimeValue::String(value.clone())),
            other => Err(ScalarError::invalid_literal(self.name(), other.kind())),
        }
    }

    fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(ValueNode::Null),
            RuntimeValue::String(value) => Ok(ValueNode::String(value.clone())),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }

    fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError> {
        match value {
            RuntimeValue::Null | RuntimeValue::String(_) => Ok(value.clone()),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }
}

/// The built-in `ID` scalar. Accepts string and integer literals; runtime
/// values are strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdType;

impl ScalarType for IdType {
    fn name(&self) -> &str {
        "ID"
    }

    fn description(&self) -> Option<&str> {
        Some("The `ID` scalar type represents a unique identifier.")
    }

    fn accepts_literal(&self, kind: ValueKind) -> bool {
        matches!(kind, ValueKind::String | ValueKind::Int)
    }

    fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError> {
        match literal {
            ValueNode::Null => Ok(RuntimeValue::Null),
            ValueNode::String(value) | ValueNode::Int(value) => {
                Ok(RuntimeValue::String(value.clone()))
            }
            other => Err(ScalarError::invalid_literal(self.name(), other.kind())),
        }
    }

    fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(ValueNode::Null),
            RuntimeValue::String(value) => Ok(ValueNode::String(value.clone())),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }

    fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError> {
        match value {
            RuntimeValue::Null | RuntimeValue::String(_) => Ok(value.clone()),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_round_trip() {
        let value = RuntimeValue::String("hello".into());
        let literal = StringType.parse_value(&value).expect("string value");
        assert_eq!(literal, ValueNode::string("hello"));
        assert_eq!(StringType.parse_literal(&literal), Ok(value));
    }

    #[test]
    fn test_id_accepts_int_literal() {
        assert_eq!(
            IdType.parse_literal(&ValueNode::int(42)),
            Ok(RuntimeValue::String("42".into()))
        );
        assert_eq!(IdType.is_instance_of_type(Some(&ValueNode::Boolean(true))), Ok(false));
    }
}
