use crate::error::ScalarError;
use crate::language::{ValueKind, ValueNode};
use crate::types::runtime::RuntimeType;
use crate::value::RuntimeValue;

use super::ScalarType;

/// The built-in `Boolean` scalar, bound to `bool`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl ScalarType for BooleanType {
    fn name(&self) -> &str {
        "Boolean"
    }

    fn description(&self) -> Option<&str> {
        Some("The `Boolean` scalar type represents `true` or `false`.")
    }

    fn runtime_type(&self) -> Option<RuntimeType> {
        Some(RuntimeType::boolean())
    }

    fn accepts_literal(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Boolean
    }

    fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError> {
        match literal {
            ValueNode::Null => Ok(RuntimeValue::Null),
            ValueNode::Boolean(value) => Ok(RuntimeValue::Boolean(*value)),
            other => Err(ScalarError::invalid_literal(self.name(), other.kind())),
        }
    }

    fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(ValueNode::Null),
            RuntimeValue::Boolean(value) => Ok(ValueNode::Boolean(*value)),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }

    fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError> {
        match value {
            RuntimeValue::Null | RuntimeValue::Boolean(_) => Ok(value.clone()),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_literals() {
        assert_eq!(
            BooleanType.parse_literal(&ValueNode::Boolean(true)),
            Ok(RuntimeValue::Boolean(true))
        );
        assert_eq!(
            BooleanType.is_instance_of_type(Some(&ValueNode::string("true"))),
            Ok(false)
        );
        assert!(matches!(
            BooleanType.parse_literal(&ValueNode::int(1)),
            Err(ScalarError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_boolean_serialize_rejects_int() {
        assert!(matches!(
            BooleanType.serialize(&RuntimeValue::Int(1)),
            Err(ScalarError::InvalidValue { .. })
        ));
    }
}
