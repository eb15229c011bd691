use uuid::Uuid;

use crate::error::ScalarError;
use crate::language::{ValueKind, ValueNode};
use crate::types::runtime::RuntimeType;
use crate::value::RuntimeValue;

use super::ScalarType;

/// The `Uuid` scalar. Values are written in the hyphenated lower-case form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidType;

impl ScalarType for UuidType {
    fn name(&self) -> &str {
        "Uuid"
    }

    fn description(&self) -> Option<&str> {
        Some("The `Uuid` scalar represents a universally unique identifier.")
    }

    fn runtime_type(&self) -> Option<RuntimeType> {
        Some(RuntimeType::uuid())
    }

    fn accepts_literal(&self, kind: ValueKind) -> bool {
        kind == ValueKind::String
    }

    fn is_instance_of_type(&self, literal: Option<&ValueNode>) -> Result<bool, ScalarError> {
        match literal {
            None => Err(ScalarError::argument_null(self.name())),
            Some(ValueNode::Null) => Ok(true),
            Some(ValueNode::String(text)) => Ok(Uuid::parse_str(text).is_ok()),
            Some(_) => Ok(false),
        }
    }

    fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError> {
        match literal {
            ValueNode::Null => Ok(RuntimeValue::Null),
            ValueNode::String(text) => Uuid::parse_str(text)
                .map(RuntimeValue::Uuid)
                .map_err(|_| ScalarError::invalid_literal(self.name(), ValueKind::String)),
            other => Err(ScalarError::invalid_literal(self.name(), other.kind())),
        }
    }

    fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(ValueNode::Null),
            RuntimeValue::Uuid(uuid) => Ok(ValueNode::String(uuid.hyphenated().to_string())),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }

    fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(RuntimeValue::Null),
            RuntimeValue::Uuid(uuid) => Ok(RuntimeValue::String(uuid.hyphenated().to_string())),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }
}
