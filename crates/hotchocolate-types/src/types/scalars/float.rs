use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::ScalarError;
use crate::language::{ValueKind, ValueNode};
use crate::types::runtime::RuntimeType;
use crate::value::RuntimeValue;

use super::{ScalarType, format_exponential};

/// The built-in `Float` scalar, bound to `f64`.
///
/// Literals are written with an upper-case exponent marker:
/// `3.402823E+038`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatType;

impl ScalarType for FloatType {
    fn name(&self) -> &str {
        "Float"
    }

    fn description(&self) -> Option<&str> {
        Some("The `Float` scalar type represents signed double-precision fractional values as specified by IEEE 754.")
    }

    fn runtime_type(&self) -> Option<RuntimeType> {
        Some(RuntimeType::float())
    }

    fn accepts_literal(&self, kind: ValueKind) -> bool {
        matches!(kind, ValueKind::Int | ValueKind::Float)
    }

    fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError> {
        match literal {
            ValueNode::Null => Ok(RuntimeValue::Null),
            ValueNode::Int(text) | ValueNode::Float(text) => text
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(RuntimeValue::Float)
                .ok_or_else(|| ScalarError::invalid_literal(self.name(), literal.kind())),
            other => Err(ScalarError::invalid_literal(self.name(), other.kind())),
        }
    }

    fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(ValueNode::Null),
            RuntimeValue::Float(value) if value.is_finite() => {
                Ok(ValueNode::Float(format_exponential(*value, 'E')))
            }
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }

    fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(RuntimeValue::Null),
            RuntimeValue::Float(v) if v.is_finite() => Ok(value.clone()),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }
}

/// The `Decimal` scalar, bound to [`rust_decimal::Decimal`].
///
/// Literals are written with a lower-case exponent marker:
/// `-7.922816e+028`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalType;

impl DecimalType {
    fn parse_text(text: &str) -> Option<Decimal> {
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
    }
}

impl ScalarType for DecimalType {
    fn name(&self) -> &str {
        "Decimal"
    }

    fn description(&self) -> Option<&str> {
        Some("The `Decimal` scalar type represents a decimal floating-point number.")
    }

    fn runtime_type(&self) -> Option<RuntimeType> {
        Some(RuntimeType::decimal())
    }

    fn accepts_literal(&self, kind: ValueKind) -> bool {
        matches!(kind, ValueKind::Int | ValueKind::Float)
    }

    fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError> {
        match literal {
            ValueNode::Null => Ok(RuntimeValue::Null),
            ValueNode::Int(text) | ValueNode::Float(text) => Self::parse_text(text)
                .map(RuntimeValue::Decimal)
                .ok_or_else(|| ScalarError::invalid_literal(self.name(), literal.kind())),
            other => Err(ScalarError::invalid_literal(self.name(), other.kind())),
        }
    }

    fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(ValueNode::Null),
            RuntimeValue::Decimal(decimal) => decimal
                .to_f64()
                .map(|v| ValueNode::Float(format_exponential(v, 'e')))
                .ok_or_else(|| ScalarError::invalid_value(self.name(), value.type_name())),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }

    fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError> {
        match value {
            RuntimeValue::Null | RuntimeValue::Decimal(_) => Ok(value.clone()),
            other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_literal_format() {
        assert_eq!(
            FloatType.parse_value(&RuntimeValue::Float(f64::from(f32::MAX))),
            Ok(ValueNode::Float("3.402823E+038".into()))
        );
        assert_eq!(
            FloatType.parse_value(&RuntimeValue::Float(1.0)),
            Ok(ValueNode::Float("1.000000E+000".into()))
        );
    }

    #[test]
    fn test_float_round_trip() {
        for value in [-2.5, 0.0, 1.5, 1234.5] {
            let literal = FloatType.parse_value(&RuntimeValue::Float(value)).expect("float");
            assert_eq!(FloatType.parse_literal(&literal), Ok(RuntimeValue::Float(value)));
        }
    }

    #[test]
    fn test_float_accepts_int_literal() {
        assert_eq!(
            FloatType.parse_literal(&ValueNode::int(3)),
            Ok(RuntimeValue::Float(3.0))
        );
        assert_eq!(FloatType.is_instance_of_type(Some(&ValueNode::string("1"))), Ok(false));
    }

    #[test]
    fn test_float_rejects_non_finite() {
        assert!(matches!(
            FloatType.serialize(&RuntimeValue::Float(f64::NAN)),
            Err(ScalarError::InvalidValue { .. })
        ));
        assert!(FloatType.parse_value(&RuntimeValue::Float(f64::INFINITY)).is_err());
        assert!(FloatType.parse_literal(&ValueNode::Float("1e999".into())).is_err());
    }

    #[test]
    fn test_decimal_literal_format() {
        assert_eq!(
            DecimalType.parse_value(&RuntimeValue::Decimal(Decimal::MIN)),
            Ok(ValueNode::Float("-7.922816e+028".into()))
        );
    }

    #[test]
    fn test_decimal_parse_literal() {
        assert_eq!(
            DecimalType.parse_literal(&ValueNode::Float("1.5".into())),
            Ok(RuntimeValue::Decimal(Decimal::new(15, 1)))
        );
        assert_eq!(
            DecimalType.parse_literal(&ValueNode::Float("1.5e+001".into())),
            Ok(RuntimeValue::Decimal(Decimal::new(15, 0)))
        );
        assert_eq!(
            DecimalType.parse_literal(&ValueNode::int(7)),
            Ok(RuntimeValue::Decimal(Decimal::new(7, 0)))
        );
        assert!(DecimalType.serialize(&RuntimeValue::Float(1.5)).is_err());
    }
}
