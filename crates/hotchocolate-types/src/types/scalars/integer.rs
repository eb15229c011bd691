use crate::error::ScalarError;
use crate::language::{ValueKind, ValueNode};
use crate::types::runtime::RuntimeType;
use crate::value::RuntimeValue;

use super::ScalarType;

// =============================================================================
// Integer scalars share everything but the bound runtime variant
// =============================================================================

macro_rules! integer_scalar {
    ($(#[$meta:meta])* $ty:ident, $name:literal, $native:ty, $variant:ident, $runtime:expr, $description:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl ScalarType for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn description(&self) -> Option<&str> {
                Some($description)
            }

            fn runtime_type(&self) -> Option<RuntimeType> {
                Some($runtime)
            }

            fn accepts_literal(&self, kind: ValueKind) -> bool {
                kind == ValueKind::Int
            }

            fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError> {
                match literal {
                    ValueNode::Null => Ok(RuntimeValue::Null),
                    ValueNode::Int(text) => text
                        .parse::<$native>()
                        .map(RuntimeValue::$variant)
                        .map_err(|_| ScalarError::invalid_literal(self.name(), ValueKind::Int)),
                    other => Err(ScalarError::invalid_literal(self.name(), other.kind())),
                }
            }

            fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError> {
                match value {
                    RuntimeValue::Null => Ok(ValueNode::Null),
                    RuntimeValue::$variant(value) => Ok(ValueNode::Int(value.to_string())),
                    other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
                }
            }

            fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError> {
                match value {
                    RuntimeValue::Null | RuntimeValue::$variant(_) => Ok(value.clone()),
                    other => Err(ScalarError::invalid_value(self.name(), other.type_name())),
                }
            }
        }
    };
}

integer_scalar!(
    /// The built-in `Int` scalar, bound to `i32`.
    IntType,
    "Int",
    i32,
    Int,
    RuntimeType::int(),
    "The `Int` scalar type represents non-fractional signed whole numeric values."
);

integer_scalar!(
    /// The `Short` scalar, bound to `i16`.
    ShortType,
    "Short",
    i16,
    Short,
    RuntimeType::short(),
    "The `Short` scalar type represents non-fractional signed whole 16-bit numeric values."
);

integer_scalar!(
    /// The `Long` scalar, bound to `i64`.
    LongType,
    "Long",
    i64,
    Long,
    RuntimeType::long(),
    "The `Long` scalar type represents non-fractional signed whole 64-bit numeric values."
);

integer_scalar!(
    /// The `Byte` scalar, bound to `u8`.
    ByteType,
    "Byte",
    u8,
    Byte,
    RuntimeType::byte(),
    "The `Byte` scalar type represents non-fractional whole numeric values between 0 and 255."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_bounds() {
        assert_eq!(
            IntType.parse_value(&RuntimeValue::Int(i32::MAX)),
            Ok(ValueNode::Int("2147483647".into()))
        );
        assert_eq!(
            IntType.parse_value(&RuntimeValue::Int(i32::MIN)),
            Ok(ValueNode::Int("-2147483648".into()))
        );
        assert_eq!(
            LongType.parse_value(&RuntimeValue::Long(i64::MAX)),
            Ok(ValueNode::Int("9223372036854775807".into()))
        );
    }

    #[test]
    fn test_int_round_trip() {
        for value in [i32::MIN, -1, 0, 1, i32::MAX] {
            let literal = IntType.parse_value(&RuntimeValue::Int(value)).expect("int");
            assert_eq!(IntType.parse_literal(&literal), Ok(RuntimeValue::Int(value)));
        }
    }

    #[test]
    fn test_int_rejects_other_types() {
        assert!(matches!(
            IntType.serialize(&RuntimeValue::Float(1.0)),
            Err(ScalarError::InvalidValue { .. })
        ));
        assert!(matches!(
            IntType.parse_literal(&ValueNode::Float("1.0".into())),
            Err(ScalarError::InvalidLiteral { .. })
        ));
        assert!(matches!(
            IntType.serialize(&RuntimeValue::Long(1)),
            Err(ScalarError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_out_of_range_literal() {
        assert!(IntType.parse_literal(&ValueNode::int(i64::from(i32::MAX) + 1)).is_err());
        assert!(ByteType.parse_literal(&ValueNode::int(-1)).is_err());
        assert_eq!(
            ShortType.parse_literal(&ValueNode::int(i16::MIN)),
            Ok(RuntimeValue::Short(i16::MIN))
        );
    }
}
