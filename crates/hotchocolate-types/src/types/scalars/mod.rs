//! Scalar coercion contracts.
//!
//! Every scalar converts between three representations:
//! - a wire literal ([`ValueNode`]) as found in documents and default values,
//! - a runtime value ([`RuntimeValue`]) handed to and returned by resolvers,
//! - an output value produced by [`ScalarType::serialize`].
//!
//! Coercion is strict. A scalar accepts only its declared literal kinds and
//! the exact runtime variant it is bound to; nothing is widened.

mod boolean;
mod date_time;
mod float;
mod integer;
mod string;
mod uuid;

use std::fmt;
use std::sync::Arc;

use crate::error::ScalarError;
use crate::language::{ValueKind, ValueNode};
use crate::types::runtime::RuntimeType;
use crate::value::RuntimeValue;

pub use boolean::BooleanType;
pub use date_time::{DateTimeType, DateType};
pub use float::{DecimalType, FloatType};
pub use integer::{ByteType, IntType, LongType, ShortType};
pub use string::{IdType, StringType};
pub use uuid::UuidType;

/// The coercion contract of a scalar type.
pub trait ScalarType: Send + Sync + fmt::Debug {
    /// The GraphQL name of the scalar.
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// The runtime type this scalar is bound to, if any.
    fn runtime_type(&self) -> Option<RuntimeType> {
        None
    }

    /// Returns `true` if literals of the given kind (other than null) are
    /// accepted.
    fn accepts_literal(&self, kind: ValueKind) -> bool;

    /// Checks a literal without converting it.
    ///
    /// The null literal is always an instance; an absent literal is an error.
    fn is_instance_of_type(&self, literal: Option<&ValueNode>) -> Result<bool, ScalarError> {
        match literal {
            None => Err(ScalarError::argument_null(self.name())),
            Some(ValueNode::Null) => Ok(true),
            Some(literal) => Ok(self.accepts_literal(literal.kind())),
        }
    }

    /// Converts a literal to a runtime value. The null literal yields null.
    fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError>;

    /// Converts a runtime value back to a literal. Null yields the null literal.
    fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError>;

    /// Converts a runtime value to its output representation.
    fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError>;
}

/// Returns all built-in scalars.
pub fn builtin_scalars() -> Vec<Arc<dyn ScalarType>> {
    vec![
        Arc::new(StringType),
        Arc::new(BooleanType),
        Arc::new(IntType),
        Arc::new(FloatType),
        Arc::new(IdType),
        Arc::new(ShortType),
        Arc::new(LongType),
        Arc::new(ByteType),
        Arc::new(DecimalType),
        Arc::new(DateTimeType),
        Arc::new(DateType),
        Arc::new(UuidType),
    ]
}

/// Returns the built-in scalar with the given GraphQL name.
pub fn builtin_scalar(name: &str) -> Option<Arc<dyn ScalarType>> {
    builtin_scalars().into_iter().find(|scalar| scalar.name() == name)
}

/// A scalar declared in SDL without a native implementation.
///
/// Values are carried as strings.
#[derive(Debug, Clone)]
pub struct CustomScalar {
    name: String,
    description: Option<String>,
}

impl CustomScalar {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }
}

impl ScalarType for CustomScalar {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn accepts_literal(&self, kind: ValueKind) -> bool {
        kind == ValueKind::String
    }

    fn parse_literal(&self, literal: &ValueNode) -> Result<RuntimeValue, ScalarError> {
        match literal {
            ValueNode::Null => Ok(RuntimeValue::Null),
            ValueNode::String(value) => Ok(RuntimeValue::String(value.clone())),
            other => Err(ScalarError::invalid_literal(&self.name, other.kind())),
        }
    }

    fn parse_value(&self, value: &RuntimeValue) -> Result<ValueNode, ScalarError> {
        match value {
            RuntimeValue::Null => Ok(ValueNode::Null),
            RuntimeValue::String(value) => Ok(ValueNode::String(value.clone())),
            other => Err(ScalarError::invalid_value(&self.name, other.type_name())),
        }
    }

    fn serialize(&self, value: &RuntimeValue) -> Result<RuntimeValue, ScalarError> {
        match value {
            RuntimeValue::Null | RuntimeValue::String(_) => Ok(value.clone()),
            other => Err(ScalarError::invalid_value(&self.name, other.type_name())),
        }
    }
}

/// Formats a number with a six digit mantissa and a signed, at least three
/// digit exponent: `1.000000E+000`.
pub(crate) fn format_exponential(value: f64, marker: char) -> String {
    let formatted = format!("{value:.6e}");
    let (mantissa, exponent) = formatted
        .split_once('e')
        .unwrap_or((formatted.as_str(), "0"));
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}{marker}{sign}{digits:0>3}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_exponential() {
        assert_eq!(format_exponential(1.0, 'E'), "1.000000E+000");
        assert_eq!(format_exponential(f64::from(f32::MAX), 'E'), "3.402823E+038");
        assert_eq!(format_exponential(-0.00125, 'e'), "-1.250000e-003");
    }

    #[test]
    fn test_builtin_lookup() {
        let names: Vec<String> = builtin_scalars()
            .iter()
            .map(|scalar| scalar.name().to_string())
            .collect();
        assert_eq!(names.len(), 12);
        assert!(builtin_scalar("DateTime").is_some());
        assert!(builtin_scalar("Json").is_none());
    }

    #[test]
    fn test_null_handling_is_uniform() {
        for scalar in builtin_scalars() {
            assert_eq!(
                scalar.serialize(&RuntimeValue::Null),
                Ok(RuntimeValue::Null),
                "{}",
                scalar.name()
            );
            assert_eq!(
                scalar.parse_literal(&ValueNode::Null),
                Ok(RuntimeValue::Null),
                "{}",
                scalar.name()
            );
            assert_eq!(
                scalar.parse_value(&RuntimeValue::Null),
                Ok(ValueNode::Null),
                "{}",
                scalar.name()
            );
            assert_eq!(scalar.is_instance_of_type(Some(&ValueNode::Null)), Ok(true));
            assert!(matches!(
                scalar.is_instance_of_type(None),
                Err(ScalarError::ArgumentNull { .. })
            ));
        }
    }

    #[test]
    fn test_custom_scalar() {
        let scalar = CustomScalar::new("Url", None);
        assert_eq!(
            scalar.parse_literal(&ValueNode::string("https://example.com")),
            Ok(RuntimeValue::String("https://example.com".into()))
        );
        assert!(scalar.parse_literal(&ValueNode::int(1)).is_err());
        assert_eq!(scalar.is_instance_of_type(Some(&ValueNode::int(1))), Ok(false));
    }
}
