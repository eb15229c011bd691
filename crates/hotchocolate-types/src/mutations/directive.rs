//! The `@mutationConvention` directive.
//!
//! ```graphql
//! directive @mutationConvention(
//!   inputTypeName: String
//!   inputArgumentName: String
//!   payloadFieldName: String
//!   payloadTypeName: String
//!   payloadPayloadErrorTypeName: String
//!   payloadErrorsFieldName: String
//!   enabled: Boolean
//! ) on FIELD_DEFINITION
//! ```

use crate::error::{SchemaError, codes};
use crate::language::{DirectiveNode, ValueNode};

use super::options::MutationContextData;

pub const MUTATION_CONVENTION_DIRECTIVE: &str = "mutationConvention";

/// Returns `true` if the directive is `@mutationConvention`.
pub fn is_mutation_convention(directive: &DirectiveNode) -> bool {
    directive.name == MUTATION_CONVENTION_DIRECTIVE
}

/// Reads the overrides of a `@mutationConvention` directive applied to
/// `type_name.field_name`.
pub fn parse_mutation_convention(
    directive: &DirectiveNode,
    type_name: &str,
    field_name: &str,
) -> Result<MutationContextData, SchemaError> {
    let mut data = MutationContextData::new(field_name);

    for (name, value) in &directive.arguments {
        let target = match name.as_str() {
            "inputTypeName" => &mut data.input_type_name,
            "inputArgumentName" => &mut data.input_argument_name,
            "payloadFieldName" => &mut data.payload_field_name,
            "payloadTypeName" => &mut data.payload_type_name,
            "payloadPayloadErrorTypeName" => &mut data.payload_error_type_name,
            "payloadErrorsFieldName" => &mut data.payload_errors_field_name,
            "enabled" => {
                data.enabled = match value {
                    ValueNode::Null => None,
                    ValueNode::Boolean(enabled) => Some(*enabled),
                    other => {
                        return Err(unexpected_value(directive, type_name, field_name, name, "Boolean", other));
                    }
                };
                continue;
            }
            _ => {
                return Err(SchemaError::new(format!(
                    "The argument `{name}` does not exist on the directive `@{MUTATION_CONVENTION_DIRECTIVE}`."
                ))
                .with_code(codes::DIRECTIVE_ARGUMENT_UNKNOWN)
                .with_type(type_name)
                .with_field(field_name)
                .with_location(directive.location)
                .with_extension("argument", name.as_str()));
            }
        };

        *target = match value {
            ValueNode::Null => None,
            ValueNode::String(text) => Some(text.clone()),
            other => {
                return Err(unexpected_value(directive, type_name, field_name, name, "String", other));
            }
        };
    }

    Ok(data)
}

fn unexpected_value(
    directive: &DirectiveNode,
    type_name: &str,
    field_name: &str,
    argument: &str,
    expected: &str,
    actual: &ValueNode,
) -> SchemaError {
    SchemaError::new(format!(
        "The argument `{argument}` of `@{MUTATION_CONVENTION_DIRECTIVE}` expects a {expected} value but received `{actual}`."
    ))
    .with_code(codes::DIRECTIVE_ARGUMENT_UNEXPECTED_VALUE)
    .with_type(type_name)
    .with_field(field_name)
    .with_location(directive.location)
    .with_extension("argument", argument)
}

/// The error raised for `@mutationConvention` outside a field definition.
pub fn invalid_location(directive: &DirectiveNode, type_name: &str, location: &str) -> SchemaError {
    SchemaError::new(format!(
        "The directive `@{MUTATION_CONVENTION_DIRECTIVE}` is only allowed on field definitions but was used on {location}."
    ))
    .with_code(codes::DIRECTIVE_LOCATION_INVALID)
    .with_type(type_name)
    .with_location(directive.location)
}
