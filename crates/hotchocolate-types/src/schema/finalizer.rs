//! Validation of the completed type graph.

use indexmap::IndexMap;
use tracing::debug;

use crate::config::SchemaOptions;
use crate::error::{SchemaError, codes};
use crate::language::ValueNode;
use crate::types::naming::is_valid_name;
use crate::types::wrapping::WrappedType;

use super::Schema;
use super::named_type::{Argument, FieldType, InterfaceType, NamedType, ObjectType};

/// Validates the completed types and assembles the schema.
///
/// Returns `None` if any validation failed; the errors are appended to
/// `errors`.
pub(crate) fn finalize(
    types: IndexMap<String, NamedType>,
    options: &SchemaOptions,
    root_overrides: &RootTypeNames,
    errors: &mut Vec<SchemaError>,
) -> Option<Schema> {
    let query_type = root_overrides
        .query
        .clone()
        .unwrap_or_else(|| options.query_type_name.clone());
    let mutation_type = root_overrides
        .mutation
        .clone()
        .unwrap_or_else(|| options.mutation_type_name.clone());
    let subscription_type = root_overrides
        .subscription
        .clone()
        .unwrap_or_else(|| options.subscription_type_name.clone());

    let mut validator = Validator {
        types: &types,
        errors: Vec::new(),
    };
    validator.validate_query_type(&query_type);
    let mutation_type = validator.validate_optional_root(&mutation_type);
    let subscription_type = validator.validate_optional_root(&subscription_type);
    for named_type in types.values() {
        validator.validate_type(named_type);
    }

    let failed = !validator.errors.is_empty();
    debug!(
        types = types.len(),
        errors = validator.errors.len(),
        "validated schema"
    );
    errors.append(&mut validator.errors);
    if failed {
        return None;
    }
    Some(Schema::new(types, query_type, mutation_type, subscription_type))
}

/// Root type names declared by a `schema { ... }` definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RootTypeNames {
    pub query: Option<String>,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

struct Validator<'a> {
    types: &'a IndexMap<String, NamedType>,
    errors: Vec<SchemaError>,
}

impl Validator<'_> {
    fn validate_query_type(&mut self, name: &str) {
        match self.types.get(name) {
            Some(NamedType::Object(_)) => {}
            Some(other) => self.errors.push(
                SchemaError::new(format!(
                    "The query type `{name}` must be an object type, found {}.",
                    other.kind()
                ))
                .with_code(codes::QUERY_TYPE_MISSING)
                .with_type(name),
            ),
            None => self.errors.push(
                SchemaError::new(format!("The schema has no query type `{name}`."))
                    .with_code(codes::QUERY_TYPE_MISSING)
                    .with_type(name),
            ),
        }
    }

    fn validate_optional_root(&mut self, name: &str) -> Option<String> {
        match self.types.get(name)? {
            NamedType::Object(_) => Some(name.to_string()),
            other => {
                self.errors.push(
                    SchemaError::new(format!(
                        "The root type `{name}` must be an object type, found {}.",
                        other.kind()
                    ))
                    .with_code(codes::TYPE_KIND_MISMATCH)
                    .with_type(name),
                );
                None
            }
        }
    }

    fn validate_type(&mut self, named_type: &NamedType) {
        let type_name = named_type.name();
        self.check_name(type_name, type_name, None);

        match named_type {
            NamedType::Scalar(_) => {}
            NamedType::Object(object) => self.validate_object(object),
            NamedType::Interface(interface) => {
                if interface.fields.is_empty() {
                    self.no_fields(type_name, "interface");
                }
                for field in interface.fields.values() {
                    self.check_name(type_name, &field.name, Some(&field.name));
                    self.check_output(type_name, &field.name, &field.ty);
                    self.validate_arguments(type_name, &field.name, &field.arguments);
                }
            }
            NamedType::Union(union) => {
                if union.types.is_empty() {
                    self.errors.push(
                        SchemaError::new(format!("The union `{type_name}` has no member types."))
                            .with_code(codes::UNION_MEMBER_INVALID)
                            .with_type(type_name),
                    );
                }
                for member in &union.types {
                    if !matches!(self.types.get(member), Some(NamedType::Object(_))) {
                        self.errors.push(
                            SchemaError::new(format!(
                                "The member `{member}` of the union `{type_name}` is not an object type."
                            ))
                            .with_code(codes::UNION_MEMBER_INVALID)
                            .with_type(type_name),
                        );
                    }
                }
            }
            NamedType::Enum(enum_type) => {
                if enum_type.values.is_empty() {
                    self.no_fields(type_name, "enum");
                }
                for value in &enum_type.values {
                    self.check_name(type_name, &value.name, Some(&value.name));
                }
            }
            NamedType::InputObject(input) => {
                if input.fields.is_empty() {
                    self.no_fields(type_name, "input object");
                }
                for field in input.fields.values() {
                    self.validate_input_value(type_name, &field.name, field);
                }
            }
        }
    }

    fn validate_object(&mut self, object: &ObjectType) {
        let type_name = object.name.as_str();
        if object.fields.is_empty() {
            self.no_fields(type_name, "object");
        }
        for field in object.fields.values() {
            self.check_name(type_name, &field.name, Some(&field.name));
            self.check_output(type_name, &field.name, &field.ty);
            self.validate_arguments(type_name, &field.name, &field.arguments);
        }

        for interface_name in &object.interfaces {
            match self.types.get(interface_name) {
                Some(NamedType::Interface(interface)) => {
                    self.validate_implementation(object, interface);
                }
                _ => self.errors.push(
                    SchemaError::new(format!(
                        "The type `{type_name}` implements `{interface_name}`, which is not an interface type."
                    ))
                    .with_code(codes::TYPE_KIND_MISMATCH)
                    .with_type(type_name),
                ),
            }
        }
    }

    fn validate_implementation(&mut self, object: &ObjectType, interface: &InterfaceType) {
        for expected in interface.fields.values() {
            let coordinate = format!("{}.{}", object.name, expected.name);
            let Some(field) = object.field(&expected.name) else {
                self.errors.push(
                    SchemaError::new(format!(
                        "The field `{coordinate}` required by the interface `{}` is missing.",
                        interface.name
                    ))
                    .with_code(codes::INTERFACE_NOT_IMPLEMENTED)
                    .with_type(object.name.clone())
                    .with_field(expected.name.clone()),
                );
                continue;
            };

            if !self.is_valid_implementation_type(&field.ty, &expected.ty) {
                self.errors.push(
                    SchemaError::new(format!(
                        "The field `{coordinate}` has the type `{}`, which is not compatible with `{}` of the interface `{}`.",
                        field.ty, expected.ty, interface.name
                    ))
                    .with_code(codes::INTERFACE_NOT_IMPLEMENTED)
                    .with_type(object.name.clone())
                    .with_field(expected.name.clone()),
                );
            }

            for argument in expected.arguments.values() {
                let matches = field
                    .argument(&argument.name)
                    .is_some_and(|actual| actual.ty == argument.ty);
                if !matches {
                    self.errors.push(
                        SchemaError::new(format!(
                            "The field `{coordinate}` must declare the argument `{}: {}` of the interface `{}`.",
                            argument.name, argument.ty, interface.name
                        ))
                        .with_code(codes::INTERFACE_NOT_IMPLEMENTED)
                        .with_type(object.name.clone())
                        .with_field(expected.name.clone()),
                    );
                }
            }
        }
    }

    /// Field types of implementations may be more specific than the
    /// interface's: non-null where nullable, or a possible type of the
    /// interface's named type.
    fn is_valid_implementation_type(&self, actual: &FieldType, expected: &FieldType) -> bool {
        match (actual, expected) {
            (WrappedType::NonNull(actual), WrappedType::NonNull(expected)) => {
                self.is_valid_implementation_type(actual, expected)
            }
            (WrappedType::NonNull(actual), expected) => {
                self.is_valid_implementation_type(actual, expected)
            }
            (_, WrappedType::NonNull(_)) => false,
            (WrappedType::List(actual), WrappedType::List(expected)) => {
                self.is_valid_implementation_type(actual, expected)
            }
            (WrappedType::List(_), _) | (_, WrappedType::List(_)) => false,
            (WrappedType::Named(actual), WrappedType::Named(expected)) => {
                actual.name == expected.name || self.is_possible_type(&expected.name, &actual.name)
            }
        }
    }

    fn is_possible_type(&self, abstract_type: &str, candidate: &str) -> bool {
        match (self.types.get(abstract_type), self.types.get(candidate)) {
            (Some(NamedType::Interface(_)), Some(NamedType::Object(object))) => {
                object.implements(abstract_type)
            }
            (Some(NamedType::Union(union)), Some(NamedType::Object(_))) => union.contains(candidate),
            _ => false,
        }
    }

    fn validate_arguments(
        &mut self,
        type_name: &str,
        field_name: &str,
        arguments: &IndexMap<String, Argument>,
    ) {
        for argument in arguments.values() {
            let coordinate = format!("{field_name}({})", argument.name);
            self.validate_input_value(type_name, &coordinate, argument);
        }
    }

    fn validate_input_value(&mut self, type_name: &str, coordinate: &str, value: &Argument) {
        self.check_name(type_name, &value.name, Some(coordinate));

        let named = value.ty.named_type();
        if !named.kind.is_input_type() {
            self.errors.push(
                SchemaError::new(format!(
                    "`{type_name}.{coordinate}` must have an input type but `{}` is of kind {}.",
                    named.name, named.kind
                ))
                .with_code(codes::TYPE_KIND_MISMATCH)
                .with_type(type_name)
                .with_field(coordinate),
            );
            return;
        }

        if let Some(default_value) = &value.default_value
            && let Err(reason) = self.check_literal(&value.ty, default_value)
        {
            self.errors.push(
                SchemaError::new(format!(
                    "The default value `{default_value}` of `{type_name}.{coordinate}` is invalid: {reason}"
                ))
                .with_code(codes::INVALID_DEFAULT_VALUE)
                .with_type(type_name)
                .with_field(coordinate),
            );
        }
    }

    fn check_output(&mut self, type_name: &str, field_name: &str, ty: &FieldType) {
        let named = ty.named_type();
        if !named.kind.is_output_type() {
            self.errors.push(
                SchemaError::new(format!(
                    "`{type_name}.{field_name}` must have an output type but `{}` is of kind {}.",
                    named.name, named.kind
                ))
                .with_code(codes::TYPE_KIND_MISMATCH)
                .with_type(type_name)
                .with_field(field_name),
            );
        }
    }

    /// Checks a literal against an input type.
    fn check_literal(&self, ty: &FieldType, literal: &ValueNode) -> Result<(), String> {
        match ty {
            WrappedType::NonNull(inner) => {
                if literal.is_null() {
                    return Err(format!("null is not a valid `{ty}`"));
                }
                self.check_literal(inner, literal)
            }
            _ if literal.is_null() => Ok(()),
            WrappedType::List(inner) => match literal {
                ValueNode::List(items) => items
                    .iter()
                    .try_for_each(|item| self.check_literal(inner, item)),
                single => self.check_literal(inner, single),
            },
            WrappedType::Named(named) => match self.types.get(&named.name) {
                Some(NamedType::Scalar(scalar)) => scalar
                    .parse_literal(literal)
                    .map(|_| ())
                    .map_err(|error| error.to_string()),
                Some(NamedType::Enum(enum_type)) => match literal {
                    ValueNode::Enum(value) if enum_type.contains(value) => Ok(()),
                    other => Err(format!(
                        "`{other}` is not a value of the enum `{}`",
                        enum_type.name
                    )),
                },
                Some(NamedType::InputObject(input)) => {
                    let ValueNode::Object(fields) = literal else {
                        return Err(format!("`{literal}` is not an object literal"));
                    };
                    if let Some(unknown) = fields.keys().find(|name| input.field(name).is_none()) {
                        return Err(format!(
                            "the field `{unknown}` does not exist on `{}`",
                            input.name
                        ));
                    }
                    for field in input.fields.values() {
                        match fields.get(&field.name) {
                            Some(value) => self.check_literal(&field.ty, value)?,
                            None if field.ty.is_non_null() && field.default_value.is_none() => {
                                return Err(format!(
                                    "the required field `{}` is missing",
                                    field.name
                                ));
                            }
                            None => {}
                        }
                    }
                    Ok(())
                }
                _ => Err(format!("`{}` is not an input type", named.name)),
            },
        }
    }

    fn check_name(&mut self, type_name: &str, name: &str, field_name: Option<&str>) {
        if is_valid_name(name) {
            return;
        }
        let mut error = SchemaError::new(format!("`{name}` is not a valid GraphQL name."))
            .with_code(codes::INVALID_NAME)
            .with_type(type_name);
        if let Some(field_name) = field_name {
            error = error.with_field(field_name);
        }
        self.errors.push(error);
    }

    fn no_fields(&mut self, type_name: &str, kind: &str) {
        self.errors.push(
            SchemaError::new(format!("The {kind} type `{type_name}` declares no fields."))
                .with_code(codes::TYPE_HAS_NO_FIELDS)
                .with_type(type_name),
        );
    }
}
