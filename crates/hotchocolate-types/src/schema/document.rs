//! Schema-first input: SDL documents are parsed with `async-graphql-parser`
//! and turned into type definitions.

use std::sync::Arc;

use async_graphql_parser::types::{
    FieldDefinition, InputValueDefinition, TypeKind as SdlTypeKind, TypeSystemDefinition,
};
use async_graphql_parser::{Positioned, parse_schema};
use tracing::debug;

use crate::error::{SchemaError, codes};
use crate::language::{DirectiveNode, SyntaxLocation, ValueNode};
use crate::types::definitions::{
    ArgumentDefinition, EnumTypeDefinition, EnumValueDefinition, InputObjectTypeDefinition,
    InterfaceTypeDefinition, ObjectFieldDefinition, ObjectTypeDefinition, ScalarTypeDefinition,
    TypeDefinition, UnionTypeDefinition,
};
use crate::types::reference::TypeReference;
use crate::types::scalars::{self, CustomScalar, ScalarType};
use crate::types::wrapping::WrappedType;

use super::finalizer::RootTypeNames;

/// Definitions read from one SDL document.
#[derive(Debug, Default)]
pub(crate) struct ParsedDocument {
    pub types: Vec<TypeDefinition>,
    pub extensions: Vec<ObjectTypeDefinition>,
    pub roots: RootTypeNames,
}

/// Parses an SDL document.
///
/// A syntax error fails the whole document; unsupported definitions are
/// reported and skipped.
pub(crate) fn parse_document(source: &str) -> Result<ParsedDocument, Vec<SchemaError>> {
    let document = parse_schema(source).map_err(|error| {
        let location = error.positions().next().map(SyntaxLocation::from);
        vec![SchemaError::new(error.to_string())
            .with_code(codes::SYNTAX_ERROR)
            .with_location(location)]
    })?;

    let mut parsed = ParsedDocument::default();
    let mut errors = Vec::new();

    for definition in &document.definitions {
        match definition {
            TypeSystemDefinition::Schema(schema) => {
                let schema = &schema.node;
                if let Some(query) = &schema.query {
                    parsed.roots.query = Some(query.node.to_string());
                }
                if let Some(mutation) = &schema.mutation {
                    parsed.roots.mutation = Some(mutation.node.to_string());
                }
                if let Some(subscription) = &schema.subscription {
                    parsed.roots.subscription = Some(subscription.node.to_string());
                }
            }
            TypeSystemDefinition::Type(positioned) => {
                let ty = &positioned.node;
                let name = ty.name.node.to_string();
                let description = ty.description.as_ref().map(|d| d.node.clone());
                let directives: Vec<DirectiveNode> = ty.directives.iter().map(DirectiveNode::from).collect();
                let location = Some(SyntaxLocation::from(positioned.pos));

                if ty.extend {
                    let SdlTypeKind::Object(object) = &ty.kind else {
                        errors.push(
                            SchemaError::new(format!(
                                "Only object types can be extended; `extend` on `{name}` is not supported."
                            ))
                            .with_code(codes::TYPE_KIND_MISMATCH)
                            .with_type(name)
                            .with_location(location),
                        );
                        continue;
                    };
                    parsed.extensions.push(ObjectTypeDefinition {
                        name: Some(name),
                        description,
                        runtime_type: None,
                        fields: object.fields.iter().map(field_definition).collect(),
                        interfaces: object
                            .implements
                            .iter()
                            .map(|i| TypeReference::named(i.node.to_string()))
                            .collect(),
                        directives,
                        location,
                    });
                    continue;
                }

                let definition: TypeDefinition = match &ty.kind {
                    SdlTypeKind::Scalar => {
                        let scalar: Arc<dyn ScalarType> = match scalars::builtin_scalar(&name) {
                            Some(builtin) => builtin,
                            None => Arc::new(CustomScalar::new(name, description)),
                        };
                        let mut definition = ScalarTypeDefinition::new(scalar);
                        definition.directives = directives;
                        definition.location = location;
                        definition.into()
                    }
                    SdlTypeKind::Object(object) => ObjectTypeDefinition {
                        name: Some(name),
                        description,
                        runtime_type: None,
                        fields: object.fields.iter().map(field_definition).collect(),
                        interfaces: object
                            .implements
                            .iter()
                            .map(|i| TypeReference::named(i.node.to_string()))
                            .collect(),
                        directives,
                        location,
                    }
                    .into(),
                    SdlTypeKind::Interface(interface) => InterfaceTypeDefinition {
                        name: Some(name),
                        description,
                        runtime_type: None,
                        fields: interface.fields.iter().map(field_definition).collect(),
                        directives,
                        location,
                    }
                    .into(),
                    SdlTypeKind::Union(union) => UnionTypeDefinition {
                        name: Some(name),
                        description,
                        runtime_type: None,
                        types: union
                            .members
                            .iter()
                            .map(|member| TypeReference::named(member.node.to_string()))
                            .collect(),
                        directives,
                        location,
                    }
                    .into(),
                    SdlTypeKind::Enum(enum_type) => EnumTypeDefinition {
                        name: Some(name),
                        description,
                        runtime_type: None,
                        values: enum_type
                            .values
                            .iter()
                            .map(|value| EnumValueDefinition {
                                name: value.node.value.node.to_string(),
                                description: value.node.description.as_ref().map(|d| d.node.clone()),
                            })
                            .collect(),
                        directives,
                        location,
                    }
                    .into(),
                    SdlTypeKind::InputObject(input) => InputObjectTypeDefinition {
                        name: Some(name),
                        description,
                        runtime_type: None,
                        fields: input.fields.iter().map(input_value_definition).collect(),
                        directives,
                        location,
                    }
                    .into(),
                };
                parsed.types.push(definition);
            }
            TypeSystemDefinition::Directive(directive) => {
                debug!(directive = %directive.node.name.node, "ignoring directive definition");
            }
        }
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(errors)
    }
}

fn field_definition(field: &Positioned<FieldDefinition>) -> ObjectFieldDefinition {
    let definition = &field.node;
    ObjectFieldDefinition {
        name: definition.name.node.to_string(),
        description: definition.description.as_ref().map(|d| d.node.clone()),
        ty: Some(TypeReference::syntax(WrappedType::from(&definition.ty.node))),
        arguments: definition
            .arguments
            .iter()
            .map(input_value_definition)
            .collect(),
        directives: definition.directives.iter().map(DirectiveNode::from).collect(),
        location: Some(field.pos.into()),
        ..ObjectFieldDefinition::default()
    }
}

fn input_value_definition(value: &Positioned<InputValueDefinition>) -> ArgumentDefinition {
    let definition = &value.node;
    let mut argument = ArgumentDefinition::new(
        definition.name.node.to_string(),
        TypeReference::syntax(WrappedType::from(&definition.ty.node)),
    );
    argument.description = definition.description.as_ref().map(|d| d.node.clone());
    argument.default_value = definition
        .default_value
        .as_ref()
        .map(|default| ValueNode::from(&default.node));
    argument.directives = definition.directives.iter().map(DirectiveNode::from).collect();
    argument.location = Some(value.pos.into());
    argument
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_types_and_extensions() {
        let parsed = parse_document(
            r#"
            schema { query: RootQuery }

            "The root"
            type RootQuery {
              user(id: ID!, limit: Int = 10): User
            }

            type User { name: String! }

            extend type User { age: Int }

            enum Role { ADMIN USER }

            scalar Url
            "#,
        )
        .expect("valid document");

        assert_eq!(parsed.roots.query.as_deref(), Some("RootQuery"));
        assert_eq!(parsed.types.len(), 4);
        assert_eq!(parsed.extensions.len(), 1);

        let query = parsed.types[0].as_object().expect("object type");
        assert_eq!(query.description.as_deref(), Some("The root"));
        let user = query.get_field("user").expect("field parsed");
        assert_eq!(user.arguments.len(), 2);
        assert_eq!(user.arguments[0].ty.to_string(), "ID!");
        assert_eq!(user.arguments[1].default_value, Some(ValueNode::int(10)));
        assert!(user.location.is_some());

        assert_eq!(parsed.types[3].name(), Some("Url"));
    }

    #[test]
    fn test_directives_keep_arguments() {
        let parsed = parse_document(
            r#"
            type Mutation {
              createUser(name: String): String @mutationConvention(payloadFieldName: "user")
            }
            "#,
        )
        .expect("valid document");
        let mutation = parsed.types[0].as_object().expect("object type");
        let directive = &mutation.fields[0].directives[0];
        assert_eq!(directive.name, "mutationConvention");
        assert_eq!(
            directive.get_argument("payloadFieldName"),
            Some(&ValueNode::string("user"))
        );
    }

    #[test]
    fn test_syntax_error_has_location() {
        let errors = parse_document("type Query {").expect_err("syntax error");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].has_code(codes::SYNTAX_ERROR));
        assert!(errors[0].location().is_some());
    }
}
