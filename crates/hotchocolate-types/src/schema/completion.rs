//! Binds a type definition whose dependencies are resolved into a completed
//! [`NamedType`].

use indexmap::IndexMap;

use crate::error::{SchemaError, codes};
use crate::resolvers::compile_pipeline;
use crate::types::definitions::{
    ArgumentDefinition, ObjectFieldDefinition, ObjectTypeDefinition, TypeDefinition,
};
use crate::types::reference::{TypeId, TypeReference};

use super::named_type::{
    Argument, EnumType, FieldType, InputObjectType, InterfaceField, InterfaceType, NamedType,
    NamedTypeRef, ObjectField, ObjectType, UnionType,
};
use super::registry::TypeRegistry;

/// Completes the registered type `id`.
///
/// All problems found in the type are returned together.
pub(crate) fn complete_type(
    registry: &TypeRegistry,
    id: TypeId,
) -> Result<NamedType, Vec<SchemaError>> {
    let Some(registered) = registry.get(id) else {
        return Err(vec![SchemaError::new(format!("The type {id} is not registered."))]);
    };
    let type_name = registered.display_name();
    let mut binder = Binder {
        registry,
        type_name: &type_name,
        errors: Vec::new(),
    };

    let completed = match &registered.definition {
        TypeDefinition::Scalar(definition) => NamedType::Scalar(definition.scalar.clone()),
        TypeDefinition::Object(definition) => NamedType::Object(binder.object(definition)),
        TypeDefinition::Interface(definition) => {
            let fields = binder.fields(&definition.fields);
            NamedType::Interface(InterfaceType {
                name: type_name.clone(),
                description: definition.description.clone(),
                fields: fields
                    .into_iter()
                    .map(|(name, field)| {
                        (
                            name,
                            InterfaceField {
                                name: field.name,
                                description: field.description,
                                ty: field.ty,
                                arguments: field.arguments,
                            },
                        )
                    })
                    .collect(),
                directives: definition.directives.clone(),
            })
        }
        TypeDefinition::Union(definition) => NamedType::Union(UnionType {
            name: type_name.clone(),
            description: definition.description.clone(),
            types: definition
                .types
                .iter()
                .filter_map(|member| binder.bind(member, None).map(|ty| ty.named_type().name.clone()))
                .collect(),
            directives: definition.directives.clone(),
        }),
        TypeDefinition::Enum(definition) => NamedType::Enum(EnumType {
            name: type_name.clone(),
            description: definition.description.clone(),
            values: definition.values.clone(),
            directives: definition.directives.clone(),
        }),
        TypeDefinition::InputObject(definition) => NamedType::InputObject(InputObjectType {
            name: type_name.clone(),
            description: definition.description.clone(),
            runtime_type: definition.runtime_type.clone(),
            fields: binder.arguments(None, &definition.fields),
            directives: definition.directives.clone(),
        }),
    };

    if binder.errors.is_empty() {
        Ok(completed)
    } else {
        Err(binder.errors)
    }
}

struct Binder<'a> {
    registry: &'a TypeRegistry,
    type_name: &'a str,
    errors: Vec<SchemaError>,
}

impl Binder<'_> {
    fn object(&mut self, definition: &ObjectTypeDefinition) -> ObjectType {
        ObjectType {
            name: self.type_name.to_string(),
            description: definition.description.clone(),
            runtime_type: definition.runtime_type.clone(),
            fields: self.fields(&definition.fields),
            interfaces: definition
                .interfaces
                .iter()
                .filter_map(|interface| {
                    self.bind(interface, None)
                        .map(|ty| ty.named_type().name.clone())
                })
                .collect(),
            directives: definition.directives.clone(),
        }
    }

    fn fields(&mut self, definitions: &[ObjectFieldDefinition]) -> IndexMap<String, ObjectField> {
        let mut fields = IndexMap::with_capacity(definitions.len());
        for definition in definitions {
            if fields.contains_key(&definition.name) {
                self.errors.push(
                    SchemaError::new(format!(
                        "The field `{}` is declared more than once on `{}`.",
                        definition.name, self.type_name
                    ))
                    .with_code(codes::DUPLICATE_FIELD_NAME)
                    .with_type(self.type_name)
                    .with_field(definition.name.clone())
                    .with_location(definition.location),
                );
                continue;
            }

            let Some(reference) = &definition.ty else {
                self.errors.push(
                    SchemaError::new(format!(
                        "The field `{}.{}` has no type.",
                        self.type_name, definition.name
                    ))
                    .with_code(codes::TYPE_REFERENCE_INVALID)
                    .with_type(self.type_name)
                    .with_field(definition.name.clone())
                    .with_location(definition.location),
                );
                continue;
            };
            let Some(ty) = self.bind(reference, Some(&definition.name)) else {
                continue;
            };

            let middleware_keys = definition
                .middleware
                .iter()
                .filter_map(|m| m.key.clone())
                .collect();
            fields.insert(
                definition.name.clone(),
                ObjectField {
                    name: definition.name.clone(),
                    description: definition.description.clone(),
                    ty,
                    arguments: self.arguments(Some(&definition.name), &definition.arguments),
                    directives: definition.directives.clone(),
                    is_introspection: definition.is_introspection,
                    middleware_keys,
                    pipeline: compile_pipeline(
                        &definition.name,
                        definition.resolver.as_ref(),
                        &definition.middleware,
                    ),
                },
            );
        }
        fields
    }

    fn arguments(
        &mut self,
        field_name: Option<&str>,
        definitions: &[ArgumentDefinition],
    ) -> IndexMap<String, Argument> {
        let mut arguments = IndexMap::with_capacity(definitions.len());
        for definition in definitions {
            let coordinate = match field_name {
                Some(field) => format!("{field}({})", definition.name),
                None => definition.name.clone(),
            };
            if arguments.contains_key(&definition.name) {
                self.errors.push(
                    SchemaError::new(format!(
                        "`{}.{coordinate}` is declared more than once.",
                        self.type_name
                    ))
                    .with_code(codes::DUPLICATE_FIELD_NAME)
                    .with_type(self.type_name)
                    .with_field(coordinate)
                    .with_location(definition.location),
                );
                continue;
            }
            let Some(ty) = self.bind(&definition.ty, Some(&coordinate)) else {
                continue;
            };
            arguments.insert(
                definition.name.clone(),
                Argument {
                    name: definition.name.clone(),
                    description: definition.description.clone(),
                    ty,
                    default_value: definition.default_value.clone(),
                    directives: definition.directives.clone(),
                },
            );
        }
        arguments
    }

    /// Binds a reference to its named types; records an error if it cannot.
    fn bind(&mut self, reference: &TypeReference, field_name: Option<&str>) -> Option<FieldType> {
        let bound = self.registry.try_resolve(reference).and_then(|resolved| {
            resolved
                .try_map(|id| {
                    let registered = self.registry.get(id).ok_or(())?;
                    Ok::<_, ()>(NamedTypeRef {
                        name: registered.name().ok_or(())?.to_string(),
                        kind: registered.kind(),
                    })
                })
                .ok()
        });

        if bound.is_none() {
            let mut error = SchemaError::new(format!(
                "The type reference `{reference}` of `{}` cannot be bound to a named type.",
                self.type_name
            ))
            .with_code(codes::TYPE_REFERENCE_INVALID)
            .with_type(self.type_name);
            if let Some(field_name) = field_name {
                error = error.with_field(field_name);
            }
            self.errors.push(error);
        }
        bound
    }
}
