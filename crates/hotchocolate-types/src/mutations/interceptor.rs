//! The mutation convention rewrite.
//!
//! Runs after type extensions are merged, so it sees the final field list of
//! the mutation type. Every mutation field that opts in is rewritten to
//!
//! ```graphql
//! createUser(input: CreateUserInput!): CreateUserPayload!
//! ```
//!
//! and the input, payload, error union and error types it needs are
//! registered. Those types are discovered and named by the initializer before
//! dependencies are resolved.

use std::mem;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{SchemaError, codes};
use crate::language::ValueNode;
use crate::resolvers::insert_middleware;
use crate::schema::interceptor::{InterceptorContext, TypeInterceptor};
use crate::schema::registry::{TypeOrigin, TypeRegistry};
use crate::types::definitions::{
    ArgumentDefinition, InputObjectTypeDefinition, ObjectFieldDefinition, ObjectTypeDefinition,
    TypeDefinition, TypeKind, UnionTypeDefinition,
};
use crate::types::naming::camel_case;
use crate::types::reference::{TypeContext, TypeId, TypeReference};
use crate::types::wrapping::WrappedType;
use crate::value::RuntimeValue;

use super::directive::{invalid_location, is_mutation_convention, parse_mutation_convention};
use super::errors::{
    ERROR_INTERFACE_NAME, ErrorDefinition, collect_error_definitions, error_interface,
    synthesize_error_type,
};
use super::middleware::{
    UnwrappedArgument, argument_middleware, error_middleware, null_on_error_middleware,
    payload_data_resolver, payload_errors_resolver, result_middleware,
};
use super::options::{MutationContextData, MutationConventionOptions, ResolvedConvention};

/// Payload fields named like this pass the query root through and are never
/// nulled on error.
const QUERY_FIELD_NAME: &str = "query";

/// Applies the mutation convention to the fields of the mutation type.
#[derive(Debug)]
pub struct MutationConventionTypeInterceptor {
    options: MutationConventionOptions,
    /// Overrides registered on the builder, keyed by mutation field name.
    explicit: IndexMap<String, MutationContextData>,
    error_interface_registered: bool,
}

impl MutationConventionTypeInterceptor {
    pub fn new(options: MutationConventionOptions, explicit: Vec<MutationContextData>) -> Self {
        Self {
            options,
            explicit: explicit
                .into_iter()
                .map(|data| (data.name.clone(), data))
                .collect(),
            error_interface_registered: false,
        }
    }

    fn rewrite_field(
        &mut self,
        context: &mut InterceptorContext<'_>,
        mutation_type: &str,
        field: &mut ObjectFieldDefinition,
    ) {
        let fluent_data = field.convention.take();
        let builder_data = self.explicit.shift_remove(&field.name);
        let errors = collect_error_definitions(field);
        field.errors.clear();

        let mut directive_data = None;
        let mut directive_failed = false;
        for directive in field.directives.iter().filter(|d| is_mutation_convention(d)) {
            match parse_mutation_convention(directive, mutation_type, &field.name) {
                Ok(data) => directive_data = Some(data),
                Err(error) => {
                    context.report(error);
                    directive_failed = true;
                }
            }
        }
        field.directives.retain(|d| !is_mutation_convention(d));
        if directive_failed {
            return;
        }

        // directive, then fluent configuration, then builder overrides
        let explicit = [directive_data, fluent_data, builder_data]
            .into_iter()
            .flatten()
            .reduce(|current, data| current.merge(&data));

        let Some(convention) = ResolvedConvention::resolve(
            &field.name,
            explicit.as_ref(),
            !errors.is_empty(),
            &self.options,
        ) else {
            trace!(mutation = %field.name, "mutation convention disabled");
            return;
        };

        let mutation = field.name.clone();
        insert_middleware(&mut field.middleware, result_middleware());
        self.apply_input_convention(context, &convention, &mutation, field);
        let error_union = self.register_errors(context, &convention, &mutation, &errors);
        self.apply_payload_convention(
            context,
            &convention,
            mutation_type,
            field,
            !errors.is_empty(),
            error_union.as_deref(),
        );
        if !errors.is_empty() {
            insert_middleware(&mut field.middleware, error_middleware(errors));
        }
    }

    fn apply_input_convention(
        &mut self,
        context: &mut InterceptorContext<'_>,
        convention: &ResolvedConvention,
        mutation: &str,
        field: &mut ObjectFieldDefinition,
    ) {
        if field.arguments.is_empty() || context.registry.has_explicit_name(&convention.input_type_name) {
            return;
        }

        let arguments = mem::take(&mut field.arguments);
        let unwrapped = arguments
            .iter()
            .map(|argument| UnwrappedArgument {
                name: argument.name.clone(),
                default_value: argument.default_value.clone(),
                default: argument
                    .default_value
                    .as_ref()
                    .map(|literal| coerce_default(&*context.registry, &argument.ty, literal)),
                formatters: argument.formatters.clone(),
            })
            .collect();

        let input = InputObjectTypeDefinition {
            name: Some(convention.input_type_name.clone()),
            fields: arguments,
            ..InputObjectTypeDefinition::default()
        };
        self.register(context, input.into(), mutation);

        field.arguments = vec![ArgumentDefinition::new(
            convention.input_argument_name.clone(),
            TypeReference::syntax(
                WrappedType::Named(convention.input_type_name.clone()).into_non_null(),
            ),
        )];
        insert_middleware(
            &mut field.middleware,
            argument_middleware(convention.input_argument_name.clone(), unwrapped),
        );
    }

    /// Registers the error types and the error union of a mutation and
    /// returns the union's name.
    fn register_errors(
        &mut self,
        context: &mut InterceptorContext<'_>,
        convention: &ResolvedConvention,
        mutation: &str,
        errors: &[ErrorDefinition],
    ) -> Option<String> {
        if errors.is_empty() {
            return None;
        }

        let mut members = Vec::with_capacity(errors.len());
        for definition in errors {
            if let TypeReference::Runtime { runtime_type, .. } = &definition.schema_type
                && context
                    .registry
                    .by_runtime_type(runtime_type, TypeContext::Output)
                    .is_none()
            {
                let Some(error_type) = synthesize_error_type(runtime_type) else {
                    context.report(
                        SchemaError::new(format!(
                            "The error type `{runtime_type}` of the mutation `{mutation}` cannot be turned into an object type."
                        ))
                        .with_code(codes::TYPE_REFERENCE_INVALID)
                        .with_field(mutation),
                    );
                    continue;
                };
                self.ensure_error_interface(context, mutation);
                self.register(context, error_type.into(), mutation);
            }
            members.push(definition.schema_type.clone());
        }

        let union_name = convention.payload_error_type_name.clone();
        if context.registry.has_explicit_name(&union_name) {
            context.report(
                SchemaError::new(format!(
                    "The error union `{union_name}` of the mutation `{mutation}` collides with an existing type of the same name."
                ))
                .with_code(codes::MUTATION_CONVENTION_TYPE_NAME_COLLISION)
                .with_type(union_name)
                .with_field(mutation)
                .with_extension("mutation", mutation),
            );
            return None;
        }

        let union = UnionTypeDefinition {
            name: Some(union_name.clone()),
            types: members,
            ..UnionTypeDefinition::default()
        };
        self.register(context, union.into(), mutation);
        Some(union_name)
    }

    fn ensure_error_interface(&mut self, context: &mut InterceptorContext<'_>, mutation: &str) {
        if self.error_interface_registered {
            return;
        }
        self.error_interface_registered = true;
        if !context.registry.has_explicit_name(ERROR_INTERFACE_NAME) {
            self.register(context, error_interface().into(), mutation);
        }
    }

    fn apply_payload_convention(
        &mut self,
        context: &mut InterceptorContext<'_>,
        convention: &ResolvedConvention,
        mutation_type: &str,
        field: &mut ObjectFieldDefinition,
        has_errors: bool,
        error_union: Option<&str>,
    ) {
        let Some(ty) = field.ty.clone() else {
            return;
        };
        let resolved = context.registry.try_resolve(&ty);
        let named_type_name = match (&resolved, &ty) {
            (Some(resolved), _) => context
                .registry
                .name_of(*resolved.named_type())
                .map(str::to_string),
            (None, TypeReference::Syntax { ty, .. }) => Some(ty.named_type().clone()),
            (None, _) => None,
        };

        if named_type_name.as_deref() == Some(convention.payload_type_name.as_str()) {
            self.apply_user_payload(
                context,
                convention,
                mutation_type,
                field,
                resolved,
                has_errors,
                error_union,
            );
            return;
        }

        let data_field_name = convention
            .payload_field_name
            .clone()
            .or_else(|| named_type_name.as_deref().map(camel_case))
            .unwrap_or_else(|| "data".to_string());
        let data_type = match resolved {
            Some(resolved) => TypeReference::Schema(resolved.into_nullable()),
            None => match ty {
                TypeReference::Syntax { ty, context } => TypeReference::Syntax {
                    ty: ty.into_nullable(),
                    context,
                },
                other => other,
            },
        };

        let mut payload = ObjectTypeDefinition::new(convention.payload_type_name.clone()).field(
            ObjectFieldDefinition::new(data_field_name)
                .ty(data_type)
                .resolver(payload_data_resolver()),
        );
        if let Some(union) = error_union {
            payload = payload.field(errors_field(convention, union));
        }
        self.register(context, payload.into(), &field.name);

        field.ty = Some(TypeReference::syntax(
            WrappedType::Named(convention.payload_type_name.clone()).into_non_null(),
        ));
    }

    /// The mutation already returns a type named like its payload.
    #[allow(clippy::too_many_arguments)]
    fn apply_user_payload(
        &mut self,
        context: &mut InterceptorContext<'_>,
        convention: &ResolvedConvention,
        mutation_type: &str,
        field: &mut ObjectFieldDefinition,
        resolved: Option<WrappedType<TypeId>>,
        has_errors: bool,
        error_union: Option<&str>,
    ) {
        let payload_id = context.registry.by_name(&convention.payload_type_name);
        let is_object = payload_id
            .and_then(|id| context.registry.get(id))
            .is_some_and(|t| t.kind() == TypeKind::Object);
        let (Some(payload_id), Some(resolved)) = (payload_id, resolved) else {
            return;
        };
        if resolved.is_list() || !is_object {
            context.report(
                SchemaError::new(format!(
                    "The payload type `{}` of the mutation `{}` must be an object type.",
                    convention.payload_type_name, field.name
                ))
                .with_code(codes::MUTATION_PAYLOAD_MUST_BE_OBJECT)
                .with_type(mutation_type)
                .with_field(field.name.clone())
                .with_location(field.location),
            );
            return;
        }
        field.ty = Some(TypeReference::Schema(resolved.into_non_null()));
        if !has_errors {
            return;
        }

        let nullable_types: Vec<Option<TypeReference>> = context
            .registry
            .get(payload_id)
            .and_then(|t| t.definition.as_object())
            .map(|payload| {
                payload
                    .fields
                    .iter()
                    .map(|payload_field| {
                        payload_field
                            .ty
                            .as_ref()
                            .and_then(|reference| context.registry.try_resolve(reference))
                            .map(|ty| TypeReference::Schema(ty.into_nullable()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some(payload) = context
            .registry
            .get_mut(payload_id)
            .and_then(|t| t.definition.as_object_mut())
        {
            for (payload_field, nullable) in payload.fields.iter_mut().zip(nullable_types) {
                if payload_field.name == QUERY_FIELD_NAME {
                    continue;
                }
                if let Some(nullable) = nullable {
                    payload_field.ty = Some(nullable);
                }
                insert_middleware(&mut payload_field.middleware, null_on_error_middleware());
            }
            if let Some(union) = error_union
                && payload.get_field(&convention.payload_errors_field_name).is_none()
            {
                payload.fields.push(errors_field(convention, union));
            }
        }

        debug!(
            mutation = %field.name,
            payload = %convention.payload_type_name,
            "adapted user payload type"
        );
    }

    fn register(
        &mut self,
        context: &mut InterceptorContext<'_>,
        definition: TypeDefinition,
        mutation: &str,
    ) {
        let kind = definition.kind();
        let name = definition.name().unwrap_or_default().to_string();
        match context.registry.register(
            definition,
            TypeOrigin::Convention {
                mutation: mutation.to_string(),
            },
        ) {
            Ok(_) => debug!(mutation = %mutation, name = %name, kind = %kind, "synthesized type"),
            Err(error) => context.report(error.with_extension("mutation", mutation)),
        }
    }
}

fn errors_field(convention: &ResolvedConvention, union: &str) -> ObjectFieldDefinition {
    ObjectFieldDefinition::new(convention.payload_errors_field_name.clone())
        .ty(TypeReference::syntax(
            WrappedType::Named(union.to_string()).into_non_null().into_list(),
        ))
        .resolver(payload_errors_resolver())
}

/// Coerces the default of a folded argument the way the argument type would.
///
/// Types that cannot be resolved yet, and non-scalar types, fall back to an
/// untyped conversion; invalid defaults are reported by schema validation.
fn coerce_default(registry: &TypeRegistry, ty: &TypeReference, literal: &ValueNode) -> RuntimeValue {
    registry
        .try_resolve(ty)
        .and_then(|ty| coerce_literal(registry, &ty, literal))
        .unwrap_or_else(|| RuntimeValue::from(literal))
}

fn coerce_literal(
    registry: &TypeRegistry,
    ty: &WrappedType<TypeId>,
    literal: &ValueNode,
) -> Option<RuntimeValue> {
    match (ty, literal) {
        (_, ValueNode::Null) => Some(RuntimeValue::Null),
        (WrappedType::NonNull(inner), _) => coerce_literal(registry, inner, literal),
        (WrappedType::List(inner), ValueNode::List(items)) => items
            .iter()
            .map(|item| coerce_literal(registry, inner, item))
            .collect::<Option<Vec<_>>>()
            .map(RuntimeValue::List),
        (WrappedType::List(inner), item) => {
            coerce_literal(registry, inner, item).map(|value| RuntimeValue::List(vec![value]))
        }
        (WrappedType::Named(id), _) => match &registry.get(*id)?.definition {
            TypeDefinition::Scalar(definition) => definition.scalar.parse_literal(literal).ok(),
            _ => None,
        },
    }
}

impl TypeInterceptor for MutationConventionTypeInterceptor {
    fn on_type_discovered(&mut self, context: &mut InterceptorContext<'_>, id: TypeId) {
        let Some(registered) = context.registry.get(id) else {
            return;
        };
        let type_name = registered.display_name();
        let mut errors: Vec<SchemaError> = registered
            .definition
            .directives()
            .iter()
            .filter(|d| is_mutation_convention(d))
            .map(|d| invalid_location(d, &type_name, "a type"))
            .collect();

        let argument_directives = |fields: &[ObjectFieldDefinition]| {
            fields
                .iter()
                .flat_map(|f| f.arguments.iter())
                .flat_map(|a| a.directives.iter())
                .filter(|d| is_mutation_convention(d))
                .map(|d| invalid_location(d, &type_name, "an argument"))
                .collect::<Vec<_>>()
        };
        match &registered.definition {
            TypeDefinition::Object(definition) => {
                errors.extend(argument_directives(definition.fields.as_slice()));
            }
            TypeDefinition::Interface(definition) => {
                errors.extend(argument_directives(definition.fields.as_slice()));
                errors.extend(
                    definition
                        .fields
                        .iter()
                        .flat_map(|f| f.directives.iter())
                        .filter(|d| is_mutation_convention(d))
                        .map(|d| invalid_location(d, &type_name, "an interface field")),
                );
            }
            TypeDefinition::InputObject(definition) => errors.extend(
                definition
                    .fields
                    .iter()
                    .flat_map(|f| f.directives.iter())
                    .filter(|d| is_mutation_convention(d))
                    .map(|d| invalid_location(d, &type_name, "an input field")),
            ),
            _ => {}
        }

        for error in errors {
            context.report(error);
        }
    }

    fn on_after_merge_type_extensions(&mut self, context: &mut InterceptorContext<'_>) {
        let mutation_type = context.options.mutation_type_name.clone();
        let mutation_id = context
            .registry
            .by_name(&mutation_type)
            .filter(|id| {
                context
                    .registry
                    .get(*id)
                    .is_some_and(|t| t.kind() == TypeKind::Object)
            });

        if let Some(mutation_id) = mutation_id {
            let fields = context
                .registry
                .get_mut(mutation_id)
                .and_then(|t| t.definition.as_object_mut())
                .map(|definition| mem::take(&mut definition.fields))
                .unwrap_or_default();

            let mut rewritten = Vec::with_capacity(fields.len());
            for mut field in fields {
                if !field.is_introspection {
                    self.rewrite_field(context, &mutation_type, &mut field);
                }
                rewritten.push(field);
            }

            if let Some(definition) = context
                .registry
                .get_mut(mutation_id)
                .and_then(|t| t.definition.as_object_mut())
            {
                definition.fields = rewritten;
            }
        }

        let mut orphans: Vec<String> = self.explicit.drain(..).map(|(name, _)| name).collect();
        for registered in context.registry.iter() {
            if registered.is_extension || Some(registered.id) == mutation_id {
                continue;
            }
            let Some(definition) = registered.definition.as_object() else {
                continue;
            };
            orphans.extend(
                definition
                    .fields
                    .iter()
                    .filter(|f| {
                        f.convention.is_some() || f.directives.iter().any(is_mutation_convention)
                    })
                    .map(|f| f.name.clone()),
            );
        }

        if !orphans.is_empty() {
            context.report(
                SchemaError::new(format!(
                    "Mutation conventions were configured for fields that are not fields of the mutation type `{mutation_type}`: {}.",
                    orphans.join(", ")
                ))
                .with_code(codes::MUTATION_CONVENTION_NON_MUTATION_FIELDS)
                .with_type(mutation_type)
                .with_extension("fields", orphans.join(", ")),
            );
        }
    }
}
