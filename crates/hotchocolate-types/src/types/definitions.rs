//! Type definitions: the mutable configuration of types under construction.
//!
//! Definitions are produced by code-first configuration or by SDL documents
//! and are rewritten in place by interceptors until the types are completed.

use std::fmt;
use std::sync::Arc;

use crate::error::FieldError;
use crate::language::{DirectiveNode, SyntaxLocation, ValueNode};
use crate::mutations::{ErrorDefinition, MutationContextData};
use crate::resolvers::{
    ArgumentFormatter, FieldMiddlewareDefinition, FieldResolver, MiddlewareContext,
    ResolverResult,
};

use super::reference::{TypeContext, TypeReference};
use super::runtime::RuntimeType;
use super::scalars::ScalarType;

/// The kind of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl TypeKind {
    pub fn is_input_type(self) -> bool {
        matches!(self, Self::Scalar | Self::Enum | Self::InputObject)
    }

    pub fn is_output_type(self) -> bool {
        !matches!(self, Self::InputObject)
    }

    /// The context a runtime type bound to this kind is registered under.
    pub fn binding_context(self) -> TypeContext {
        match self {
            Self::Object | Self::Interface | Self::Union => TypeContext::Output,
            Self::InputObject => TypeContext::Input,
            Self::Scalar | Self::Enum => TypeContext::None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "scalar",
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::InputObject => "input object",
        };
        f.write_str(name)
    }
}

/// The definition of a named type.
#[derive(Debug, Clone)]
pub enum TypeDefinition {
    Object(ObjectTypeDefinition),
    Interface(InterfaceTypeDefinition),
    Union(UnionTypeDefinition),
    InputObject(InputObjectTypeDefinition),
    Enum(EnumTypeDefinition),
    Scalar(ScalarTypeDefinition),
}

impl TypeDefinition {
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::InputObject(_) => TypeKind::InputObject,
            Self::Enum(_) => TypeKind::Enum,
            Self::Scalar(_) => TypeKind::Scalar,
        }
    }

    /// The explicitly configured or already completed name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Object(d) => d.name.as_deref(),
            Self::Interface(d) => d.name.as_deref(),
            Self::Union(d) => d.name.as_deref(),
            Self::InputObject(d) => d.name.as_deref(),
            Self::Enum(d) => d.name.as_deref(),
            Self::Scalar(d) => Some(d.scalar.name()),
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Self::Object(d) => d.name = Some(name),
            Self::Interface(d) => d.name = Some(name),
            Self::Union(d) => d.name = Some(name),
            Self::InputObject(d) => d.name = Some(name),
            Self::Enum(d) => d.name = Some(name),
            Self::Scalar(_) => {}
        }
    }

    pub fn runtime_type(&self) -> Option<&RuntimeType> {
        match self {
            Self::Object(d) => d.runtime_type.as_ref(),
            Self::Interface(d) => d.runtime_type.as_ref(),
            Self::Union(d) => d.runtime_type.as_ref(),
            Self::InputObject(d) => d.runtime_type.as_ref(),
            Self::Enum(d) => d.runtime_type.as_ref(),
            Self::Scalar(d) => d.runtime_type.as_ref(),
        }
    }

    pub fn directives(&self) -> &[DirectiveNode] {
        match self {
            Self::Object(d) => &d.directives,
            Self::Interface(d) => &d.directives,
            Self::Union(d) => &d.directives,
            Self::InputObject(d) => &d.directives,
            Self::Enum(d) => &d.directives,
            Self::Scalar(d) => &d.directives,
        }
    }

    pub fn location(&self) -> Option<SyntaxLocation> {
        match self {
            Self::Object(d) => d.location,
            Self::Interface(d) => d.location,
            Self::Union(d) => d.location,
            Self::InputObject(d) => d.location,
            Self::Enum(d) => d.location,
            Self::Scalar(d) => d.location,
        }
    }

    /// Every type reference the definition holds, in declaration order.
    pub fn references(&self) -> Vec<&TypeReference> {
        let mut references = Vec::new();
        match self {
            Self::Object(d) => {
                collect_field_references(&d.fields, &mut references);
                references.extend(d.interfaces.iter());
            }
            Self::Interface(d) => collect_field_references(&d.fields, &mut references),
            Self::Union(d) => references.extend(d.types.iter()),
            Self::InputObject(d) => references.extend(d.fields.iter().map(|f| &f.ty)),
            Self::Enum(_) | Self::Scalar(_) => {}
        }
        references
    }

    pub fn as_object(&self) -> Option<&ObjectTypeDefinition> {
        match self {
            Self::Object(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectTypeDefinition> {
        match self {
            Self::Object(d) => Some(d),
            _ => None,
        }
    }
}

fn collect_field_references<'a>(
    fields: &'a [ObjectFieldDefinition],
    references: &mut Vec<&'a TypeReference>,
) {
    for field in fields {
        if let Some(ty) = &field.ty {
            references.push(ty);
        }
        references.extend(field.arguments.iter().map(|a| &a.ty));
    }
}

impl From<ObjectTypeDefinition> for TypeDefinition {
    fn from(definition: ObjectTypeDefinition) -> Self {
        Self::Object(definition)
    }
}

impl From<InterfaceTypeDefinition> for TypeDefinition {
    fn from(definition: InterfaceTypeDefinition) -> Self {
        Self::Interface(definition)
    }
}

impl From<UnionTypeDefinition> for TypeDefinition {
    fn from(definition: UnionTypeDefinition) -> Self {
        Self::Union(definition)
    }
}

impl From<InputObjectTypeDefinition> for TypeDefinition {
    fn from(definition: InputObjectTypeDefinition) -> Self {
        Self::InputObject(definition)
    }
}

impl From<EnumTypeDefinition> for TypeDefinition {
    fn from(definition: EnumTypeDefinition) -> Self {
        Self::Enum(definition)
    }
}

impl From<ScalarTypeDefinition> for TypeDefinition {
    fn from(definition: ScalarTypeDefinition) -> Self {
        Self::Scalar(definition)
    }
}

// =============================================================================
// Object types
// =============================================================================

/// An object type or an object type extension.
#[derive(Debug, Clone, Default)]
pub struct ObjectTypeDefinition {
    pub name: Option<String>,
    pub description: Option<String>,
    pub runtime_type: Option<RuntimeType>,
    pub fields: Vec<ObjectFieldDefinition>,
    pub interfaces: Vec<TypeReference>,
    pub directives: Vec<DirectiveNode>,
    pub location: Option<SyntaxLocation>,
}

impl ObjectTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// An object type named after its runtime type.
    pub fn for_runtime_type(runtime_type: RuntimeType) -> Self {
        Self {
            runtime_type: Some(runtime_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn runtime_type(mut self, runtime_type: RuntimeType) -> Self {
        self.runtime_type = Some(runtime_type);
        self
    }

    #[must_use]
    pub fn field(mut self, field: ObjectFieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: TypeReference) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn directive(mut self, directive: DirectiveNode) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&ObjectFieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut ObjectFieldDefinition> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

/// An output field of an object or interface type.
#[derive(Debug, Clone, Default)]
pub struct ObjectFieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: Option<TypeReference>,
    pub arguments: Vec<ArgumentDefinition>,
    pub middleware: Vec<FieldMiddlewareDefinition>,
    pub resolver: Option<FieldResolver>,
    /// The declared runtime result type, including `MutationResult` error
    /// type arguments.
    pub result_type: Option<RuntimeType>,
    /// Error types registered for the mutation convention. Cleared once the
    /// convention has consumed them.
    pub errors: Vec<ErrorDefinition>,
    /// Per-field mutation convention overrides.
    pub convention: Option<MutationContextData>,
    pub directives: Vec<DirectiveNode>,
    pub is_introspection: bool,
    pub location: Option<SyntaxLocation>,
}

impl ObjectFieldDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the field type from a type reference.
    #[must_use]
    pub fn ty(mut self, ty: TypeReference) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Sets the field type from SDL syntax; invalid syntax leaves the field
    /// without a type.
    #[must_use]
    pub fn type_syntax(mut self, syntax: &str) -> Self {
        self.ty = TypeReference::parse(syntax);
        self
    }

    /// Sets the field type from the resolver's runtime result type.
    ///
    /// For `MutationResult<T, E...>` the field type is `T` and the remaining
    /// arguments are kept as the mutation's error types.
    #[must_use]
    pub fn result_type(mut self, runtime_type: RuntimeType) -> Self {
        let output = runtime_type
            .mutation_result_arguments()
            .and_then(|arguments| arguments.first())
            .cloned()
            .unwrap_or_else(|| runtime_type.clone());
        self.ty = Some(TypeReference::runtime(output, TypeContext::Output));
        self.result_type = Some(runtime_type);
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn resolver(mut self, resolver: FieldResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn resolve_with(
        self,
        resolver: impl Fn(&MiddlewareContext) -> Result<ResolverResult, FieldError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.resolver(FieldResolver::new(resolver))
    }

    #[must_use]
    pub fn use_middleware(mut self, middleware: FieldMiddlewareDefinition) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Registers an error type for the mutation convention.
    #[must_use]
    pub fn error(mut self, runtime_type: RuntimeType) -> Self {
        self.errors.push(ErrorDefinition::from_runtime_type(runtime_type));
        self
    }

    #[must_use]
    pub fn error_definition(mut self, definition: ErrorDefinition) -> Self {
        self.errors.push(definition);
        self
    }

    #[must_use]
    pub fn mutation_convention(mut self, data: MutationContextData) -> Self {
        self.convention = Some(data);
        self
    }

    #[must_use]
    pub fn directive(mut self, directive: DirectiveNode) -> Self {
        self.directives.push(directive);
        self
    }

    #[must_use]
    pub fn introspection(mut self) -> Self {
        self.is_introspection = true;
        self
    }
}

/// An argument or input field.
#[derive(Debug, Clone)]
pub struct ArgumentDefinition {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeReference,
    pub default_value: Option<ValueNode>,
    pub formatters: Vec<ArgumentFormatter>,
    pub directives: Vec<DirectiveNode>,
    pub location: Option<SyntaxLocation>,
}

/// Input object fields share the argument configuration.
pub type InputFieldDefinition = ArgumentDefinition;

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, ty: TypeReference) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            default_value: None,
            formatters: Vec::new(),
            directives: Vec::new(),
            location: None,
        }
    }

    /// An argument typed by a runtime type in input context.
    pub fn runtime(name: impl Into<String>, runtime_type: RuntimeType) -> Self {
        Self::new(name, TypeReference::runtime(runtime_type, TypeContext::Input))
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: ValueNode) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: ArgumentFormatter) -> Self {
        self.formatters.push(formatter);
        self
    }

    #[must_use]
    pub fn directive(mut self, directive: DirectiveNode) -> Self {
        self.directives.push(directive);
        self
    }
}

// =============================================================================
// Other type kinds
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct InterfaceTypeDefinition {
    pub name: Option<String>,
    pub description: Option<String>,
    pub runtime_type: Option<RuntimeType>,
    pub fields: Vec<ObjectFieldDefinition>,
    pub directives: Vec<DirectiveNode>,
    pub location: Option<SyntaxLocation>,
}

impl InterfaceTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: ObjectFieldDefinition) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnionTypeDefinition {
    pub name: Option<String>,
    pub description: Option<String>,
    pub runtime_type: Option<RuntimeType>,
    pub types: Vec<TypeReference>,
    pub directives: Vec<DirectiveNode>,
    pub location: Option<SyntaxLocation>,
}

impl UnionTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn member(mut self, member: TypeReference) -> Self {
        self.types.push(member);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputObjectTypeDefinition {
    pub name: Option<String>,
    pub description: Option<String>,
    pub runtime_type: Option<RuntimeType>,
    pub fields: Vec<InputFieldDefinition>,
    pub directives: Vec<DirectiveNode>,
    pub location: Option<SyntaxLocation>,
}

impl InputObjectTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: InputFieldDefinition) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnumTypeDefinition {
    pub name: Option<String>,
    pub description: Option<String>,
    pub runtime_type: Option<RuntimeType>,
    pub values: Vec<EnumValueDefinition>,
    pub directives: Vec<DirectiveNode>,
    pub location: Option<SyntaxLocation>,
}

impl EnumTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn value(mut self, name: impl Into<String>) -> Self {
        self.values.push(EnumValueDefinition {
            name: name.into(),
            description: None,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDefinition {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScalarTypeDefinition {
    pub scalar: Arc<dyn ScalarType>,
    pub runtime_type: Option<RuntimeType>,
    pub directives: Vec<DirectiveNode>,
    pub location: Option<SyntaxLocation>,
}

impl ScalarTypeDefinition {
    pub fn new(scalar: Arc<dyn ScalarType>) -> Self {
        Self {
            runtime_type: scalar.runtime_type(),
            scalar,
            directives: Vec::new(),
            location: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_result_sets_success_type() {
        let field = ObjectFieldDefinition::new("createUser").result_type(
            RuntimeType::mutation_result(
                RuntimeType::reference("User"),
                vec![RuntimeType::reference("InvalidNameError")],
            ),
        );
        assert_eq!(
            field.ty,
            Some(TypeReference::runtime(
                RuntimeType::reference("User"),
                TypeContext::Output
            ))
        );
        assert!(field.result_type.is_some());
    }

    #[test]
    fn test_references_in_declaration_order() {
        let definition: TypeDefinition = ObjectTypeDefinition::new("Query")
            .field(
                ObjectFieldDefinition::new("user")
                    .type_syntax("User")
                    .argument(ArgumentDefinition::new(
                        "id",
                        TypeReference::parse("ID!").expect("valid syntax"),
                    )),
            )
            .implements(TypeReference::named("Node"))
            .into();
        let references: Vec<String> = definition
            .references()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(references, vec!["User", "ID!", "Node"]);
    }

    #[test]
    fn test_kind_positions() {
        assert!(TypeKind::Scalar.is_input_type() && TypeKind::Scalar.is_output_type());
        assert!(!TypeKind::Object.is_input_type());
        assert!(!TypeKind::InputObject.is_output_type());
        assert_eq!(TypeKind::Union.binding_context(), TypeContext::Output);
    }
}
