//! Completed, immutable schema types.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::FieldError;
use crate::language::{DirectiveNode, ValueNode};
use crate::resolvers::{FieldDelegate, MiddlewareContext, ResolverResult};
use crate::types::definitions::{EnumValueDefinition, TypeKind};
use crate::types::runtime::RuntimeType;
use crate::types::scalars::ScalarType;
use crate::types::wrapping::WrappedType;

/// A bound reference to a named type of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedTypeRef {
    pub name: String,
    pub kind: TypeKind,
}

impl fmt::Display for NamedTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The type of a field, argument or input field.
pub type FieldType = WrappedType<NamedTypeRef>;

#[derive(Debug, Clone)]
pub enum NamedType {
    Scalar(Arc<dyn ScalarType>),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(scalar) => scalar.name(),
            Self::Object(t) => &t.name,
            Self::Interface(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::Enum(t) => &t.name,
            Self::InputObject(t) => &t.name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::Enum(_) => TypeKind::Enum,
            Self::InputObject(_) => TypeKind::InputObject,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Scalar(scalar) => scalar.description(),
            Self::Object(t) => t.description.as_deref(),
            Self::Interface(t) => t.description.as_deref(),
            Self::Union(t) => t.description.as_deref(),
            Self::Enum(t) => t.description.as_deref(),
            Self::InputObject(t) => t.description.as_deref(),
        }
    }

    pub fn as_scalar(&self) -> Option<&Arc<dyn ScalarType>> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            Self::Interface(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            Self::Union(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_input_object(&self) -> Option<&InputObjectType> {
        match self {
            Self::InputObject(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub runtime_type: Option<RuntimeType>,
    pub fields: IndexMap<String, ObjectField>,
    pub interfaces: Vec<String>,
    pub directives: Vec<DirectiveNode>,
}

impl ObjectType {
    pub fn field(&self, name: &str) -> Option<&ObjectField> {
        self.fields.get(name)
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }
}

/// A completed output field with its compiled resolver pipeline.
#[derive(Debug, Clone)]
pub struct ObjectField {
    pub name: String,
    pub description: Option<String>,
    pub ty: FieldType,
    pub arguments: IndexMap<String, Argument>,
    pub directives: Vec<DirectiveNode>,
    pub is_introspection: bool,
    /// Keys of the keyed middleware in pipeline order.
    pub middleware_keys: Vec<String>,
    pub(crate) pipeline: FieldDelegate,
}

impl ObjectField {
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.get(name)
    }

    /// Runs the field pipeline and returns its result.
    ///
    /// A pipeline that completes without setting a result yields null.
    pub fn resolve(&self, context: &mut MiddlewareContext) -> Result<ResolverResult, FieldError> {
        self.pipeline.call(context)?;
        Ok(context.result.clone().unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: IndexMap<String, InterfaceField>,
    pub directives: Vec<DirectiveNode>,
}

#[derive(Debug, Clone)]
pub struct InterfaceField {
    pub name: String,
    pub description: Option<String>,
    pub ty: FieldType,
    pub arguments: IndexMap<String, Argument>,
}

/// A completed argument or input field.
#[derive(Debug, Clone)]
pub struct Argument {
    pub name: String,
    pub description: Option<String>,
    pub ty: FieldType,
    pub default_value: Option<ValueNode>,
    pub directives: Vec<DirectiveNode>,
}

pub type InputField = Argument;

#[derive(Debug, Clone)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub runtime_type: Option<RuntimeType>,
    pub fields: IndexMap<String, InputField>,
    pub directives: Vec<DirectiveNode>,
}

impl InputObjectType {
    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.fields.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub types: Vec<String>,
    pub directives: Vec<DirectiveNode>,
}

impl UnionType {
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t == type_name)
    }
}

#[derive(Debug, Clone)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValueDefinition>,
    pub directives: Vec<DirectiveNode>,
}

impl EnumType {
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.name == value)
    }
}
