//! Schema construction and the finished, immutable schema.
//!
//! [`SchemaBuilder`] collects type definitions, extensions and SDL documents,
//! runs them through the initialization phases and validates
//! the result. A successful build yields a [`Schema`].

mod builder;
mod completion;
mod document;
mod finalizer;
mod initializer;
pub mod interceptor;
pub mod named_type;
mod printer;
pub mod registry;

use indexmap::IndexMap;

use crate::value::ObjectValue;

pub use builder::SchemaBuilder;
pub use interceptor::{InterceptorContext, TypeInterceptor};
pub use named_type::{
    Argument, EnumType, FieldType, InputField, InputObjectType, InterfaceField, InterfaceType,
    NamedType, NamedTypeRef, ObjectField, ObjectType, UnionType,
};
pub use registry::{RegisteredType, TypeOrigin, TypeRegistry, TypeStatus};

/// A completed GraphQL schema.
///
/// Immutable once built; safe to share between threads.
#[derive(Debug)]
pub struct Schema {
    types: IndexMap<String, NamedType>,
    query_type: String,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    /// Runtime type name to object type name.
    runtime_bindings: IndexMap<String, String>,
}

impl Schema {
    pub(crate) fn new(
        types: IndexMap<String, NamedType>,
        query_type: String,
        mutation_type: Option<String>,
        subscription_type: Option<String>,
    ) -> Self {
        let runtime_bindings = types
            .values()
            .filter_map(NamedType::as_object)
            .filter_map(|object| {
                object
                    .runtime_type
                    .as_ref()
                    .map(|runtime_type| (runtime_type.to_string(), object.name.clone()))
            })
            .collect();

        Self {
            types,
            query_type,
            mutation_type,
            subscription_type,
            runtime_bindings,
        }
    }

    pub fn get_type(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    /// All types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &NamedType> {
        self.types.values()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn object_type(&self, name: &str) -> Option<&ObjectType> {
        self.get_type(name).and_then(NamedType::as_object)
    }

    pub fn query_type_name(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type_name(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn subscription_type_name(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    pub fn query_type(&self) -> Option<&ObjectType> {
        self.object_type(&self.query_type)
    }

    pub fn mutation_type(&self) -> Option<&ObjectType> {
        self.mutation_type
            .as_deref()
            .and_then(|name| self.object_type(name))
    }

    pub fn subscription_type(&self) -> Option<&ObjectType> {
        self.subscription_type
            .as_deref()
            .and_then(|name| self.object_type(name))
    }

    /// Finds the object type a resolver result belongs to.
    ///
    /// The runtime type binding is tried first, then an object type of the
    /// same name.
    pub fn resolve_object_type(&self, value: &ObjectValue) -> Option<&ObjectType> {
        let type_name = value.type_name()?;
        self.runtime_bindings
            .get(type_name)
            .and_then(|name| self.object_type(name))
            .or_else(|| self.object_type(type_name))
    }

    /// Renders the schema as SDL.
    pub fn print(&self) -> String {
        printer::print_schema(self)
    }
}
