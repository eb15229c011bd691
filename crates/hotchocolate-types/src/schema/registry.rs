//! The working set of types during a schema build.
//!
//! Types are appended and never removed, so a [`TypeId`] stays valid for the
//! whole build. Lookup works by completed name and by runtime binding.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{SchemaError, codes};
use crate::types::definitions::{ScalarTypeDefinition, TypeDefinition, TypeKind};
use crate::types::reference::{TypeContext, TypeDependency, TypeId, TypeReference};
use crate::types::runtime::RuntimeType;
use crate::types::scalars::{self, ScalarType};
use crate::types::type_info::{NamedCore, TypeInfo};
use crate::types::wrapping::WrappedType;

/// Initialization state of a registered type, in strict order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeStatus {
    Discovered,
    Named,
    DependenciesResolved,
    Completed,
}

/// Who registered a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeOrigin {
    User,
    BuiltIn,
    /// Synthesized by the mutation convention for the named mutation field.
    Convention { mutation: String },
}

#[derive(Debug, Clone)]
pub struct RegisteredType {
    pub id: TypeId,
    pub definition: TypeDefinition,
    pub status: TypeStatus,
    pub origin: TypeOrigin,
    pub is_extension: bool,
    pub dependencies: Vec<TypeDependency>,
    /// Set once a configuration error was reported for this type.
    pub failed: bool,
}

impl RegisteredType {
    pub fn name(&self) -> Option<&str> {
        self.definition.name()
    }

    pub fn kind(&self) -> TypeKind {
        self.definition.kind()
    }

    /// Display name for diagnostics, available before naming completes.
    pub fn display_name(&self) -> String {
        match (self.definition.name(), self.definition.runtime_type()) {
            (Some(name), _) => name.to_string(),
            (None, Some(runtime_type)) => runtime_type.to_string(),
            (None, None) => self.id.to_string(),
        }
    }
}

/// Registry of all types known to a schema under construction.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<RegisteredType>,
    names: IndexMap<String, TypeId>,
    bindings: IndexMap<(RuntimeType, TypeContext), TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type.
    ///
    /// Fails if another type is already bound to the same runtime type in
    /// the same context.
    pub fn register(
        &mut self,
        definition: TypeDefinition,
        origin: TypeOrigin,
    ) -> Result<TypeId, SchemaError> {
        let id = TypeId(self.types.len());
        if let Some(runtime_type) = definition.runtime_type() {
            let key = (runtime_type.clone(), definition.kind().binding_context());
            if let Some(existing) = self.bindings.get(&key) {
                return Err(SchemaError::new(format!(
                    "The runtime type `{runtime_type}` is already bound to the type `{}`.",
                    self.types[existing.0].display_name()
                ))
                .with_code(codes::DUPLICATE_TYPE_REGISTRATION)
                .with_type(definition.name().unwrap_or_default().to_string())
                .with_location(definition.location()));
            }
            self.bindings.insert(key, id);
        }

        trace!(id = %id, kind = %definition.kind(), "registered type");
        self.types.push(RegisteredType {
            id,
            definition,
            status: TypeStatus::Discovered,
            origin,
            is_extension: false,
            dependencies: Vec::new(),
            failed: false,
        });
        Ok(id)
    }

    /// Registers an object type extension. Extensions are never bound to
    /// runtime types and never named.
    pub fn register_extension(&mut self, definition: TypeDefinition) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(RegisteredType {
            id,
            definition,
            status: TypeStatus::Discovered,
            origin: TypeOrigin::User,
            is_extension: true,
            dependencies: Vec::new(),
            failed: false,
        });
        id
    }

    /// Registers a built-in scalar and names it immediately.
    pub(crate) fn register_builtin(&mut self, scalar: Arc<dyn ScalarType>) -> Option<TypeId> {
        let name = scalar.name().to_string();
        let id = self
            .register(
                TypeDefinition::Scalar(ScalarTypeDefinition::new(scalar)),
                TypeOrigin::BuiltIn,
            )
            .ok()?;
        self.names.insert(name, id);
        self.types[id.0].status = TypeStatus::Named;
        Some(id)
    }

    /// Registers the built-in scalar with the given name unless a type
    /// already claims that name.
    pub(crate) fn ensure_builtin_by_name(&mut self, name: &str) -> Option<TypeId> {
        if let Some(id) = self.names.get(name) {
            return Some(*id);
        }
        if self.has_explicit_name(name) {
            return None;
        }
        self.register_builtin(scalars::builtin_scalar(name)?)
    }

    /// Registers the built-in scalar bound to the given runtime type unless
    /// the runtime type is already bound.
    pub(crate) fn ensure_builtin_by_runtime_type(&mut self, runtime_type: &RuntimeType) {
        let Some(named) = runtime_type.as_named() else {
            return;
        };
        if !named.arguments.is_empty() || self.by_runtime_type(runtime_type, TypeContext::None).is_some() {
            return;
        }
        if let Some(scalar_name) = RuntimeType::builtin_scalar_name(&named.name) {
            self.ensure_builtin_by_name(scalar_name);
        }
    }

    pub fn get(&self, id: TypeId) -> Option<&RegisteredType> {
        self.types.get(id.0)
    }

    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut RegisteredType> {
        self.types.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredType> {
        self.types.iter()
    }

    pub fn ids(&self) -> Vec<TypeId> {
        (0..self.types.len()).map(TypeId).collect()
    }

    /// Looks up a named type.
    pub fn by_name(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    /// Returns `true` if a non-extension type already carries the name,
    /// named or not.
    pub fn has_explicit_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
            || self
                .types
                .iter()
                .any(|t| !t.is_extension && t.definition.name() == Some(name))
    }

    /// Assigns the final name of a type.
    pub(crate) fn set_name(&mut self, id: TypeId, name: String) -> Result<(), SchemaError> {
        if let Some(existing) = self.names.get(&name)
            && *existing != id
        {
            let registered = &self.types[id.0];
            let mut error = SchemaError::new(format!(
                "The name `{name}` was already registered by another type."
            ))
            .with_code(codes::DUPLICATE_TYPE_NAME)
            .with_type(name.clone())
            .with_location(registered.definition.location());
            if let TypeOrigin::Convention { mutation } = &registered.origin {
                error = error.with_extension("mutation", mutation.clone());
            }
            return Err(error);
        }
        self.names.insert(name.clone(), id);
        let registered = &mut self.types[id.0];
        registered.definition.set_name(name);
        registered.status = TypeStatus::Named;
        Ok(())
    }

    /// Looks up the type bound to a runtime type.
    ///
    /// The exact context is tried first, then the context-free binding.
    pub fn by_runtime_type(&self, runtime_type: &RuntimeType, context: TypeContext) -> Option<TypeId> {
        let lookup = |ctx: TypeContext| self.bindings.get(&(runtime_type.clone(), ctx)).copied();
        match context {
            TypeContext::None => lookup(TypeContext::None)
                .or_else(|| lookup(TypeContext::Output))
                .or_else(|| lookup(TypeContext::Input)),
            ctx => lookup(ctx).or_else(|| lookup(TypeContext::None)),
        }
    }

    /// Resolves a reference to registered, named types.
    pub fn try_resolve(&self, reference: &TypeReference) -> Option<WrappedType<TypeId>> {
        match reference {
            TypeReference::Runtime {
                runtime_type,
                context,
            } => {
                let info = TypeInfo::try_create(runtime_type)?;
                let id = match info.named() {
                    NamedCore::Runtime(named) => {
                        self.by_runtime_type(&RuntimeType::Named(named.clone()), *context)?
                    }
                    NamedCore::Schema(name) => self.by_name(name)?,
                };
                Some(info.create_type(id))
            }
            TypeReference::Syntax { ty, .. } => ty.clone().try_map(|name| self.by_name(&name).ok_or(())).ok(),
            TypeReference::Schema(ty) => Some(ty.clone()),
        }
    }

    /// Name of a registered type, if it has one.
    pub fn name_of(&self, id: TypeId) -> Option<&str> {
        self.get(id).and_then(RegisteredType::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::definitions::ObjectTypeDefinition;

    #[test]
    fn test_duplicate_runtime_binding() {
        let mut registry = TypeRegistry::new();
        let user = ObjectTypeDefinition::for_runtime_type(RuntimeType::reference("User"));
        registry
            .register(user.clone().into(), TypeOrigin::User)
            .expect("first registration");
        let err = registry
            .register(user.into(), TypeOrigin::User)
            .expect_err("duplicate binding");
        assert!(err.has_code(codes::DUPLICATE_TYPE_REGISTRATION));
    }

    #[test]
    fn test_duplicate_name_attributes_convention() {
        let mut registry = TypeRegistry::new();
        let first = registry
            .register(ObjectTypeDefinition::new("CreateUserError").into(), TypeOrigin::User)
            .expect("registered");
        let second = registry
            .register(
                ObjectTypeDefinition::new("CreateUserError").into(),
                TypeOrigin::Convention {
                    mutation: "createUser".into(),
                },
            )
            .expect("registered");
        registry
            .set_name(first, "CreateUserError".into())
            .expect("unique name");
        let err = registry
            .set_name(second, "CreateUserError".into())
            .expect_err("duplicate name");
        assert!(err.has_code(codes::DUPLICATE_TYPE_NAME));
        assert_eq!(
            err.extensions().get("mutation").map(String::as_str),
            Some("createUser")
        );
    }

    #[test]
    fn test_resolve_runtime_and_syntax_references() {
        let mut registry = TypeRegistry::new();
        registry.ensure_builtin_by_runtime_type(&RuntimeType::string());
        let string = registry.by_name("String").expect("builtin registered");

        let resolved = registry
            .try_resolve(&TypeReference::runtime(
                RuntimeType::string().list(),
                TypeContext::Output,
            ))
            .expect("resolvable");
        assert_eq!(resolved, WrappedType::Named(string).into_list());

        let resolved = registry
            .try_resolve(&TypeReference::parse("[String!]!").expect("valid syntax"))
            .expect("resolvable");
        assert_eq!(resolved.to_string(), format!("[{string}!]!"));

        assert!(registry.try_resolve(&TypeReference::named("Missing")).is_none());
    }

    #[test]
    fn test_builtin_not_registered_over_user_type() {
        let mut registry = TypeRegistry::new();
        registry
            .register(ObjectTypeDefinition::new("Date").into(), TypeOrigin::User)
            .expect("registered");
        assert!(registry.ensure_builtin_by_name("Date").is_none());
        assert_eq!(registry.len(), 1);
    }
}
