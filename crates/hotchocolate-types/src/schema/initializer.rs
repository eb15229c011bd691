//! Drives registered types through `Discovered → Named →
//! DependenciesResolved → Completed`.
//!
//! Every phase records configuration errors and moves on, so one broken type
//! does not hide the problems of the others.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::config::SchemaOptions;
use crate::error::{SchemaError, codes};
use crate::types::definitions::{TypeDefinition, TypeKind};
use crate::types::naming::runtime_type_name;
use crate::types::reference::{
    DependencyKind, TypeContext, TypeDependency, TypeId, TypeReference,
};
use crate::types::runtime::RuntimeType;
use crate::types::type_info::{NamedCore, TypeInfo};

use super::completion::complete_type;
use super::interceptor::{InterceptorContext, TypeInterceptor};
use super::named_type::NamedType;
use super::registry::{TypeRegistry, TypeStatus};

enum NameOutcome {
    Ready(String),
    Waiting,
    Unnamed,
}

pub(crate) struct TypeInitializer<'a> {
    registry: TypeRegistry,
    interceptors: Vec<Box<dyn TypeInterceptor>>,
    options: &'a SchemaOptions,
    errors: Vec<SchemaError>,
    /// Number of registered types `on_type_discovered` has seen.
    discovered: usize,
}

impl<'a> TypeInitializer<'a> {
    pub(crate) fn new(
        registry: TypeRegistry,
        interceptors: Vec<Box<dyn TypeInterceptor>>,
        options: &'a SchemaOptions,
        errors: Vec<SchemaError>,
    ) -> Self {
        Self {
            registry,
            interceptors,
            options,
            errors,
            discovered: 0,
        }
    }

    /// Runs all phases and returns the completed types together with every
    /// error collected on the way.
    pub(crate) fn initialize(mut self) -> (IndexMap<String, NamedType>, Vec<SchemaError>) {
        self.discover_types();
        self.complete_type_names();
        self.run_hook(|interceptor, context| interceptor.on_after_complete_type_names(context));

        self.merge_type_extensions();
        self.run_hook(|interceptor, context| interceptor.on_after_merge_type_extensions(context));

        // interceptors may have registered new types
        self.discover_types();
        self.complete_type_names();

        self.resolve_dependencies();
        let types = self.complete_types();
        self.run_hook(|interceptor, context| interceptor.on_types_completed(context));

        (types, self.errors)
    }

    fn run_hook(
        &mut self,
        mut hook: impl FnMut(&mut dyn TypeInterceptor, &mut InterceptorContext<'_>),
    ) {
        let mut context = InterceptorContext {
            registry: &mut self.registry,
            errors: &mut self.errors,
            options: self.options,
        };
        for interceptor in &mut self.interceptors {
            hook(interceptor.as_mut(), &mut context);
        }
    }

    fn report(&mut self, id: TypeId, error: SchemaError) {
        if let Some(registered) = self.registry.get_mut(id) {
            registered.failed = true;
        }
        self.errors.push(error);
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    fn discover_types(&mut self) {
        let start = self.discovered;
        while self.discovered < self.registry.len() {
            let id = TypeId(self.discovered);
            self.discovered += 1;
            self.collect_dependencies(id);
            self.run_hook(|interceptor, context| interceptor.on_type_discovered(context, id));
        }
        debug!(
            discovered = self.discovered - start,
            total = self.registry.len(),
            "discovered types"
        );
    }

    /// Records the dependencies of a type and registers the built-in scalars
    /// it refers to.
    fn collect_dependencies(&mut self, id: TypeId) {
        let Some(registered) = self.registry.get(id) else {
            return;
        };
        let display_name = registered.display_name();
        let references: Vec<TypeReference> = registered
            .definition
            .references()
            .into_iter()
            .cloned()
            .collect();
        let runtime_type = registered.definition.runtime_type().cloned();

        let mut dependencies = Vec::with_capacity(references.len());
        for reference in references {
            match &reference {
                TypeReference::Runtime { runtime_type, .. } => {
                    let Some(info) = TypeInfo::try_create(runtime_type) else {
                        self.report(
                            id,
                            SchemaError::new(format!(
                                "The runtime type `{runtime_type}` used by `{display_name}` cannot be turned into a GraphQL type."
                            ))
                            .with_code(codes::TYPE_REFERENCE_INVALID)
                            .with_type(display_name.clone()),
                        );
                        continue;
                    };
                    match info.named() {
                        NamedCore::Runtime(named) => self
                            .registry
                            .ensure_builtin_by_runtime_type(&RuntimeType::Named(named.clone())),
                        NamedCore::Schema(name) => {
                            self.registry.ensure_builtin_by_name(name);
                        }
                    }
                }
                TypeReference::Syntax { ty, .. } => {
                    self.registry.ensure_builtin_by_name(ty.named_type());
                }
                TypeReference::Schema(_) => {}
            }
            dependencies.push(TypeDependency::new(reference, DependencyKind::Default));
        }

        // generic arguments must be named before the type itself
        if let Some(RuntimeType::Named(named)) = &runtime_type {
            for argument in &named.arguments {
                self.collect_argument_dependencies(argument, &mut dependencies);
            }
        }

        trace!(id = %id, dependencies = dependencies.len(), "collected dependencies");
        if let Some(registered) = self.registry.get_mut(id) {
            registered.dependencies = dependencies;
        }
    }

    fn collect_argument_dependencies(
        &mut self,
        argument: &RuntimeType,
        dependencies: &mut Vec<TypeDependency>,
    ) {
        match argument {
            RuntimeType::Named(named) => {
                self.registry.ensure_builtin_by_runtime_type(argument);
                dependencies.push(TypeDependency::new(
                    TypeReference::runtime(argument.clone(), TypeContext::None),
                    DependencyKind::Named,
                ));
                for inner in &named.arguments {
                    self.collect_argument_dependencies(inner, dependencies);
                }
            }
            RuntimeType::SchemaType(name) => {
                self.registry.ensure_builtin_by_name(name);
            }
            RuntimeType::Array(inner)
            | RuntimeType::List(inner)
            | RuntimeType::Nullable(inner)
            | RuntimeType::Task(inner)
            | RuntimeType::Native(inner)
            | RuntimeType::NonNullMarker(inner)
            | RuntimeType::ListMarker(inner) => {
                self.collect_argument_dependencies(inner, dependencies);
            }
        }
    }

    // =========================================================================
    // Naming
    // =========================================================================

    fn complete_type_names(&mut self) {
        let mut pending: Vec<TypeId> = self
            .registry
            .iter()
            .filter(|t| !t.is_extension && !t.failed && t.status == TypeStatus::Discovered)
            .map(|t| t.id)
            .collect();

        while !pending.is_empty() {
            let mut waiting = Vec::new();
            let mut progress = false;

            for id in pending {
                match self.compute_name(id) {
                    NameOutcome::Ready(name) => {
                        progress = true;
                        self.assign_name(id, name);
                    }
                    NameOutcome::Waiting => waiting.push(id),
                    NameOutcome::Unnamed => {
                        progress = true;
                        let display_name = self
                            .registry
                            .get(id)
                            .map(|t| t.display_name())
                            .unwrap_or_default();
                        self.report(
                            id,
                            SchemaError::new(format!(
                                "The type `{display_name}` has no name and none can be inferred from its runtime type."
                            ))
                            .with_code(codes::TYPE_NAME_UNRESOLVED)
                            .with_type(display_name),
                        );
                    }
                }
            }

            if !progress {
                for id in waiting {
                    let display_name = self
                        .registry
                        .get(id)
                        .map(|t| t.display_name())
                        .unwrap_or_default();
                    self.report(
                        id,
                        SchemaError::new(format!(
                            "The name of `{display_name}` depends on types that never receive a name."
                        ))
                        .with_code(codes::TYPE_NAME_UNRESOLVED)
                        .with_type(display_name),
                    );
                }
                break;
            }
            pending = waiting;
        }
    }

    fn compute_name(&self, id: TypeId) -> NameOutcome {
        let Some(registered) = self.registry.get(id) else {
            return NameOutcome::Unnamed;
        };
        if let Some(name) = registered.name() {
            return NameOutcome::Ready(name.to_string());
        }
        let Some(RuntimeType::Named(named)) = registered.definition.runtime_type() else {
            return NameOutcome::Unnamed;
        };

        let registry = &self.registry;
        let mut resolve = |argument: &RuntimeType| {
            registry
                .by_runtime_type(argument, TypeContext::None)
                .map(|bound| registry.name_of(bound).map(str::to_string))
        };
        match runtime_type_name(named, &mut resolve) {
            Some(name) => NameOutcome::Ready(name),
            None => NameOutcome::Waiting,
        }
    }

    fn assign_name(&mut self, id: TypeId, name: String) {
        trace!(id = %id, name = %name, "named type");
        if let Err(error) = self.registry.set_name(id, name) {
            self.report(id, error);
        }
    }

    // =========================================================================
    // Extensions
    // =========================================================================

    fn merge_type_extensions(&mut self) {
        let extensions: Vec<TypeId> = self
            .registry
            .iter()
            .filter(|t| t.is_extension && t.status == TypeStatus::Discovered)
            .map(|t| t.id)
            .collect();

        for extension_id in extensions {
            let Some(TypeDefinition::Object(extension)) = self
                .registry
                .get(extension_id)
                .map(|t| t.definition.clone())
            else {
                continue;
            };
            if let Some(registered) = self.registry.get_mut(extension_id) {
                registered.status = TypeStatus::Completed;
            }

            let target = match (&extension.name, &extension.runtime_type) {
                (Some(name), _) => self.registry.by_name(name),
                (None, Some(runtime_type)) => {
                    self.registry.by_runtime_type(runtime_type, TypeContext::Output)
                }
                (None, None) => None,
            };
            let display_name = extension
                .name
                .clone()
                .or_else(|| extension.runtime_type.as_ref().map(ToString::to_string))
                .unwrap_or_default();

            let Some(target) = target else {
                self.report(
                    extension_id,
                    SchemaError::new(format!(
                        "The type extension `{display_name}` has no type to extend."
                    ))
                    .with_code(codes::EXTENSION_TARGET_MISSING)
                    .with_type(display_name)
                    .with_location(extension.location),
                );
                continue;
            };

            let kind = self
                .registry
                .get(target)
                .map_or(TypeKind::Object, |t| t.kind());
            if kind != TypeKind::Object {
                self.report(
                    extension_id,
                    SchemaError::new(format!(
                        "The object type extension `{display_name}` cannot extend the {kind} type of the same name."
                    ))
                    .with_code(codes::TYPE_KIND_MISMATCH)
                    .with_type(display_name)
                    .with_location(extension.location),
                );
                continue;
            }
            let Some(base) = self
                .registry
                .get_mut(target)
                .and_then(|t| t.definition.as_object_mut())
            else {
                continue;
            };

            let mut errors = Vec::new();
            let base_name = base.name.clone().unwrap_or_default();
            let merged = extension.fields.len();
            for field in extension.fields {
                if base.get_field(&field.name).is_some() {
                    errors.push(
                        SchemaError::new(format!(
                            "The field `{}` of the type extension is already declared on `{base_name}`.",
                            field.name
                        ))
                        .with_code(codes::DUPLICATE_FIELD_NAME)
                        .with_type(base_name.clone())
                        .with_field(field.name.clone())
                        .with_location(field.location),
                    );
                    continue;
                }
                base.fields.push(field);
            }
            base.interfaces.extend(extension.interfaces);
            base.directives.extend(extension.directives);

            debug!(base = %base_name, fields = merged, "merged type extension");
            for error in errors {
                self.report(extension_id, error);
            }
        }
    }

    // =========================================================================
    // Dependencies and completion
    // =========================================================================

    fn resolve_dependencies(&mut self) {
        let named: Vec<TypeId> = self
            .registry
            .iter()
            .filter(|t| !t.is_extension && !t.failed && t.status == TypeStatus::Named)
            .map(|t| t.id)
            .collect();

        for id in named {
            // definitions may have been rewritten since discovery
            self.collect_dependencies(id);
            let Some(registered) = self.registry.get(id) else {
                continue;
            };
            let display_name = registered.display_name();
            let unresolved: Vec<SchemaError> = registered
                .dependencies
                .iter()
                .filter(|dependency| self.registry.try_resolve(&dependency.reference).is_none())
                .map(|dependency| {
                    SchemaError::new(format!(
                        "Unable to resolve the {} dependency `{}` of the type `{display_name}`.",
                        dependency.kind, dependency.reference
                    ))
                    .with_code(codes::UNRESOLVED_TYPE_DEPENDENCY)
                    .with_type(display_name.clone())
                    .with_location(registered.definition.location())
                    .with_extension("dependency", dependency.reference.to_string())
                    .with_extension("kind", dependency.kind.to_string())
                })
                .collect();

            if unresolved.is_empty() {
                if let Some(registered) = self.registry.get_mut(id) {
                    registered.status = TypeStatus::DependenciesResolved;
                }
            } else {
                for error in unresolved {
                    self.report(id, error);
                }
            }
        }
    }

    fn complete_types(&mut self) -> IndexMap<String, NamedType> {
        let ready: Vec<TypeId> = self
            .registry
            .iter()
            .filter(|t| !t.failed && t.status == TypeStatus::DependenciesResolved)
            .map(|t| t.id)
            .collect();

        let mut types = IndexMap::with_capacity(ready.len());
        for id in ready {
            self.run_hook(|interceptor, context| interceptor.on_before_complete_type(context, id));
            match complete_type(&self.registry, id) {
                Ok(completed) => {
                    if let Some(registered) = self.registry.get_mut(id) {
                        registered.status = TypeStatus::Completed;
                    }
                    types.insert(completed.name().to_string(), completed);
                }
                Err(errors) => {
                    for error in errors {
                        self.report(id, error);
                    }
                }
            }
            self.run_hook(|interceptor, context| interceptor.on_after_complete_type(context, id));
        }
        debug!(completed = types.len(), "completed types");
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::registry::TypeOrigin;
    use crate::types::definitions::{ObjectFieldDefinition, ObjectTypeDefinition};

    fn initialize(registry: TypeRegistry) -> (IndexMap<String, NamedType>, Vec<SchemaError>) {
        let options = SchemaOptions::default();
        TypeInitializer::new(registry, Vec::new(), &options, Vec::new()).initialize()
    }

    #[test]
    fn test_generic_runtime_type_names() {
        let mut registry = TypeRegistry::new();
        let inner = RuntimeType::generic("GenericFoo", vec![RuntimeType::string()]);
        let outer = RuntimeType::generic("GenericFoo", vec![inner.clone()]);
        for runtime_type in [outer, inner] {
            registry
                .register(
                    ObjectTypeDefinition::for_runtime_type(runtime_type)
                        .field(ObjectFieldDefinition::new("value").type_syntax("String"))
                        .into(),
                    TypeOrigin::User,
                )
                .expect("registered");
        }

        let (types, errors) = initialize(registry);
        assert!(errors.is_empty(), "{errors:?}");
        assert!(types.contains_key("GenericFooOfString"));
        assert!(types.contains_key("GenericFooOfGenericFooOfString"));
    }

    #[test]
    fn test_unresolved_dependency_names_both_ends() {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                ObjectTypeDefinition::new("Query")
                    .field(ObjectFieldDefinition::new("user").type_syntax("User"))
                    .into(),
                TypeOrigin::User,
            )
            .expect("registered");

        let (types, errors) = initialize(registry);
        assert!(!types.contains_key("Query"));
        let error = errors
            .iter()
            .find(|e| e.has_code(codes::UNRESOLVED_TYPE_DEPENDENCY))
            .expect("unresolved dependency reported");
        assert_eq!(error.type_name(), Some("Query"));
        assert_eq!(error.extensions().get("dependency").map(String::as_str), Some("User"));
        assert_eq!(error.extensions().get("kind").map(String::as_str), Some("Default"));
    }

    #[test]
    fn test_extension_fields_are_merged() {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                ObjectTypeDefinition::new("Query")
                    .field(ObjectFieldDefinition::new("a").type_syntax("String"))
                    .into(),
                TypeOrigin::User,
            )
            .expect("registered");
        registry.register_extension(
            ObjectTypeDefinition::new("Query")
                .field(ObjectFieldDefinition::new("b").type_syntax("Int"))
                .into(),
        );
        registry.register_extension(
            ObjectTypeDefinition::new("Missing")
                .field(ObjectFieldDefinition::new("c").type_syntax("Int"))
                .into(),
        );

        let (types, errors) = initialize(registry);
        let query = types
            .get("Query")
            .and_then(NamedType::as_object)
            .expect("query completed");
        assert_eq!(query.fields.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].has_code(codes::EXTENSION_TARGET_MISSING));
    }

    #[test]
    fn test_invalid_runtime_reference() {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                ObjectTypeDefinition::new("Query")
                    .field(
                        ObjectFieldDefinition::new("a")
                            .result_type(RuntimeType::string().native().native()),
                    )
                    .into(),
                TypeOrigin::User,
            )
            .expect("registered");

        let (_, errors) = initialize(registry);
        assert!(errors.iter().any(|e| e.has_code(codes::TYPE_REFERENCE_INVALID)));
    }
}
