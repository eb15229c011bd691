//! Error definitions for mutation payloads.
//!
//! Every error type a mutation declares ends up as a member of the mutation's
//! error union. Error types come from the trailing type arguments of a
//! `MutationResult<T, E...>` result type and from explicit registrations on
//! the field.

use std::fmt;
use std::sync::Arc;

use crate::types::definitions::{
    InterfaceTypeDefinition, ObjectFieldDefinition, ObjectTypeDefinition,
};
use crate::types::naming::error_type_name;
use crate::types::reference::{TypeContext, TypeReference};
use crate::types::runtime::RuntimeType;
use crate::value::{ObjectValue, RuntimeValue};

/// Name of the interface every synthesized error type implements.
pub const ERROR_INTERFACE_NAME: &str = "Error";

type ErrorFactoryFn = dyn Fn(&ObjectValue) -> Option<RuntimeValue> + Send + Sync;

/// Maps a raised exception to an error object, or `None` if it does not match.
#[derive(Clone)]
pub struct ErrorFactory(Arc<ErrorFactoryFn>);

impl ErrorFactory {
    pub fn new(
        factory: impl Fn(&ObjectValue) -> Option<RuntimeValue> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(factory))
    }

    /// Matches exceptions whose runtime type name is exactly `type_name`.
    pub fn exact(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self::new(move |exception| {
            (exception.type_name() == Some(type_name.as_str()))
                .then(|| RuntimeValue::Object(exception.clone()))
        })
    }

    /// Passes error objects through unchanged.
    pub fn identity() -> Self {
        Self::new(|error| Some(RuntimeValue::Object(error.clone())))
    }

    pub fn create(&self, exception: &ObjectValue) -> Option<RuntimeValue> {
        (self.0)(exception)
    }
}

impl fmt::Debug for ErrorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorFactory")
    }
}

/// An error type of a mutation.
#[derive(Debug, Clone)]
pub struct ErrorDefinition {
    pub runtime_type: RuntimeType,
    pub schema_type: TypeReference,
    pub factory: ErrorFactory,
}

impl ErrorDefinition {
    pub fn new(runtime_type: RuntimeType, schema_type: TypeReference, factory: ErrorFactory) -> Self {
        Self {
            runtime_type,
            schema_type,
            factory,
        }
    }

    /// An error definition for an exception or plain error runtime type.
    ///
    /// The schema type is whatever object type the runtime type is bound to.
    /// A raised exception matches only if its runtime type is exactly this
    /// one; plain error objects are passed through as they are.
    pub fn from_runtime_type(runtime_type: RuntimeType) -> Self {
        let factory = if runtime_type.is_exception() {
            let type_name = runtime_type
                .as_named()
                .map_or_else(|| runtime_type.to_string(), |named| named.name.clone());
            ErrorFactory::exact(type_name)
        } else {
            ErrorFactory::identity()
        };
        Self {
            schema_type: TypeReference::runtime(runtime_type.clone(), TypeContext::Output),
            factory,
            runtime_type,
        }
    }

    pub fn is_exception(&self) -> bool {
        self.runtime_type.is_exception()
    }
}

/// Collects the error definitions of a mutation field.
///
/// Explicit registrations come first and win over result type arguments of
/// the same runtime type; duplicates are dropped.
pub fn collect_error_definitions(field: &ObjectFieldDefinition) -> Vec<ErrorDefinition> {
    let mut definitions: Vec<ErrorDefinition> = Vec::new();

    let declared = field
        .result_type
        .as_ref()
        .and_then(RuntimeType::mutation_result_arguments)
        .map(|arguments| arguments.iter().skip(1).cloned().collect::<Vec<_>>())
        .unwrap_or_default();

    let candidates = field
        .errors
        .iter()
        .cloned()
        .chain(declared.into_iter().map(ErrorDefinition::from_runtime_type));

    for candidate in candidates {
        if definitions
            .iter()
            .all(|d| d.runtime_type != candidate.runtime_type)
        {
            definitions.push(candidate);
        }
    }
    definitions
}

/// The `Error` interface: `interface Error { message: String! }`.
pub fn error_interface() -> InterfaceTypeDefinition {
    InterfaceTypeDefinition::new(ERROR_INTERFACE_NAME).field(
        ObjectFieldDefinition::new("message").type_syntax("String!"),
    )
}

/// An error object type for an error runtime type nobody registered.
///
/// Exceptions `FooException` become `type FooError implements Error`.
pub fn synthesize_error_type(runtime_type: &RuntimeType) -> Option<ObjectTypeDefinition> {
    let named = runtime_type.as_named()?;
    Some(
        ObjectTypeDefinition::new(error_type_name(named))
            .runtime_type(runtime_type.clone())
            .field(ObjectFieldDefinition::new("message").type_syntax("String!"))
            .implements(TypeReference::named(ERROR_INTERFACE_NAME)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_prefers_explicit_and_drops_duplicates() {
        let explicit = ErrorDefinition::new(
            RuntimeType::reference("InvalidNameError"),
            TypeReference::named("CustomInvalidName"),
            ErrorFactory::exact("InvalidNameError"),
        );
        let field = ObjectFieldDefinition::new("createUser")
            .result_type(RuntimeType::mutation_result(
                RuntimeType::reference("User"),
                vec![
                    RuntimeType::reference("InvalidNameError"),
                    RuntimeType::exception("UserExistsException"),
                    RuntimeType::exception("UserExistsException"),
                ],
            ))
            .error_definition(explicit);

        let definitions = collect_error_definitions(&field);
        assert_eq!(definitions.len(), 2);
        assert_eq!(
            definitions[0].schema_type,
            TypeReference::named("CustomInvalidName")
        );
        assert!(definitions[1].is_exception());
    }

    #[test]
    fn test_exception_factory_matches_exact_type() {
        let definition =
            ErrorDefinition::from_runtime_type(RuntimeType::exception("UserExistsException"));
        let matching = ObjectValue::typed("UserExistsException").with_field("message", "taken");
        let other = ObjectValue::typed("IoException");
        assert_eq!(
            definition.factory.create(&matching),
            Some(RuntimeValue::Object(matching.clone()))
        );
        assert_eq!(definition.factory.create(&other), None);
    }

    #[test]
    fn test_plain_error_factory_is_identity() {
        let definition =
            ErrorDefinition::from_runtime_type(RuntimeType::reference("InvalidNameError"));
        assert!(!definition.is_exception());
        let error = ObjectValue::typed("InvalidNameError").with_field("message", "too short");
        assert_eq!(
            definition.factory.create(&error),
            Some(RuntimeValue::Object(error.clone()))
        );
    }

    #[test]
    fn test_synthesized_error_type() {
        let definition = synthesize_error_type(&RuntimeType::exception("UserExistsException"))
            .expect("named runtime type");
        assert_eq!(definition.name.as_deref(), Some("UserExistsError"));
        assert_eq!(definition.fields.len(), 1);
        assert_eq!(
            definition.interfaces,
            vec![TypeReference::named(ERROR_INTERFACE_NAME)]
        );
    }
}
