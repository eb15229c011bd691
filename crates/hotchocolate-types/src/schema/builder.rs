//! Schema builder.

use std::fmt;

use tracing::{debug, warn};

use crate::config::SchemaOptions;
use crate::error::{SchemaError, SchemaException, codes};
use crate::mutations::{
    MutationContextData, MutationConventionOptions, MutationConventionTypeInterceptor,
};
use crate::types::definitions::{ObjectTypeDefinition, TypeDefinition};

use super::Schema;
use super::document::parse_document;
use super::finalizer::{RootTypeNames, finalize};
use super::initializer::TypeInitializer;
use super::interceptor::TypeInterceptor;
use super::registry::{TypeOrigin, TypeRegistry};

/// Collects type definitions and builds a [`Schema`].
///
/// ```no_run
/// use hotchocolate_types::{MutationConventionOptions, SchemaBuilder};
///
/// let schema = SchemaBuilder::new()
///     .add_document("type Query { hello: String }")
///     .add_mutation_conventions(MutationConventionOptions::default())
///     .build()?;
/// # Ok::<(), hotchocolate_types::SchemaException>(())
/// ```
#[derive(Default)]
pub struct SchemaBuilder {
    options: SchemaOptions,
    types: Vec<TypeDefinition>,
    extensions: Vec<ObjectTypeDefinition>,
    documents: Vec<String>,
    interceptors: Vec<Box<dyn TypeInterceptor>>,
    convention_data: Vec<MutationContextData>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the options. Mutation conventions configured earlier are
    /// kept unless `options` configures its own.
    #[must_use]
    pub fn with_options(mut self, options: SchemaOptions) -> Self {
        let conventions = self.options.mutation_conventions.take();
        self.options = options;
        if self.options.mutation_conventions.is_none() {
            self.options.mutation_conventions = conventions;
        }
        self
    }

    #[must_use]
    pub fn add_type(mut self, definition: impl Into<TypeDefinition>) -> Self {
        self.types.push(definition.into());
        self
    }

    /// Adds `extend type` fields to an object type defined elsewhere.
    #[must_use]
    pub fn add_type_extension(mut self, extension: ObjectTypeDefinition) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Adds an SDL document.
    #[must_use]
    pub fn add_document(mut self, source: impl Into<String>) -> Self {
        self.documents.push(source.into());
        self
    }

    /// Enables mutation conventions for every mutation field.
    #[must_use]
    pub fn add_mutation_conventions(mut self, options: MutationConventionOptions) -> Self {
        self.options.mutation_conventions = Some(options);
        self
    }

    /// Configures the convention of one mutation field.
    #[must_use]
    pub fn add_mutation_convention(mut self, data: MutationContextData) -> Self {
        self.convention_data.push(data);
        self
    }

    #[must_use]
    pub fn add_interceptor(mut self, interceptor: Box<dyn TypeInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Builds the schema.
    ///
    /// # Errors
    ///
    /// Returns every configuration error found during the build.
    pub fn build(self) -> Result<Schema, SchemaException> {
        let mut options = self.options;
        if let Err(message) = options.validate() {
            return Err(SchemaException::new(vec![
                SchemaError::new(message).with_code(codes::INVALID_OPTIONS),
            ]));
        }

        let mut errors = Vec::new();
        let mut types = self.types;
        let mut extensions = self.extensions;
        let mut roots = RootTypeNames::default();
        for source in &self.documents {
            match parse_document(source) {
                Ok(parsed) => {
                    types.extend(parsed.types);
                    extensions.extend(parsed.extensions);
                    roots.query = parsed.roots.query.or(roots.query);
                    roots.mutation = parsed.roots.mutation.or(roots.mutation);
                    roots.subscription = parsed.roots.subscription.or(roots.subscription);
                }
                Err(mut document_errors) => errors.append(&mut document_errors),
            }
        }
        if let Some(query) = roots.query.clone() {
            options.query_type_name = query;
        }
        if let Some(mutation) = roots.mutation.clone() {
            options.mutation_type_name = mutation;
        }
        if let Some(subscription) = roots.subscription.clone() {
            options.subscription_type_name = subscription;
        }

        let mut registry = TypeRegistry::new();
        for definition in types {
            if let Err(error) = registry.register(definition, TypeOrigin::User) {
                errors.push(error);
            }
        }
        for extension in extensions {
            registry.register_extension(extension.into());
        }

        // without configured conventions only explicit opt-ins are rewritten
        let conventions = options
            .mutation_conventions
            .clone()
            .unwrap_or_else(|| MutationConventionOptions::new().apply_to_all_mutations(false));
        let mut interceptors: Vec<Box<dyn TypeInterceptor>> = vec![Box::new(
            MutationConventionTypeInterceptor::new(conventions, self.convention_data),
        )];
        interceptors.extend(self.interceptors);

        debug!(
            types = registry.len(),
            documents = self.documents.len(),
            "building schema"
        );
        let (completed, mut errors) =
            TypeInitializer::new(registry, interceptors, &options, errors).initialize();

        let schema = if errors.is_empty() {
            finalize(completed, &options, &roots, &mut errors)
        } else {
            None
        };

        match schema {
            Some(schema) if errors.is_empty() => {
                debug!(types = schema.type_count(), "schema built");
                Ok(schema)
            }
            _ => {
                warn!(errors = errors.len(), "schema build failed");
                Err(SchemaException::new(errors))
            }
        }
    }
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("options", &self.options)
            .field("types", &self.types.len())
            .field("extensions", &self.extensions.len())
            .field("documents", &self.documents.len())
            .field("interceptors", &self.interceptors.len())
            .field("convention_data", &self.convention_data)
            .finish()
    }
}
