//! # hotchocolate-types
//!
//! Type system initialization for a GraphQL server.
//!
//! This crate takes user-declared schema fragments (object types, fields,
//! directives, SDL documents) and drives them through a multi-pass pipeline
//! into a fully linked, validated, immutable [`Schema`]:
//!
//! - Discovery: every registered type declares its dependencies and missing
//!   built-in scalars are registered on demand
//! - Naming: every type receives its final GraphQL name (generic runtime
//!   types become `GenericFooOfString`)
//! - Extension merging: `extend type` fields are merged into their base types
//! - Dependency resolution: every type reference must point at a known type
//! - Completion: field types, arguments, interfaces and union members are
//!   bound and the resolver pipelines are compiled
//!
//! ## Mutation conventions
//!
//! With [`SchemaBuilder::add_mutation_conventions`] every mutation field is
//! rewritten into the input/payload/error envelope shape:
//!
//! ```graphql
//! type Mutation {
//!   createUser(input: CreateUserInput!): CreateUserPayload!
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Schema options loaded from TOML
//! - [`error`] - Schema, scalar and field errors
//! - [`language`] - Literal values and directive syntax
//! - [`value`] - Runtime values
//! - [`types`] - Runtime type descriptors, type references, definitions and scalars
//! - [`resolvers`] - The field middleware pipeline contract
//! - [`schema`] - Registry, initializer, completion and the finished schema
//! - [`mutations`] - The mutation convention rewrite

pub mod config;
pub mod error;
pub mod language;
pub mod mutations;
pub mod resolvers;
pub mod schema;
pub mod types;
pub mod value;

pub use config::SchemaOptions;
pub use error::{FieldError, ScalarError, SchemaError, SchemaException};
pub use language::{DirectiveNode, ValueKind, ValueNode};
pub use mutations::{ErrorDefinition, MutationContextData, MutationConventionOptions};
pub use resolvers::{ArgumentValue, MiddlewareContext, MutationResult, ResolverResult};
pub use schema::{Schema, SchemaBuilder};
pub use types::{RuntimeType, TypeReference, WrappedType};
pub use value::{ObjectValue, RuntimeValue};

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, SchemaException>;
