//! Mutation conventions.
//!
//! Rewrites mutation fields into the input/payload/error envelope shape. The
//! rewrite is driven by [`MutationConventionTypeInterceptor`], configured
//! globally through [`MutationConventionOptions`] and per mutation through
//! [`MutationContextData`] or the `@mutationConvention` directive.

pub mod directive;
pub mod errors;
pub mod interceptor;
pub mod middleware;
pub mod options;

pub use directive::MUTATION_CONVENTION_DIRECTIVE;
pub use errors::{ERROR_INTERFACE_NAME, ErrorDefinition, ErrorFactory};
pub use interceptor::MutationConventionTypeInterceptor;
pub use options::{MutationContextData, MutationConventionOptions, ResolvedConvention};
