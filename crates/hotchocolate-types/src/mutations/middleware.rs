//! Field middleware installed by the mutation convention.
//!
//! After the rewrite a mutation field runs, outermost first:
//! error mapping, argument unwrapping, result unwrapping, user middleware and
//! finally the user resolver.

use indexmap::IndexMap;

use crate::error::FieldError;
use crate::language::ValueNode;
use crate::resolvers::{
    ArgumentFormatter, ArgumentValue, FieldDelegate, FieldMiddleware, FieldMiddlewareDefinition,
    FieldResolver, MutationResult, ResolverResult,
};
use crate::value::RuntimeValue;

use super::errors::ErrorDefinition;

pub const MUTATION_RESULT_MIDDLEWARE: &str = "hotchocolate.mutation.result";
pub const MUTATION_ARGUMENTS_MIDDLEWARE: &str = "hotchocolate.mutation.arguments";
pub const MUTATION_ERRORS_MIDDLEWARE: &str = "hotchocolate.mutation.errors";
pub const PAYLOAD_NULL_ON_ERROR_MIDDLEWARE: &str = "hotchocolate.mutation.payload.null_on_error";

/// Request-scoped state key holding the errors of a failed mutation.
pub const MUTATION_ERRORS_STATE: &str = "hotchocolate.mutation.errors";

/// Unwraps `MutationResult`s.
///
/// Success yields the payload value, or the null marker for a null payload.
/// Failure stores the errors in request-scoped state and yields the error
/// marker.
pub fn result_middleware() -> FieldMiddlewareDefinition {
    FieldMiddlewareDefinition::keyed(
        MUTATION_RESULT_MIDDLEWARE,
        FieldMiddleware::new(|next| {
            FieldDelegate::new(move |context| {
                next.call(context)?;
                context.result = Some(match context.result.take() {
                    None | Some(ResolverResult::Value(RuntimeValue::Null)) => {
                        ResolverResult::NullMarker
                    }
                    Some(ResolverResult::Mutation(MutationResult::Success(value))) => {
                        if value.is_null() {
                            ResolverResult::NullMarker
                        } else {
                            ResolverResult::Value(value)
                        }
                    }
                    Some(ResolverResult::Mutation(MutationResult::Failure(errors))) => {
                        context
                            .scoped_state
                            .insert(MUTATION_ERRORS_STATE.to_string(), RuntimeValue::List(errors));
                        ResolverResult::ErrorMarker
                    }
                    Some(other) => other,
                });
                Ok(())
            })
        }),
    )
}

/// One original argument of a mutation whose arguments were folded into an
/// input object.
#[derive(Debug, Clone)]
pub struct UnwrappedArgument {
    pub name: String,
    pub default_value: Option<ValueNode>,
    /// `default_value` coerced against the argument type.
    pub default: Option<RuntimeValue>,
    pub formatters: Vec<ArgumentFormatter>,
}

/// Splits the single input object argument back into the original flat
/// arguments, so resolvers written against them keep working.
pub fn argument_middleware(
    input_argument_name: String,
    arguments: Vec<UnwrappedArgument>,
) -> FieldMiddlewareDefinition {
    FieldMiddlewareDefinition::keyed(
        MUTATION_ARGUMENTS_MIDDLEWARE,
        FieldMiddleware::new(move |next| {
            let input_argument_name = input_argument_name.clone();
            let arguments = arguments.clone();
            FieldDelegate::new(move |context| {
                let input = context.arguments.shift_remove(&input_argument_name);
                let (value, literal) = match input {
                    Some(input) => (input.value, input.literal),
                    None => (RuntimeValue::Null, None),
                };

                let mut flat = IndexMap::with_capacity(arguments.len());
                for argument in &arguments {
                    let provided_literal = match &literal {
                        Some(ValueNode::Object(fields)) => fields.get(&argument.name).cloned(),
                        _ => None,
                    };
                    let provided_value = value
                        .as_object()
                        .and_then(|object| object.get(&argument.name))
                        .cloned();
                    let is_default = provided_value.is_none()
                        && provided_literal.is_none()
                        && argument.default_value.is_some();

                    let mut argument_value = match provided_value {
                        Some(value) => value,
                        None if is_default => argument.default.clone().unwrap_or_default(),
                        None => RuntimeValue::Null,
                    };
                    for formatter in &argument.formatters {
                        argument_value = formatter.format(argument_value);
                    }

                    flat.insert(
                        argument.name.clone(),
                        ArgumentValue {
                            name: argument.name.clone(),
                            literal: provided_literal.or_else(|| argument.default_value.clone()),
                            value: argument_value,
                            is_default,
                        },
                    );
                }

                context.arguments = flat;
                next.call(context)
            })
        }),
    )
}

/// Maps exceptions raised by the resolver to declared exception types.
///
/// An exception no definition matches is propagated unchanged. Plain error
/// types never match; they reach the payload through `MutationResult`.
pub fn error_middleware(definitions: Vec<ErrorDefinition>) -> FieldMiddlewareDefinition {
    FieldMiddlewareDefinition::keyed(
        MUTATION_ERRORS_MIDDLEWARE,
        FieldMiddleware::new(move |next| {
            let definitions = definitions.clone();
            FieldDelegate::new(move |context| match next.call(context) {
                Err(FieldError::Exception(exception)) => {
                    let mapped = definitions
                        .iter()
                        .filter(|definition| definition.is_exception())
                        .find_map(|definition| definition.factory.create(&exception));
                    match mapped {
                        Some(error) => {
                            context.scoped_state.insert(
                                MUTATION_ERRORS_STATE.to_string(),
                                RuntimeValue::List(vec![error]),
                            );
                            context.result = Some(ResolverResult::ErrorMarker);
                            Ok(())
                        }
                        None => Err(FieldError::Exception(exception)),
                    }
                }
                other => other,
            })
        }),
    )
}

/// Forces payload fields to null when the mutation failed.
pub fn null_on_error_middleware() -> FieldMiddlewareDefinition {
    FieldMiddlewareDefinition::keyed(
        PAYLOAD_NULL_ON_ERROR_MIDDLEWARE,
        FieldMiddleware::new(|next| {
            FieldDelegate::new(move |context| {
                if context.parent == ResolverResult::ErrorMarker {
                    context.result = Some(ResolverResult::Value(RuntimeValue::Null));
                    return Ok(());
                }
                next.call(context)
            })
        }),
    )
}

/// Resolves the data field of a synthesized payload: null for either marker,
/// the mutation's value otherwise.
pub fn payload_data_resolver() -> FieldResolver {
    FieldResolver::new(|context| {
        Ok(match &context.parent {
            ResolverResult::Value(value) => ResolverResult::Value(value.clone()),
            ResolverResult::Mutation(MutationResult::Success(value)) => {
                ResolverResult::Value(value.clone())
            }
            _ => ResolverResult::Value(RuntimeValue::Null),
        })
    })
}

/// Resolves the errors field of a payload from request-scoped state.
pub fn payload_errors_resolver() -> FieldResolver {
    FieldResolver::new(|context| {
        if context.parent != ResolverResult::ErrorMarker {
            return Ok(ResolverResult::Value(RuntimeValue::Null));
        }
        Ok(ResolverResult::Value(
            context
                .scoped_state
                .get(MUTATION_ERRORS_STATE)
                .cloned()
                .unwrap_or_default(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolvers::{MiddlewareContext, compile_pipeline};
    use crate::types::runtime::RuntimeType;
    use crate::value::ObjectValue;

    fn run(
        middleware: &[FieldMiddlewareDefinition],
        resolver: FieldResolver,
    ) -> (Result<(), FieldError>, MiddlewareContext) {
        let pipeline = compile_pipeline("createUser", Some(&resolver), middleware);
        let mut context = MiddlewareContext::new("Mutation", "createUser");
        let result = pipeline.call(&mut context);
        (result, context)
    }

    #[test]
    fn test_result_middleware_success() {
        let user = RuntimeValue::Object(ObjectValue::typed("User").with_field("name", "Ada"));
        let expected = user.clone();
        let (result, context) = run(
            &[result_middleware()],
            FieldResolver::new(move |_| Ok(MutationResult::success(user.clone()).into())),
        );
        assert!(result.is_ok());
        assert_eq!(context.result, Some(ResolverResult::Value(expected)));
    }

    #[test]
    fn test_result_middleware_null_marker() {
        let (_, context) = run(
            &[result_middleware()],
            FieldResolver::new(|_| Ok(ResolverResult::Value(RuntimeValue::Null))),
        );
        assert_eq!(context.result, Some(ResolverResult::NullMarker));
    }

    #[test]
    fn test_result_middleware_failure() {
        let error = RuntimeValue::Object(ObjectValue::typed("InvalidNameError"));
        let stored = error.clone();
        let (_, context) = run(
            &[result_middleware()],
            FieldResolver::new(move |_| Ok(MutationResult::failure(vec![error.clone()]).into())),
        );
        assert_eq!(context.result, Some(ResolverResult::ErrorMarker));
        assert_eq!(
            context.scoped_state.get(MUTATION_ERRORS_STATE),
            Some(&RuntimeValue::List(vec![stored]))
        );
    }

    #[test]
    fn test_error_middleware_maps_declared_exception() {
        let definitions = vec![ErrorDefinition::from_runtime_type(RuntimeType::exception(
            "UserExistsException",
        ))];
        let (result, context) = run(
            &[error_middleware(definitions.clone()), result_middleware()],
            FieldResolver::new(|_| Err(FieldError::exception("UserExistsException", "taken"))),
        );
        assert!(result.is_ok());
        assert_eq!(context.result, Some(ResolverResult::ErrorMarker));

        let (result, _) = run(
            &[error_middleware(definitions.clone()), result_middleware()],
            FieldResolver::new(|_| Err(FieldError::exception("IoException", "disk"))),
        );
        assert!(matches!(result, Err(FieldError::Exception(_))));

        let mut definitions = definitions;
        definitions.insert(
            0,
            ErrorDefinition::from_runtime_type(RuntimeType::reference("InvalidNameError")),
        );
        let (result, _) = run(
            &[error_middleware(definitions), result_middleware()],
            FieldResolver::new(|_| Err(FieldError::exception("IoException", "disk"))),
        );
        assert!(matches!(result, Err(FieldError::Exception(_))));
    }

    #[test]
    fn test_argument_middleware_unwraps_input() {
        let arguments = vec![
            UnwrappedArgument {
                name: "name".into(),
                default_value: None,
                default: None,
                formatters: vec![ArgumentFormatter::new(|value| match value {
                    RuntimeValue::String(s) => RuntimeValue::String(s.to_uppercase()),
                    other => other,
                })],
            },
            UnwrappedArgument {
                name: "age".into(),
                default_value: Some(ValueNode::int(18)),
                default: Some(RuntimeValue::Int(18)),
                formatters: vec![ArgumentFormatter::new(|value| match value {
                    RuntimeValue::Int(age) => RuntimeValue::Int(age + 1),
                    other => other,
                })],
            },
        ];
        let pipeline = compile_pipeline(
            "createUser",
            Some(&FieldResolver::new(|context| {
                Ok(ResolverResult::Value(
                    context.argument("name").cloned().unwrap_or_default(),
                ))
            })),
            &[argument_middleware("input".into(), arguments)],
        );

        let input = ObjectValue::new().with_field("name", "ada");
        let mut context = MiddlewareContext::new("Mutation", "createUser").with_argument(
            ArgumentValue::new("input", RuntimeValue::Object(input)),
        );
        pipeline.call(&mut context).expect("pipeline runs");

        assert_eq!(
            context.result,
            Some(ResolverResult::Value(RuntimeValue::String("ADA".into())))
        );
        assert!(!context.arguments.contains_key("input"));
        let age = context.arguments.get("age").expect("age argument");
        assert!(age.is_default);
        assert_eq!(age.literal, Some(ValueNode::int(18)));
        assert_eq!(age.value, RuntimeValue::Int(19));
    }

    #[test]
    fn test_argument_middleware_passes_default_to_resolver() {
        let arguments = vec![UnwrappedArgument {
            name: "age".into(),
            default_value: Some(ValueNode::int(18)),
            default: Some(RuntimeValue::Int(18)),
            formatters: Vec::new(),
        }];
        let pipeline = compile_pipeline(
            "createUser",
            Some(&FieldResolver::new(|context| {
                Ok(ResolverResult::Value(
                    context.argument("age").cloned().unwrap_or_default(),
                ))
            })),
            &[argument_middleware("input".into(), arguments)],
        );

        let input = ObjectValue::new().with_field("name", "ada");
        let mut context = MiddlewareContext::new("Mutation", "createUser").with_argument(
            ArgumentValue::new("input", RuntimeValue::Object(input)),
        );
        pipeline.call(&mut context).expect("pipeline runs");
        assert_eq!(context.result, Some(ResolverResult::Value(RuntimeValue::Int(18))));

        let input = ObjectValue::new().with_field("age", 42);
        let mut context = MiddlewareContext::new("Mutation", "createUser").with_argument(
            ArgumentValue::new("input", RuntimeValue::Object(input)),
        );
        pipeline.call(&mut context).expect("pipeline runs");
        assert_eq!(context.result, Some(ResolverResult::Value(RuntimeValue::Int(42))));
    }

    #[test]
    fn test_payload_resolvers_respect_markers() {
        let data = payload_data_resolver();
        let errors = payload_errors_resolver();

        let context = MiddlewareContext::new("CreateUserPayload", "user")
            .with_parent(ResolverResult::NullMarker);
        assert_eq!(
            data.call(&context),
            Ok(ResolverResult::Value(RuntimeValue::Null))
        );

        let mut context = MiddlewareContext::new("CreateUserPayload", "errors")
            .with_parent(ResolverResult::ErrorMarker);
        context.scoped_state.insert(
            MUTATION_ERRORS_STATE.into(),
            RuntimeValue::List(vec![RuntimeValue::String("x".into())]),
        );
        assert_eq!(
            errors.call(&context),
            Ok(ResolverResult::Value(RuntimeValue::List(vec![
                RuntimeValue::String("x".into())
            ])))
        );
    }

    #[test]
    fn test_null_on_error_short_circuits() {
        let pipeline = compile_pipeline("user", None, &[null_on_error_middleware()]);
        let mut context = MiddlewareContext::new("CreateUserPayload", "user")
            .with_parent(ResolverResult::ErrorMarker);
        pipeline.call(&mut context).expect("pipeline runs");
        assert_eq!(context.result, Some(ResolverResult::Value(RuntimeValue::Null)));
    }
}
