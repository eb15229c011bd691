//! The field resolver pipeline contract.
//!
//! A field exposes an ordered list of middleware wrapping a terminal resolver.
//! Middleware is identified by an optional key; non-repeatable keys are only
//! ever inserted once so that re-applying a convention does not double-wrap a
//! field.
//!
//! Execution is out of scope for this crate. The pipeline is still fully
//! executable so that conventions can be verified without an executor: build a
//! [`MiddlewareContext`] and call `ObjectField::resolve`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::FieldError;
use crate::language::ValueNode;
use crate::value::RuntimeValue;

/// The structured result of a mutation resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResult {
    Success(RuntimeValue),
    Failure(Vec<RuntimeValue>),
}

impl MutationResult {
    pub fn success(value: impl Into<RuntimeValue>) -> Self {
        Self::Success(value.into())
    }

    pub fn failure(errors: Vec<RuntimeValue>) -> Self {
        Self::Failure(errors)
    }
}

/// What a resolver or middleware produced for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverResult {
    Value(RuntimeValue),
    Mutation(MutationResult),
    /// The mutation failed; errors are in request-scoped state.
    ErrorMarker,
    /// The mutation succeeded with a null value.
    NullMarker,
}

impl ResolverResult {
    pub fn as_value(&self) -> Option<&RuntimeValue> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::ErrorMarker | Self::NullMarker)
    }
}

impl Default for ResolverResult {
    fn default() -> Self {
        Self::Value(RuntimeValue::Null)
    }
}

impl From<RuntimeValue> for ResolverResult {
    fn from(value: RuntimeValue) -> Self {
        Self::Value(value)
    }
}

impl From<MutationResult> for ResolverResult {
    fn from(value: MutationResult) -> Self {
        Self::Mutation(value)
    }
}

/// A coerced argument as seen by resolvers.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentValue {
    pub name: String,
    /// The literal the value was coerced from, if any.
    pub literal: Option<ValueNode>,
    pub value: RuntimeValue,
    /// `true` if the value came from the argument's default.
    pub is_default: bool,
}

impl ArgumentValue {
    pub fn new(name: impl Into<String>, value: impl Into<RuntimeValue>) -> Self {
        Self {
            name: name.into(),
            literal: None,
            value: value.into(),
            is_default: false,
        }
    }

    #[must_use]
    pub fn with_literal(mut self, literal: ValueNode) -> Self {
        self.literal = Some(literal);
        self
    }
}

/// Per-invocation state passed through a field's middleware pipeline.
#[derive(Debug, Clone, Default)]
pub struct MiddlewareContext {
    pub type_name: String,
    pub field_name: String,
    pub parent: ResolverResult,
    pub arguments: IndexMap<String, ArgumentValue>,
    pub result: Option<ResolverResult>,
    /// Request-scoped state, inherited by child contexts.
    pub scoped_state: IndexMap<String, RuntimeValue>,
}

impl MiddlewareContext {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: ResolverResult) -> Self {
        self.parent = parent;
        self
    }

    #[must_use]
    pub fn with_argument(mut self, argument: ArgumentValue) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    pub fn argument(&self, name: &str) -> Option<&RuntimeValue> {
        self.arguments.get(name).map(|argument| &argument.value)
    }

    /// Creates the context of a field selected on this field's result.
    pub fn child(&self, type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
            parent: self.result.clone().unwrap_or_default(),
            arguments: IndexMap::new(),
            result: None,
            scoped_state: self.scoped_state.clone(),
        }
    }
}

type ResolverFn = dyn Fn(&MiddlewareContext) -> Result<ResolverResult, FieldError> + Send + Sync;
type DelegateFn = dyn Fn(&mut MiddlewareContext) -> Result<(), FieldError> + Send + Sync;
type MiddlewareFn = dyn Fn(FieldDelegate) -> FieldDelegate + Send + Sync;
type FormatterFn = dyn Fn(RuntimeValue) -> RuntimeValue + Send + Sync;

/// A terminal field resolver.
#[derive(Clone)]
pub struct FieldResolver(Arc<ResolverFn>);

impl FieldResolver {
    pub fn new(
        resolver: impl Fn(&MiddlewareContext) -> Result<ResolverResult, FieldError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(Arc::new(resolver))
    }

    pub fn call(&self, context: &MiddlewareContext) -> Result<ResolverResult, FieldError> {
        (self.0)(context)
    }
}

impl fmt::Debug for FieldResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldResolver")
    }
}

/// A compiled step of a field pipeline.
#[derive(Clone)]
pub struct FieldDelegate(Arc<DelegateFn>);

impl FieldDelegate {
    pub fn new(
        delegate: impl Fn(&mut MiddlewareContext) -> Result<(), FieldError> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(delegate))
    }

    pub fn call(&self, context: &mut MiddlewareContext) -> Result<(), FieldError> {
        (self.0)(context)
    }
}

impl fmt::Debug for FieldDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldDelegate")
    }
}

/// Wraps the next delegate of a pipeline.
#[derive(Clone)]
pub struct FieldMiddleware(Arc<MiddlewareFn>);

impl FieldMiddleware {
    pub fn new(middleware: impl Fn(FieldDelegate) -> FieldDelegate + Send + Sync + 'static) -> Self {
        Self(Arc::new(middleware))
    }

    pub fn wrap(&self, next: FieldDelegate) -> FieldDelegate {
        (self.0)(next)
    }
}

impl fmt::Debug for FieldMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldMiddleware")
    }
}

/// Post-coercion transformation of an argument value.
#[derive(Clone)]
pub struct ArgumentFormatter(Arc<FormatterFn>);

impl ArgumentFormatter {
    pub fn new(formatter: impl Fn(RuntimeValue) -> RuntimeValue + Send + Sync + 'static) -> Self {
        Self(Arc::new(formatter))
    }

    pub fn format(&self, value: RuntimeValue) -> RuntimeValue {
        (self.0)(value)
    }
}

impl fmt::Debug for ArgumentFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ArgumentFormatter")
    }
}

/// A middleware entry in a field's pipeline configuration.
#[derive(Debug, Clone)]
pub struct FieldMiddlewareDefinition {
    pub key: Option<String>,
    pub is_repeatable: bool,
    pub middleware: FieldMiddleware,
}

impl FieldMiddlewareDefinition {
    /// An anonymous, repeatable middleware.
    pub fn new(middleware: FieldMiddleware) -> Self {
        Self {
            key: None,
            is_repeatable: true,
            middleware,
        }
    }

    /// A keyed middleware that is applied at most once per field.
    pub fn keyed(key: impl Into<String>, middleware: FieldMiddleware) -> Self {
        Self {
            key: Some(key.into()),
            is_repeatable: false,
            middleware,
        }
    }
}

/// Inserts a middleware at the head of the list.
///
/// Returns `false` if a non-repeatable entry with the same key is already
/// present; the list is then left unchanged.
pub fn insert_middleware(
    middleware: &mut Vec<FieldMiddlewareDefinition>,
    definition: FieldMiddlewareDefinition,
) -> bool {
    if !definition.is_repeatable
        && let Some(key) = &definition.key
        && middleware.iter().any(|m| m.key.as_ref() == Some(key))
    {
        return false;
    }
    middleware.insert(0, definition);
    true
}

/// Compiles a field's middleware and resolver into one delegate.
///
/// The first middleware entry is the outermost. Of several non-repeatable
/// entries sharing a key, only the first is applied. Without a resolver the
/// field reads the same-named property of its parent object.
pub fn compile_pipeline(
    field_name: &str,
    resolver: Option<&FieldResolver>,
    middleware: &[FieldMiddlewareDefinition],
) -> FieldDelegate {
    let terminal = match resolver {
        Some(resolver) => {
            let resolver = resolver.clone();
            FieldDelegate::new(move |context| {
                let result = resolver.call(context)?;
                context.result = Some(result);
                Ok(())
            })
        }
        None => property_resolver(field_name.to_string()),
    };

    let mut seen = HashSet::new();
    let applied: Vec<&FieldMiddlewareDefinition> = middleware
        .iter()
        .filter(|m| match (&m.key, m.is_repeatable) {
            (Some(key), false) => seen.insert(key.as_str()),
            _ => true,
        })
        .collect();

    applied
        .into_iter()
        .rev()
        .fold(terminal, |next, definition| definition.middleware.wrap(next))
}

fn property_resolver(field_name: String) -> FieldDelegate {
    FieldDelegate::new(move |context| {
        let value = match &context.parent {
            ResolverResult::Value(RuntimeValue::Object(object)) => {
                object.get(&field_name).cloned().unwrap_or_default()
            }
            _ => RuntimeValue::Null,
        };
        context.result = Some(ResolverResult::Value(value));
        Ok(())
    })
}
