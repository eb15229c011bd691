//! Error types for schema construction, scalar coercion and field execution.
//!
//! Schema construction never fails fast: every configuration problem becomes
//! a [`SchemaError`] and all of them are reported together through a single
//! [`SchemaException`]. Scalar coercion errors are raised per call.

use std::fmt;

use indexmap::IndexMap;

use crate::language::{SyntaxLocation, ValueKind};
use crate::value::{ObjectValue, RuntimeValue};

/// Machine-readable error codes attached to [`SchemaError`]s.
pub mod codes {
    pub const DUPLICATE_TYPE_NAME: &str = "DUPLICATE_TYPE_NAME";
    pub const DUPLICATE_FIELD_NAME: &str = "DUPLICATE_FIELD_NAME";
    pub const DUPLICATE_TYPE_REGISTRATION: &str = "DUPLICATE_TYPE_REGISTRATION";
    pub const UNRESOLVED_TYPE_DEPENDENCY: &str = "UNRESOLVED_TYPE_DEPENDENCY";
    pub const TYPE_NAME_UNRESOLVED: &str = "TYPE_NAME_UNRESOLVED";
    pub const TYPE_REFERENCE_INVALID: &str = "TYPE_REFERENCE_INVALID";
    pub const INVALID_NAME: &str = "INVALID_NAME";
    pub const EXTENSION_TARGET_MISSING: &str = "EXTENSION_TARGET_MISSING";
    pub const QUERY_TYPE_MISSING: &str = "QUERY_TYPE_MISSING";
    pub const TYPE_HAS_NO_FIELDS: &str = "TYPE_HAS_NO_FIELDS";
    pub const TYPE_KIND_MISMATCH: &str = "TYPE_KIND_MISMATCH";
    pub const INTERFACE_NOT_IMPLEMENTED: &str = "INTERFACE_NOT_IMPLEMENTED";
    pub const UNION_MEMBER_INVALID: &str = "UNION_MEMBER_INVALID";
    pub const INVALID_DEFAULT_VALUE: &str = "INVALID_DEFAULT_VALUE";
    pub const SYNTAX_ERROR: &str = "SYNTAX_ERROR";
    pub const INVALID_OPTIONS: &str = "INVALID_OPTIONS";
    pub const DIRECTIVE_LOCATION_INVALID: &str = "DIRECTIVE_LOCATION_INVALID";
    pub const DIRECTIVE_ARGUMENT_UNKNOWN: &str = "DIRECTIVE_ARGUMENT_UNKNOWN";
    pub const DIRECTIVE_ARGUMENT_UNEXPECTED_VALUE: &str = "DIRECTIVE_ARGUMENT_UNEXPECTED_VALUE";
    pub const MUTATION_PAYLOAD_MUST_BE_OBJECT: &str = "MUTATION_PAYLOAD_MUST_BE_OBJECT";
    pub const MUTATION_CONVENTION_NON_MUTATION_FIELDS: &str =
        "MUTATION_CONVENTION_NON_MUTATION_FIELDS";
    pub const MUTATION_CONVENTION_TYPE_NAME_COLLISION: &str =
        "MUTATION_CONVENTION_TYPE_NAME_COLLISION";
}

/// A structured, user-facing schema construction error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    message: String,
    code: Option<String>,
    type_name: Option<String>,
    field_name: Option<String>,
    location: Option<SyntaxLocation>,
    extensions: IndexMap<String, String>,
}

impl SchemaError {
    /// Creates a new error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            type_name: None,
            field_name: None,
            location: None,
            extensions: IndexMap::new(),
        }
    }

    /// Attaches a machine-readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attaches the offending type.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Attaches the offending field.
    #[must_use]
    pub fn with_field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    /// Attaches the location of the offending syntax node.
    #[must_use]
    pub fn with_location(mut self, location: Option<SyntaxLocation>) -> Self {
        self.location = location;
        self
    }

    /// Attaches an extension entry.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    pub fn location(&self) -> Option<SyntaxLocation> {
        self.location
    }

    pub fn extensions(&self) -> &IndexMap<String, String> {
        &self.extensions
    }

    /// Returns `true` if the error carries the given code.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        match (&self.type_name, &self.field_name) {
            (Some(type_name), Some(field_name)) => write!(f, " ({type_name}.{field_name})")?,
            (Some(type_name), None) => write!(f, " ({type_name})")?,
            _ => {}
        }
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        if let Some(location) = self.location {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

/// The aggregate failure of a schema build.
///
/// Always carries at least one error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", format_errors(.errors))]
pub struct SchemaException {
    errors: Vec<SchemaError>,
}

impl SchemaException {
    /// Creates an exception from the collected errors.
    ///
    /// An empty list is replaced by a single generic error so that callers
    /// never observe an exception without a cause.
    #[must_use]
    pub fn new(errors: Vec<SchemaError>) -> Self {
        if errors.is_empty() {
            return Self {
                errors: vec![SchemaError::new("Unexpected schema exception occurred.")],
            };
        }
        Self { errors }
    }

    pub fn errors(&self) -> &[SchemaError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SchemaError> {
        self.errors
    }

    /// Returns `true` if any contained error carries the given code.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.has_code(code))
    }

    /// Returns all errors that carry the given code.
    pub fn errors_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a SchemaError> {
        self.errors.iter().filter(move |e| e.has_code(code))
    }
}

impl From<SchemaError> for SchemaException {
    fn from(error: SchemaError) -> Self {
        Self::new(vec![error])
    }
}

fn format_errors(errors: &[SchemaError]) -> String {
    let mut out = format!("Schema construction failed with {} error(s).", errors.len());
    for (index, error) in errors.iter().enumerate() {
        out.push_str(&format!("\n\n{}. {}", index + 1, error));
    }
    out
}

/// Errors raised by scalar coercion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScalarError {
    /// The literal kind is not accepted by the scalar.
    #[error("{scalar} cannot parse the given literal of type `{kind}`.")]
    InvalidLiteral {
        /// Name of the scalar.
        scalar: String,
        /// Kind of the rejected literal.
        kind: ValueKind,
    },

    /// The runtime value is not of the scalar's runtime type.
    #[error("{scalar} cannot serialize the given value of type `{runtime_type}`.")]
    InvalidValue {
        /// Name of the scalar.
        scalar: String,
        /// Runtime type name of the rejected value.
        runtime_type: String,
    },

    /// No literal was passed.
    #[error("The literal passed to {scalar} must not be absent.")]
    ArgumentNull {
        /// Name of the scalar.
        scalar: String,
    },
}

impl ScalarError {
    pub fn invalid_literal(scalar: impl Into<String>, kind: ValueKind) -> Self {
        Self::InvalidLiteral {
            scalar: scalar.into(),
            kind,
        }
    }

    pub fn invalid_value(scalar: impl Into<String>, runtime_type: impl Into<String>) -> Self {
        Self::InvalidValue {
            scalar: scalar.into(),
            runtime_type: runtime_type.into(),
        }
    }

    pub fn argument_null(scalar: impl Into<String>) -> Self {
        Self::ArgumentNull {
            scalar: scalar.into(),
        }
    }
}

/// Errors raised while a field's resolver pipeline runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// A plain error message, optionally with a code.
    #[error("{message}")]
    Message {
        /// Human readable message.
        message: String,
        /// Optional machine-readable code.
        code: Option<String>,
    },

    /// An exception raised by a resolver. Mutation error definitions may map
    /// it to a schema error object.
    #[error("Unexpected Execution Error: {}", .0.type_name().unwrap_or("exception"))]
    Exception(ObjectValue),

    /// A scalar coercion failure.
    #[error(transparent)]
    Scalar(#[from] ScalarError),
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Creates an exception of the given runtime type carrying a `message`.
    pub fn exception(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Exception(
            ObjectValue::typed(type_name)
                .with_field("message", RuntimeValue::String(message.into())),
        )
    }
}
