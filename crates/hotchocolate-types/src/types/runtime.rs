//! Runtime type descriptors.
//!
//! Code-first types are described by [`RuntimeType`] values instead of
//! reflection. A descriptor can be a plain or generic runtime type, a list,
//! a nullable value type, an async wrapper, the `Native` opt-out marker, or
//! one of the schema-type markers (`NonNullType<ListType<StringType>>`).

use std::fmt;

/// Name of the generic runtime type whose trailing type arguments declare the
/// error types of a mutation: `MutationResult<User, InvalidNameError>`.
pub const MUTATION_RESULT: &str = "MutationResult";

/// How a named runtime type treats absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeKind {
    /// Value types are non-null unless wrapped in [`RuntimeType::Nullable`].
    Value,
    /// Reference types are nullable.
    Reference,
    /// Exception types; nullable like reference types.
    Exception,
}

/// A plain or generic runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedRuntimeType {
    pub name: String,
    pub kind: RuntimeKind,
    pub arguments: Vec<RuntimeType>,
}

/// A runtime type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuntimeType {
    Named(NamedRuntimeType),
    /// `T[]`
    Array(Box<RuntimeType>),
    /// `List<T>` and other single-argument enumerables.
    List(Box<RuntimeType>),
    /// `T?` around a value type.
    Nullable(Box<RuntimeType>),
    /// `Task<T>`
    Task(Box<RuntimeType>),
    /// `NativeType<T>`
    Native(Box<RuntimeType>),
    /// `NonNullType<T>`
    NonNullMarker(Box<RuntimeType>),
    /// `ListType<T>`
    ListMarker(Box<RuntimeType>),
    /// A schema type class such as `StringType`, holding the schema type name.
    SchemaType(String),
}

impl RuntimeType {
    pub fn value(name: impl Into<String>) -> Self {
        Self::Named(NamedRuntimeType {
            name: name.into(),
            kind: RuntimeKind::Value,
            arguments: Vec::new(),
        })
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::Named(NamedRuntimeType {
            name: name.into(),
            kind: RuntimeKind::Reference,
            arguments: Vec::new(),
        })
    }

    pub fn exception(name: impl Into<String>) -> Self {
        Self::Named(NamedRuntimeType {
            name: name.into(),
            kind: RuntimeKind::Exception,
            arguments: Vec::new(),
        })
    }

    /// A generic reference type: `GenericFoo<String>`.
    pub fn generic(name: impl Into<String>, arguments: Vec<RuntimeType>) -> Self {
        Self::Named(NamedRuntimeType {
            name: name.into(),
            kind: RuntimeKind::Reference,
            arguments,
        })
    }

    /// `MutationResult<T, E1, E2, ...>`
    pub fn mutation_result(success: RuntimeType, errors: Vec<RuntimeType>) -> Self {
        let mut arguments = Vec::with_capacity(errors.len() + 1);
        arguments.push(success);
        arguments.extend(errors);
        Self::generic(MUTATION_RESULT, arguments)
    }

    pub fn schema_type(name: impl Into<String>) -> Self {
        Self::SchemaType(name.into())
    }

    pub fn string() -> Self {
        Self::reference("String")
    }

    pub fn boolean() -> Self {
        Self::value("bool")
    }

    pub fn int() -> Self {
        Self::value("i32")
    }

    pub fn short() -> Self {
        Self::value("i16")
    }

    pub fn long() -> Self {
        Self::value("i64")
    }

    pub fn byte() -> Self {
        Self::value("u8")
    }

    pub fn float() -> Self {
        Self::value("f64")
    }

    pub fn decimal() -> Self {
        Self::value("Decimal")
    }

    pub fn date_time() -> Self {
        Self::value("OffsetDateTime")
    }

    pub fn date() -> Self {
        Self::value("Date")
    }

    pub fn uuid() -> Self {
        Self::value("Uuid")
    }

    #[must_use]
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    #[must_use]
    pub fn array(self) -> Self {
        Self::Array(Box::new(self))
    }

    #[must_use]
    pub fn nullable(self) -> Self {
        Self::Nullable(Box::new(self))
    }

    #[must_use]
    pub fn task(self) -> Self {
        Self::Task(Box::new(self))
    }

    #[must_use]
    pub fn native(self) -> Self {
        Self::Native(Box::new(self))
    }

    #[must_use]
    pub fn non_null_type(self) -> Self {
        Self::NonNullMarker(Box::new(self))
    }

    #[must_use]
    pub fn list_type(self) -> Self {
        Self::ListMarker(Box::new(self))
    }

    pub fn as_named(&self) -> Option<&NamedRuntimeType> {
        match self {
            Self::Named(named) => Some(named),
            _ => None,
        }
    }

    /// Returns the `MutationResult` type arguments if this type (optionally
    /// behind one async wrapper) is a mutation result.
    pub fn mutation_result_arguments(&self) -> Option<&[RuntimeType]> {
        let inner = match self {
            Self::Task(inner) => inner.as_ref(),
            other => other,
        };
        match inner {
            Self::Named(named) if named.name == MUTATION_RESULT && !named.arguments.is_empty() => {
                Some(named.arguments.as_slice())
            }
            _ => None,
        }
    }

    /// Returns `true` for exception runtime types.
    pub fn is_exception(&self) -> bool {
        matches!(self, Self::Named(named) if named.kind == RuntimeKind::Exception)
    }

    /// Maps a built-in runtime type name to its scalar name.
    pub fn builtin_scalar_name(name: &str) -> Option<&'static str> {
        match name {
            "String" => Some("String"),
            "bool" => Some("Boolean"),
            "i32" => Some("Int"),
            "i16" => Some("Short"),
            "i64" => Some("Long"),
            "u8" => Some("Byte"),
            "f64" => Some("Float"),
            "Decimal" => Some("Decimal"),
            "OffsetDateTime" => Some("DateTime"),
            "Date" => Some("Date"),
            "Uuid" => Some("Uuid"),
            _ => None,
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => {
                f.write_str(&named.name)?;
                if !named.arguments.is_empty() {
                    f.write_str("<")?;
                    for (index, argument) in named.arguments.iter().enumerate() {
                        if index > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{argument}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::List(inner) => write!(f, "List<{inner}>"),
            Self::Nullable(inner) => write!(f, "{inner}?"),
            Self::Task(inner) => write!(f, "Task<{inner}>"),
            Self::Native(inner) => write!(f, "NativeType<{inner}>"),
            Self::NonNullMarker(inner) => write!(f, "NonNullType<{inner}>"),
            Self::ListMarker(inner) => write!(f, "ListType<{inner}>"),
            Self::SchemaType(name) => write!(f, "{name}Type"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ty = RuntimeType::int().nullable().list().task();
        assert_eq!(ty.to_string(), "Task<List<i32?>>");

        let ty = RuntimeType::generic("GenericFoo", vec![RuntimeType::string()]);
        assert_eq!(ty.to_string(), "GenericFoo<String>");

        let ty = RuntimeType::schema_type("String").non_null_type().list_type();
        assert_eq!(ty.to_string(), "ListType<NonNullType<StringType>>");
    }

    #[test]
    fn test_mutation_result_arguments() {
        let ty = RuntimeType::mutation_result(
            RuntimeType::reference("User"),
            vec![RuntimeType::reference("InvalidNameError")],
        )
        .task();
        let arguments = ty.mutation_result_arguments().expect("mutation result");
        assert_eq!(arguments.len(), 2);
        assert!(RuntimeType::reference("User").mutation_result_arguments().is_none());
    }

    #[test]
    fn test_builtin_scalar_names() {
        assert_eq!(RuntimeType::builtin_scalar_name("i32"), Some("Int"));
        assert_eq!(RuntimeType::builtin_scalar_name("OffsetDateTime"), Some("DateTime"));
        assert_eq!(RuntimeType::builtin_scalar_name("User"), None);
    }
}
