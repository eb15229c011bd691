//! List and non-null wrappers around a named type.

use std::fmt;

/// A named type wrapped by list and non-null modifiers.
///
/// `N` is whatever identifies the named type at the current stage: a name,
/// a registry id, or a bound type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WrappedType<N> {
    Named(N),
    List(Box<WrappedType<N>>),
    NonNull(Box<WrappedType<N>>),
}

impl<N> WrappedType<N> {
    pub fn named(named: N) -> Self {
        Self::Named(named)
    }

    /// Wraps the type in a list.
    #[must_use]
    pub fn into_list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Makes the type non-null; already non-null types are returned as is.
    #[must_use]
    pub fn into_non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// Strips an outer non-null wrapper.
    #[must_use]
    pub fn into_nullable(self) -> Self {
        match self {
            Self::NonNull(inner) => *inner,
            other => other,
        }
    }

    /// The innermost named type.
    pub fn named_type(&self) -> &N {
        match self {
            Self::Named(named) => named,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Returns `true` if the type, ignoring an outer non-null, is a list.
    pub fn is_list(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::NonNull(inner) => matches!(inner.as_ref(), Self::List(_)),
            Self::Named(_) => false,
        }
    }

    /// Returns `true` if the type is a bare or non-null named type.
    pub fn is_named(&self) -> bool {
        match self {
            Self::Named(_) => true,
            Self::NonNull(inner) => matches!(inner.as_ref(), Self::Named(_)),
            Self::List(_) => false,
        }
    }

    /// Replaces the named type, keeping the wrapper nesting.
    pub fn map<M>(self, f: impl FnOnce(N) -> M) -> WrappedType<M> {
        match self {
            Self::Named(named) => WrappedType::Named(f(named)),
            Self::List(inner) => WrappedType::List(Box::new(inner.map(f))),
            Self::NonNull(inner) => WrappedType::NonNull(Box::new(inner.map(f))),
        }
    }

    /// Fallible [`WrappedType::map`].
    pub fn try_map<M, E>(self, f: impl FnOnce(N) -> Result<M, E>) -> Result<WrappedType<M>, E> {
        Ok(match self {
            Self::Named(named) => WrappedType::Named(f(named)?),
            Self::List(inner) => WrappedType::List(Box::new(inner.try_map(f)?)),
            Self::NonNull(inner) => WrappedType::NonNull(Box::new(inner.try_map(f)?)),
        })
    }

    /// Borrowing variant of [`WrappedType::map`].
    pub fn as_ref(&self) -> WrappedType<&N> {
        match self {
            Self::Named(named) => WrappedType::Named(named),
            Self::List(inner) => WrappedType::List(Box::new(inner.as_ref().as_ref())),
            Self::NonNull(inner) => WrappedType::NonNull(Box::new(inner.as_ref().as_ref())),
        }
    }

    /// Returns `true` if both types have the same wrapper nesting.
    pub fn same_shape<M>(&self, other: &WrappedType<M>) -> bool {
        match (self, other) {
            (Self::Named(_), WrappedType::Named(_)) => true,
            (Self::List(a), WrappedType::List(b)) | (Self::NonNull(a), WrappedType::NonNull(b)) => {
                a.same_shape(b)
            }
            _ => false,
        }
    }
}

impl<N: fmt::Display> fmt::Display for WrappedType<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => write!(f, "{named}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl WrappedType<String> {
    /// Parses SDL type syntax such as `[String!]!`.
    pub fn parse(source: &str) -> Option<Self> {
        async_graphql_parser::types::Type::new(source).map(|ty| Self::from(&ty))
    }
}

impl From<&async_graphql_parser::types::Type> for WrappedType<String> {
    fn from(ty: &async_graphql_parser::types::Type) -> Self {
        use async_graphql_parser::types::BaseType;

        let inner = match &ty.base {
            BaseType::Named(name) => Self::Named(name.to_string()),
            BaseType::List(item) => Self::List(Box::new(Self::from(item.as_ref()))),
        };
        if ty.nullable {
            inner
        } else {
            Self::NonNull(Box::new(inner))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let ty = WrappedType::parse("[String!]!").expect("valid type");
        assert_eq!(ty.to_string(), "[String!]!");
        assert!(ty.is_non_null());
        assert!(ty.is_list());
        assert_eq!(ty.named_type(), "String");
    }

    #[test]
    fn test_list_of_non_null_differs_from_non_null_list() {
        let a = WrappedType::parse("[Int!]").expect("valid type");
        let b = WrappedType::parse("[Int]!").expect("valid type");
        assert_ne!(a, b);
        assert!(!a.same_shape(&b));
    }

    #[test]
    fn test_non_null_is_idempotent() {
        let ty = WrappedType::named("User").into_non_null().into_non_null();
        assert_eq!(ty.to_string(), "User!");
        assert_eq!(ty.into_nullable().to_string(), "User");
    }

    #[test]
    fn test_map_keeps_nesting() {
        let ty = WrappedType::parse("[User]!").expect("valid type");
        let mapped = ty.map(|name| name.len());
        assert_eq!(mapped.to_string(), "[4]!");
    }

    #[test]
    fn test_invalid_syntax() {
        assert!(WrappedType::parse("[String").is_none());
    }
}
