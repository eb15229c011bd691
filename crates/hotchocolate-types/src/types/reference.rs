//! Type references and dependencies.

use std::fmt;

use super::runtime::RuntimeType;
use super::wrapping::WrappedType;

/// Whether a reference is used in an input or output position.
///
/// A runtime type may be bound to an output object and an input object at the
/// same time; the context picks the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeContext {
    #[default]
    None,
    Input,
    Output,
}

/// Identifies a registered type inside one schema build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A reference to a type that may not be known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeReference {
    /// A runtime type descriptor, resolved through its runtime binding.
    Runtime {
        runtime_type: RuntimeType,
        context: TypeContext,
    },
    /// SDL type syntax, resolved by name.
    Syntax {
        ty: WrappedType<String>,
        context: TypeContext,
    },
    /// A type already registered in the current build.
    Schema(WrappedType<TypeId>),
}

impl TypeReference {
    pub fn runtime(runtime_type: RuntimeType, context: TypeContext) -> Self {
        Self::Runtime {
            runtime_type,
            context,
        }
    }

    /// Parses SDL type syntax such as `[String!]!`.
    pub fn parse(source: &str) -> Option<Self> {
        WrappedType::parse(source).map(|ty| Self::Syntax {
            ty,
            context: TypeContext::None,
        })
    }

    /// A nullable reference to the named type.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Syntax {
            ty: WrappedType::Named(name.into()),
            context: TypeContext::None,
        }
    }

    pub fn syntax(ty: WrappedType<String>) -> Self {
        Self::Syntax {
            ty,
            context: TypeContext::None,
        }
    }

    pub fn context(&self) -> TypeContext {
        match self {
            Self::Runtime { context, .. } | Self::Syntax { context, .. } => *context,
            Self::Schema(_) => TypeContext::None,
        }
    }

    /// Returns `true` if the reference is syntax or a schema reference with a
    /// non-null outer wrapper. Runtime references are decided by `TypeInfo`.
    pub fn is_explicitly_non_null(&self) -> bool {
        match self {
            Self::Syntax { ty, .. } => ty.is_non_null(),
            Self::Schema(ty) => ty.is_non_null(),
            Self::Runtime { .. } => false,
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime { runtime_type, .. } => write!(f, "{runtime_type}"),
            Self::Syntax { ty, .. } => write!(f, "{ty}"),
            Self::Schema(ty) => write!(f, "{ty}"),
        }
    }
}

/// What a dependent type needs from its dependency before it can progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// The dependency must be registered by the time types complete.
    Default,
    /// The dependency must be named before the dependent can be named.
    Named,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Named => f.write_str("Named"),
        }
    }
}

/// A dependency edge from a registered type to another type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDependency {
    pub reference: TypeReference,
    pub kind: DependencyKind,
}

impl TypeDependency {
    pub fn new(reference: TypeReference, kind: DependencyKind) -> Self {
        Self { reference, kind }
    }
}
