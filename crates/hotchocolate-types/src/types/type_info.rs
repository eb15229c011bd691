//! Normalization of runtime type descriptors.
//!
//! [`TypeInfo::try_create`] turns any supported [`RuntimeType`] spelling into
//! a named type plus the list/non-null wrappers around it. Unsupported shapes
//! yield `None` so callers can fall back to another strategy.

use super::runtime::{NamedRuntimeType, RuntimeKind, RuntimeType};
use super::wrapping::WrappedType;

/// One wrapper level of a resolved type, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeComponent {
    List,
    NonNull,
    Named,
}

/// The core of a resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedCore {
    /// A runtime type to be bound to a schema type.
    Runtime(NamedRuntimeType),
    /// A schema type marker naming the type directly.
    Schema(String),
}

/// A normalized runtime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    runtime_type: RuntimeType,
    named: NamedCore,
    components: Vec<TypeComponent>,
}

impl TypeInfo {
    /// Normalizes a runtime type descriptor.
    ///
    /// Returns `None` for nested async wrappers, nested or misplaced native
    /// markers, async wrappers inside lists, `Nullable` around anything but a
    /// value type, and doubly non-null markers.
    pub fn try_create(runtime_type: &RuntimeType) -> Option<Self> {
        let mut current = runtime_type;

        if let RuntimeType::Task(inner) = current {
            current = inner;
        }
        if let RuntimeType::Native(inner) = current {
            current = inner;
            if contains_native_or_task(current) {
                return None;
            }
        }

        let mut components = Vec::new();
        let named = collect(current, &mut components)?;
        Some(Self {
            runtime_type: runtime_type.clone(),
            named,
            components,
        })
    }

    pub fn runtime_type(&self) -> &RuntimeType {
        &self.runtime_type
    }

    pub fn named(&self) -> &NamedCore {
        &self.named
    }

    pub fn components(&self) -> &[TypeComponent] {
        &self.components
    }

    pub fn is_list(&self) -> bool {
        self.components
            .iter()
            .find(|c| **c != TypeComponent::NonNull)
            .is_some_and(|c| *c == TypeComponent::List)
    }

    pub fn is_non_null(&self) -> bool {
        self.components.first() == Some(&TypeComponent::NonNull)
    }

    /// Re-applies the captured wrappers around `named`.
    pub fn create_type<N>(&self, named: N) -> WrappedType<N> {
        let mut ty = WrappedType::Named(named);
        for component in self.components.iter().rev() {
            ty = match component {
                TypeComponent::List => WrappedType::List(Box::new(ty)),
                TypeComponent::NonNull => WrappedType::NonNull(Box::new(ty)),
                TypeComponent::Named => ty,
            };
        }
        ty
    }
}

fn collect(ty: &RuntimeType, components: &mut Vec<TypeComponent>) -> Option<NamedCore> {
    match ty {
        RuntimeType::Task(_) | RuntimeType::Native(_) => None,
        RuntimeType::NonNullMarker(inner) => {
            if matches!(inner.as_ref(), RuntimeType::NonNullMarker(_)) {
                return None;
            }
            components.push(TypeComponent::NonNull);
            collect_marker(inner, components)
        }
        RuntimeType::ListMarker(_) | RuntimeType::SchemaType(_) => collect_marker(ty, components),
        RuntimeType::Array(element) | RuntimeType::List(element) => {
            components.push(TypeComponent::List);
            collect(element, components)
        }
        RuntimeType::Nullable(inner) => match inner.as_ref() {
            RuntimeType::Named(named) if named.kind == RuntimeKind::Value => {
                components.push(TypeComponent::Named);
                Some(NamedCore::Runtime(named.clone()))
            }
            _ => None,
        },
        RuntimeType::Named(named) => {
            if named.kind == RuntimeKind::Value {
                components.push(TypeComponent::NonNull);
            }
            components.push(TypeComponent::Named);
            Some(NamedCore::Runtime(named.clone()))
        }
    }
}

/// Schema type markers: nullability is explicit, nothing is inferred.
fn collect_marker(ty: &RuntimeType, components: &mut Vec<TypeComponent>) -> Option<NamedCore> {
    match ty {
        RuntimeType::NonNullMarker(_) => collect(ty, components),
        RuntimeType::ListMarker(inner) => {
            components.push(TypeComponent::List);
            collect_marker(inner, components)
        }
        RuntimeType::SchemaType(name) => {
            components.push(TypeComponent::Named);
            Some(NamedCore::Schema(name.clone()))
        }
        _ => None,
    }
}

fn contains_native_or_task(ty: &RuntimeType) -> bool {
    match ty {
        RuntimeType::Native(_) | RuntimeType::Task(_) => true,
        RuntimeType::Array(inner)
        | RuntimeType::List(inner)
        | RuntimeType::Nullable(inner)
        | RuntimeType::NonNullMarker(inner)
        | RuntimeType::ListMarker(inner) => contains_native_or_task(inner),
        RuntimeType::Named(named) => named.arguments.iter().any(contains_native_or_task),
        RuntimeType::SchemaType(_) => false,
    }
}
