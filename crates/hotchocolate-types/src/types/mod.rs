//! Type descriptors, references, definitions and scalars.

pub mod definitions;
pub mod naming;
pub mod reference;
pub mod runtime;
pub mod scalars;
pub mod type_info;
pub mod wrapping;

pub use definitions::{
    ArgumentDefinition, EnumTypeDefinition, EnumValueDefinition, InputFieldDefinition,
    InputObjectTypeDefinition, InterfaceTypeDefinition, ObjectFieldDefinition,
    ObjectTypeDefinition, ScalarTypeDefinition, TypeDefinition, TypeKind, UnionTypeDefinition,
};
pub use reference::{DependencyKind, TypeContext, TypeDependency, TypeId, TypeReference};
pub use runtime::{NamedRuntimeType, RuntimeKind, RuntimeType};
pub use scalars::ScalarType;
pub use type_info::{NamedCore, TypeComponent, TypeInfo};
pub use wrapping::WrappedType;
