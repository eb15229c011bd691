//! Naming conventions.

use std::sync::LazyLock;

use super::runtime::{NamedRuntimeType, RuntimeKind, RuntimeType};

/// GraphQL name: `^[_A-Za-z][_0-9A-Za-z]*$`
static NAME_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").expect("Invalid name regex"));

/// Placeholder replaced by the capitalized mutation field name.
pub const MUTATION_NAME_PLACEHOLDER: &str = "{MutationName}";

/// Returns `true` if `name` is a valid GraphQL name.
pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Substitutes `{MutationName}` in a name pattern.
pub fn format_mutation_pattern(pattern: &str, mutation_name: &str) -> String {
    pattern.replace(MUTATION_NAME_PLACEHOLDER, &capitalize(mutation_name))
}

/// Schema name of an error runtime type. Exceptions are renamed from
/// `FooException` to `FooError`.
pub fn error_type_name(runtime_type: &NamedRuntimeType) -> String {
    match runtime_type.kind {
        RuntimeKind::Exception => match runtime_type.name.strip_suffix("Exception") {
            Some(stem) => format!("{stem}Error"),
            None => runtime_type.name.clone(),
        },
        _ => runtime_type.name.clone(),
    }
}

/// Computes the schema name of a runtime type.
///
/// Generic types concatenate their base name with the names of their type
/// arguments: `GenericFoo<GenericFoo<String>>` becomes
/// `GenericFooOfGenericFooOfString`. `resolve` supplies the name of a bound
/// argument type and returns `None` while that type is not named yet; the
/// whole computation then yields `None`.
pub fn runtime_type_name(
    runtime_type: &NamedRuntimeType,
    resolve: &mut dyn FnMut(&RuntimeType) -> Option<Option<String>>,
) -> Option<String> {
    if runtime_type.arguments.is_empty() {
        return Some(runtime_type.name.clone());
    }

    let mut name = runtime_type.name.clone();
    name.push_str("Of");
    for (index, argument) in runtime_type.arguments.iter().enumerate() {
        if index > 0 {
            name.push_str("And");
        }
        name.push_str(&argument_name(argument, resolve)?);
    }
    Some(name)
}

fn argument_name(
    argument: &RuntimeType,
    resolve: &mut dyn FnMut(&RuntimeType) -> Option<Option<String>>,
) -> Option<String> {
    match argument {
        RuntimeType::Array(inner) | RuntimeType::List(inner) | RuntimeType::ListMarker(inner) => {
            Some(format!("ListOf{}", argument_name(inner, resolve)?))
        }
        RuntimeType::Nullable(inner)
        | RuntimeType::Task(inner)
        | RuntimeType::Native(inner)
        | RuntimeType::NonNullMarker(inner) => argument_name(inner, resolve),
        RuntimeType::SchemaType(name) => Some(name.clone()),
        RuntimeType::Named(named) => match resolve(argument) {
            // bound to a registered type
            Some(name) => name,
            None => match RuntimeType::builtin_scalar_name(&named.name) {
                Some(scalar) => Some(scalar.to_string()),
                None => runtime_type_name(named, resolve),
            },
        },
    }
}
