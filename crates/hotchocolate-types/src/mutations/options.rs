//! Mutation convention options and per-mutation overrides.

use serde::{Deserialize, Serialize};

use crate::types::naming::format_mutation_pattern;

pub const DEFAULT_INPUT_TYPE_NAME_PATTERN: &str = "{MutationName}Input";
pub const DEFAULT_INPUT_ARGUMENT_NAME: &str = "input";
pub const DEFAULT_PAYLOAD_TYPE_NAME_PATTERN: &str = "{MutationName}Payload";
pub const DEFAULT_PAYLOAD_ERROR_TYPE_NAME_PATTERN: &str = "{MutationName}Error";
pub const DEFAULT_PAYLOAD_ERRORS_FIELD_NAME: &str = "errors";

/// Global mutation convention options.
///
/// Unset values fall back to the built-in defaults.
///
/// ```toml
/// [mutation_conventions]
/// input_type_name_pattern = "{MutationName}Input"
/// apply_to_all_mutations = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationConventionOptions {
    #[serde(default)]
    pub input_type_name_pattern: Option<String>,

    #[serde(default)]
    pub input_argument_name: Option<String>,

    #[serde(default)]
    pub payload_type_name_pattern: Option<String>,

    #[serde(default)]
    pub payload_error_type_name_pattern: Option<String>,

    #[serde(default)]
    pub payload_errors_field_name: Option<String>,

    /// Apply the convention to mutations that did not opt in.
    /// Default: true
    #[serde(default)]
    pub apply_to_all_mutations: Option<bool>,
}

impl MutationConventionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn input_type_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.input_type_name_pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn input_argument_name(mut self, name: impl Into<String>) -> Self {
        self.input_argument_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn payload_type_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.payload_type_name_pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn payload_error_type_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.payload_error_type_name_pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn payload_errors_field_name(mut self, name: impl Into<String>) -> Self {
        self.payload_errors_field_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn apply_to_all_mutations(mut self, apply: bool) -> Self {
        self.apply_to_all_mutations = Some(apply);
        self
    }
}

/// Convention overrides for a single mutation field.
///
/// Created from `@mutationConvention`, from
/// `ObjectFieldDefinition::mutation_convention` or from
/// `SchemaBuilder::add_mutation_convention`. Names given here are used
/// verbatim; `{MutationName}` is still substituted if present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationContextData {
    /// The mutation field the overrides apply to.
    pub name: String,
    pub input_type_name: Option<String>,
    pub input_argument_name: Option<String>,
    pub payload_field_name: Option<String>,
    pub payload_type_name: Option<String>,
    pub payload_error_type_name: Option<String>,
    pub payload_errors_field_name: Option<String>,
    pub enabled: Option<bool>,
}

impl MutationContextData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn input_type_name(mut self, name: impl Into<String>) -> Self {
        self.input_type_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn input_argument_name(mut self, name: impl Into<String>) -> Self {
        self.input_argument_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn payload_field_name(mut self, name: impl Into<String>) -> Self {
        self.payload_field_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn payload_type_name(mut self, name: impl Into<String>) -> Self {
        self.payload_type_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn payload_error_type_name(mut self, name: impl Into<String>) -> Self {
        self.payload_error_type_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn payload_errors_field_name(mut self, name: impl Into<String>) -> Self {
        self.payload_errors_field_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn disable(self) -> Self {
        self.enabled(false)
    }

    /// Overlays `other` on `self`; values set in `other` win.
    #[must_use]
    pub fn merge(mut self, other: &MutationContextData) -> Self {
        fn pick(target: &mut Option<String>, source: &Option<String>) {
            if source.is_some() {
                target.clone_from(source);
            }
        }
        pick(&mut self.input_type_name, &other.input_type_name);
        pick(&mut self.input_argument_name, &other.input_argument_name);
        pick(&mut self.payload_field_name, &other.payload_field_name);
        pick(&mut self.payload_type_name, &other.payload_type_name);
        pick(&mut self.payload_error_type_name, &other.payload_error_type_name);
        pick(&mut self.payload_errors_field_name, &other.payload_errors_field_name);
        if other.enabled.is_some() {
            self.enabled = other.enabled;
        }
        self
    }
}

/// The effective convention for one mutation field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConvention {
    pub input_type_name: String,
    pub input_argument_name: String,
    pub payload_type_name: String,
    pub payload_field_name: Option<String>,
    pub payload_error_type_name: String,
    pub payload_errors_field_name: String,
}

impl ResolvedConvention {
    /// Decides whether the convention applies to `mutation_name` and with
    /// which names.
    ///
    /// Explicit overrides win over the presence of error types, which wins
    /// over the global default. Returns `None` if the convention is off.
    pub fn resolve(
        mutation_name: &str,
        explicit: Option<&MutationContextData>,
        has_errors: bool,
        global: &MutationConventionOptions,
    ) -> Option<Self> {
        let enabled = explicit
            .and_then(|data| data.enabled)
            .unwrap_or(has_errors || global.apply_to_all_mutations.unwrap_or(true));
        if !enabled {
            return None;
        }

        let pick = |explicit_value: Option<&String>, pattern: Option<&String>, default: &str| {
            let pattern = explicit_value
                .or(pattern)
                .map_or(default, String::as_str);
            format_mutation_pattern(pattern, mutation_name)
        };

        Some(Self {
            input_type_name: pick(
                explicit.and_then(|d| d.input_type_name.as_ref()),
                global.input_type_name_pattern.as_ref(),
                DEFAULT_INPUT_TYPE_NAME_PATTERN,
            ),
            input_argument_name: pick(
                explicit.and_then(|d| d.input_argument_name.as_ref()),
                global.input_argument_name.as_ref(),
                DEFAULT_INPUT_ARGUMENT_NAME,
            ),
            payload_type_name: pick(
                explicit.and_then(|d| d.payload_type_name.as_ref()),
                global.payload_type_name_pattern.as_ref(),
                DEFAULT_PAYLOAD_TYPE_NAME_PATTERN,
            ),
            payload_field_name: explicit.and_then(|d| d.payload_field_name.clone()),
            payload_error_type_name: pick(
                explicit.and_then(|d| d.payload_error_type_name.as_ref()),
                global.payload_error_type_name_pattern.as_ref(),
                DEFAULT_PAYLOAD_ERROR_TYPE_NAME_PATTERN,
            ),
            payload_errors_field_name: pick(
                explicit.and_then(|d| d.payload_errors_field_name.as_ref()),
                global.payload_errors_field_name.as_ref(),
                DEFAULT_PAYLOAD_ERRORS_FIELD_NAME,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let resolved = ResolvedConvention::resolve(
            "createUser",
            None,
            false,
            &MutationConventionOptions::default(),
        )
        .expect("enabled by default");
        assert_eq!(resolved.input_type_name, "CreateUserInput");
        assert_eq!(resolved.input_argument_name, "input");
        assert_eq!(resolved.payload_type_name, "CreateUserPayload");
        assert_eq!(resolved.payload_error_type_name, "CreateUserError");
        assert_eq!(resolved.payload_errors_field_name, "errors");
        assert_eq!(resolved.payload_field_name, None);
    }

    #[test]
    fn test_precedence() {
        let global = MutationConventionOptions::new()
            .apply_to_all_mutations(false)
            .input_argument_name("data");

        // global off
        assert!(ResolvedConvention::resolve("a", None, false, &global).is_none());

        // error types opt in
        let resolved = ResolvedConvention::resolve("a", None, true, &global).expect("opted in");
        assert_eq!(resolved.input_argument_name, "data");

        // explicit overrides beat everything
        let explicit = MutationContextData::new("a").disable();
        assert!(ResolvedConvention::resolve("a", Some(&explicit), true, &global).is_none());

        let explicit = MutationContextData::new("a")
            .enabled(true)
            .input_argument_name("args")
            .payload_type_name("APayloadV2");
        let resolved =
            ResolvedConvention::resolve("a", Some(&explicit), false, &global).expect("enabled");
        assert_eq!(resolved.input_argument_name, "args");
        assert_eq!(resolved.payload_type_name, "APayloadV2");
        assert_eq!(resolved.input_type_name, "AInput");
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = MutationContextData::new("a").input_type_name("X").enabled(true);
        let merged = base.merge(&MutationContextData::new("a").enabled(false));
        assert_eq!(merged.input_type_name.as_deref(), Some("X"));
        assert_eq!(merged.enabled, Some(false));
    }

    #[test]
    fn test_options_from_toml() {
        let options: MutationConventionOptions = toml::from_str(
            r#"
            payload_errors_field_name = "problems"
            apply_to_all_mutations = false
            "#,
        )
        .expect("valid toml");
        assert_eq!(options.payload_errors_field_name.as_deref(), Some("problems"));
        assert_eq!(options.apply_to_all_mutations, Some(false));
        assert_eq!(options.input_type_name_pattern, None);
    }
}
