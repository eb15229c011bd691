//! Schema configuration.
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```toml
//! query_type_name = "Query"
//! mutation_type_name = "Mutation"
//!
//! [mutation_conventions]
//! payload_errors_field_name = "errors"
//! apply_to_all_mutations = true
//! ```

use serde::{Deserialize, Serialize};

use crate::mutations::MutationConventionOptions;
use crate::types::naming::{MUTATION_NAME_PLACEHOLDER, is_valid_name};

/// Options for a schema build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaOptions {
    /// Name of the query root type.
    /// Default: "Query"
    #[serde(default = "default_query_type_name")]
    pub query_type_name: String,

    /// Name of the mutation root type.
    /// Default: "Mutation"
    #[serde(default = "default_mutation_type_name")]
    pub mutation_type_name: String,

    /// Name of the subscription root type.
    /// Default: "Subscription"
    #[serde(default = "default_subscription_type_name")]
    pub subscription_type_name: String,

    /// Mutation conventions; `None` leaves mutation fields untouched unless a
    /// field opts in explicitly.
    #[serde(default)]
    pub mutation_conventions: Option<MutationConventionOptions>,
}

fn default_query_type_name() -> String {
    "Query".to_string()
}

fn default_mutation_type_name() -> String {
    "Mutation".to_string()
}

fn default_subscription_type_name() -> String {
    "Subscription".to_string()
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            query_type_name: default_query_type_name(),
            mutation_type_name: default_mutation_type_name(),
            subscription_type_name: default_subscription_type_name(),
            mutation_conventions: None,
        }
    }
}

impl SchemaOptions {
    /// Parses options from a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    #[must_use]
    pub fn with_mutation_conventions(mut self, options: MutationConventionOptions) -> Self {
        self.mutation_conventions = Some(options);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a root type name or a convention name is invalid.
    pub fn validate(&self) -> Result<(), String> {
        for (key, name) in [
            ("query_type_name", &self.query_type_name),
            ("mutation_type_name", &self.mutation_type_name),
            ("subscription_type_name", &self.subscription_type_name),
        ] {
            if !is_valid_name(name) {
                return Err(format!("{key} `{name}` is not a valid GraphQL name"));
            }
        }

        let Some(conventions) = &self.mutation_conventions else {
            return Ok(());
        };
        for (key, pattern) in [
            ("input_type_name_pattern", &conventions.input_type_name_pattern),
            ("payload_type_name_pattern", &conventions.payload_type_name_pattern),
            (
                "payload_error_type_name_pattern",
                &conventions.payload_error_type_name_pattern,
            ),
        ] {
            if let Some(pattern) = pattern
                && !is_valid_name(&pattern.replace(MUTATION_NAME_PLACEHOLDER, "Mutation"))
            {
                return Err(format!(
                    "mutation_conventions.{key} `{pattern}` does not produce valid GraphQL names"
                ));
            }
        }
        for (key, name) in [
            ("input_argument_name", &conventions.input_argument_name),
            ("payload_errors_field_name", &conventions.payload_errors_field_name),
        ] {
            if let Some(name) = name
                && !is_valid_name(name)
            {
                return Err(format!(
                    "mutation_conventions.{key} `{name}` is not a valid GraphQL name"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = SchemaOptions::default();
        assert_eq!(options.query_type_name, "Query");
        assert_eq!(options.mutation_type_name, "Mutation");
        assert_eq!(options.subscription_type_name, "Subscription");
        assert!(options.mutation_conventions.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_invalid_root_name() {
        let options = SchemaOptions {
            query_type_name: "Root Query".into(),
            ..SchemaOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_invalid_convention_pattern() {
        let options = SchemaOptions::default().with_mutation_conventions(
            MutationConventionOptions::new().payload_type_name_pattern("{MutationName}-Payload"),
        );
        assert!(options.validate().is_err());

        let options = SchemaOptions::default().with_mutation_conventions(
            MutationConventionOptions::new().payload_type_name_pattern("{MutationName}Result"),
        );
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            mutation_type_name = "RootMutation"

            [mutation_conventions]
            input_argument_name = "data"
            apply_to_all_mutations = false
        "#;

        let options = SchemaOptions::from_toml(toml).expect("valid toml");
        assert_eq!(options.query_type_name, "Query");
        assert_eq!(options.mutation_type_name, "RootMutation");
        let conventions = options.mutation_conventions.expect("conventions configured");
        assert_eq!(conventions.input_argument_name.as_deref(), Some("data"));
        assert_eq!(conventions.apply_to_all_mutations, Some(false));
    }
}
