use crate::schema::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors produced while loading and merging a config chain.
///
/// Every variant aborts the load it was raised in; no partially merged
/// config is ever returned alongside one.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config file must contain a mapping at the top level: {}", path.display())]
    NotAMapping { path: PathBuf },

    #[error("Circular config inheritance detected: {}", path.display())]
    CircularInheritance { path: PathBuf },

    #[error("extends in {} must be a path or a list of paths, got {found}", path.display())]
    InvalidExtendsValue { path: PathBuf, found: &'static str },

    #[error("extends entry #{index} in {} must be a path string", path.display())]
    InvalidExtendsEntry { path: PathBuf, index: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Deep merge requires two mappings, got {base} and {overlay}")]
    InvalidMergeInput {
        base: &'static str,
        overlay: &'static str,
    },

    #[error("Merged config must be a mapping")]
    MergedNotAMapping,

    #[error("extends directive must not remain after merging")]
    ExtendsLeaked,

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ConfigError {
    /// True for failures that indicate a defect in the merge logic rather
    /// than a problem with the user's config files.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::ExtendsLeaked | Self::MergedNotAMapping)
    }
}

/// Short type name of a config value, used in error messages.
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_circular_message_names_path() {
        let err = ConfigError::CircularInheritance {
            path: PathBuf::from("/configs/a.yaml"),
        };
        assert!(err.to_string().contains("/configs/a.yaml"));
    }

    #[test]
    fn test_internal_errors_are_flagged() {
        assert!(ConfigError::ExtendsLeaked.is_internal());
        assert!(ConfigError::MergedNotAMapping.is_internal());
        assert!(
            !ConfigError::NotFound {
                path: PathBuf::from("x.yaml")
            }
            .is_internal()
        );
        assert!(!ConfigError::Schema(SchemaError::MissingAgent).is_internal());
    }

    #[test]
    fn test_schema_error_passes_through_verbatim() {
        let err = ConfigError::from(SchemaError::MissingAgentKey("tools"));
        assert_eq!(err.to_string(), "agent.tools is required");
    }

    #[test]
    fn test_value_kind_names() {
        assert_eq!(value_kind(&json!(null)), "null");
        assert_eq!(value_kind(&json!(3)), "number");
        assert_eq!(value_kind(&json!([1])), "sequence");
        assert_eq!(value_kind(&json!({"a": 1})), "mapping");
    }
}
