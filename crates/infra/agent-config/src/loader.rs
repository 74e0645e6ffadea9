//! Config loader entry points.
//!
//! The loading process:
//! 1. Resolve the requested config to a canonical path (working directory
//!    first, then the base directory)
//! 2. Recursively resolve its `extends` chain and merge it
//! 3. Check that no `extends` directive survived the merge
//! 4. Run schema validation on the merged config

use crate::error::{ConfigError, Result, value_kind};
use crate::inherit::{ResolutionStack, Resolver};
use crate::paths::{canonicalize, resolve_reference};
use crate::schema::{AgentSchema, SchemaValidator};
use crate::tree::{ConfigMap, EXTENDS_KEY};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Environment variable overriding the default base directory.
pub const BASE_DIR_ENV: &str = "AGENT_CONFIG_DIR";

/// Directory name under `config_dir` used when no override is set.
pub const DEFAULT_DIR_NAME: &str = "agent-config";

/// File name standing in for configs that were never read from disk.
pub const GENERATED_FILE: &str = "__generated__.yaml";

/// Default directory searched for configs that are not found relative to
/// the working directory.
///
/// `$AGENT_CONFIG_DIR` if set, else `~/.config/agent-config` on Unix-like
/// systems, else `./config`.
pub fn default_base_dir() -> PathBuf {
    if let Some(dir) = env_trimmed(BASE_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .map(|dir| dir.join(DEFAULT_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("config"))
}

/// Helper to read and normalize an env var (trim + filter empty).
fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Loads config documents with inheritance, then validates the result.
///
/// Each call owns its own [`ResolutionStack`], so one loader can serve
/// concurrent loads.
#[derive(Debug, Clone)]
pub struct ConfigLoader<V = AgentSchema> {
    base_dir: PathBuf,
    validator: V,
}

impl ConfigLoader<AgentSchema> {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            validator: AgentSchema,
        }
    }

    /// Loader rooted at [`default_base_dir`].
    pub fn from_env() -> Self {
        Self::new(default_base_dir())
    }
}

impl<V: SchemaValidator> ConfigLoader<V> {
    /// Replace the schema validator run on merged configs.
    pub fn with_validator<W: SchemaValidator>(self, validator: W) -> ConfigLoader<W> {
        ConfigLoader {
            base_dir: self.base_dir,
            validator,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Location used for in-memory configs. Relative `extends` entries in
    /// such configs resolve against the base directory.
    pub fn generated_location(&self) -> PathBuf {
        canonicalize(&self.base_dir.join(GENERATED_FILE))
    }

    /// Load a config file, applying inheritance and validation.
    pub fn load_config(&self, config_path: impl AsRef<Path>) -> Result<ConfigMap> {
        let path = resolve_reference(config_path.as_ref(), None, &self.base_dir);
        tracing::debug!(path = %path.display(), "loading config");
        let mut stack = ResolutionStack::new();
        let merged = Resolver::new(&self.base_dir).resolve_file(&path, &mut stack)?;
        self.check_merged(Value::Object(merged))
    }

    /// Load a config from an in-memory mapping, applying inheritance rules.
    pub fn load_from_value(&self, config: &Value) -> Result<ConfigMap> {
        let Value::Object(document) = config else {
            return Err(ConfigError::InvalidInput(format!(
                "config must be a mapping, got {}",
                value_kind(config)
            )));
        };
        let mut stack = ResolutionStack::new();
        let merged = Resolver::new(&self.base_dir).resolve_document(
            document,
            &self.generated_location(),
            &mut stack,
        )?;
        self.check_merged(Value::Object(merged))
    }

    /// Post-merge checks: the result is a mapping, carries no `extends`,
    /// and satisfies the schema.
    fn check_merged(&self, merged: Value) -> Result<ConfigMap> {
        let Value::Object(config) = merged else {
            return Err(ConfigError::MergedNotAMapping);
        };
        if config.contains_key(EXTENDS_KEY) {
            return Err(ConfigError::ExtendsLeaked);
        }
        self.validator.validate(&config)?;
        Ok(config)
    }
}
