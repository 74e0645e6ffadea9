//! Schema checks run once on the fully merged config.
//!
//! The loader only knows the [`SchemaValidator`] trait; [`AgentSchema`] is
//! the rule set agent configs are held to by default.

use crate::tree::ConfigMap;
use serde_json::Value;
use thiserror::Error;

/// Bundle paths must live under one of these prefixes.
pub const ALLOWED_BUNDLE_PREFIXES: &[&str] = &["tools/"];

/// Bundle paths under these prefixes are rejected even though they are under `tools/`.
pub const DISALLOWED_BUNDLE_PREFIXES: &[&str] =
    &["tools/experimental", "tools/fs_write", "tools/system_shell"];

pub const REQUIRED_AGENT_KEYS: &[&str] = &["tools", "templates"];
pub const REQUIRED_TEMPLATE_KEYS: &[&str] = &["system_template"];
pub const REQUIRED_HISTORY_PROCESSORS: &[&str] = &["cache_control"];

/// A merged config failed a schema rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Config missing top-level \"agent\" section")]
    MissingAgent,

    #[error("agent must be a mapping")]
    AgentNotMapping,

    #[error("agent.{0} is required")]
    MissingAgentKey(&'static str),

    #[error("agent.templates must be a mapping")]
    TemplatesNotMapping,

    #[error("agent.templates.{0} must be provided as text")]
    MissingTemplate(&'static str),

    #[error("agent.tools must be a mapping")]
    ToolsNotMapping,

    #[error("agent.tools.bundles must be a list")]
    BundlesNotList,

    #[error("tool bundles must include a string path")]
    BundleMissingPath,

    #[error("Bundle path {0} must live under tools/")]
    BundleOutsideTools(String),

    #[error("Bundle path {0} is not permitted in dynamic configs")]
    BundleNotPermitted(String),

    #[error("agent.history_processors must be a list")]
    HistoryProcessorsNotList,

    #[error("Missing required history processors: {0}")]
    MissingHistoryProcessors(String),
}

/// Checks applied to the final merged config.
pub trait SchemaValidator {
    fn validate(&self, config: &ConfigMap) -> Result<(), SchemaError>;
}

/// Accepts any mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipSchema;

impl SchemaValidator for SkipSchema {
    fn validate(&self, _config: &ConfigMap) -> Result<(), SchemaError> {
        Ok(())
    }
}

/// Required shape of an agent config.
///
/// - `agent` is a mapping holding `tools` and `templates`
/// - `agent.templates.system_template` is a string
/// - every entry of `agent.tools.bundles` has a `tools/` path outside the
///   disallowed prefixes
/// - `agent.history_processors` includes every required processor `type`
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentSchema;

impl SchemaValidator for AgentSchema {
    fn validate(&self, config: &ConfigMap) -> Result<(), SchemaError> {
        let agent = match config.get("agent") {
            None => return Err(SchemaError::MissingAgent),
            Some(Value::Object(agent)) => agent,
            Some(_) => return Err(SchemaError::AgentNotMapping),
        };

        if let Some(key) = REQUIRED_AGENT_KEYS.iter().find(|k| !agent.contains_key(**k)) {
            return Err(SchemaError::MissingAgentKey(*key));
        }

        let Some(templates) = agent["templates"].as_object() else {
            return Err(SchemaError::TemplatesNotMapping);
        };
        for key in REQUIRED_TEMPLATE_KEYS {
            if !templates.get(*key).is_some_and(Value::is_string) {
                return Err(SchemaError::MissingTemplate(*key));
            }
        }

        let Some(tools) = agent["tools"].as_object() else {
            return Err(SchemaError::ToolsNotMapping);
        };
        match tools.get("bundles") {
            None => {}
            Some(Value::Array(bundles)) => bundles.iter().try_for_each(validate_bundle)?,
            Some(_) => return Err(SchemaError::BundlesNotList),
        }

        let processors = match agent.get("history_processors") {
            None => &[][..],
            Some(Value::Array(processors)) => processors.as_slice(),
            Some(_) => return Err(SchemaError::HistoryProcessorsNotList),
        };
        let mut missing: Vec<&str> = REQUIRED_HISTORY_PROCESSORS
            .iter()
            .copied()
            .filter(|required| {
                !processors
                    .iter()
                    .any(|p| p.get("type").and_then(Value::as_str) == Some(*required))
            })
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(SchemaError::MissingHistoryProcessors(missing.join(", ")));
        }

        Ok(())
    }
}

fn validate_bundle(bundle: &Value) -> Result<(), SchemaError> {
    let path = match bundle {
        Value::Object(map) => map.get("path").and_then(Value::as_str),
        other => other.as_str(),
    }
    .ok_or(SchemaError::BundleMissingPath)?;

    if !ALLOWED_BUNDLE_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return Err(SchemaError::BundleOutsideTools(path.to_string()));
    }
    if DISALLOWED_BUNDLE_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return Err(SchemaError::BundleNotPermitted(path.to_string()));
    }
    Ok(())
}
