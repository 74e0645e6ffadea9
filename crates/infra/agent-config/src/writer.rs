//! Atomic writing of merged configs.
//!
//! Uses the atomicwrites crate so a rendered config is either fully written
//! or not written at all.

use crate::tree::ConfigMap;
use atomicwrites::{AllowOverwrite, AtomicFile};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to serialize config as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write config file {}: {message}", path.display())]
    AtomicWrite { path: PathBuf, message: String },
}

/// Serialization format for a rendered config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// JSON for `.json` paths, YAML for everything else.
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            Self::Json
        } else {
            Self::Yaml
        }
    }

    pub fn render(self, config: &ConfigMap) -> Result<String, WriteError> {
        Ok(match self {
            Self::Yaml => serde_yaml::to_string(config)?,
            Self::Json => serde_json::to_string_pretty(config)? + "\n",
        })
    }
}

/// Write a config to `path` atomically, creating parent directories.
pub fn write_config_atomic(
    path: &Path,
    config: &ConfigMap,
    format: OutputFormat,
) -> Result<(), WriteError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let rendered = format.render(config)?;
    AtomicFile::new(path, AllowOverwrite)
        .write(|f| f.write_all(rendered.as_bytes()))
        .map_err(|e| WriteError::AtomicWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(())
}
