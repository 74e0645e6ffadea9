//! Layered configuration loader for agent configs.
//!
//! This crate provides:
//! - [`ConfigLoader`]: load a config file (or an in-memory mapping) and
//!   resolve its `extends` chain into one merged mapping
//! - [`merge`]: override-wins deep merge with `+`-prefixed list appends
//! - [`schema`]: the checks run on every merged config
//! - [`writer`]: atomic output of merged configs
//!
//! # Inheritance
//! A config may name parents with a top-level `extends` key holding one
//! path or a list of paths. Parents are merged in list order (later ones
//! win), then the config's own keys are merged on top. Relative paths
//! resolve against the directory of the config that names them.
//!
//! # List merging
//! Inside a config, list items that start with `+` (or mappings with a
//! `+key`) are appended to the inherited list; plain items replace it.
//!
//! # Example
//! ```no_run
//! use agent_config::ConfigLoader;
//!
//! let loader = ConfigLoader::from_env();
//! let config = loader.load_config("docker_go.yaml").unwrap();
//! println!("{}", config["agent"]["templates"]["system_template"]);
//! ```
//!
//! # Environment Variables
//! - `AGENT_CONFIG_DIR`: Directory searched for configs not found relative
//!   to the working directory

pub mod error;
pub mod inherit;
pub mod loader;
pub mod merge;
pub mod paths;
pub mod schema;
pub mod store;
pub mod tree;
pub mod writer;

// Re-exports for convenient access
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, default_base_dir};
pub use merge::deep_merge;
pub use schema::{AgentSchema, SchemaError, SchemaValidator, SkipSchema};
pub use tree::{ConfigMap, ConfigTree, EXTENDS_KEY};
pub use writer::{OutputFormat, write_config_atomic};
