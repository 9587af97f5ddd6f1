//! Configuration system for RapidSetup.
//!
//! Load business-process configuration from TOML, YAML or JSON to control which
//! lifecycle processes are enabled and which trigger filters they apply.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use rapidsetup_config::RapidSetupConfig;
//!
//! let config = RapidSetupConfig::from_toml_str(r#"
//!     [businessProcesses.joiner]
//!     enabled = true
//!     reprocessSkipped = false
//!
//!     [businessProcesses.joiner.triggerFilter.group]
//!     type = "group"
//!     booleanOperation = "AND"
//!     items = []
//! "#).unwrap();
//!
//! assert!(config.get_boolean("businessProcesses.joiner.enabled").unwrap());
//! assert!(!config.get_boolean("businessProcesses.mover.enabled").unwrap());
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root RapidSetup configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RapidSetupConfig {
    /// Business process settings keyed by process name (`joiner`, `mover`, `leaver`).
    #[serde(default)]
    pub business_processes: BTreeMap<String, BusinessProcessConfig>,
}

impl RapidSetupConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, has an unknown extension, or
    /// fails to parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            other => Err(ConfigError::Invalid(format!(
                "unsupported configuration format: {:?}",
                other
            ))),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parses configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Adds or replaces a business process configuration.
    pub fn with_process(mut self, name: impl Into<String>, process: BusinessProcessConfig) -> Self {
        self.business_processes.insert(name.into(), process);
        self
    }

    /// Returns the configuration of a business process, if present.
    pub fn process(&self, name: &str) -> Option<&BusinessProcessConfig> {
        self.business_processes.get(name)
    }

    /// Returns the trigger filter tree for a business process.
    pub fn match_filter(&self, process: &str) -> Option<&Value> {
        self.process(process)
            .and_then(|p| p.trigger_filter.as_ref())
    }

    /// Reads a nested boolean by dotted path, e.g. `businessProcesses.joiner.enabled`.
    ///
    /// Missing paths read as `false`; a path resolving to a non-boolean is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use rapidsetup_config::{BusinessProcessConfig, RapidSetupConfig};
    ///
    /// let config = RapidSetupConfig::new()
    ///     .with_process("leaver", BusinessProcessConfig::enabled());
    ///
    /// assert!(config.get_boolean("businessProcesses.leaver.enabled").unwrap());
    /// assert!(!config.get_boolean("businessProcesses.leaver.reprocessSkipped").unwrap());
    /// ```
    pub fn get_boolean(&self, path: &str) -> Result<bool, ConfigError> {
        let root = serde_json::to_value(self)?;
        let mut node = &root;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            match node.get(segment) {
                Some(child) => node = child,
                None => return Ok(false),
            }
        }
        match node {
            Value::Bool(b) => Ok(*b),
            Value::Null => Ok(false),
            other => Err(ConfigError::Invalid(format!(
                "{} is not a boolean: {}",
                path, other
            ))),
        }
    }
}

/// Per business process configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProcessConfig {
    /// Whether the business process runs at all.
    #[serde(default)]
    pub enabled: bool,

    /// Whether identities previously marked skipped are evaluated again.
    #[serde(default)]
    pub reprocess_skipped: bool,

    /// Trigger filter tree; its `group` key holds the root constraint node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_filter: Option<Value>,
}

impl BusinessProcessConfig {
    /// Creates an enabled process with no trigger filter.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Creates a disabled process.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Sets the trigger filter tree.
    pub fn with_trigger_filter(mut self, filter: Value) -> Self {
        self.trigger_filter = Some(filter);
        self
    }

    /// Sets the reprocess-skipped override.
    pub fn with_reprocess_skipped(mut self, reprocess: bool) -> Self {
        self.reprocess_skipped = reprocess;
        self
    }
}
