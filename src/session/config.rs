use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::Variant;

/// Solver endpoint used when none is configured
pub const DEFAULT_SOLVER_URL: &str = "http://localhost/thyrosim/ajax_getplot.cgi";

/// Seconds a solver request may take before it counts as failed
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read session config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse session config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Session settings, loadable from JSON
///
/// ```json
/// {
///   "solver_url": "https://example.org/thyrosim/ajax_getplot.cgi",
///   "timeout_secs": 60,
///   "variant": "Junior",
///   "parameters": { "p1": "0.0027785" }
/// }
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub solver_url: String,
    pub timeout_secs: u64,
    pub variant: Variant,
    /// Model-parameter fields shown on the form, with their initial values
    pub parameters: BTreeMap<String, String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            solver_url: DEFAULT_SOLVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            variant: Variant::default(),
            parameters: BTreeMap::new(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_solver_url(mut self, url: impl Into<String>) -> Self {
        self.solver_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.solver_url, DEFAULT_SOLVER_URL);
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.variant, Variant::Standard);
    }

    #[test]
    fn test_partial_json() {
        let config = SessionConfig::from_json(
            r#"{ "variant": "ThyrosimJr", "parameters": { "p1": "0.5" } }"#,
        )
        .unwrap();
        assert_eq!(config.variant, Variant::Junior);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.parameters.get("p1").map(String::as_str), Some("0.5"));
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(
            SessionConfig::from_json("{ \"timeout_secs\": \"soon\" }"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SessionConfig::from_file("/nonexistent/thyrosim.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
