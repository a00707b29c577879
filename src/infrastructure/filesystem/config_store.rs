use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use validator::Validate;

/// Configuration store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Configuration file not found at path: {0}")]
    ConfigFileNotFound(String),

    #[error("Configuration file read failed: {0}")]
    ReadFailed(String),

    #[error("YAML parsing failed: {0}")]
    YamlParsingFailed(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Settings read from an optional YAML config file
///
/// Every field is optional; command-line flags take precedence over
/// whatever is set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GkConfigFile {
    /// kubectl executable name or path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 4096))]
    pub kubectl: Option<String>,

    /// kubeconfig context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 253))]
    pub context: Option<String>,

    /// Explicit kubeconfig file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Maximum number of concurrent gateway calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 64))]
    pub jobs: Option<usize>,

    /// Timeout for each kubectl call in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 3600))]
    pub timeout_seconds: Option<u64>,

    /// Print operations instead of running them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

/// Reads gk configuration files
#[derive(Debug, Clone, Default)]
pub struct ConfigStore;

impl ConfigStore {
    /// Create a new configuration store
    pub fn new() -> Self {
        Self
    }

    /// Read and validate a config file
    pub fn load<P: AsRef<Path>>(&self, config_path: P) -> Result<GkConfigFile, ConfigStoreError> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            return Err(ConfigStoreError::ConfigFileNotFound(
                config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(config_path)
            .map_err(|e| ConfigStoreError::ReadFailed(e.to_string()))?;

        let config = Self::parse(&contents)?;
        debug!(path = %config_path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Parse and validate YAML config contents
    pub fn parse(contents: &str) -> Result<GkConfigFile, ConfigStoreError> {
        // An empty document deserializes as unit, not as an empty mapping
        if contents.trim().is_empty() {
            return Ok(GkConfigFile::default());
        }

        let config: GkConfigFile = serde_yaml::from_str(contents)
            .map_err(|e| ConfigStoreError::YamlParsingFailed(e.to_string()))?;

        config
            .validate()
            .map_err(|e| ConfigStoreError::ValidationFailed(e.to_string()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = ConfigStore::parse(
            r#"
kubectl: /usr/local/bin/kubectl
context: staging
kubeconfig: /etc/gk/kubeconfig
jobs: 4
timeout_seconds: 120
dry_run: true
"#,
        )
        .unwrap();

        assert_eq!(config.kubectl.as_deref(), Some("/usr/local/bin/kubectl"));
        assert_eq!(config.context.as_deref(), Some("staging"));
        assert_eq!(config.kubeconfig, Some(PathBuf::from("/etc/gk/kubeconfig")));
        assert_eq!(config.jobs, Some(4));
        assert_eq!(config.timeout_seconds, Some(120));
        assert_eq!(config.dry_run, Some(true));
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(ConfigStore::parse("").unwrap(), GkConfigFile::default());
        assert_eq!(ConfigStore::parse("{}").unwrap(), GkConfigFile::default());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(matches!(
            ConfigStore::parse("jobs: 0"),
            Err(ConfigStoreError::ValidationFailed(_))
        ));
        assert!(matches!(
            ConfigStore::parse("timeout_seconds: 7200"),
            Err(ConfigStoreError::ValidationFailed(_))
        ));
        assert!(matches!(
            ConfigStore::parse("kubectl: ''"),
            Err(ConfigStoreError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(matches!(
            ConfigStore::parse("parallel: 3"),
            Err(ConfigStoreError::YamlParsingFailed(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gk.yaml");
        std::fs::write(&path, "context: prod\njobs: 2\n").unwrap();

        let config = ConfigStore::new().load(&path).unwrap();
        assert_eq!(config.context.as_deref(), Some("prod"));
        assert_eq!(config.jobs, Some(2));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = ConfigStore::new().load(temp.path().join("missing.yaml"));
        assert!(matches!(result, Err(ConfigStoreError::ConfigFileNotFound(_))));
    }
}
