//! # Deployment Configuration
//!
//! Loaded once per invocation and passed by reference; nothing here is
//! mutated after `load` returns.
//!
//! ## Lookup
//!
//! 1. `--config <path>` / `KEYCLOAK_DEPLOY_CONFIG` (must exist)
//! 2. `{working_dir}/deploy.yaml` (optional)
//! 3. Built-in defaults (`homolog` and `production` under `k8s/`)
//!
//! Every key has a default, so a config file only lists overrides:
//!
//! ```yaml
//! namespace: identity
//! environments:
//!   homolog:
//!     workload_manifest: k8s/homolog/keycloak.yaml
//!     ingress_manifest: k8s/homolog/keycloak-ingress.yaml
//! retry:
//!   max_attempts: 3
//!   backoff: 10s
//! ```

mod environment;
mod report;
mod resources;
mod timing;

pub use environment::EnvironmentConfig;
pub use report::ReportConfig;
pub use resources::{IngressConfig, ResourcesConfig};
pub use timing::{RetryConfig, TimingConfig};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::ConfigError;

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "deploy.yaml";

/// Complete reconciler configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    /// Namespace for all Keycloak resources (current context namespace if unset)
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default = "environment::default_environments")]
    pub environments: BTreeMap<String, EnvironmentConfig>,

    #[serde(default)]
    pub resources: ResourcesConfig,

    #[serde(default)]
    pub ingress: IngressConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            environments: environment::default_environments(),
            resources: ResourcesConfig::default(),
            ingress: IngressConfig::default(),
            retry: RetryConfig::default(),
            timing: TimingConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl DeployConfig {
    /// Load configuration following the lookup order above
    pub fn load(explicit: Option<&Path>, working_dir: &Path) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::from_file(path)?
            }
            None => {
                let candidate = working_dir.join(DEFAULT_CONFIG_FILE);
                if candidate.exists() {
                    Self::from_file(&candidate)?
                } else {
                    debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content, &path.display().to_string())
    }

    /// Parse configuration from YAML text; an empty document yields defaults
    pub fn from_yaml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Reject configurations the reconciler cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environments.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "environments".to_string(),
                value: "(empty)".to_string(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                value: "0".to_string(),
            });
        }
        if self.ingress.placeholder.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ingress.placeholder".to_string(),
                value: "(empty)".to_string(),
            });
        }
        Ok(())
    }

    /// Configured environment names, sorted
    pub fn environment_names(&self) -> Vec<&str> {
        self.environments.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = DeployConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.environment_names(), vec!["homolog", "production"]);
        assert_eq!(config.namespace, None);
        assert_eq!(config.report.realm, "master");
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
namespace: identity
environments:
  qa:
    workload_manifest: manifests/qa/workload.yaml
    ingress_manifest: manifests/qa/ingress.yaml
retry:
  max_attempts: 5
  backoff: 1s
"#;
        let config = DeployConfig::from_yaml(yaml, "test").unwrap();
        assert_eq!(config.namespace.as_deref(), Some("identity"));
        assert_eq!(config.environment_names(), vec!["qa"]);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff, Duration::from_secs(1));
        assert_eq!(config.resources.workload, "keycloak");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = DeployConfig::from_yaml("\n", "test").unwrap();
        assert_eq!(config.environment_names(), vec!["homolog", "production"]);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = DeployConfig::from_yaml("retry:\n  max_attempts: 0\n", "test").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("retry.max_attempts"));
    }

    #[test]
    fn test_malformed_yaml_reports_origin() {
        let err = DeployConfig::from_yaml("environments: [", "broken.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { ref path, .. } if path == "broken.yaml"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = DeployConfig::load(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_from_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "namespace: auth\n").unwrap();
        let config = DeployConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.namespace.as_deref(), Some("auth"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DeployConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.retry.max_attempts, 3);
    }
}
