//! Centralized error types for keycloak-deploy
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a deployment pass
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Target error: {0}")]
    Target(#[from] TargetError),

    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),
}

/// Environment and manifest resolution errors
#[derive(Error, Debug)]
pub enum TargetError {
    #[error("Unknown environment '{name}'. Known environments: {known}")]
    UnknownEnvironment { name: String, known: String },

    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Failed to read manifest {path}: {message}")]
    ManifestUnreadable { path: PathBuf, message: String },

    #[error("Failed to write resolved ingress manifest: {message}")]
    ScratchFile { message: String },
}

/// Cluster and add-on control errors
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Required tool '{tool}' not found. Install it or set {env_var}")]
    ToolNotFound { tool: String, env_var: String },

    #[error("Failed to execute `{command}`: {message}")]
    SpawnFailed { command: String, message: String },

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Apply failed for {manifest}: {message}")]
    ApplyFailed { manifest: PathBuf, message: String },

    #[error("Timed out waiting for {target} ({condition}) after {timeout_secs}s")]
    ReadinessTimeout {
        target: String,
        condition: String,
        timeout_secs: u64,
    },

    #[error("Could not determine cluster address: {message}")]
    AddressLookup { message: String },

    #[error("Failed to parse add-on list: {message}")]
    AddonList { message: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_environment_display() {
        let err = TargetError::UnknownEnvironment {
            name: "staging".to_string(),
            known: "homolog, production".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("staging"));
        assert!(msg.contains("homolog, production"));
    }

    #[test]
    fn test_error_conversion() {
        let err = ClusterError::AddressLookup {
            message: "minikube not running".to_string(),
        };
        let deploy_err: DeployError = err.into();
        assert!(matches!(deploy_err, DeployError::Cluster(_)));
    }

    #[test]
    fn test_tool_not_found_names_override() {
        let err = ClusterError::ToolNotFound {
            tool: "kubectl".to_string(),
            env_var: "KUBECTL_BIN".to_string(),
        };
        assert!(err.to_string().contains("KUBECTL_BIN"));
    }
}
