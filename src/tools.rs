//! Runtime tool path resolution
//!
//! For each external tool (`kubectl`, `minikube`) we:
//! 1. Check for an environment variable `{TOOL}_BIN` (e.g. `KUBECTL_BIN`)
//! 2. Fall back to a PATH lookup
//!
//! Resolution happens once, before any cluster call, so a missing binary
//! fails the run up front instead of in the middle of a deployment.

use std::env;

use crate::error::ClusterError;

/// Environment variable overriding a tool's path (`kube-ctl` -> `KUBE_CTL_BIN`)
pub fn tool_env_var(tool: &str) -> String {
    format!("{}_BIN", tool.to_uppercase().replace('-', "_"))
}

/// Get the path to an external tool
///
/// Returns the value of `{TOOL}_BIN` if set, otherwise the tool name itself.
pub fn get_tool_path(tool: &str) -> String {
    env::var(tool_env_var(tool)).unwrap_or_else(|_| tool.to_string())
}

/// Resolve a tool to an executable path, failing if it cannot be found
pub fn resolve_tool(tool: &str) -> Result<String, ClusterError> {
    let candidate = get_tool_path(tool);
    which::which(&candidate)
        .map(|path| path.display().to_string())
        .map_err(|_| ClusterError::ToolNotFound {
            tool: tool.to_string(),
            env_var: tool_env_var(tool),
        })
}

/// Tool names
pub mod tools {
    pub const KUBECTL: &str = "kubectl";
    pub const MINIKUBE: &str = "minikube";
}
