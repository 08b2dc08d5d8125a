//! Minikube add-on control and node address lookup.

use std::net::IpAddr;
use tracing::info;

use super::command::run_checked;
use super::AddonControl;
use crate::error::ClusterError;

/// `minikube`-backed implementation of [`AddonControl`]
pub struct MinikubeClient {
    /// Path to the minikube binary
    minikube: String,
}

impl MinikubeClient {
    pub fn new(minikube: impl Into<String>) -> Self {
        Self {
            minikube: minikube.into(),
        }
    }

    /// Node IP from `minikube ip`
    pub async fn ip(&self) -> Result<String, ClusterError> {
        let stdout = run_checked(&self.minikube, &["ip".to_string()])
            .await
            .map_err(|e| ClusterError::AddressLookup {
                message: e.to_string(),
            })?;
        parse_ip(&stdout)
    }
}

/// `minikube ip` may print warnings before the address; take the last line
fn parse_ip(stdout: &str) -> Result<String, ClusterError> {
    let candidate = stdout.lines().last().unwrap_or_default().trim();
    candidate
        .parse::<IpAddr>()
        .map(|ip| ip.to_string())
        .map_err(|_| ClusterError::AddressLookup {
            message: format!("unexpected `minikube ip` output: {:?}", stdout),
        })
}

/// Look an add-on up in `minikube addons list -o json`.
///
/// Shape: `{"ingress": {"Profile": "minikube", "Status": "enabled"}, ...}`
fn addon_enabled(json: &str, addon: &str) -> Result<bool, ClusterError> {
    let list: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ClusterError::AddonList {
            message: e.to_string(),
        })?;

    Ok(list
        .get(addon)
        .and_then(|entry| entry.get("Status"))
        .and_then(|status| status.as_str())
        .map(|status| status.eq_ignore_ascii_case("enabled"))
        .unwrap_or(false))
}

impl AddonControl for MinikubeClient {
    async fn is_enabled(&self, addon: &str) -> Result<bool, ClusterError> {
        let args = vec![
            "addons".to_string(),
            "list".to_string(),
            "-o".to_string(),
            "json".to_string(),
        ];
        let stdout = run_checked(&self.minikube, &args).await?;
        addon_enabled(&stdout, addon)
    }

    async fn enable(&self, addon: &str) -> Result<(), ClusterError> {
        info!("Enabling minikube add-on '{}'", addon);
        let args = vec!["addons".to_string(), "enable".to_string(), addon.to_string()];
        run_checked(&self.minikube, &args).await.map(|_| ())
    }

    async fn disable(&self, addon: &str) -> Result<(), ClusterError> {
        info!("Disabling minikube add-on '{}'", addon);
        let args = vec!["addons".to_string(), "disable".to_string(), addon.to_string()];
        run_checked(&self.minikube, &args).await.map(|_| ())
    }
}
