//! Environment definitions mapping names to manifest paths.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Manifest pair for one deployment environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Workload manifest (database, services, stateful workload)
    pub workload_manifest: PathBuf,

    /// Ingress template containing the host placeholder
    pub ingress_manifest: PathBuf,
}

impl EnvironmentConfig {
    /// Conventional layout: `k8s/{env}/keycloak.yaml` and `k8s/{env}/keycloak-ingress.yaml`
    pub fn conventional(env: &str) -> Self {
        let dir = PathBuf::from("k8s").join(env);
        Self {
            workload_manifest: dir.join("keycloak.yaml"),
            ingress_manifest: dir.join("keycloak-ingress.yaml"),
        }
    }
}

pub(crate) fn default_environments() -> BTreeMap<String, EnvironmentConfig> {
    ["homolog", "production"]
        .into_iter()
        .map(|env| (env.to_string(), EnvironmentConfig::conventional(env)))
        .collect()
}
