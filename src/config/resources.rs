//! Names of the cluster resources the reconciler touches.

use serde::{Deserialize, Serialize};

/// Resource names and selectors for the Keycloak stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Primary Keycloak service
    #[serde(default = "default_service")]
    pub service: String,

    /// Headless discovery service used for clustering
    #[serde(default = "default_discovery_service")]
    pub discovery_service: String,

    /// Keycloak StatefulSet; its presence marks an existing deployment
    #[serde(default = "default_workload")]
    pub workload: String,

    #[serde(default = "default_database")]
    pub database_deployment: String,

    #[serde(default = "default_database")]
    pub database_service: String,

    #[serde(default = "default_ingress")]
    pub ingress: String,

    /// Label selector for Keycloak pods
    #[serde(default = "default_workload_selector")]
    pub workload_selector: String,
}

fn default_service() -> String {
    "keycloak".to_string()
}

fn default_discovery_service() -> String {
    "keycloak-discovery".to_string()
}

fn default_workload() -> String {
    "keycloak".to_string()
}

fn default_database() -> String {
    "postgres".to_string()
}

fn default_ingress() -> String {
    "keycloak-ingress".to_string()
}

fn default_workload_selector() -> String {
    "app=keycloak".to_string()
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            discovery_service: default_discovery_service(),
            workload: default_workload(),
            database_deployment: default_database(),
            database_service: default_database(),
            ingress: default_ingress(),
            workload_selector: default_workload_selector(),
        }
    }
}

/// Ingress template and ingress-controller add-on settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressConfig {
    /// Token replaced in the ingress template
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Host prefix, e.g. `keycloak` in `keycloak.192.168.49.2.nip.io`
    #[serde(default = "default_subdomain")]
    pub subdomain: String,

    /// Wildcard DNS domain resolving `<anything>.<ip>.<domain>` to `<ip>`
    #[serde(default = "default_wildcard_domain")]
    pub wildcard_domain: String,

    /// Minikube add-on providing the ingress controller
    #[serde(default = "default_addon")]
    pub addon: String,

    #[serde(default = "default_controller_namespace")]
    pub controller_namespace: String,

    #[serde(default = "default_controller_selector")]
    pub controller_selector: String,

    /// ValidatingWebhookConfiguration installed by the add-on
    #[serde(default = "default_webhook")]
    pub webhook: String,

    /// Service backing the admission webhook
    #[serde(default = "default_webhook_service")]
    pub webhook_service: String,
}

fn default_placeholder() -> String {
    "KEYCLOAK_HOST".to_string()
}

fn default_subdomain() -> String {
    "keycloak".to_string()
}

fn default_wildcard_domain() -> String {
    "nip.io".to_string()
}

fn default_addon() -> String {
    "ingress".to_string()
}

fn default_controller_namespace() -> String {
    "ingress-nginx".to_string()
}

fn default_controller_selector() -> String {
    "app.kubernetes.io/component=controller".to_string()
}

fn default_webhook() -> String {
    "ingress-nginx-admission".to_string()
}

fn default_webhook_service() -> String {
    "ingress-nginx-controller-admission".to_string()
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            subdomain: default_subdomain(),
            wildcard_domain: default_wildcard_domain(),
            addon: default_addon(),
            controller_namespace: default_controller_namespace(),
            controller_selector: default_controller_selector(),
            webhook: default_webhook(),
            webhook_service: default_webhook_service(),
        }
    }
}

impl IngressConfig {
    /// Externally reachable host for a cluster address
    pub fn host_for(&self, address: &str) -> String {
        format!("{}.{}.{}", self.subdomain, address, self.wildcard_domain)
    }
}
