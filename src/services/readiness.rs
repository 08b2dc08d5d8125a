//! Readiness gate: database availability and Keycloak pod readiness.
//!
//! Both waits run one after the other and degrade to warnings on timeout.

use tracing::{info, warn};

use crate::config::DeployConfig;
use crate::domain::ReadinessStatus;
use crate::infrastructure::{ClusterControl, ResourceRef, WaitTarget};

/// Outcome of both readiness waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub database: ReadinessStatus,
    pub workload_pods: ReadinessStatus,
}

pub async fn await_readiness<C: ClusterControl>(cluster: &C, config: &DeployConfig) -> Readiness {
    let namespace = config.namespace.as_deref();

    let database = WaitTarget::Resource(
        ResourceRef::new("deployment", config.resources.database_deployment.as_str())
            .in_namespace(namespace),
    );
    info!("⏳ Waiting for database ({})...", database);
    let database = wait(
        cluster,
        &database,
        "available",
        config.timing.database_timeout,
        "Database",
    )
    .await;

    let pods = WaitTarget::pods(config.resources.workload_selector.as_str(), namespace);
    info!("⏳ Waiting for Keycloak pods ({})...", pods);
    let workload_pods = wait(
        cluster,
        &pods,
        "ready",
        config.timing.workload_timeout,
        "Keycloak pods",
    )
    .await;

    Readiness {
        database,
        workload_pods,
    }
}

async fn wait<C: ClusterControl>(
    cluster: &C,
    target: &WaitTarget,
    condition: &str,
    timeout: std::time::Duration,
    label: &str,
) -> ReadinessStatus {
    match cluster.wait(target, condition, timeout).await {
        Ok(()) => {
            info!("✅ {} ready", label);
            ReadinessStatus::Ready
        }
        Err(e) => {
            warn!("⚠️  {} not ready, continuing: {}", label, e);
            ReadinessStatus::TimedOut
        }
    }
}
