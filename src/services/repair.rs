//! Ingress controller repair
//!
//! Best-effort self-healing run between failed ingress applies. Ingress
//! applies usually fail because the add-on is off, the controller pod is not
//! running yet, or the admission webhook points at a service that does not
//! exist. Every failure in here is logged and swallowed.
//! A failing step never skips the steps after it.
//!
//! Not safe to run concurrently with itself: it toggles the add-on.

use std::time::Duration;
use tracing::{info, warn};

use crate::config::IngressConfig;
use crate::error::ClusterError;
use crate::infrastructure::{AddonControl, ClusterControl, ResourceRef, WaitTarget};

/// What a repair pass changed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepairSummary {
    pub enabled_addon: bool,
    pub restarted_addon: bool,
    /// The admission webhook was deleted; ingress validation stays off
    /// until the add-on is re-enabled cleanly
    pub removed_webhook: bool,
}

/// Run one repair pass, never failing.
///
/// Steps run independently: a failed step is logged and the next one still
/// runs, and the summary reflects only the steps that took effect.
pub async fn repair_ingress_controller<C, A>(
    cluster: &C,
    addons: &A,
    ingress: &IngressConfig,
    ready_timeout: Duration,
) -> RepairSummary
where
    C: ClusterControl,
    A: AddonControl,
{
    info!("🔧 Checking ingress controller health...");
    let mut summary = RepairSummary::default();
    let addon = ingress.addon.as_str();

    if logged("Add-on status lookup", addons.is_enabled(addon).await) == Some(false) {
        info!("   Add-on '{}' is disabled, enabling", addon);
        if logged("Add-on enable", addons.enable(addon).await).is_some() {
            summary.enabled_addon = true;
            wait_for_controller(cluster, ingress, ready_timeout).await;
        }
    }

    // Cluster scoped
    let webhook = ResourceRef::new("validatingwebhookconfiguration", ingress.webhook.as_str());
    if logged("Webhook lookup", cluster.get(&webhook).await) != Some(true) {
        return summary;
    }

    let phases = logged(
        "Controller pod lookup",
        cluster
            .pod_phases(&ingress.controller_namespace, &ingress.controller_selector)
            .await,
    );
    if let Some(phases) = phases.filter(|phases| !phases.iter().any(|phase| phase == "Running")) {
        warn!(
            "   Ingress controller not running (phases: {:?}), restarting add-on",
            phases
        );
        logged("Add-on disable", addons.disable(addon).await);
        if logged("Add-on enable", addons.enable(addon).await).is_some() {
            summary.restarted_addon = true;
            wait_for_controller(cluster, ingress, ready_timeout).await;
        } else {
            warn!("⚠️  Add-on '{}' may be left disabled", addon);
        }
    }

    let service = ResourceRef::new("service", ingress.webhook_service.as_str())
        .in_namespace(Some(ingress.controller_namespace.as_str()));
    if logged("Admission service lookup", cluster.get(&service).await) == Some(false) {
        warn!(
            "⚠️  Admission service {} is missing; deleting webhook {} (ingress validation disabled until the add-on is re-enabled)",
            service, webhook
        );
        if logged("Webhook delete", cluster.delete(&webhook, true).await).is_some() {
            summary.removed_webhook = true;
        }
    }

    summary
}

/// Log a failed step and turn it into `None`
fn logged<T>(step: &str, result: Result<T, ClusterError>) -> Option<T> {
    result
        .map_err(|e| warn!("⚠️  {} failed (non-fatal): {}", step, e))
        .ok()
}

async fn wait_for_controller<C: ClusterControl>(
    cluster: &C,
    ingress: &IngressConfig,
    timeout: Duration,
) {
    let target = WaitTarget::pods(
        ingress.controller_selector.as_str(),
        Some(ingress.controller_namespace.as_str()),
    );
    info!("   Waiting for ingress controller pod to become ready...");
    match cluster.wait(&target, "ready", timeout).await {
        Ok(()) => info!("   Ingress controller ready"),
        Err(e) => warn!("⚠️  Ingress controller not ready: {}", e),
    }
}
