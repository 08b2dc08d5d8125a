use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::DeployConfig;
use crate::domain::{resolve_target, ReconciliationOutcome};
use crate::infrastructure::{AddonControl, ClusterControl, KubectlClient, MinikubeClient};
use crate::k8s::{self, PodStatus};
use crate::services::{report, DeployOptions, Reconciler};
use crate::tools::{resolve_tool, tools};
use crate::ui;

/// Everything the deploy command needs from the command line
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub environment: String,
    pub options: DeployOptions,
    pub config_path: Option<PathBuf>,
    pub working_dir: PathBuf,
}

pub async fn execute(request: DeployRequest) -> Result<ReconciliationOutcome> {
    execute_with(request, connect).await
}

/// Run a deployment pass with clients built by `connect`.
///
/// `connect` is only called once the configuration and target resolved, so
/// a bad environment or manifest never reaches a tool or the cluster.
async fn execute_with<C, A, F>(request: DeployRequest, connect: F) -> Result<ReconciliationOutcome>
where
    C: ClusterControl,
    A: AddonControl,
    F: FnOnce(&DeployConfig) -> Result<(C, A)>,
{
    let config = DeployConfig::load(request.config_path.as_deref(), &request.working_dir)
        .context("Failed to load configuration")?;

    let target = resolve_target(&config, &request.environment, &request.working_dir)?;

    ui::print_header(&format!("Keycloak Deploy - {}", target.environment));
    info!("🎯 Environment: {}", target.environment);
    info!("📄 Workload: {}", target.workload_manifest.display());
    info!("📄 Ingress: {}", target.ingress_manifest.display());
    if request.options.force_recreate {
        info!("♻️  Force recreate enabled");
    }
    println!();

    let (cluster, addons) = connect(&config)?;
    let reconciler = Reconciler::new(&cluster, &addons, &config);

    // Ctrl-C drops the pass, which cancels any pause and removes the scratch file
    let outcome = tokio::select! {
        outcome = reconciler.run(&target, request.options) => {
            outcome.context("Deployment aborted")?
        }
        _ = tokio::signal::ctrl_c() => {
            anyhow::bail!("Interrupted; cluster may be partially updated");
        }
    };

    report::print_report(&outcome, &config);

    match fetch_pods(&config).await {
        Ok(pods) => report::print_pods(&pods),
        Err(e) => warn!("⚠️  Could not fetch pod status (non-fatal): {:#}", e),
    }

    Ok(outcome)
}

/// Resolve `kubectl` and `minikube` and build the real clients
fn connect(config: &DeployConfig) -> Result<(KubectlClient, MinikubeClient)> {
    let kubectl = resolve_tool(tools::KUBECTL)?;
    let minikube = resolve_tool(tools::MINIKUBE)?;

    let addons = MinikubeClient::new(minikube.as_str());
    let cluster = KubectlClient::new(kubectl, MinikubeClient::new(minikube))
        .with_namespace(config.namespace.clone());
    Ok((cluster, addons))
}

async fn fetch_pods(config: &DeployConfig) -> Result<Vec<PodStatus>> {
    let client = k8s::create_client().await?;
    k8s::get_pod_statuses(
        &client,
        config.namespace.as_deref(),
        &config.resources.workload_selector,
    )
    .await
}
