//! Deployment reconciler - orchestrates one deployment pass
//!
//! A pass resolves the cluster address, renders the ingress template,
//! brings the workload onto the cluster, applies the ingress through the
//! retry-with-repair loop and finally waits for readiness.
//!
//! Cluster mutations are not transactional: a failure between a delete and
//! the following apply leaves the cluster in between and nothing is rolled
//! back. Failed applies are logged and recorded in the outcome; only address
//! lookup and template rendering abort the pass.

use tracing::{error, info, warn};

use crate::config::DeployConfig;
use crate::domain::{
    DeploymentTarget, IngressApplyState, ReconciliationOutcome, ResolvedIngressManifest,
    WorkloadAction,
};
use crate::error::DeployError;
use crate::infrastructure::{AddonControl, ClusterControl, ResourceRef};
use crate::services::readiness::await_readiness;
use crate::services::repair::repair_ingress_controller;
use crate::ui;

/// Result of the retry-with-repair loop
struct IngressRun {
    state: IngressApplyState,
    repairs: u32,
    webhook_removed: bool,
}

/// Per-invocation switches from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Delete and recreate the whole stack when it already exists
    pub force_recreate: bool,
}

/// Reconciler for the Keycloak stack
pub struct Reconciler<'a, C, A> {
    cluster: &'a C,
    addons: &'a A,
    config: &'a DeployConfig,
}

impl<'a, C, A> Reconciler<'a, C, A>
where
    C: ClusterControl,
    A: AddonControl,
{
    pub fn new(cluster: &'a C, addons: &'a A, config: &'a DeployConfig) -> Self {
        Self {
            cluster,
            addons,
            config,
        }
    }

    /// Execute one deployment pass for `target`
    pub async fn run(
        &self,
        target: &DeploymentTarget,
        options: DeployOptions,
    ) -> Result<ReconciliationOutcome, DeployError> {
        info!("🌐 Resolving cluster address...");
        let address = self.cluster.cluster_address().await?;
        info!("   Cluster address: {}", address);

        // Scratch file lives until the end of this function
        let ingress = ResolvedIngressManifest::materialize(
            &target.ingress_manifest,
            &self.config.ingress,
            &address,
        )?;
        info!("   Ingress host: {}", ingress.host());

        let workload = self.apply_workload(target, options).await;
        let ingress_run = self.apply_ingress(&ingress).await;
        let readiness = await_readiness(self.cluster, self.config).await;

        Ok(ReconciliationOutcome {
            environment: target.environment.clone(),
            host: ingress.host().to_string(),
            workload,
            ingress: ingress_run.state,
            ingress_template: ingress.template().to_path_buf(),
            repairs: ingress_run.repairs,
            webhook_removed: ingress_run.webhook_removed,
            database: readiness.database,
            workload_pods: readiness.workload_pods,
        })
    }

    fn resource(&self, kind: &str, name: &str) -> ResourceRef {
        ResourceRef::new(kind, name).in_namespace(self.config.namespace.as_deref())
    }

    fn workload_resource(&self) -> ResourceRef {
        self.resource("statefulset", &self.config.resources.workload)
    }

    fn primary_service(&self) -> ResourceRef {
        self.resource("service", &self.config.resources.service)
    }

    fn ingress_resource(&self) -> ResourceRef {
        self.resource("ingress", &self.config.resources.ingress)
    }

    /// Everything removed by a forced recreate, in deletion order
    fn recreate_set(&self) -> Vec<ResourceRef> {
        let names = &self.config.resources;
        vec![
            self.primary_service(),
            self.resource("service", &names.discovery_service),
            self.workload_resource(),
            self.resource("deployment", &names.database_deployment),
            self.resource("service", &names.database_service),
            self.ingress_resource(),
        ]
    }

    async fn workload_exists(&self) -> bool {
        let workload = self.workload_resource();
        match self.cluster.get(&workload).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!("⚠️  Could not look up {}, treating as absent: {}", workload, e);
                false
            }
        }
    }

    async fn apply_workload(
        &self,
        target: &DeploymentTarget,
        options: DeployOptions,
    ) -> WorkloadAction {
        if !self.workload_exists().await {
            info!("📦 No existing deployment, applying workload manifest...");
            return self
                .apply_or_log(target, WorkloadAction::Applied)
                .await;
        }

        if options.force_recreate {
            self.recreate(target).await
        } else {
            self.update(target).await
        }
    }

    async fn recreate(&self, target: &DeploymentTarget) -> WorkloadAction {
        info!("♻️  Existing deployment found, force-recreating...");
        for resource in self.recreate_set() {
            info!("   Deleting {}", resource);
            if let Err(e) = self.cluster.delete(&resource, true).await {
                warn!("⚠️  Failed to delete {}: {}", resource, e);
            }
        }

        ui::pause(
            self.config.timing.force_quiescence,
            "Waiting for resources to terminate",
        )
        .await;

        self.apply_or_log(target, WorkloadAction::Recreated).await
    }

    async fn update(&self, target: &DeploymentTarget) -> WorkloadAction {
        info!("🔄 Existing deployment found, updating in place...");

        let ingress = self.ingress_resource();
        if let Err(e) = self.cluster.delete(&ingress, true).await {
            warn!("⚠️  Failed to delete {}: {}", ingress, e);
        }

        ui::pause(
            self.config.timing.update_quiescence,
            "Waiting for ingress removal",
        )
        .await;

        match self.cluster.apply(&target.workload_manifest).await {
            Ok(()) => {
                info!("✅ Workload updated");
                WorkloadAction::Updated
            }
            Err(e) => {
                // Immutable service fields are the usual culprit
                warn!("⚠️  Workload apply failed, recreating service: {}", e);
                let service = self.primary_service();
                if let Err(e) = self.cluster.delete(&service, true).await {
                    warn!("⚠️  Failed to delete {}: {}", service, e);
                }
                self.apply_or_log(target, WorkloadAction::UpdatedViaFallback)
                    .await
            }
        }
    }

    async fn apply_or_log(
        &self,
        target: &DeploymentTarget,
        on_success: WorkloadAction,
    ) -> WorkloadAction {
        match self.cluster.apply(&target.workload_manifest).await {
            Ok(()) => {
                info!("✅ Workload {}", on_success.name());
                on_success
            }
            Err(e) => {
                error!("❌ Workload apply failed: {}", e);
                WorkloadAction::Failed
            }
        }
    }

    /// Apply the rendered ingress, repairing the controller between attempts.
    ///
    /// Never more than `max_attempts` applies; no repair after the last one.
    async fn apply_ingress(&self, ingress: &ResolvedIngressManifest) -> IngressRun {
        let max_attempts = self.config.retry.max_attempts;
        let mut state = IngressApplyState::NotAttempted.begin();
        let mut repairs = 0;
        let mut webhook_removed = false;

        while let IngressApplyState::Attempting(attempt) = state {
            info!(
                "🌍 Applying ingress (attempt {}/{})...",
                attempt, max_attempts
            );

            match self.cluster.apply(ingress.path()).await {
                Ok(()) => {
                    state = state.record(true, max_attempts);
                    info!("✅ Ingress applied for {}", ingress.host());
                }
                Err(e) => {
                    state = state.record(false, max_attempts);
                    if state.is_terminal() {
                        error!("❌ Ingress apply attempt {} failed: {}", attempt, e);
                        break;
                    }

                    warn!("⚠️  Ingress apply attempt {} failed: {}", attempt, e);
                    ui::pause(
                        self.config.retry.backoff,
                        "Backing off before ingress controller repair",
                    )
                    .await;
                    let summary = repair_ingress_controller(
                        self.cluster,
                        self.addons,
                        &self.config.ingress,
                        self.config.timing.controller_ready_timeout,
                    )
                    .await;
                    if summary.enabled_addon || summary.restarted_addon {
                        info!("   Ingress add-on restarted");
                    }
                    webhook_removed |= summary.removed_webhook;
                    repairs += 1;
                }
            }
        }

        if let IngressApplyState::ExhaustedFailure(attempts) = state {
            error!(
                "❌ Ingress not applied after {} attempts; apply {} manually with host {}",
                attempts,
                ingress.template().display(),
                ingress.host()
            );
        }

        IngressRun {
            state,
            repairs,
            webhook_removed,
        }
    }
}
