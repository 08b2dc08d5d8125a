use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{Api, ListParams},
    Client, Config,
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PodStatus {
    pub name: String,
    pub phase: String,
    pub ready: bool,
    /// Waiting/terminated reason of the first container, if any
    pub reason: Option<String>,
    pub restart_count: i32,
}

/// Create Kubernetes client
pub async fn create_client() -> Result<Client> {
    let config = Config::infer()
        .await
        .context("Failed to infer kubeconfig")?;

    Client::try_from(config).context("Failed to create Kubernetes client")
}

/// Get pod statuses with label selector
///
/// `namespace: None` uses the kubeconfig's default namespace.
pub async fn get_pod_statuses(
    client: &Client,
    namespace: Option<&str>,
    label_selector: &str,
) -> Result<Vec<PodStatus>> {
    let pods: Api<Pod> = match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::default_namespaced(client.clone()),
    };

    let lp = ListParams::default().labels(label_selector);

    let pod_list = pods.list(&lp).await.context("Failed to list pods")?;
    debug!("Found {} pods for {}", pod_list.items.len(), label_selector);

    let mut statuses: Vec<PodStatus> = pod_list.into_iter().map(pod_status).collect();

    // Sort by name
    statuses.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(statuses)
}

fn pod_status(pod: Pod) -> PodStatus {
    let name = pod.metadata.name.unwrap_or_else(|| "unknown".to_string());

    let phase = pod
        .status
        .as_ref()
        .and_then(|s| s.phase.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let container = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.as_ref())
        .and_then(|cs| cs.first());

    let ready = container.map(|c| c.ready).unwrap_or(false);
    let restart_count = container.map(|c| c.restart_count).unwrap_or(0);

    let reason = container
        .and_then(|c| c.state.as_ref())
        .and_then(|state| {
            state
                .waiting
                .as_ref()
                .and_then(|w| w.reason.clone())
                .or_else(|| state.terminated.as_ref().and_then(|t| t.reason.clone()))
        });

    PodStatus {
        name,
        phase,
        ready,
        reason,
        restart_count,
    }
}

/// Check if a pod is in a bad state
pub fn is_bad_state(pod: &PodStatus) -> bool {
    matches!(
        pod.reason.as_deref(),
        Some(
            "CrashLoopBackOff"
                | "ImagePullBackOff"
                | "ErrImagePull"
                | "CreateContainerConfigError"
                | "InvalidImageName"
                | "CreateContainerError"
                | "RunContainerError"
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{
        ContainerState, ContainerStateWaiting, ContainerStatus, PodStatus as K8sPodStatus,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn pod(name: &str, phase: &str, ready: bool, waiting: Option<&str>) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: None,
            status: Some(K8sPodStatus {
                phase: Some(phase.to_string()),
                container_statuses: Some(vec![ContainerStatus {
                    name: "keycloak".to_string(),
                    ready,
                    restart_count: 2,
                    state: waiting.map(|reason| ContainerState {
                        waiting: Some(ContainerStateWaiting {
                            reason: Some(reason.to_string()),
                            message: None,
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_pod_status_ready() {
        let status = pod_status(pod("keycloak-0", "Running", true, None));
        assert_eq!(status.name, "keycloak-0");
        assert!(status.ready);
        assert_eq!(status.restart_count, 2);
        assert!(!is_bad_state(&status));
    }

    #[test]
    fn test_pod_status_crashloop() {
        let status = pod_status(pod("keycloak-1", "Running", false, Some("CrashLoopBackOff")));
        assert_eq!(status.reason.as_deref(), Some("CrashLoopBackOff"));
        assert!(is_bad_state(&status));
    }

    #[test]
    fn test_container_creating_is_not_bad() {
        let status = pod_status(pod("keycloak-2", "Pending", false, Some("ContainerCreating")));
        assert!(!is_bad_state(&status));
    }
}
