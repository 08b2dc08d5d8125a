//! Cluster control through `kubectl`
//!
//! Every operation shells out once; the cluster address comes from
//! `minikube ip` since the ingress is exposed on the Minikube node.

use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::command::{render, run, run_checked};
use super::{ClusterControl, MinikubeClient, ResourceRef, WaitTarget};
use crate::error::ClusterError;

/// `kubectl`-backed implementation of [`ClusterControl`]
pub struct KubectlClient {
    /// Path to the kubectl binary
    kubectl: String,
    /// Namespace passed to `apply` (resources carry their own)
    namespace: Option<String>,
    minikube: MinikubeClient,
}

impl KubectlClient {
    pub fn new(kubectl: impl Into<String>, minikube: MinikubeClient) -> Self {
        Self {
            kubectl: kubectl.into(),
            namespace: None,
            minikube,
        }
    }

    /// Builder: apply manifests into a namespace
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    fn namespace_args(namespace: Option<&str>) -> Vec<String> {
        namespace
            .map(|ns| vec!["-n".to_string(), ns.to_string()])
            .unwrap_or_default()
    }
}

/// `kubectl get` reports absence on stderr with one of these markers
fn is_not_found(stderr: &str) -> bool {
    stderr.contains("NotFound") || stderr.contains("not found")
}

/// `kubectl wait` prints "timed out waiting for the condition"
fn is_timeout(stderr: &str) -> bool {
    stderr.contains("timed out")
}

fn timeout_arg(timeout: Duration) -> String {
    format!("--timeout={}s", timeout.as_secs().max(1))
}

impl ClusterControl for KubectlClient {
    async fn apply(&self, manifest: &Path) -> Result<(), ClusterError> {
        let mut args = vec![
            "apply".to_string(),
            "-f".to_string(),
            manifest.display().to_string(),
        ];
        args.extend(Self::namespace_args(self.namespace.as_deref()));

        let output = run(&self.kubectl, &args).await?;
        if output.success {
            debug!("{}", output.stdout);
            Ok(())
        } else {
            Err(ClusterError::ApplyFailed {
                manifest: manifest.to_path_buf(),
                message: output.stderr,
            })
        }
    }

    async fn delete(
        &self,
        resource: &ResourceRef,
        ignore_missing: bool,
    ) -> Result<(), ClusterError> {
        let mut args = vec![
            "delete".to_string(),
            resource.kind.clone(),
            resource.name.clone(),
        ];
        args.extend(Self::namespace_args(resource.namespace.as_deref()));
        if ignore_missing {
            args.push("--ignore-not-found".to_string());
        }

        run_checked(&self.kubectl, &args).await.map(|_| ())
    }

    async fn get(&self, resource: &ResourceRef) -> Result<bool, ClusterError> {
        let mut args = vec![
            "get".to_string(),
            resource.kind.clone(),
            resource.name.clone(),
            "-o".to_string(),
            "name".to_string(),
        ];
        args.extend(Self::namespace_args(resource.namespace.as_deref()));

        let output = run(&self.kubectl, &args).await?;
        if output.success {
            Ok(true)
        } else if is_not_found(&output.stderr) {
            Ok(false)
        } else {
            Err(ClusterError::CommandFailed {
                command: render(&self.kubectl, &args),
                stderr: output.stderr,
            })
        }
    }

    async fn wait(
        &self,
        target: &WaitTarget,
        condition: &str,
        timeout: Duration,
    ) -> Result<(), ClusterError> {
        let mut args = vec!["wait".to_string(), format!("--for=condition={}", condition)];
        match target {
            WaitTarget::Resource(resource) => {
                args.push(resource.to_string());
                args.extend(Self::namespace_args(resource.namespace.as_deref()));
            }
            WaitTarget::Selector {
                kind,
                selector,
                namespace,
            } => {
                args.push(kind.clone());
                args.push(format!("--selector={}", selector));
                args.extend(Self::namespace_args(namespace.as_deref()));
            }
        }
        args.push(timeout_arg(timeout));

        let output = run(&self.kubectl, &args).await?;
        if output.success {
            Ok(())
        } else if is_timeout(&output.stderr) {
            Err(ClusterError::ReadinessTimeout {
                target: target.to_string(),
                condition: condition.to_string(),
                timeout_secs: timeout.as_secs(),
            })
        } else {
            Err(ClusterError::CommandFailed {
                command: render(&self.kubectl, &args),
                stderr: output.stderr,
            })
        }
    }

    async fn pod_phases(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<String>, ClusterError> {
        let args = vec![
            "get".to_string(),
            "pods".to_string(),
            "-n".to_string(),
            namespace.to_string(),
            format!("--selector={}", selector),
            "-o".to_string(),
            "jsonpath={.items[*].status.phase}".to_string(),
        ];

        let stdout = run_checked(&self.kubectl, &args).await?;
        Ok(stdout.split_whitespace().map(str::to_string).collect())
    }

    async fn cluster_address(&self) -> Result<String, ClusterError> {
        self.minikube.ip().await
    }
}
