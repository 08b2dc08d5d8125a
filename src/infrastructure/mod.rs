//! Infrastructure layer - external I/O adapters
//!
//! This module contains all code that interacts with external systems:
//! - Cluster control via `kubectl`
//! - Add-on control and cluster address via `minikube`
//!
//! The reconciler only sees the [`ClusterControl`] and [`AddonControl`]
//! capabilities, so tests swap in [`fake::FakeCluster`].

pub mod command;
#[cfg(test)]
pub mod fake;
pub mod kubectl;
pub mod minikube;

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::ClusterError;

// Re-export commonly used types
pub use kubectl::KubectlClient;
pub use minikube::MinikubeClient;

/// A named cluster resource, e.g. `statefulset/keycloak`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: String,
    pub name: String,
    /// `None` uses the current context namespace (or is cluster scoped)
    pub namespace: Option<String>,
}

impl ResourceRef {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: None,
        }
    }

    /// Builder: set namespace
    pub fn in_namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace.map(str::to_string);
        self
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// What a readiness wait blocks on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitTarget {
    /// A single named resource
    Resource(ResourceRef),
    /// Every resource of `kind` matching a label selector
    Selector {
        kind: String,
        selector: String,
        namespace: Option<String>,
    },
}

impl WaitTarget {
    pub fn pods(selector: impl Into<String>, namespace: Option<&str>) -> Self {
        Self::Selector {
            kind: "pod".to_string(),
            selector: selector.into(),
            namespace: namespace.map(str::to_string),
        }
    }
}

impl fmt::Display for WaitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(resource) => fmt::Display::fmt(resource, f),
            Self::Selector { kind, selector, .. } => write!(f, "{} -l {}", kind, selector),
        }
    }
}

/// Cluster control capability (apply/delete/get/wait/address)
///
/// Every call blocks until the external system answers or its own timeout
/// fires; implementations do not retry.
#[allow(async_fn_in_trait)]
pub trait ClusterControl {
    /// Apply a manifest file
    async fn apply(&self, manifest: &Path) -> Result<(), ClusterError>;

    /// Delete a resource, optionally tolerating its absence
    async fn delete(&self, resource: &ResourceRef, ignore_missing: bool)
        -> Result<(), ClusterError>;

    /// Look a resource up; `Ok(false)` when it does not exist
    async fn get(&self, resource: &ResourceRef) -> Result<bool, ClusterError>;

    /// Block until `condition` holds for `target` or `timeout` elapses
    async fn wait(
        &self,
        target: &WaitTarget,
        condition: &str,
        timeout: Duration,
    ) -> Result<(), ClusterError>;

    /// Phases (`Running`, `Pending`, ...) of pods matching a selector
    async fn pod_phases(&self, namespace: &str, selector: &str)
        -> Result<Vec<String>, ClusterError>;

    /// Externally reachable cluster IP
    async fn cluster_address(&self) -> Result<String, ClusterError>;
}

/// Add-on control capability (list/enable/disable)
#[allow(async_fn_in_trait)]
pub trait AddonControl {
    async fn is_enabled(&self, addon: &str) -> Result<bool, ClusterError>;

    async fn enable(&self, addon: &str) -> Result<(), ClusterError>;

    async fn disable(&self, addon: &str) -> Result<(), ClusterError>;
}
