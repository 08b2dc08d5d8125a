//! In-memory cluster for reconciler tests.
//!
//! Records every call in order and fails applies/waits as scripted.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use super::{AddonControl, ClusterControl, ResourceRef, WaitTarget};
use crate::error::ClusterError;

/// A recorded capability call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Apply(PathBuf),
    Delete(String),
    Get(String),
    Wait(String),
    PodPhases(String),
    Address,
    AddonStatus(String),
    AddonEnable(String),
    AddonDisable(String),
}

pub struct FakeCluster {
    calls: Mutex<Vec<Call>>,
    existing: Mutex<HashSet<String>>,
    address: Option<String>,
    workload_manifest: Option<PathBuf>,
    workload_failures: Mutex<u32>,
    ingress_failures: Mutex<u32>,
    failing_waits: HashSet<String>,
    addon_enabled: Mutex<bool>,
    addon_enable_fails: bool,
    controller_phases: Vec<String>,
    /// Contents of each ingress manifest at apply time
    applied_ingress: Mutex<Vec<String>>,
}

impl FakeCluster {
    /// Empty cluster answering `address` to address lookups
    pub fn new(address: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            existing: Mutex::new(HashSet::new()),
            address: Some(address.to_string()),
            workload_manifest: None,
            workload_failures: Mutex::new(0),
            ingress_failures: Mutex::new(0),
            failing_waits: HashSet::new(),
            addon_enabled: Mutex::new(true),
            addon_enable_fails: false,
            controller_phases: vec!["Running".to_string()],
            applied_ingress: Mutex::new(Vec::new()),
        }
    }

    /// Builder: address lookup fails
    pub fn unreachable(mut self) -> Self {
        self.address = None;
        self
    }

    /// Builder: mark `kind/name` as present
    pub fn with_existing(self, resource: &str) -> Self {
        self.existing.lock().unwrap().insert(resource.to_string());
        self
    }

    /// Builder: applies of this path are workload applies; all others are ingress
    pub fn with_workload_manifest(mut self, path: &Path) -> Self {
        self.workload_manifest = Some(path.to_path_buf());
        self
    }

    /// Builder: the next `n` workload applies fail
    pub fn failing_workload_applies(self, n: u32) -> Self {
        *self.workload_failures.lock().unwrap() = n;
        self
    }

    /// Builder: the next `n` ingress applies fail
    pub fn failing_ingress_applies(self, n: u32) -> Self {
        *self.ingress_failures.lock().unwrap() = n;
        self
    }

    /// Builder: waits on `target` (its Display form) time out
    pub fn failing_wait(mut self, target: &str) -> Self {
        self.failing_waits.insert(target.to_string());
        self
    }

    pub fn with_addon_enabled(self, enabled: bool) -> Self {
        *self.addon_enabled.lock().unwrap() = enabled;
        self
    }

    /// Builder: every add-on enable fails and leaves the add-on as it was
    pub fn failing_addon_enable(mut self) -> Self {
        self.addon_enable_fails = true;
        self
    }

    pub fn with_controller_phases(mut self, phases: &[&str]) -> Self {
        self.controller_phases = phases.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete(resource) => Some(resource),
                _ => None,
            })
            .collect()
    }

    pub fn workload_applies(&self) -> usize {
        self.applies().filter(|path| self.is_workload(path)).count()
    }

    pub fn ingress_applies(&self) -> Vec<PathBuf> {
        self.applies().filter(|path| !self.is_workload(path)).collect()
    }

    pub fn applied_ingress(&self) -> Vec<String> {
        self.applied_ingress.lock().unwrap().clone()
    }

    /// Number of repair actions, counted by their opening add-on probe
    pub fn repairs(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::AddonStatus(_)))
            .count()
    }

    /// Position of the first call matching `pred`
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(pred)
    }

    fn applies(&self) -> impl Iterator<Item = PathBuf> {
        self.calls().into_iter().filter_map(|call| match call {
            Call::Apply(path) => Some(path),
            _ => None,
        })
    }

    fn is_workload(&self, path: &Path) -> bool {
        self.workload_manifest.as_deref() == Some(path)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn take_failure(counter: &Mutex<u32>) -> bool {
        let mut remaining = counter.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            true
        } else {
            false
        }
    }
}

impl ClusterControl for FakeCluster {
    async fn apply(&self, manifest: &Path) -> Result<(), ClusterError> {
        self.record(Call::Apply(manifest.to_path_buf()));

        let failing = if self.is_workload(manifest) {
            Self::take_failure(&self.workload_failures)
        } else {
            let content = std::fs::read_to_string(manifest).unwrap_or_default();
            self.applied_ingress.lock().unwrap().push(content);
            Self::take_failure(&self.ingress_failures)
        };

        if failing {
            Err(ClusterError::ApplyFailed {
                manifest: manifest.to_path_buf(),
                message: "admission webhook denied the request".to_string(),
            })
        } else {
            Ok(())
        }
    }

    async fn delete(
        &self,
        resource: &ResourceRef,
        ignore_missing: bool,
    ) -> Result<(), ClusterError> {
        let key = resource.to_string();
        self.record(Call::Delete(key.clone()));
        let removed = self.existing.lock().unwrap().remove(&key);
        if removed || ignore_missing {
            Ok(())
        } else {
            Err(ClusterError::CommandFailed {
                command: format!("kubectl delete {}", key),
                stderr: "NotFound".to_string(),
            })
        }
    }

    async fn get(&self, resource: &ResourceRef) -> Result<bool, ClusterError> {
        let key = resource.to_string();
        self.record(Call::Get(key.clone()));
        Ok(self.existing.lock().unwrap().contains(&key))
    }

    async fn wait(
        &self,
        target: &WaitTarget,
        condition: &str,
        timeout: Duration,
    ) -> Result<(), ClusterError> {
        let key = target.to_string();
        self.record(Call::Wait(key.clone()));
        if self.failing_waits.contains(&key) {
            Err(ClusterError::ReadinessTimeout {
                target: key,
                condition: condition.to_string(),
                timeout_secs: timeout.as_secs(),
            })
        } else {
            Ok(())
        }
    }

    async fn pod_phases(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<String>, ClusterError> {
        self.record(Call::PodPhases(format!("{}/{}", namespace, selector)));
        Ok(self.controller_phases.clone())
    }

    async fn cluster_address(&self) -> Result<String, ClusterError> {
        self.record(Call::Address);
        self.address
            .clone()
            .ok_or_else(|| ClusterError::AddressLookup {
                message: "minikube host is not running".to_string(),
            })
    }
}

impl AddonControl for FakeCluster {
    async fn is_enabled(&self, addon: &str) -> Result<bool, ClusterError> {
        self.record(Call::AddonStatus(addon.to_string()));
        Ok(*self.addon_enabled.lock().unwrap())
    }

    async fn enable(&self, addon: &str) -> Result<(), ClusterError> {
        self.record(Call::AddonEnable(addon.to_string()));
        if self.addon_enable_fails {
            return Err(ClusterError::CommandFailed {
                command: format!("minikube addons enable {}", addon),
                stderr: "timed out waiting for the pods to be ready".to_string(),
            });
        }
        *self.addon_enabled.lock().unwrap() = true;
        Ok(())
    }

    async fn disable(&self, addon: &str) -> Result<(), ClusterError> {
        self.record(Call::AddonDisable(addon.to_string()));
        *self.addon_enabled.lock().unwrap() = false;
        Ok(())
    }
}
