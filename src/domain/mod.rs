//! Domain layer - pure deployment logic
//!
//! This module contains types and functions with no cluster I/O.
//! Everything here can be unit tested without a fake cluster.

pub mod ingress;
pub mod outcome;
pub mod target;

// Re-export commonly used types
pub use ingress::ResolvedIngressManifest;
pub use outcome::{IngressApplyState, ReadinessStatus, ReconciliationOutcome, WorkloadAction};
pub use target::{resolve_target, DeploymentTarget};
