//! Reconciliation outcome types
//!
//! Defines the ingress apply retry loop as a state machine with explicit
//! phases, plus the per-pass summary used by the final report.

use std::path::PathBuf;

/// How the workload manifest was brought onto the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadAction {
    /// Nothing existed; applied fresh
    Applied,
    /// Existing stack re-applied in place
    Updated,
    /// In-place apply failed; primary service deleted and apply retried
    UpdatedViaFallback,
    /// Existing stack deleted and applied fresh
    Recreated,
    /// Every apply for this branch failed
    Failed,
}

impl WorkloadAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Updated => "updated",
            Self::UpdatedViaFallback => "updated (service recreated)",
            Self::Recreated => "recreated",
            Self::Failed => "failed",
        }
    }

    pub fn succeeded(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// State of the ingress apply retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngressApplyState {
    NotAttempted,
    /// Attempt `n` (1-based) is about to run
    Attempting(u32),
    /// Applied on attempt `n`
    Succeeded(u32),
    /// All `n` attempts failed
    ExhaustedFailure(u32),
}

impl IngressApplyState {
    /// Enter the first attempt
    pub fn begin(self) -> Self {
        match self {
            Self::NotAttempted => Self::Attempting(1),
            other => other,
        }
    }

    /// Advance after the current attempt reported `success`.
    ///
    /// Terminal states absorb further results.
    pub fn record(self, success: bool, max_attempts: u32) -> Self {
        match self {
            Self::Attempting(n) if success => Self::Succeeded(n),
            Self::Attempting(n) if n >= max_attempts => Self::ExhaustedFailure(n),
            Self::Attempting(n) => Self::Attempting(n + 1),
            other => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::ExhaustedFailure(_))
    }

    /// Attempts made so far (or in progress)
    pub fn attempts(&self) -> u32 {
        match self {
            Self::NotAttempted => 0,
            Self::Attempting(n) | Self::Succeeded(n) | Self::ExhaustedFailure(n) => *n,
        }
    }
}

/// Result of a readiness wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessStatus {
    Ready,
    TimedOut,
}

/// Summary of one deployment pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationOutcome {
    pub environment: String,
    /// Externally reachable ingress host
    pub host: String,
    pub workload: WorkloadAction,
    pub ingress: IngressApplyState,
    /// Ingress template to apply by hand when retries are exhausted
    pub ingress_template: PathBuf,
    /// Number of repair actions run between ingress attempts
    pub repairs: u32,
    /// A repair deleted the ingress admission webhook
    pub webhook_removed: bool,
    pub database: ReadinessStatus,
    pub workload_pods: ReadinessStatus,
}

impl ReconciliationOutcome {
    /// True when every step succeeded without degradation
    pub fn is_clean(&self) -> bool {
        self.workload.succeeded()
            && matches!(self.ingress, IngressApplyState::Succeeded(_))
            && self.database == ReadinessStatus::Ready
            && self.workload_pods == ReadinessStatus::Ready
    }
}
