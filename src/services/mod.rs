//! Services layer - orchestration logic
//!
//! This module coordinates between domain logic and infrastructure.
//! Services only see the capability traits, never a concrete client.

pub mod readiness;
pub mod reconciler;
pub mod repair;
pub mod report;

// Re-export commonly used types
pub use reconciler::{DeployOptions, Reconciler};
