//! Target resolution: environment name to manifest paths.

use std::path::{Path, PathBuf};

use crate::config::DeployConfig;
use crate::error::TargetError;

/// Selected environment and its manifests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub environment: String,
    pub workload_manifest: PathBuf,
    pub ingress_manifest: PathBuf,
}

/// Resolve an environment name against the configured set.
///
/// Relative manifest paths are joined onto `working_dir`. Only the workload
/// manifest is checked here; the ingress template is read when it is rendered.
pub fn resolve_target(
    config: &DeployConfig,
    environment: &str,
    working_dir: &Path,
) -> Result<DeploymentTarget, TargetError> {
    let env = config
        .environments
        .get(environment)
        .ok_or_else(|| TargetError::UnknownEnvironment {
            name: environment.to_string(),
            known: config.environment_names().join(", "),
        })?;

    let workload_manifest = working_dir.join(&env.workload_manifest);
    if !workload_manifest.is_file() {
        return Err(TargetError::ManifestNotFound {
            path: workload_manifest,
        });
    }

    Ok(DeploymentTarget {
        environment: environment.to_string(),
        workload_manifest,
        ingress_manifest: working_dir.join(&env.ingress_manifest),
    })
}
