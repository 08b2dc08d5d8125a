//! CLI definitions for keycloak-deploy
//!
//! This module contains the argument parsing structure using clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "keycloak-deploy",
    version,
    about = "Deploy Keycloak to a Minikube cluster",
    long_about = "Applies the Keycloak workload and ingress manifests for an environment,\nrepairs the ingress controller when the ingress is rejected, waits for\nreadiness and prints the access URLs."
)]
pub struct Cli {
    /// Target environment (configured names, e.g. homolog or production)
    #[arg(long = "env", value_name = "NAME")]
    pub environment: String,

    /// Delete and recreate existing resources instead of updating in place
    #[arg(long)]
    pub force: bool,

    /// Config file (defaults to deploy.yaml in the working directory)
    #[arg(long, env = "KEYCLOAK_DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory that manifest paths are relative to
    #[arg(long, default_value = ".")]
    pub working_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
