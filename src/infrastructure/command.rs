//! External command execution shared by the kubectl and minikube adapters.

use tokio::process::Command;
use tracing::debug;

use crate::error::ClusterError;

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run a command to completion, capturing stdout/stderr.
///
/// A non-zero exit is reported through `success`, not as an error.
pub async fn run(program: &str, args: &[String]) -> Result<CommandOutput, ClusterError> {
    let rendered = render(program, args);
    debug!("$ {}", rendered);

    // Dropping the future (Ctrl-C) must not leave the child running
    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ClusterError::SpawnFailed {
            command: rendered.clone(),
            message: e.to_string(),
        })?;

    let result = CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };

    if !result.success {
        debug!(
            "`{}` exited with {:?}: {}",
            rendered,
            output.status.code(),
            result.stderr
        );
    }

    Ok(result)
}

/// Run a command and fail on non-zero exit, returning trimmed stdout
pub async fn run_checked(program: &str, args: &[String]) -> Result<String, ClusterError> {
    let output = run(program, args).await?;
    if output.success {
        Ok(output.stdout)
    } else {
        Err(ClusterError::CommandFailed {
            command: render(program, args),
            stderr: output.stderr,
        })
    }
}

/// Human-readable command line for logs and errors
pub fn render(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
