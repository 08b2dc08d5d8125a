//! Ingress template rendering
//!
//! The template carries a host placeholder that is replaced with
//! `<subdomain>.<cluster address>.<wildcard domain>`. The rendered manifest
//! lives in a uniquely named scratch file that is removed when the
//! [`ResolvedIngressManifest`] is dropped, so every exit path of a
//! deployment pass (including cancellation) cleans it up.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::IngressConfig;
use crate::error::TargetError;

/// Replace every occurrence of `placeholder` with `host`
pub fn render_template(template: &str, placeholder: &str, host: &str) -> String {
    template.replace(placeholder, host)
}

/// Rendered ingress manifest backed by a scratch file
#[derive(Debug)]
pub struct ResolvedIngressManifest {
    file: NamedTempFile,
    host: String,
    template: PathBuf,
}

impl ResolvedIngressManifest {
    /// Render `template_path` for `address` into a fresh scratch file
    pub fn materialize(
        template_path: &Path,
        ingress: &IngressConfig,
        address: &str,
    ) -> Result<Self, TargetError> {
        let template = std::fs::read_to_string(template_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TargetError::ManifestNotFound {
                path: template_path.to_path_buf(),
            },
            _ => TargetError::ManifestUnreadable {
                path: template_path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let host = ingress.host_for(address);
        let rendered = render_template(&template, &ingress.placeholder, &host);

        let mut file = tempfile::Builder::new()
            .prefix("keycloak-ingress-")
            .suffix(".yaml")
            .tempfile()
            .map_err(|e| TargetError::ScratchFile {
                message: e.to_string(),
            })?;
        file.write_all(rendered.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| TargetError::ScratchFile {
                message: e.to_string(),
            })?;

        debug!("Rendered ingress for {} into {}", host, file.path().display());

        Ok(Self {
            file,
            host,
            template: template_path.to_path_buf(),
        })
    }

    /// Scratch file path handed to `kubectl apply -f`
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Template the manifest was rendered from
    pub fn template(&self) -> &Path {
        &self.template
    }
}
