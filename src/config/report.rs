//! Settings for the final access report.

use serde::{Deserialize, Serialize};

/// Access report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Realm whose account console is printed
    #[serde(default = "default_realm")]
    pub realm: String,

    #[serde(default = "default_admin")]
    pub admin_user: String,

    #[serde(default = "default_admin")]
    pub admin_password: String,
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_realm() -> String {
    "master".to_string()
}

fn default_admin() -> String {
    "admin".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            realm: default_realm(),
            admin_user: default_admin(),
            admin_password: default_admin(),
        }
    }
}
