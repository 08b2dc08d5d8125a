//! Final deployment report: step summary, access URLs and credentials.

use colored::Colorize;

use crate::config::{DeployConfig, ReportConfig};
use crate::domain::{IngressApplyState, ReadinessStatus, ReconciliationOutcome};
use crate::k8s::{self, PodStatus};
use crate::ui;

/// Keycloak endpoints behind the ingress host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessUrls {
    pub root: String,
    pub admin_console: String,
    pub account_console: String,
}

impl AccessUrls {
    pub fn new(scheme: &str, host: &str, realm: &str) -> Self {
        let root = format!("{}://{}", scheme, host);
        Self {
            admin_console: format!("{}/admin/", root),
            account_console: format!("{}/realms/{}/account/", root, realm),
            root: format!("{}/", root),
        }
    }
}

/// Shell pipeline that applies the ingress by hand into the configured namespace
pub fn remediation_command(outcome: &ReconciliationOutcome, config: &DeployConfig) -> String {
    let mut command = format!(
        "sed 's/{}/{}/g' {} | kubectl apply -f -",
        config.ingress.placeholder,
        outcome.host,
        outcome.ingress_template.display()
    );
    if let Some(namespace) = config.namespace.as_deref() {
        command.push_str(" -n ");
        command.push_str(namespace);
    }
    command
}

fn banner_title(outcome: &ReconciliationOutcome) -> String {
    format!("✅ Keycloak deployed to {}", outcome.environment)
}

fn access_lines(outcome: &ReconciliationOutcome, report: &ReportConfig) -> Vec<(&'static str, String)> {
    let urls = AccessUrls::new(&report.scheme, &outcome.host, &report.realm);
    vec![
        ("Keycloak:       ", urls.root),
        ("Admin console:  ", urls.admin_console),
        ("Account console:", urls.account_console),
    ]
}

fn step_lines(outcome: &ReconciliationOutcome) -> Vec<(bool, String)> {
    let ingress = match outcome.ingress {
        IngressApplyState::Succeeded(1) => (true, "Ingress: applied".to_string()),
        IngressApplyState::Succeeded(n) => (
            true,
            format!(
                "Ingress: applied on attempt {} ({} controller repairs)",
                n, outcome.repairs
            ),
        ),
        IngressApplyState::ExhaustedFailure(_) => (
            false,
            format!("Ingress: failed after {} attempts", outcome.ingress.attempts()),
        ),
        IngressApplyState::NotAttempted | IngressApplyState::Attempting(_) => {
            (false, "Ingress: not applied".to_string())
        }
    };

    let readiness = |label: &str, status: ReadinessStatus| match status {
        ReadinessStatus::Ready => (true, format!("{}: ready", label)),
        ReadinessStatus::TimedOut => (false, format!("{}: not ready (timed out)", label)),
    };

    vec![
        (
            outcome.workload.succeeded(),
            format!("Workload: {}", outcome.workload.name()),
        ),
        ingress,
        readiness("Database", outcome.database),
        readiness("Keycloak pods", outcome.workload_pods),
    ]
}

/// Print the report to stdout
pub fn print_report(outcome: &ReconciliationOutcome, config: &DeployConfig) {
    let report = &config.report;
    let ingress = &config.ingress;
    ui::print_banner(&banner_title(outcome));

    println!("{}", "Steps:".bold());
    for (ok, line) in step_lines(outcome) {
        let marker = if ok { "✅" } else { "⚠️ " };
        println!("   {} {}", marker, line);
    }
    println!();

    if matches!(outcome.ingress, IngressApplyState::ExhaustedFailure(_)) {
        ui::print_warning("Ingress could not be applied. Once the ingress controller is healthy run:");
        println!("   {}", remediation_command(outcome, config));
        println!();
    }

    if outcome.webhook_removed {
        ui::print_warning(&format!(
            "Admission webhook '{}' was deleted; ingress validation stays off until the '{}' add-on is disabled and re-enabled",
            ingress.webhook, ingress.addon
        ));
        println!();
    }

    println!("{}", "Access:".bold());
    for (label, url) in access_lines(outcome, report) {
        println!("   {} {}", label, url.bright_cyan());
    }
    println!();

    println!("{}", "Default credentials:".bold());
    println!("   Username: {}", report.admin_user);
    println!("   Password: {}", report.admin_password);
    println!();
}

/// Print the pod table for the Keycloak selector
pub fn print_pods(pods: &[PodStatus]) {
    if pods.is_empty() {
        ui::print_warning("No Keycloak pods found");
        return;
    }

    println!("{}", "Pods:".bold());
    for pod in pods {
        let state = if k8s::is_bad_state(pod) {
            pod.reason.as_deref().unwrap_or("error").bright_red()
        } else if pod.ready {
            "ready".bright_green()
        } else {
            pod.phase.as_str().bright_yellow()
        };
        println!(
            "   {:<32} {:<12} restarts={}",
            pod.name, state, pod.restart_count
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkloadAction;
    use std::path::PathBuf;

    fn outcome() -> ReconciliationOutcome {
        ReconciliationOutcome {
            environment: "homolog".to_string(),
            host: "keycloak.192.168.49.2.nip.io".to_string(),
            workload: WorkloadAction::Applied,
            ingress: IngressApplyState::Succeeded(1),
            ingress_template: PathBuf::from("k8s/homolog/keycloak-ingress.yaml"),
            repairs: 0,
            webhook_removed: false,
            database: ReadinessStatus::Ready,
            workload_pods: ReadinessStatus::Ready,
        }
    }

    #[test]
    fn test_access_urls() {
        let urls = AccessUrls::new("http", "keycloak.192.168.49.2.nip.io", "master");
        assert_eq!(urls.root, "http://keycloak.192.168.49.2.nip.io/");
        assert_eq!(urls.admin_console, "http://keycloak.192.168.49.2.nip.io/admin/");
        assert_eq!(
            urls.account_console,
            "http://keycloak.192.168.49.2.nip.io/realms/master/account/"
        );
    }

    #[test]
    fn test_remediation_command() {
        let cmd = remediation_command(&outcome(), &DeployConfig::default());
        assert_eq!(
            cmd,
            "sed 's/KEYCLOAK_HOST/keycloak.192.168.49.2.nip.io/g' k8s/homolog/keycloak-ingress.yaml | kubectl apply -f -"
        );
    }

    #[test]
    fn test_remediation_command_targets_namespace() {
        let mut config = DeployConfig::default();
        config.namespace = Some("identity".to_string());

        let cmd = remediation_command(&outcome(), &config);
        assert!(cmd.ends_with("| kubectl apply -f - -n identity"));
    }

    #[test]
    fn test_banner_and_access_lines_name_environment() {
        let outcome = outcome();
        assert_eq!(banner_title(&outcome), "✅ Keycloak deployed to homolog");

        let urls: Vec<String> = access_lines(&outcome, &ReportConfig::default())
            .into_iter()
            .map(|(_, url)| url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "http://keycloak.192.168.49.2.nip.io/",
                "http://keycloak.192.168.49.2.nip.io/admin/",
                "http://keycloak.192.168.49.2.nip.io/realms/master/account/",
            ]
        );
    }

    #[test]
    fn test_step_lines_clean() {
        let lines = step_lines(&outcome());
        assert!(lines.iter().all(|(ok, _)| *ok));
        assert_eq!(lines[0].1, "Workload: applied");
        assert_eq!(lines[1].1, "Ingress: applied");
    }

    #[test]
    fn test_step_lines_degraded() {
        let mut degraded = outcome();
        degraded.ingress = IngressApplyState::ExhaustedFailure(3);
        degraded.repairs = 2;
        degraded.workload_pods = ReadinessStatus::TimedOut;

        let lines = step_lines(&degraded);
        assert_eq!(lines[1], (false, "Ingress: failed after 3 attempts".to_string()));
        assert_eq!(
            lines[3],
            (false, "Keycloak pods: not ready (timed out)".to_string())
        );
        assert!(lines[2].0);
    }

    #[test]
    fn test_step_lines_retried_ingress() {
        let mut retried = outcome();
        retried.ingress = IngressApplyState::Succeeded(2);
        retried.repairs = 1;

        let lines = step_lines(&retried);
        assert_eq!(
            lines[1].1,
            "Ingress: applied on attempt 2 (1 controller repairs)"
        );
    }
}
