//! `proxyswitch toggle|on|off`.
//!
//! The write runs on a blocking thread because authorization may wait on
//! the OS credentials prompt. Afterwards the state is read again and
//! printed the same way `status` prints it.

use serde::Serialize;
use tracing::{info, warn};

use proxyswitch_api::SystemStore;
use proxyswitch_core::view::LINE_VPN_BLOCKED;
use proxyswitch_core::{Switcher, ToggleOutcome, ToggleReport};

use crate::cli::OutputFormat;
use crate::commands::status::{self, StatusReport};
use crate::error::CliError;
use crate::output::{self, Ui};

#[derive(Serialize)]
struct ToggleResult<'a> {
    change: &'a ToggleOutcome,
    status: &'a StatusReport,
}

fn summary(outcome: &ToggleOutcome) -> String {
    match outcome {
        ToggleOutcome::Applied(report) => format!(
            "Proxy {} on {} service(s)",
            if report.target { "enabled" } else { "disabled" },
            report.staged.len()
        ),
        ToggleOutcome::NoChangeApplied(_) => "No change applied".to_owned(),
        ToggleOutcome::BlockedByVpn => LINE_VPN_BLOCKED.to_owned(),
    }
}

/// One stderr line per stage failure.
fn stage_warnings(report: &ToggleReport) -> Vec<String> {
    report
        .failures
        .iter()
        .map(|failure| {
            format!(
                "warning: {} ({}) was left unchanged: {}",
                failure.interface.label(),
                failure.interface.bsd_name,
                failure.reason
            )
        })
        .collect()
}

/// Lines printed ahead of a commit/apply diagnostic: the services whose
/// change may already be visible, then the stage failures.
fn partial_write_warnings(report: &ToggleReport) -> Vec<String> {
    let staged: Vec<&str> = report.staged.iter().map(|i| i.bsd_name.as_str()).collect();
    let mut lines = vec![format!(
        "warning: proxy {} was staged on {} before the write failed; it may be partly visible",
        if report.target { "enable" } else { "disable" },
        staged.join(", ")
    )];
    lines.extend(stage_warnings(report));
    lines
}

fn print_warnings(lines: &[String], quiet: bool) {
    if quiet {
        return;
    }
    for line in lines {
        eprintln!("{line}");
    }
}

fn log_report(outcome: &ToggleOutcome, report: &ToggleReport, quiet: bool) {
    match outcome {
        ToggleOutcome::Applied(_) => info!(
            enabled = report.target,
            staged = report.staged.len(),
            failed = report.failures.len(),
            "proxy change applied"
        ),
        _ => warn!(
            enabled = report.target,
            "no eligible service could be changed"
        ),
    }
    print_warnings(&stage_warnings(report), quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

/// `target` is `None` for a toggle, `Some` for an explicit on/off.
pub async fn handle<S: SystemStore>(
    switcher: &Switcher<S>,
    target: Option<bool>,
    ui: Ui,
) -> Result<(), CliError> {
    let worker = switcher.clone();
    let written = tokio::task::spawn_blocking(move || match target {
        Some(enabled) => worker.set_enabled(enabled),
        None => worker.request_toggle(),
    })
    .await?;

    let outcome = match written {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Some(report) = err.report() {
                warn!(
                    enabled = report.target,
                    staged = report.staged.len(),
                    "write failed after staging"
                );
                print_warnings(&partial_write_warnings(report), ui.quiet);
            }
            return Err(err.into());
        }
    };

    let Some(report) = outcome.report() else {
        return Err(CliError::VpnBlocked);
    };
    log_report(&outcome, report, ui.quiet);

    let status = StatusReport::read(switcher);
    let rendered = match ui.format {
        OutputFormat::Table => {
            let current = status::render(&status, ui)?;
            format!("{}\n\n{current}", summary(&outcome))
        }
        OutputFormat::Plain => status::render(&status, ui)?,
        structured => output::render_single(
            structured,
            &ToggleResult {
                change: &outcome,
                status: &status,
            },
            |_| String::new(),
            |_| String::new(),
        )?,
    };
    output::print_output(&rendered, ui.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use proxyswitch_core::{NetworkInterfaceRef, StageFailure};

    use super::*;

    fn report(target: bool, staged: usize) -> ToggleReport {
        ToggleReport {
            target,
            staged: (0..staged)
                .map(|i| NetworkInterfaceRef {
                    service_id: format!("S{i}"),
                    service_name: None,
                    bsd_name: format!("en{i}"),
                    is_enabled: true,
                })
                .collect(),
            failures: Vec::new(),
        }
    }

    #[test]
    fn summaries() {
        assert_eq!(
            summary(&ToggleOutcome::Applied(report(true, 2))),
            "Proxy enabled on 2 service(s)"
        );
        assert_eq!(
            summary(&ToggleOutcome::Applied(report(false, 1))),
            "Proxy disabled on 1 service(s)"
        );
        assert_eq!(
            summary(&ToggleOutcome::NoChangeApplied(report(true, 0))),
            "No change applied"
        );
    }

    #[test]
    fn blocked_summary_uses_the_vpn_line() {
        assert_eq!(summary(&ToggleOutcome::BlockedByVpn), LINE_VPN_BLOCKED);
    }

    #[test]
    fn partial_write_lists_staged_services_then_failures() {
        let mut partial = report(true, 2);
        partial.failures.push(StageFailure {
            interface: NetworkInterfaceRef {
                service_id: "S9".into(),
                service_name: Some("Thunderbolt Bridge".into()),
                bsd_name: "bridge0".into(),
                is_enabled: true,
            },
            reason: "permission denied".into(),
        });

        assert_eq!(
            partial_write_warnings(&partial),
            vec![
                "warning: proxy enable was staged on en0, en1 before the write failed; \
                 it may be partly visible"
                    .to_owned(),
                "warning: Thunderbolt Bridge (bridge0) was left unchanged: permission denied"
                    .to_owned(),
            ]
        );
    }

    #[test]
    fn clean_report_has_no_stage_warnings() {
        assert!(stage_warnings(&report(false, 3)).is_empty());
    }
}
