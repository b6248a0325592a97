//! `proxyswitch status`: snapshot, state and VPN verdict.

use serde::Serialize;
use tabled::Tabled;

use proxyswitch_api::SystemStore;
use proxyswitch_core::{ProxyEndpoint, ProxySnapshot, StatusState, StatusView, Switcher, VpnState};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{self, Ui};

// ── Report ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub view: StatusView,
    pub vpn: VpnState,
    pub snapshot: ProxySnapshot,
}

impl StatusReport {
    pub fn read<S: SystemStore>(switcher: &Switcher<S>) -> Self {
        Self::new(switcher.snapshot(), switcher.vpn_state())
    }

    pub fn new(snapshot: ProxySnapshot, vpn: VpnState) -> Self {
        Self {
            view: StatusView::render(&snapshot, vpn),
            vpn,
            snapshot,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EndpointRow {
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Enabled")]
    enabled: &'static str,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&ProxyEndpoint> for EndpointRow {
    fn from(e: &ProxyEndpoint) -> Self {
        Self {
            scope: e.scope.to_string(),
            protocol: e.protocol.to_string(),
            enabled: if e.enabled { "yes" } else { "no" },
            address: e.address().unwrap_or_else(|| "-".into()),
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────

pub fn vpn_label(vpn: VpnState) -> &'static str {
    match vpn {
        VpnState::Clear => "clear",
        VpnState::LikelyActive => "likely active",
    }
}

fn detail(report: &StatusReport, color: bool) -> String {
    let mut out = vec![
        format!(
            "Proxy:  {} {}",
            output::state_label(report.view.state, color),
            output::dim(&format!("({})", report.view.tooltip), color)
        ),
        format!("VPN:    {}", vpn_label(report.vpn)),
    ];
    if report.view.state == StatusState::VpnBlocked || report.snapshot.is_empty() {
        for line in &report.view.lines {
            out.push(format!("        {line}"));
        }
    } else {
        let rows: Vec<EndpointRow> = report
            .snapshot
            .endpoints
            .iter()
            .map(EndpointRow::from)
            .collect();
        out.push(output::render_table(&rows));
    }
    out.join("\n")
}

/// Render a status report in the selected format.
pub fn render(report: &StatusReport, ui: Ui) -> Result<String, CliError> {
    output::render_single(
        ui.format,
        report,
        |r| detail(r, ui.color),
        |r| r.view.state.to_string(),
    )
}

/// One line per update, used by `watch`.
pub fn render_line(report: &StatusReport, ui: Ui) -> Result<String, CliError> {
    match ui.format {
        OutputFormat::Table => {
            let time = report.snapshot.captured_at.with_timezone(&chrono::Local);
            Ok(format!(
                "{} {} {}",
                output::dim(&time.format("%H:%M:%S").to_string(), ui.color),
                output::state_label(report.view.state, ui.color),
                report.view.lines.join("; ")
            ))
        }
        OutputFormat::Plain => Ok(report.view.state.to_string()),
        OutputFormat::Yaml => {
            let doc = output::render_single(
                ui.format,
                report,
                |_| String::new(),
                |_| String::new(),
            )?;
            Ok(format!("---\n{}", doc.trim_end()))
        }
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_single(
            OutputFormat::JsonCompact,
            report,
            |_| String::new(),
            |_| String::new(),
        ),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle<S: SystemStore>(switcher: &Switcher<S>, ui: Ui) -> Result<(), CliError> {
    let report = StatusReport::read(switcher);
    output::print_output(&render(&report, ui)?, ui.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proxyswitch_core::{ProxyProtocol, ProxyScope};

    use super::*;

    fn ui(format: OutputFormat) -> Ui {
        Ui {
            format,
            color: false,
            quiet: false,
        }
    }

    fn enabled_snapshot() -> ProxySnapshot {
        ProxySnapshot::new(vec![
            ProxyEndpoint::new(
                ProxyScope::Global,
                ProxyProtocol::Http,
                true,
                Some("10.0.0.1"),
                Some(8080),
            ),
            ProxyEndpoint::new(
                ProxyScope::Interface("en0".into()),
                ProxyProtocol::Https,
                true,
                Some("10.0.0.1"),
                Some(8443),
            ),
        ])
    }

    #[test]
    fn table_lists_endpoints() {
        let report = StatusReport::new(enabled_snapshot(), VpnState::Clear);
        let out = render(&report, ui(OutputFormat::Table)).unwrap();
        assert!(out.starts_with("Proxy:  ON (Proxy on)"));
        assert!(out.contains("VPN:    clear"));
        assert!(out.contains("10.0.0.1:8080"));
        assert!(out.contains("en0"));
    }

    #[test]
    fn vpn_replaces_endpoint_lines_with_notice() {
        let report = StatusReport::new(enabled_snapshot(), VpnState::LikelyActive);
        let out = render(&report, ui(OutputFormat::Table)).unwrap();
        assert!(out.contains("VPN:    likely active"));
        assert!(out.contains("proxy toggle disabled"));
        assert!(!out.contains("10.0.0.1:8080"));
    }

    #[test]
    fn plain_prints_the_state() {
        let report = StatusReport::new(ProxySnapshot::empty(), VpnState::Clear);
        assert_eq!(render(&report, ui(OutputFormat::Plain)).unwrap(), "off");

        let report = StatusReport::new(enabled_snapshot(), VpnState::LikelyActive);
        assert_eq!(
            render(&report, ui(OutputFormat::Plain)).unwrap(),
            "vpn_blocked"
        );
    }

    #[test]
    fn json_flattens_the_view() {
        let report = StatusReport::new(ProxySnapshot::empty(), VpnState::Clear);
        let out = render(&report, ui(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["state"], "off");
        assert_eq!(value["icon"], "network.slash");
        assert_eq!(value["vpn"], "clear");
        assert_eq!(value["lines"][0], "Proxy is disabled");
    }

    #[test]
    fn watch_lines_are_single_line_json() {
        let report = StatusReport::new(enabled_snapshot(), VpnState::Clear);
        let out = render_line(&report, ui(OutputFormat::Json)).unwrap();
        assert!(!out.contains('\n'));
        assert!(out.contains(r#""state":"on""#));

        let out = render_line(&report, ui(OutputFormat::Table)).unwrap();
        assert!(out.contains("ON http: 10.0.0.1:8080; en0 https: 10.0.0.1:8443"));
    }
}
