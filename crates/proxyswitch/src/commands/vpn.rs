//! `proxyswitch vpn`: the current network path and the heuristic's verdict.

use tabled::Tabled;

use proxyswitch_api::SystemStore;
use proxyswitch_core::{AvailableInterface, InterfaceKind, Switcher, VpnVerdict};

use crate::commands::status::vpn_label;
use crate::error::CliError;
use crate::output::{self, Ui};

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "Interface")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Suspect")]
    suspect: &'static str,
}

impl From<&AvailableInterface> for InterfaceRow {
    fn from(i: &AvailableInterface) -> Self {
        Self {
            name: i.name.clone(),
            kind: i.kind.to_string(),
            suspect: if i.kind == InterfaceKind::Other {
                "yes"
            } else {
                ""
            },
        }
    }
}

fn detail(verdict: &VpnVerdict) -> String {
    let suspects: Vec<&str> = verdict.suspects().collect();
    let mut out = vec![
        format!("VPN:    {}", vpn_label(verdict.state)),
        format!("Path:   {}", verdict.path.status),
    ];
    if !suspects.is_empty() {
        out.push(format!("Tunnel: {}", suspects.join(", ")));
    }
    if !verdict.path.interfaces.is_empty() {
        let rows: Vec<InterfaceRow> = verdict
            .path
            .interfaces
            .iter()
            .map(InterfaceRow::from)
            .collect();
        out.push(output::render_table(&rows));
    }
    out.join("\n")
}

pub fn handle<S: SystemStore>(switcher: &Switcher<S>, ui: Ui) -> Result<(), CliError> {
    let verdict = switcher.vpn()?;
    let out = output::render_single(ui.format, &verdict, detail, |v| {
        String::from(if v.state.is_active() {
            "likely_active"
        } else {
            "clear"
        })
    })?;
    output::print_output(&out, ui.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use proxyswitch_core::{NetworkPath, PathStatus};

    use super::*;

    #[test]
    fn detail_names_the_tunnel() {
        let verdict = VpnVerdict::from_path(NetworkPath {
            status: PathStatus::Satisfied,
            interfaces: vec![
                AvailableInterface::new("en0", InterfaceKind::Wifi),
                AvailableInterface::new("utun3", InterfaceKind::Other),
            ],
        });
        let out = detail(&verdict);
        assert!(out.starts_with("VPN:    likely active\nPath:   satisfied"));
        assert!(out.contains("Tunnel: utun3"));
    }

    #[test]
    fn unsatisfied_path_is_clear() {
        let verdict = VpnVerdict::from_path(NetworkPath {
            status: PathStatus::Unsatisfied,
            interfaces: vec![AvailableInterface::new("utun3", InterfaceKind::Other)],
        });
        assert!(detail(&verdict).starts_with("VPN:    clear"));
    }
}
