//! `proxyswitch interfaces`: interface-bound network services.

use tabled::Tabled;

use proxyswitch_api::SystemStore;
use proxyswitch_core::{NetworkInterfaceRef, Switcher};

use crate::error::CliError;
use crate::output::{self, Ui};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "Interface")]
    bsd_name: String,
    #[tabled(rename = "Enabled")]
    enabled: &'static str,
    #[tabled(rename = "Toggled")]
    eligible: &'static str,
    #[tabled(rename = "ID")]
    id: String,
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

impl From<&NetworkInterfaceRef> for ServiceRow {
    fn from(s: &NetworkInterfaceRef) -> Self {
        Self {
            name: s.service_name.clone().unwrap_or_default(),
            bsd_name: if s.bsd_name.is_empty() {
                "-".into()
            } else {
                s.bsd_name.clone()
            },
            enabled: yes_no(s.is_enabled),
            eligible: yes_no(s.is_eligible()),
            id: s.service_id.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle<S: SystemStore>(switcher: &Switcher<S>, ui: Ui) -> Result<(), CliError> {
    let services = switcher.interfaces()?;
    let out = output::render_list(
        ui.format,
        &services,
        |s| ServiceRow::from(s),
        |s| s.service_id.clone(),
    )?;
    output::print_output(&out, ui.quiet);
    Ok(())
}
