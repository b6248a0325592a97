//! `proxyswitch watch`: reprint the status line on every proxy or
//! network path change until Ctrl-C.

use tracing::debug;

use proxyswitch_api::SystemStore;
use proxyswitch_core::{Switcher, VpnState};

use crate::commands::status::{self, StatusReport};
use crate::error::CliError;
use crate::output::{self, Ui};

/// Print the current line unless it matches the previous one.
fn emit<S: SystemStore>(
    switcher: &Switcher<S>,
    vpn: VpnState,
    ui: Ui,
    last: &mut Option<StatusReport>,
) -> Result<(), CliError> {
    let report = StatusReport::new(switcher.snapshot(), vpn);
    let unchanged = last.as_ref().is_some_and(|prev| {
        prev.view == report.view && prev.snapshot.same_endpoints(&report.snapshot)
    });
    if !unchanged {
        output::print_output(&status::render_line(&report, ui)?, ui.quiet);
        *last = Some(report);
    }
    Ok(())
}

pub async fn handle<S: SystemStore>(switcher: &Switcher<S>, ui: Ui) -> Result<(), CliError> {
    let mut changes = switcher.change_stream()?;
    let mut path = switcher.monitor_path()?;
    let mut vpn = path.current().state;
    let mut last = None;

    emit(switcher, vpn, ui, &mut last)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                debug!("interrupted; stopping watch");
                break;
            }
            change = changes.changed() => {
                if change.is_none() {
                    break;
                }
                debug!("proxy configuration changed");
            }
            verdict = path.changed() => {
                let Some(verdict) = verdict else { break };
                debug!(vpn = ?verdict.state, "network path changed");
                vpn = verdict.state;
            }
        }
        emit(switcher, vpn, ui, &mut last)?;
    }
    Ok(())
}
