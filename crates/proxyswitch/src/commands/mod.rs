//! Command dispatch: bridges CLI args -> Switcher operations -> output.

pub mod config_cmd;
pub mod interfaces;
pub mod man;
pub mod status;
pub mod toggle;
pub mod vpn;
pub mod watch;

use proxyswitch_api::SystemStore;
use proxyswitch_core::Switcher;

use crate::cli::Command;
use crate::error::CliError;
use crate::output::Ui;

/// Dispatch a store-bound command to its handler.
pub async fn dispatch<S: SystemStore>(
    cmd: Command,
    switcher: &Switcher<S>,
    ui: Ui,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(switcher, ui),
        Command::Toggle => toggle::handle(switcher, None, ui).await,
        Command::On => toggle::handle(switcher, Some(true), ui).await,
        Command::Off => toggle::handle(switcher, Some(false), ui).await,
        Command::Vpn => vpn::handle(switcher, ui),
        Command::Interfaces => interfaces::handle(switcher, ui),
        Command::Watch => watch::handle(switcher, ui).await,
        // Handled before the store is opened
        Command::Config(_) | Command::Completions(_) | Command::Man(_) => Ok(()),
    }
}
