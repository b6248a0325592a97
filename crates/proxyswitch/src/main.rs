//! Entry point: argument parsing, settings, tracing setup and dispatch.

mod cli;
mod commands;
mod error;
mod output;

use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use proxyswitch_api::PlatformStore;
use proxyswitch_config::Settings;
use proxyswitch_core::{CoreError, Switcher};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::Ui;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Settings feed the log filter, so load them before tracing exists and
    // report a failure only once it does.
    let settings = proxyswitch_config::load();
    let _log_guard = init_tracing(cli.global.verbose, settings.as_ref().ok());

    if let Err(err) = run(cli, settings.map_err(CliError::from)).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// `RUST_LOG` wins, then `-v`, then the configured `log_level`.
///
/// Logs go to stderr; with `log_file` set they are also written to that
/// file. The returned guard flushes the file writer on drop.
fn init_tracing(verbosity: u8, settings: Option<&Settings>) -> Option<WorkerGuard> {
    let level = match verbosity {
        0 => settings
            .and_then(|s| s.log_level.as_deref())
            .unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match settings.and_then(|s| s.log_file.as_deref()) {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn file_appender(path: &Path) -> tracing_appender::rolling::RollingFileAppender {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("proxyswitch.log"));
    tracing_appender::rolling::never(dir, name)
}

async fn run(cli: Cli, settings: Result<Settings, CliError>) -> Result<(), CliError> {
    match cli.command {
        // Completions need neither settings nor the store
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "proxyswitch", &mut std::io::stdout());
            Ok(())
        }

        Command::Man(args) => commands::man::handle(&args),

        // Config commands don't touch the network configuration
        Command::Config(args) => {
            let settings = settings?;
            let ui = Ui::resolve(&cli.global, &settings)?;
            commands::config_cmd::handle(args, &settings, ui)
        }

        cmd => {
            let settings = settings?;
            let ui = Ui::resolve(&cli.global, &settings)?;
            let store = PlatformStore::new().map_err(CoreError::from)?;
            let switcher = Switcher::new(store, settings.to_switcher_config());

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &switcher, ui).await
        }
    }
}
