//! Config subcommand handlers. The file is only ever read.

use proxyswitch_config::Settings;

use crate::cli::{ConfigArgs, ConfigCommand, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Ui};

pub fn handle(args: ConfigArgs, settings: &Settings, ui: Ui) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let out = match ui.format {
                OutputFormat::Table | OutputFormat::Plain => settings.to_toml()?,
                structured => output::render_single(
                    structured,
                    settings,
                    |_| String::new(),
                    |_| String::new(),
                )?,
            };
            output::print_output(out.trim_end(), ui.quiet);
        }
        ConfigCommand::Path => {
            let path = proxyswitch_config::config_path();
            output::print_output(&path.display().to_string(), ui.quiet);
        }
    }
    Ok(())
}
