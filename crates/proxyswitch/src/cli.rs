//! Clap derive structures for the `proxyswitch` CLI.
//!
//! Also compiled by build.rs for man page generation, so this module may
//! only depend on clap and clap_complete.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// proxyswitch -- flip the macOS system proxy on and off
#[derive(Debug, Parser)]
#[command(
    name = "proxyswitch",
    version,
    about = "Toggle the macOS HTTP/HTTPS proxy from the command line",
    long_about = "Reads and toggles the HTTP and HTTPS proxy of every enabled,\n\
        interface-bound network service. Toggling is refused while a VPN\n\
        tunnel looks active.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format [default: table, or `defaults.output` from the config file]
    #[arg(long, short = 'o', env = "PROXYSWITCH_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto, or `defaults.color`]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current proxy state, endpoints and VPN verdict
    #[command(alias = "st")]
    Status,

    /// Flip the proxy: disable if globally enabled, enable otherwise
    #[command(alias = "t")]
    Toggle,

    /// Enable the proxy on every eligible network service
    On,

    /// Disable the proxy on every eligible network service
    Off,

    /// Show the network path and the VPN heuristic's verdict
    Vpn,

    /// List interface-bound network services
    #[command(alias = "if")]
    Interfaces,

    /// Print a status line on every proxy or network path change
    Watch,

    /// Inspect the configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Print a manual page (roff) for proxyswitch or one of its commands
    Man(ManArgs),
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Manual pages ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ManArgs {
    /// Command path, e.g. `toggle` or `config show` [default: proxyswitch]
    pub command: Vec<String>,
}
