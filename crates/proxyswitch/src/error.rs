//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `WriteError` and `ConfigError` into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use proxyswitch_config::ConfigError;
use proxyswitch_core::view::LINE_VPN_BLOCKED;
use proxyswitch_core::{CoreError, WriteError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const UNAVAILABLE: i32 = 5;
    pub const VPN_BLOCKED: i32 = 6;
    pub const WRITE_FAILED: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Platform ─────────────────────────────────────────────────────
    #[error("Unsupported platform: {reason}")]
    #[diagnostic(
        code(proxyswitch::unsupported_platform),
        help("proxyswitch manages the macOS SystemConfiguration store and only runs on macOS.")
    )]
    UnsupportedPlatform { reason: String },

    #[error("Network preferences unavailable: {reason}")]
    #[diagnostic(
        code(proxyswitch::preferences_unavailable),
        help(
            "The process could not open the system network preferences.\n\
             If it runs inside an App Sandbox, disable the sandbox; otherwise run it as an administrator."
        )
    )]
    PreferencesUnavailable { reason: String },

    // ── Authorization ────────────────────────────────────────────────
    #[error("Authorization denied (status {status})")]
    #[diagnostic(
        code(proxyswitch::auth_denied),
        help(
            "Changing network settings needs an administrator's approval.\n\
             Run interactively, or set interactive_auth = true in the config file."
        )
    )]
    AuthorizationDenied { status: i32 },

    // ── Writes ───────────────────────────────────────────────────────
    #[error("{}", LINE_VPN_BLOCKED)]
    #[diagnostic(
        code(proxyswitch::vpn_blocked),
        help("Disconnect the VPN and try again. Run: proxyswitch vpn")
    )]
    VpnBlocked,

    #[error("{message}")]
    #[diagnostic(code(proxyswitch::write_failed))]
    WriteFailed {
        message: String,
        #[help]
        hint: Option<String>,
    },

    // ── Observation ──────────────────────────────────────────────────
    #[error("Cannot watch for changes: {reason}")]
    #[diagnostic(code(proxyswitch::monitor_failed))]
    MonitorFailed { reason: String },

    #[error("Network path unavailable: {reason}")]
    #[diagnostic(code(proxyswitch::path_unavailable))]
    PathUnavailable { reason: String },

    #[error("{message}")]
    #[diagnostic(code(proxyswitch::store))]
    Store { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(proxyswitch::validation),
        help("Check the config file (proxyswitch config path) and PROXYSWITCH_* variables.")
    )]
    Validation { field: String, reason: String },

    #[error("No manual page for `{command}`")]
    #[diagnostic(
        code(proxyswitch::unknown_man_page),
        help("Run: proxyswitch --help for the list of commands")
    )]
    UnknownManPage { command: String },

    #[error(transparent)]
    #[diagnostic(code(proxyswitch::config))]
    Config(ConfigError),

    // ── Runtime ──────────────────────────────────────────────────────
    #[error("Background task failed: {0}")]
    #[diagnostic(code(proxyswitch::task))]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(proxyswitch::serialize))]
    Serialize(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedPlatform { .. } | Self::PreferencesUnavailable { .. } => {
                exit_code::UNAVAILABLE
            }
            Self::AuthorizationDenied { .. } => exit_code::AUTH,
            Self::VpnBlocked => exit_code::VPN_BLOCKED,
            Self::WriteFailed { .. } => exit_code::WRITE_FAILED,
            Self::Validation { .. } | Self::UnknownManPage { .. } => exit_code::USAGE,
            Self::MonitorFailed { .. }
            | Self::PathUnavailable { .. }
            | Self::Store { .. }
            | Self::Config(_)
            | Self::Task(_)
            | Self::Io(_)
            | Self::Serialize(_) => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthorizationDenied { status } => Self::AuthorizationDenied { status },
            CoreError::PreferencesUnavailable { reason } => Self::PreferencesUnavailable { reason },
            CoreError::MonitorFailed { reason } => Self::MonitorFailed { reason },
            CoreError::PathUnavailable { reason } => Self::PathUnavailable { reason },
            CoreError::Unsupported { reason } => Self::UnsupportedPlatform { reason },
            CoreError::Store { message } => Self::Store { message },
        }
    }
}

impl From<WriteError> for CliError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::AuthorizationDenied { status } => Self::AuthorizationDenied { status },
            WriteError::PreferencesUnavailable { reason } => {
                Self::PreferencesUnavailable { reason }
            }
            WriteError::CommitFailed { .. } | WriteError::ApplyFailed { .. } => {
                let hint = err.hint().map(str::to_owned);
                Self::WriteFailed {
                    message: err.to_string(),
                    hint,
                }
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
