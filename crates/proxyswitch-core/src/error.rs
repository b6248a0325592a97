// ── Core error types ──
//
// Domain errors for consumers of proxyswitch-core. Backend status codes
// survive only where a caller can act on them (authorization status, the
// SC error behind a failed commit/apply). The `From<proxyswitch_api::Error>`
// impl translates everything else into domain-appropriate variants.

use proxyswitch_api::{Error as ApiError, StatusCode};
use thiserror::Error;

use crate::model::NetworkInterfaceRef;
use crate::writer::ToggleReport;

/// Shown when the store rejects a change with an access error.
pub const SANDBOX_HINT: &str = "The process was denied access to the system preferences. \
If it runs inside an App Sandbox, disable the sandbox; otherwise run it as an administrator.";

/// Errors from reading, observing and enumerating network state.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Authorization denied (status {status})")]
    AuthorizationDenied { status: i32 },

    #[error("Network preferences unavailable: {reason}")]
    PreferencesUnavailable { reason: String },

    #[error("Cannot monitor configuration changes: {reason}")]
    MonitorFailed { reason: String },

    #[error("Network path unavailable: {reason}")]
    PathUnavailable { reason: String },

    #[error("Unsupported platform: {reason}")]
    Unsupported { reason: String },

    #[error("Configuration store error: {message}")]
    Store { message: String },
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authorization { status } => CoreError::AuthorizationDenied { status },
            ApiError::SessionUnavailable { .. }
            | ApiError::ServiceNotFound { .. }
            | ApiError::NoProxyProtocol { .. } => CoreError::PreferencesUnavailable {
                reason: err.to_string(),
            },
            ApiError::Notification { reason } => CoreError::MonitorFailed { reason },
            ApiError::ReachabilityUnavailable => CoreError::PathUnavailable {
                reason: err.to_string(),
            },
            ApiError::Unsupported(reason) => CoreError::Unsupported {
                reason: reason.to_owned(),
            },
            ApiError::Stage { .. }
            | ApiError::Commit(_)
            | ApiError::Apply(_)
            | ApiError::ProxiesUnavailable => CoreError::Store {
                message: err.to_string(),
            },
        }
    }
}

/// Fatal outcomes of a toggle. Per-service stage failures are not fatal
/// and travel in the [`ToggleReport`].
///
/// A failed commit or apply happens after services were staged, so the
/// change may be partly visible. Those variants carry the report of what
/// was staged once the writer attaches it.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Authorization denied (status {status})")]
    AuthorizationDenied { status: i32 },

    #[error("Network preferences unavailable: {reason}")]
    PreferencesUnavailable { reason: String },

    #[error("Commit failed: {status}")]
    CommitFailed {
        status: StatusCode,
        report: Option<Box<ToggleReport>>,
    },

    #[error("Apply failed: {status}")]
    ApplyFailed {
        status: StatusCode,
        report: Option<Box<ToggleReport>>,
    },
}

impl WriteError {
    /// Attach the staged services to a commit or apply failure.
    #[must_use]
    pub fn with_report(self, report: ToggleReport) -> Self {
        match self {
            Self::CommitFailed { status, .. } => Self::CommitFailed {
                status,
                report: Some(Box::new(report)),
            },
            Self::ApplyFailed { status, .. } => Self::ApplyFailed {
                status,
                report: Some(Box::new(report)),
            },
            other => other,
        }
    }

    /// What was staged before a commit or apply failed.
    pub fn report(&self) -> Option<&ToggleReport> {
        match self {
            Self::CommitFailed { report, .. } | Self::ApplyFailed { report, .. } => {
                report.as_deref()
            }
            Self::AuthorizationDenied { .. } | Self::PreferencesUnavailable { .. } => None,
        }
    }

    /// Remediation hint for access-denied commit/apply failures.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CommitFailed { status, .. } | Self::ApplyFailed { status, .. }
                if status.is_access_denied() =>
            {
                Some(SANDBOX_HINT)
            }
            _ => None,
        }
    }
}

impl From<ApiError> for WriteError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authorization { status } => WriteError::AuthorizationDenied { status },
            ApiError::Commit(status) => WriteError::CommitFailed {
                status,
                report: None,
            },
            ApiError::Apply(status) => WriteError::ApplyFailed {
                status,
                report: None,
            },
            other => WriteError::PreferencesUnavailable {
                reason: other.to_string(),
            },
        }
    }
}

/// A service whose proxy change could not be staged.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StageFailure {
    pub interface: NetworkInterfaceRef,
    pub reason: String,
}
