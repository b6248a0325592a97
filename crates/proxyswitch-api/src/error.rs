use thiserror::Error;

/// SystemConfiguration status code reported when a store call fails.
///
/// `1003` (`kSCStatusAccessError`) is the one callers care about: the
/// process lacks the privileges, or runs inside a sandbox that forbids
/// editing the system preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub i32);

impl StatusCode {
    pub const ACCESS_ERROR: Self = Self(1003);
    pub const FAILED: Self = Self(1001);

    pub fn is_access_denied(self) -> bool {
        self == Self::ACCESS_ERROR
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SC error {}", self.0)
    }
}

/// Top-level error type for the `proxyswitch-api` crate.
///
/// Covers every failure mode of the configuration store backends:
/// authorization, preferences sessions, per-service staging, commit/apply,
/// and notification registration. `proxyswitch-core` maps these into
/// domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authorization ───────────────────────────────────────────────
    /// The authorization reference could not be created or the rights
    /// were not granted (user declined, or no interaction allowed).
    #[error("Authorization failed (status {status})")]
    Authorization { status: i32 },

    // ── Preferences session ─────────────────────────────────────────
    /// A privileged preferences session could not be created.
    #[error("Cannot open preferences session: {status}")]
    SessionUnavailable { status: StatusCode },

    /// No network service with this identifier exists in the session.
    #[error("Network service not found: {service_id}")]
    ServiceNotFound { service_id: String },

    /// The service carries no Proxies protocol or configuration.
    #[error("Network service {service_id} has no proxy configuration")]
    NoProxyProtocol { service_id: String },

    /// The updated proxy configuration was rejected by the session.
    #[error("Cannot stage proxy change for {service_id}: {status}")]
    Stage {
        service_id: String,
        status: StatusCode,
    },

    /// `SCPreferencesCommitChanges` failed.
    #[error("Commit failed: {0}")]
    Commit(StatusCode),

    /// `SCPreferencesApplyChanges` failed.
    #[error("Apply failed: {0}")]
    Apply(StatusCode),

    // ── Dynamic store ───────────────────────────────────────────────
    /// The global proxy dictionary could not be copied.
    #[error("Global proxy configuration unavailable")]
    ProxiesUnavailable,

    /// Reachability flags could not be determined.
    #[error("Network reachability unavailable")]
    ReachabilityUnavailable,

    /// Registration for change notifications failed.
    #[error("Cannot register for change notifications: {reason}")]
    Notification { reason: String },

    // ── Platform ────────────────────────────────────────────────────
    /// The host has no network configuration store this crate can drive.
    #[error("Unsupported platform: {0}")]
    Unsupported(&'static str),
}

impl Error {
    /// Returns the SystemConfiguration status carried by this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::SessionUnavailable { status }
            | Self::Stage { status, .. }
            | Self::Commit(status)
            | Self::Apply(status) => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the store refused the operation for lack of
    /// privileges (SC error 1003).
    pub fn is_access_denied(&self) -> bool {
        self.status().is_some_and(StatusCode::is_access_denied)
    }
}
