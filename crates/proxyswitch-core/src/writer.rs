// ── Proxy state writer ──
//
// One toggle = authorize, open a privileged session, stage the same
// enable flag on every eligible service, then commit and apply. The
// target state is decided once, before anything is staged. Nothing is
// rolled back: a commit that lands followed by a failed apply leaves the
// persisted and live configurations apart until the next apply.

use proxyswitch_api::{AuthorizationMode, PreferencesSession, SystemStore};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::Authorizer;
use crate::error::{StageFailure, WriteError};
use crate::model::NetworkInterfaceRef;
use crate::reader::ProxyReader;

/// What a toggle touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleReport {
    /// Enable state written to every staged service.
    pub target: bool,
    pub staged: Vec<NetworkInterfaceRef>,
    pub failures: Vec<StageFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// At least one service was staged; commit and apply both succeeded.
    Applied(ToggleReport),
    /// No service could be staged; nothing was committed.
    NoChangeApplied(ToggleReport),
    /// The VPN heuristic suppressed the toggle; the writer never ran.
    BlockedByVpn,
}

impl ToggleOutcome {
    pub fn report(&self) -> Option<&ToggleReport> {
        match self {
            Self::Applied(report) | Self::NoChangeApplied(report) => Some(report),
            Self::BlockedByVpn => None,
        }
    }
}

pub struct ProxyWriter<'a, S: SystemStore> {
    store: &'a S,
    authorizer: &'a Authorizer<S>,
    session_name: &'a str,
    mode: AuthorizationMode,
}

impl<'a, S: SystemStore> ProxyWriter<'a, S> {
    pub fn new(
        store: &'a S,
        authorizer: &'a Authorizer<S>,
        session_name: &'a str,
        mode: AuthorizationMode,
    ) -> Self {
        Self {
            store,
            authorizer,
            session_name,
            mode,
        }
    }

    /// Invert the global proxy state on every eligible service.
    pub fn toggle(&self) -> Result<ToggleOutcome, WriteError> {
        let current =
            ProxyReader::new(self.store, self.authorizer, self.session_name).is_globally_enabled();
        debug!(current, "toggling proxies");
        self.set_enabled(!current)
    }

    /// Write `target` to the HTTP and HTTPS enable flags of every eligible
    /// service.
    pub fn set_enabled(&self, target: bool) -> Result<ToggleOutcome, WriteError> {
        let authorization = self.authorizer.acquire(self.store, self.mode)?;
        let mut session = self.store.open_session(self.session_name, authorization)?;

        let eligible: Vec<NetworkInterfaceRef> = session
            .services()?
            .into_iter()
            .map(NetworkInterfaceRef::from)
            .filter(NetworkInterfaceRef::is_eligible)
            .collect();

        let mut report = ToggleReport {
            target,
            staged: Vec::new(),
            failures: Vec::new(),
        };
        for interface in eligible {
            match session.stage_proxy_enabled(&interface.service_id, target) {
                Ok(()) => {
                    debug!(
                        service = interface.label(),
                        interface = %interface.bsd_name,
                        target,
                        "staged"
                    );
                    report.staged.push(interface);
                }
                Err(err) => {
                    warn!(
                        service = interface.label(),
                        error = %err,
                        "could not stage proxy change"
                    );
                    report.failures.push(StageFailure {
                        interface,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if report.staged.is_empty() {
            info!(
                enabled = target,
                "no eligible service staged; nothing to commit"
            );
            return Ok(ToggleOutcome::NoChangeApplied(report));
        }

        let committed = session.commit().map_err(WriteError::from);
        if let Err(err) = &committed {
            warn_write_failure(err);
        }
        let applied = session.apply().map_err(WriteError::from);
        if let Err(err) = &applied {
            warn_write_failure(err);
        }
        if let Err(err) = committed.and(applied) {
            return Err(err.with_report(report));
        }

        info!(
            enabled = target,
            staged = report.staged.len(),
            failed = report.failures.len(),
            "proxy change applied"
        );
        Ok(ToggleOutcome::Applied(report))
    }
}

fn warn_write_failure(err: &WriteError) {
    match err.hint() {
        Some(hint) => warn!(error = %err, hint, "write failed"),
        None => warn!(error = %err, "write failed"),
    }
}
