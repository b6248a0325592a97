// ── Switcher ──
//
// The entry point for shells. Owns the store and the authorization
// capability; cheaply cloneable so blocking work can move onto another
// thread.

use std::sync::Arc;

use proxyswitch_api::{AuthorizationMode, SystemStore};
use tracing::{debug, info};

use crate::auth::Authorizer;
use crate::config::SwitcherConfig;
use crate::error::{CoreError, WriteError};
use crate::model::{NetworkInterfaceRef, ProxySnapshot, VpnState};
use crate::monitor::{ChangeMonitor, ChangeStream, MonitorHandle};
use crate::reader::ProxyReader;
use crate::view::StatusView;
use crate::vpn::{self, PathMonitor, VpnVerdict};
use crate::writer::{ProxyWriter, ToggleOutcome};

pub struct Switcher<S: SystemStore> {
    inner: Arc<SwitcherInner<S>>,
}

impl<S: SystemStore> Clone for Switcher<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SwitcherInner<S: SystemStore> {
    config: SwitcherConfig,
    store: Arc<S>,
    authorizer: Authorizer<S>,
}

impl<S: SystemStore> Switcher<S> {
    pub fn new(store: S, config: SwitcherConfig) -> Self {
        Self {
            inner: Arc::new(SwitcherInner {
                config,
                store: Arc::new(store),
                authorizer: Authorizer::new(),
            }),
        }
    }

    pub fn config(&self) -> &SwitcherConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    fn reader(&self) -> ProxyReader<'_, S> {
        ProxyReader::new(
            &self.inner.store,
            &self.inner.authorizer,
            &self.inner.config.session_name,
        )
    }

    fn writer(&self) -> ProxyWriter<'_, S> {
        ProxyWriter::new(
            &self.inner.store,
            &self.inner.authorizer,
            &self.inner.config.session_name,
            self.inner.config.write_mode(),
        )
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> ProxySnapshot {
        self.reader().read()
    }

    pub fn is_enabled(&self) -> bool {
        self.reader().is_globally_enabled()
    }

    /// Interface-bound services, eligible or not. Tries silent
    /// authorization first and only prompts when configured to.
    pub fn interfaces(&self) -> Result<Vec<NetworkInterfaceRef>, CoreError> {
        let reader = self.reader();
        match reader.interfaces(AuthorizationMode::Silent) {
            Err(CoreError::AuthorizationDenied { .. }) if self.inner.config.interactive_auth => {
                debug!("silent authorization refused; retrying interactively");
                reader.interfaces(AuthorizationMode::Interactive)
            }
            other => other,
        }
    }

    pub fn vpn(&self) -> Result<VpnVerdict, CoreError> {
        vpn::assess(self.store())
    }

    /// Heuristic verdict; an unreadable path counts as no VPN.
    pub fn vpn_state(&self) -> VpnState {
        self.vpn().map(|verdict| verdict.state).unwrap_or_default()
    }

    pub fn status_view(&self) -> StatusView {
        StatusView::render(&self.snapshot(), self.vpn_state())
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Toggle unless the VPN heuristic says otherwise.
    pub fn request_toggle(&self) -> Result<ToggleOutcome, WriteError> {
        if self.vpn_state().is_active() {
            info!("VPN detected; toggle suppressed");
            return Ok(ToggleOutcome::BlockedByVpn);
        }
        self.writer().toggle()
    }

    /// Force a target state, subject to the same VPN gate.
    pub fn set_enabled(&self, enabled: bool) -> Result<ToggleOutcome, WriteError> {
        if self.vpn_state().is_active() {
            info!(enabled, "VPN detected; change suppressed");
            return Ok(ToggleOutcome::BlockedByVpn);
        }
        self.writer().set_enabled(enabled)
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn monitor_changes<F>(&self, on_change: F) -> Result<MonitorHandle, CoreError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        ChangeMonitor::subscribe(
            self.store(),
            &self.inner.config.monitor_name("proxies"),
            on_change,
        )
    }

    pub fn change_stream(&self) -> Result<ChangeStream, CoreError> {
        ChangeMonitor::channel(self.store(), &self.inner.config.monitor_name("proxies"))
    }

    pub fn monitor_path(&self) -> Result<PathMonitor, CoreError> {
        PathMonitor::start(
            Arc::clone(&self.inner.store),
            &self.inner.config.monitor_name("path"),
        )
    }
}
