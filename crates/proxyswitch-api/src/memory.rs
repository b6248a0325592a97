// ── In-memory configuration store ──
//
// A `SystemStore` that keeps services, the live global proxy view and the
// network path in process. Faults can be injected per operation, and
// every mutation is delivered to matching watchers synchronously on the
// mutating thread.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::debug;

use crate::error::{Error, StatusCode};
use crate::keys::{self, WatchKeys};
use crate::store::{ChangeCallback, PreferencesSession, SystemStore, WatchHandle};
use crate::types::{AuthorizationMode, NetworkPath, ProxySettings, ServiceRecord};

/// `errAuthorizationCanceled`
const AUTH_CANCELED: i32 = -60006;
/// `errAuthorizationInteractionNotAllowed`
const AUTH_INTERACTION_NOT_ALLOWED: i32 = -60007;

/// Operation counts, for asserting what a caller actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryCounters {
    pub authorizations: usize,
    pub sessions: usize,
    pub stages: usize,
    pub commits: usize,
    pub applies: usize,
}

#[derive(Debug, Clone)]
struct MemoryService {
    record: ServiceRecord,
    proxies: Option<ProxySettings>,
}

#[derive(Debug, Default)]
struct Faults {
    denied: Vec<AuthorizationMode>,
    session: Option<StatusCode>,
    global_unavailable: bool,
    path_unavailable: bool,
    stage: HashSet<String>,
    commit: Option<StatusCode>,
    apply: Option<StatusCode>,
}

struct Watcher {
    id: u64,
    keys: WatchKeys,
    callback: ChangeCallback,
}

#[derive(Default)]
struct MemoryState {
    services: Vec<MemoryService>,
    global: ProxySettings,
    path: NetworkPath,
    faults: Faults,
    watchers: Vec<Watcher>,
    next_watch_id: u64,
    counters: MemoryCounters,
}

/// Shared, cloneable in-memory store. Clones observe the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

/// Authorization token handed out by [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAuthorization {
    pub mode: AuthorizationMode,
}

fn lock(state: &Mutex<MemoryState>) -> MutexGuard<'_, MemoryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Fixture setup ────────────────────────────────────────────────

    /// Append a network service; service order is insertion order.
    pub fn with_service(self, record: ServiceRecord, proxies: Option<ProxySettings>) -> Self {
        self.add_service(record, proxies);
        self
    }

    pub fn with_global(self, global: ProxySettings) -> Self {
        lock(&self.state).global = global;
        self
    }

    pub fn with_path(self, path: NetworkPath) -> Self {
        lock(&self.state).path = path;
        self
    }

    pub fn add_service(&self, record: ServiceRecord, proxies: Option<ProxySettings>) {
        lock(&self.state)
            .services
            .push(MemoryService { record, proxies });
    }

    /// Replace the live global view, as an external tool would.
    pub fn set_global(&self, global: ProxySettings) {
        lock(&self.state).global = global;
        self.notify(&[keys::GLOBAL_PROXIES.to_owned()]);
    }

    /// Replace the network path and notify path watchers.
    pub fn set_path(&self, path: NetworkPath) {
        lock(&self.state).path = path;
        self.notify(&[keys::GLOBAL_IPV4.to_owned()]);
    }

    // ── Fault injection ──────────────────────────────────────────────

    pub fn deny_authorization(&self, mode: AuthorizationMode) {
        lock(&self.state).faults.denied.push(mode);
    }

    pub fn fail_session(&self, status: StatusCode) {
        lock(&self.state).faults.session = Some(status);
    }

    pub fn fail_global_read(&self) {
        lock(&self.state).faults.global_unavailable = true;
    }

    pub fn fail_path_read(&self) {
        lock(&self.state).faults.path_unavailable = true;
    }

    pub fn fail_stage(&self, service_id: &str) {
        lock(&self.state).faults.stage.insert(service_id.to_owned());
    }

    pub fn fail_commit(&self, status: StatusCode) {
        lock(&self.state).faults.commit = Some(status);
    }

    pub fn fail_apply(&self, status: StatusCode) {
        lock(&self.state).faults.apply = Some(status);
    }

    pub fn clear_faults(&self) {
        lock(&self.state).faults = Faults::default();
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Committed proxy configuration of a service.
    pub fn service_proxies(&self, service_id: &str) -> Option<ProxySettings> {
        lock(&self.state)
            .services
            .iter()
            .find(|s| s.record.id == service_id)
            .and_then(|s| s.proxies.clone())
    }

    pub fn counters(&self) -> MemoryCounters {
        lock(&self.state).counters
    }

    pub fn watcher_count(&self) -> usize {
        lock(&self.state).watchers.len()
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Deliver a change of `changed` keys to every matching watcher.
    ///
    /// Callbacks run after the lock is released so they may read the store.
    fn notify(&self, changed: &[String]) {
        let callbacks: Vec<ChangeCallback> = lock(&self.state)
            .watchers
            .iter()
            .filter(|w| changed.iter().any(|key| w.keys.matches(key)))
            .map(|w| Arc::clone(&w.callback))
            .collect();
        debug!(keys = ?changed, watchers = callbacks.len(), "memory store change");
        for callback in callbacks {
            callback();
        }
    }
}

impl SystemStore for MemoryStore {
    type Authorization = MemoryAuthorization;
    type Session = MemorySession;

    fn global_proxies(&self) -> Result<ProxySettings, Error> {
        let state = lock(&self.state);
        if state.faults.global_unavailable {
            return Err(Error::ProxiesUnavailable);
        }
        Ok(state.global.clone())
    }

    fn authorize(&self, mode: AuthorizationMode) -> Result<MemoryAuthorization, Error> {
        let mut state = lock(&self.state);
        state.counters.authorizations += 1;
        if state.faults.denied.contains(&mode) {
            let status = match mode {
                AuthorizationMode::Interactive => AUTH_CANCELED,
                AuthorizationMode::Silent => AUTH_INTERACTION_NOT_ALLOWED,
            };
            return Err(Error::Authorization { status });
        }
        Ok(MemoryAuthorization { mode })
    }

    fn open_session(
        &self,
        name: &str,
        _authorization: &MemoryAuthorization,
    ) -> Result<MemorySession, Error> {
        let mut state = lock(&self.state);
        state.counters.sessions += 1;
        if let Some(status) = state.faults.session {
            return Err(Error::SessionUnavailable { status });
        }
        debug!(name, "memory preferences session opened");
        Ok(MemorySession {
            store: self.clone(),
            staged: Vec::new(),
        })
    }

    fn network_path(&self) -> Result<NetworkPath, Error> {
        let state = lock(&self.state);
        if state.faults.path_unavailable {
            return Err(Error::ReachabilityUnavailable);
        }
        Ok(state.path.clone())
    }

    fn watch(
        &self,
        name: &str,
        keys: &WatchKeys,
        callback: ChangeCallback,
    ) -> Result<WatchHandle, Error> {
        let mut state = lock(&self.state);
        let id = state.next_watch_id;
        state.next_watch_id += 1;
        state.watchers.push(Watcher {
            id,
            keys: keys.clone(),
            callback,
        });
        debug!(name, id, "memory store watcher registered");

        let weak: Weak<Mutex<MemoryState>> = Arc::downgrade(&self.state);
        Ok(WatchHandle::new(move || {
            if let Some(state) = weak.upgrade() {
                lock(&state).watchers.retain(|w| w.id != id);
            }
        }))
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// Editing session over a [`MemoryStore`]. Staged changes are private to
/// the session until committed.
pub struct MemorySession {
    store: MemoryStore,
    staged: Vec<(String, ProxySettings)>,
}

impl MemorySession {
    fn committed(&self, service_id: &str) -> Result<Option<ProxySettings>, Error> {
        lock(&self.store.state)
            .services
            .iter()
            .find(|s| s.record.id == service_id)
            .map(|s| s.proxies.clone())
            .ok_or_else(|| Error::ServiceNotFound {
                service_id: service_id.to_owned(),
            })
    }
}

impl PreferencesSession for MemorySession {
    fn services(&self) -> Result<Vec<ServiceRecord>, Error> {
        Ok(lock(&self.store.state)
            .services
            .iter()
            .map(|s| s.record.clone())
            .collect())
    }

    fn proxy_settings(&self, service_id: &str) -> Result<ProxySettings, Error> {
        if let Some((_, staged)) = self.staged.iter().find(|(id, _)| id == service_id) {
            return Ok(staged.clone());
        }
        self.committed(service_id)?
            .ok_or_else(|| Error::NoProxyProtocol {
                service_id: service_id.to_owned(),
            })
    }

    fn stage_proxy_enabled(&mut self, service_id: &str, enabled: bool) -> Result<(), Error> {
        let current = self.proxy_settings(service_id)?;
        {
            let mut state = lock(&self.store.state);
            state.counters.stages += 1;
            if state.faults.stage.contains(service_id) {
                return Err(Error::Stage {
                    service_id: service_id.to_owned(),
                    status: StatusCode::FAILED,
                });
            }
        }
        let next = current.with_enabled(enabled);
        match self.staged.iter_mut().find(|(id, _)| id == service_id) {
            Some((_, staged)) => *staged = next,
            None => self.staged.push((service_id.to_owned(), next)),
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Error> {
        let changed: Vec<String> = {
            let mut state = lock(&self.store.state);
            state.counters.commits += 1;
            if let Some(status) = state.faults.commit {
                return Err(Error::Commit(status));
            }
            for (id, settings) in self.staged.drain(..) {
                if let Some(service) = state.services.iter_mut().find(|s| s.record.id == id) {
                    service.proxies = Some(settings);
                }
            }
            state
                .services
                .iter()
                .map(|s| keys::service_key("Setup", &s.record.id, "Proxies"))
                .collect()
        };
        self.store.notify(&changed);
        Ok(())
    }

    /// Recomputes the live global view from the primary service: the first
    /// enabled service bound to an interface that carries proxy settings.
    fn apply(&mut self) -> Result<(), Error> {
        {
            let mut state = lock(&self.store.state);
            state.counters.applies += 1;
            if let Some(status) = state.faults.apply {
                return Err(Error::Apply(status));
            }
            let primary = state
                .services
                .iter()
                .find(|s| {
                    s.record.enabled
                        && s.record.bsd_name.as_deref().is_some_and(|n| !n.is_empty())
                        && s.proxies.is_some()
                })
                .and_then(|s| s.proxies.clone());
            if let Some(global) = primary {
                state.global = global;
            }
        }
        self.store.notify(&[keys::GLOBAL_PROXIES.to_owned()]);
        Ok(())
    }
}
