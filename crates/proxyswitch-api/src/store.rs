// ── Store abstraction ──
//
// The seam between the domain logic and the host configuration store.
// `MacStore` drives SystemConfiguration; `MemoryStore` keeps everything
// in process for tests and dry runs.

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::keys::WatchKeys;
use crate::types::{AuthorizationMode, NetworkPath, ProxySettings, ServiceRecord};

/// Invoked on the backend's delivery thread for every matched change.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Read, authorize, edit and observe the network configuration.
pub trait SystemStore: Send + Sync + 'static {
    /// Capability permitting privileged preference edits.
    type Authorization: Send + Sync + 'static;
    type Session: PreferencesSession;

    /// Effective global proxy configuration (the live, merged view).
    fn global_proxies(&self) -> Result<ProxySettings, Error>;

    /// Acquire the right to edit system network preferences.
    fn authorize(&self, mode: AuthorizationMode) -> Result<Self::Authorization, Error>;

    /// Open a privileged editing session named `name`.
    fn open_session(
        &self,
        name: &str,
        authorization: &Self::Authorization,
    ) -> Result<Self::Session, Error>;

    /// Current set of usable interfaces and overall reachability.
    fn network_path(&self) -> Result<NetworkPath, Error>;

    /// Deliver `callback` whenever a key in `keys` changes, until the
    /// returned handle is dropped.
    fn watch(
        &self,
        name: &str,
        keys: &WatchKeys,
        callback: ChangeCallback,
    ) -> Result<WatchHandle, Error>;
}

/// A privileged editing session over the preferences store.
///
/// Changes are staged in memory until [`commit`](Self::commit) persists
/// them and [`apply`](Self::apply) pushes them into the live configuration.
pub trait PreferencesSession {
    /// All network services, in service order.
    fn services(&self) -> Result<Vec<ServiceRecord>, Error>;

    fn proxy_settings(&self, service_id: &str) -> Result<ProxySettings, Error>;

    /// Set both the HTTP and HTTPS enable flags of a service.
    fn stage_proxy_enabled(&mut self, service_id: &str, enabled: bool) -> Result<(), Error>;

    fn commit(&mut self) -> Result<(), Error>;

    fn apply(&mut self) -> Result<(), Error>;
}

/// Keeps a notification registration alive; dropping it stops delivery.
pub struct WatchHandle {
    stop: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchHandle {
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            stop: Some(Box::new(stop)),
        }
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.stop.is_some())
            .finish()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

/// Stable-sort `items` by their position in `order`. Items whose id is
/// missing or not listed keep their relative order after the listed ones,
/// so an empty order leaves enumeration order untouched.
pub fn sort_by_service_order<T>(
    items: &mut [T],
    order: &[String],
    id: impl Fn(&T) -> Option<String>,
) {
    items.sort_by_key(|item| {
        id(item)
            .and_then(|id| order.iter().position(|listed| *listed == id))
            .unwrap_or(usize::MAX)
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|id| (*id).to_owned()).collect()
    }

    #[test]
    fn empty_order_keeps_enumeration_order() {
        let mut services = ids(&["wifi", "eth", "bridge"]);
        sort_by_service_order(&mut services, &[], |s| Some(s.clone()));
        assert_eq!(services, ids(&["wifi", "eth", "bridge"]));
    }

    #[test]
    fn unlisted_services_go_last_in_enumeration_order() {
        let mut services = ids(&["bridge", "vpn", "wifi", "eth"]);
        sort_by_service_order(&mut services, &ids(&["eth", "wifi"]), |s| Some(s.clone()));
        assert_eq!(services, ids(&["eth", "wifi", "bridge", "vpn"]));
    }

    #[test]
    fn services_without_an_id_sort_after_listed_ones() {
        let mut services = vec![None, Some("wifi".to_owned()), Some("eth".to_owned())];
        sort_by_service_order(&mut services, &ids(&["eth", "wifi"]), Option::clone);
        assert_eq!(
            services,
            [Some("eth".to_owned()), Some("wifi".to_owned()), None]
        );
    }

    #[test]
    fn watch_handle_runs_stop_once_on_drop() {
        let stops = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&stops);
        let handle = WatchHandle::new(move || {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });
        assert_eq!(format!("{handle:?}"), "WatchHandle { active: true }");
        drop(handle);
        assert_eq!(stops.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
