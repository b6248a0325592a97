// ── Proxy state reader ──
//
// Produces a fresh `ProxySnapshot` on every call. Reads never fail the
// caller: a missing global view yields an empty snapshot, and anything
// that blocks per-service enumeration (no silent authorization, no
// session) degrades the snapshot to the global scope.

use proxyswitch_api::{AuthorizationMode, PreferencesSession, SystemStore};
use tracing::{debug, warn};

use crate::auth::Authorizer;
use crate::convert;
use crate::error::CoreError;
use crate::model::{NetworkInterfaceRef, ProxyEndpoint, ProxyScope, ProxySnapshot};

pub struct ProxyReader<'a, S: SystemStore> {
    store: &'a S,
    authorizer: &'a Authorizer<S>,
    session_name: &'a str,
}

impl<'a, S: SystemStore> ProxyReader<'a, S> {
    pub fn new(store: &'a S, authorizer: &'a Authorizer<S>, session_name: &'a str) -> Self {
        Self {
            store,
            authorizer,
            session_name,
        }
    }

    /// Global and per-interface endpoints.
    pub fn read(&self) -> ProxySnapshot {
        let Some(mut endpoints) = self.global_endpoints() else {
            return ProxySnapshot::empty();
        };
        endpoints.extend(self.interface_endpoints());
        ProxySnapshot::new(endpoints)
    }

    /// Global endpoints only; never touches authorization.
    pub fn read_global(&self) -> ProxySnapshot {
        ProxySnapshot::new(self.global_endpoints().unwrap_or_default())
    }

    pub fn is_globally_enabled(&self) -> bool {
        self.read_global().is_globally_enabled()
    }

    /// Every interface-bound service, eligible or not, in service order.
    pub fn interfaces(
        &self,
        mode: AuthorizationMode,
    ) -> Result<Vec<NetworkInterfaceRef>, CoreError> {
        let authorization = self.authorizer.acquire(self.store, mode)?;
        let session = self.store.open_session(self.session_name, authorization)?;
        Ok(session
            .services()?
            .into_iter()
            .map(NetworkInterfaceRef::from)
            .collect())
    }

    fn global_endpoints(&self) -> Option<Vec<ProxyEndpoint>> {
        match self.store.global_proxies() {
            Ok(settings) => Some(convert::endpoints(&ProxyScope::Global, &settings)),
            Err(err) => {
                warn!(error = %err, "global proxy configuration unreadable");
                None
            }
        }
    }

    fn interface_endpoints(&self) -> Vec<ProxyEndpoint> {
        let silent = self.authorizer.acquire(self.store, AuthorizationMode::Silent);
        let authorization = match silent {
            Ok(authorization) => authorization,
            Err(err) => {
                debug!(error = %err, "no silent authorization; reporting global scope only");
                return Vec::new();
            }
        };
        let session = match self.store.open_session(self.session_name, authorization) {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "preferences session unavailable; reporting global scope only");
                return Vec::new();
            }
        };
        let services = match session.services() {
            Ok(services) => services,
            Err(err) => {
                warn!(error = %err, "network services unreadable");
                return Vec::new();
            }
        };

        let mut endpoints = Vec::new();
        for interface in services.into_iter().map(NetworkInterfaceRef::from) {
            if !interface.is_eligible() {
                continue;
            }
            match session.proxy_settings(&interface.service_id) {
                Ok(settings) => {
                    let scope = ProxyScope::Interface(interface.bsd_name.clone());
                    endpoints.extend(convert::endpoints(&scope, &settings));
                }
                Err(err) => debug!(service = interface.label(), error = %err, "no proxy settings"),
            }
        }
        endpoints
    }
}
