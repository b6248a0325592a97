// Stand-in backend for hosts without SystemConfiguration.

use crate::error::Error;
use crate::keys::WatchKeys;
use crate::store::{ChangeCallback, PreferencesSession, SystemStore, WatchHandle};
use crate::types::{AuthorizationMode, NetworkPath, ProxySettings, ServiceRecord};

const REASON: &str = "proxy settings are only managed on macOS";

/// Never constructed: [`UnsupportedStore::new`] always fails.
#[derive(Debug)]
pub struct UnsupportedStore {
    _private: (),
}

#[derive(Debug)]
pub enum NoAuthorization {}

#[derive(Debug)]
pub enum NoSession {}

impl UnsupportedStore {
    pub fn new() -> Result<Self, Error> {
        Err(Error::Unsupported(REASON))
    }
}

impl SystemStore for UnsupportedStore {
    type Authorization = NoAuthorization;
    type Session = NoSession;

    fn global_proxies(&self) -> Result<ProxySettings, Error> {
        Err(Error::Unsupported(REASON))
    }

    fn authorize(&self, _mode: AuthorizationMode) -> Result<NoAuthorization, Error> {
        Err(Error::Unsupported(REASON))
    }

    fn open_session(
        &self,
        _name: &str,
        authorization: &NoAuthorization,
    ) -> Result<NoSession, Error> {
        match *authorization {}
    }

    fn network_path(&self) -> Result<NetworkPath, Error> {
        Err(Error::Unsupported(REASON))
    }

    fn watch(
        &self,
        _name: &str,
        _keys: &WatchKeys,
        _callback: ChangeCallback,
    ) -> Result<WatchHandle, Error> {
        Err(Error::Unsupported(REASON))
    }
}

impl PreferencesSession for NoSession {
    fn services(&self) -> Result<Vec<ServiceRecord>, Error> {
        match *self {}
    }

    fn proxy_settings(&self, _service_id: &str) -> Result<ProxySettings, Error> {
        match *self {}
    }

    fn stage_proxy_enabled(&mut self, _service_id: &str, _enabled: bool) -> Result<(), Error> {
        match *self {}
    }

    fn commit(&mut self) -> Result<(), Error> {
        match *self {}
    }

    fn apply(&mut self) -> Result<(), Error> {
        match *self {}
    }
}
