//! SystemConfiguration + Authorization Services backend.
//!
//! The only module in the workspace that talks to the OS through FFI.
#![allow(unsafe_code)]

mod authorization;
mod path;
mod preferences;
mod proxies;
mod watch;

use core_foundation::base::TCFType;
use core_foundation::dictionary::CFDictionary;
use system_configuration::sys::dynamic_store_copy_specific::SCDynamicStoreCopyProxies;
use tracing::debug;

pub use authorization::MacAuthorization;
pub use preferences::MacSession;

use crate::error::Error;
use crate::keys::WatchKeys;
use crate::store::{ChangeCallback, SystemStore, WatchHandle};
use crate::types::{AuthorizationMode, NetworkPath, ProxySettings};

/// Dynamic-store session name used for one-shot reads.
const READER_NAME: &str = "proxyswitch-reader";

/// The host's live network configuration.
#[derive(Debug, Clone, Default)]
pub struct MacStore {
    _private: (),
}

impl MacStore {
    #[allow(clippy::unnecessary_wraps)]
    pub fn new() -> Result<Self, Error> {
        Ok(Self { _private: () })
    }
}

impl SystemStore for MacStore {
    type Authorization = MacAuthorization;
    type Session = MacSession;

    fn global_proxies(&self) -> Result<ProxySettings, Error> {
        // SAFETY: a null store asks for a temporary session; the result
        // follows the copy rule and is checked for null below.
        let raw = unsafe { SCDynamicStoreCopyProxies(std::ptr::null()) };
        if raw.is_null() {
            return Err(Error::ProxiesUnavailable);
        }
        // SAFETY: non-null dictionary owned by us from here on.
        let dict = unsafe { CFDictionary::wrap_under_create_rule(raw) };
        Ok(proxies::settings_from(&dict))
    }

    fn authorize(&self, mode: AuthorizationMode) -> Result<MacAuthorization, Error> {
        debug!(?mode, "requesting authorization");
        MacAuthorization::acquire(mode)
    }

    fn open_session(
        &self,
        name: &str,
        authorization: &MacAuthorization,
    ) -> Result<MacSession, Error> {
        MacSession::open(name, authorization)
    }

    fn network_path(&self) -> Result<NetworkPath, Error> {
        path::current(READER_NAME)
    }

    fn watch(
        &self,
        name: &str,
        keys: &WatchKeys,
        callback: ChangeCallback,
    ) -> Result<WatchHandle, Error> {
        watch::spawn(name, keys, callback)
    }
}
