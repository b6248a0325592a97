// proxyswitch-api: Access to the host network configuration store.

pub mod error;
pub mod keys;
pub mod memory;
pub mod store;
pub mod types;

#[cfg(target_os = "macos")]
pub mod macos;
#[cfg(not(target_os = "macos"))]
pub mod unsupported;

pub use error::{Error, StatusCode};
pub use keys::WatchKeys;
pub use memory::{MemoryAuthorization, MemoryCounters, MemorySession, MemoryStore};
pub use store::{
    ChangeCallback, PreferencesSession, SystemStore, WatchHandle, sort_by_service_order,
};
pub use types::{
    AuthorizationMode, AvailableInterface, InterfaceKind, NetworkPath, PathStatus,
    ProtocolSettings, ProxySettings, ServiceRecord,
};

/// The backend for the platform this binary was built for.
#[cfg(target_os = "macos")]
pub type PlatformStore = macos::MacStore;
#[cfg(not(target_os = "macos"))]
pub type PlatformStore = unsupported::UnsupportedStore;
