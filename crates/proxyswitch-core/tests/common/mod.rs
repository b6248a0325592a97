#![allow(dead_code)]

use proxyswitch_api::{
    AvailableInterface, InterfaceKind, MemoryStore, NetworkPath, PathStatus, ProtocolSettings,
    ProxySettings, ServiceRecord,
};
use proxyswitch_core::{Switcher, SwitcherConfig};

pub fn service(id: &str, bsd_name: Option<&str>, enabled: bool) -> ServiceRecord {
    ServiceRecord {
        id: id.into(),
        name: Some(format!("{id} service")),
        bsd_name: bsd_name.map(Into::into),
        enabled,
    }
}

pub fn proxies(enabled: bool) -> ProxySettings {
    ProxySettings {
        http: ProtocolSettings {
            enabled,
            host: Some("10.0.0.1".into()),
            port: Some(8080),
        },
        https: ProtocolSettings {
            enabled,
            host: Some("10.0.0.1".into()),
            port: Some(8443),
        },
    }
}

pub fn wifi_path() -> NetworkPath {
    NetworkPath {
        status: PathStatus::Satisfied,
        interfaces: vec![AvailableInterface::new("en0", InterfaceKind::Wifi)],
    }
}

pub fn vpn_path() -> NetworkPath {
    NetworkPath {
        status: PathStatus::Satisfied,
        interfaces: vec![
            AvailableInterface::new("en0", InterfaceKind::Wifi),
            AvailableInterface::new("utun3", InterfaceKind::Other),
        ],
    }
}

/// Wi-Fi and Ethernet services plus an unbound VPN service and a disabled
/// Thunderbolt bridge; the global view mirrors Wi-Fi.
pub fn office(enabled: bool) -> MemoryStore {
    MemoryStore::new()
        .with_service(service("WIFI", Some("en0"), true), Some(proxies(enabled)))
        .with_service(service("ETH", Some("en5"), true), Some(proxies(enabled)))
        .with_service(service("VPN", None, true), Some(proxies(enabled)))
        .with_service(
            service("BRIDGE", Some("bridge0"), false),
            Some(proxies(enabled)),
        )
        .with_global(proxies(enabled))
        .with_path(wifi_path())
}

pub fn switcher(store: &MemoryStore) -> Switcher<MemoryStore> {
    Switcher::new(store.clone(), SwitcherConfig::default())
}

/// HTTP and HTTPS enable flags of a service's committed settings.
pub fn flags(store: &MemoryStore, id: &str) -> Option<(bool, bool)> {
    store
        .service_proxies(id)
        .map(|p| (p.http.enabled, p.https.enabled))
}
