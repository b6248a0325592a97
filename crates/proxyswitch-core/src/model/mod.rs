// ── Domain model ──

pub mod network;
pub mod proxy;

pub use network::{
    AvailableInterface, InterfaceKind, NetworkInterfaceRef, NetworkPath, PathStatus, VpnState,
};
pub use proxy::{ProxyEndpoint, ProxyProtocol, ProxyScope, ProxySnapshot};
