// proxyswitch-core: Proxy state model and toggle protocol on top of proxyswitch-api.

pub mod auth;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod monitor;
pub mod reader;
pub mod switcher;
pub mod view;
pub mod vpn;
pub mod writer;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::Authorizer;
pub use config::{DEFAULT_SESSION_NAME, SwitcherConfig};
pub use error::{CoreError, SANDBOX_HINT, StageFailure, WriteError};
pub use monitor::{ChangeMonitor, ChangeStream, MonitorHandle};
pub use reader::ProxyReader;
pub use switcher::Switcher;
pub use view::{StatusState, StatusView};
pub use vpn::{PathMonitor, VpnVerdict, evaluate};
pub use writer::{ProxyWriter, ToggleOutcome, ToggleReport};

pub use model::{
    AvailableInterface, InterfaceKind, NetworkInterfaceRef, NetworkPath, PathStatus,
    ProxyEndpoint, ProxyProtocol, ProxyScope, ProxySnapshot, VpnState,
};
