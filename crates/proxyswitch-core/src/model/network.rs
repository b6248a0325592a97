use serde::Serialize;

pub use proxyswitch_api::{AvailableInterface, InterfaceKind, NetworkPath, PathStatus};

/// An interface-bound network service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInterfaceRef {
    pub service_id: String,
    pub service_name: Option<String>,
    /// Hardware name of the bound interface, empty when unbound.
    pub bsd_name: String,
    pub is_enabled: bool,
}

impl NetworkInterfaceRef {
    /// Only enabled services bound to a hardware interface are touched by
    /// a toggle.
    pub fn is_eligible(&self) -> bool {
        self.is_enabled && !self.bsd_name.is_empty()
    }

    /// Service name if known, else the BSD name.
    pub fn label(&self) -> &str {
        self.service_name.as_deref().unwrap_or(&self.bsd_name)
    }
}

/// Outcome of the VPN heuristic for the current path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VpnState {
    #[default]
    Clear,
    LikelyActive,
}

impl VpnState {
    pub fn is_active(self) -> bool {
        self == Self::LikelyActive
    }
}

impl From<bool> for VpnState {
    fn from(active: bool) -> Self {
        if active { Self::LikelyActive } else { Self::Clear }
    }
}
