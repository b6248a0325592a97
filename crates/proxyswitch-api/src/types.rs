// ── Raw store records ──
//
// Backend-neutral shapes of what the configuration store hands back.
// `proxyswitch-core` converts these into its domain model.

use serde::Serialize;
use strum::{Display, EnumString};

/// Proxy configuration for a single protocol, as stored.
///
/// Values are passed through untouched: `port` keeps whatever integer the
/// store holds, and `host` may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProtocolSettings {
    pub enabled: bool,
    pub host: Option<String>,
    pub port: Option<i64>,
}

impl ProtocolSettings {
    pub fn enabled_at(host: impl Into<String>, port: i64) -> Self {
        Self {
            enabled: true,
            host: Some(host.into()),
            port: Some(port),
        }
    }
}

/// HTTP and HTTPS proxy configuration for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProxySettings {
    pub http: ProtocolSettings,
    pub https: ProtocolSettings,
}

impl ProxySettings {
    pub fn with_enabled(&self, enabled: bool) -> Self {
        let mut next = self.clone();
        next.http.enabled = enabled;
        next.https.enabled = enabled;
        next
    }
}

/// A network service as enumerated by a preferences session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRecord {
    pub id: String,
    /// User-visible service name ("Wi-Fi", "USB 10/100/1000 LAN").
    pub name: Option<String>,
    /// Hardware (BSD) name of the bound interface, e.g. `en0`.
    pub bsd_name: Option<String>,
    pub enabled: bool,
}

// ── Network path ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PathStatus {
    Satisfied,
    #[default]
    Unsatisfied,
    RequiresConnection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InterfaceKind {
    Wifi,
    Cellular,
    WiredEthernet,
    Loopback,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableInterface {
    pub name: String,
    pub kind: InterfaceKind,
}

impl AvailableInterface {
    pub fn new(name: impl Into<String>, kind: InterfaceKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Current usable interfaces plus overall reachability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkPath {
    pub status: PathStatus,
    pub interfaces: Vec<AvailableInterface>,
}

/// Whether acquiring an authorization may show the OS credentials prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationMode {
    Interactive,
    Silent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_enabled_flips_both_protocols_and_keeps_endpoints() {
        let settings = ProxySettings {
            http: ProtocolSettings::enabled_at("10.0.0.1", 8080),
            https: ProtocolSettings::default(),
        };
        let off = settings.with_enabled(false);
        assert!(!off.http.enabled);
        assert!(!off.https.enabled);
        assert_eq!(off.http.host.as_deref(), Some("10.0.0.1"));

        let on = settings.with_enabled(true);
        assert!(on.https.enabled);
        assert_eq!(on.https.host, None);
    }

    #[test]
    fn path_status_parses_snake_case() {
        assert_eq!(
            "requires_connection".parse::<PathStatus>().ok(),
            Some(PathStatus::RequiresConnection)
        );
        assert_eq!(InterfaceKind::WiredEthernet.to_string(), "wired_ethernet");
    }
}
