use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

/// Which layer of the configuration an endpoint belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "interface", rename_all = "snake_case")]
pub enum ProxyScope {
    /// System-wide default, as seen by applications.
    Global,
    /// One network service, identified by its interface's BSD name.
    Interface(String),
}

impl ProxyScope {
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

impl std::fmt::Display for ProxyScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Interface(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProxyProtocol {
    Http,
    Https,
}

/// One protocol's proxy configuration for one scope.
///
/// `host` and `port` are either both present or both absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyEndpoint {
    pub scope: ProxyScope,
    pub protocol: ProxyProtocol,
    pub enabled: bool,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ProxyEndpoint {
    /// Build an endpoint from raw store values.
    ///
    /// The address is kept only when the host is non-empty and the port
    /// is a valid TCP port; otherwise both are dropped.
    pub fn new(
        scope: ProxyScope,
        protocol: ProxyProtocol,
        enabled: bool,
        host: Option<&str>,
        port: Option<i64>,
    ) -> Self {
        let port = port.and_then(|p| u16::try_from(p).ok()).filter(|p| *p > 0);
        let (host, port) = match (host.filter(|h| !h.is_empty()), port) {
            (Some(host), Some(port)) => (Some(host.to_owned()), Some(port)),
            _ => (None, None),
        };
        Self {
            scope,
            protocol,
            enabled,
            host,
            port,
        }
    }

    /// `host:port`, when both are known.
    pub fn address(&self) -> Option<String> {
        match (&self.host, self.port) {
            (Some(host), Some(port)) => Some(format!("{host}:{port}")),
            _ => None,
        }
    }
}

/// Point-in-time view of every enabled proxy endpoint.
///
/// Global entries come first (HTTP, then HTTPS), followed by interface
/// entries in service order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxySnapshot {
    pub endpoints: Vec<ProxyEndpoint>,
    pub captured_at: DateTime<Utc>,
}

impl ProxySnapshot {
    pub fn new(endpoints: Vec<ProxyEndpoint>) -> Self {
        Self {
            endpoints,
            captured_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// `true` iff the global scope has HTTP or HTTPS enabled. Host and
    /// port presence is irrelevant.
    pub fn is_globally_enabled(&self) -> bool {
        self.endpoints
            .iter()
            .any(|e| e.scope.is_global() && e.enabled)
    }

    /// Alias of [`is_globally_enabled`](Self::is_globally_enabled).
    pub fn is_any_enabled(&self) -> bool {
        self.is_globally_enabled()
    }

    pub fn global(&self) -> impl Iterator<Item = &ProxyEndpoint> {
        self.endpoints.iter().filter(|e| e.scope.is_global())
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &ProxyEndpoint> {
        self.endpoints.iter().filter(|e| !e.scope.is_global())
    }

    /// Equality ignoring the capture time.
    pub fn same_endpoints(&self, other: &Self) -> bool {
        self.endpoints == other.endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(host: Option<&str>, port: Option<i64>) -> ProxyEndpoint {
        ProxyEndpoint::new(ProxyScope::Global, ProxyProtocol::Http, true, host, port)
    }

    #[test]
    fn host_and_port_reported_together() {
        let e = endpoint(Some("proxy.local"), Some(3128));
        assert_eq!(e.address().as_deref(), Some("proxy.local:3128"));

        for (host, port) in [
            (Some(""), Some(3128)),
            (Some("proxy.local"), Some(0)),
            (Some("proxy.local"), None),
            (None, Some(3128)),
            (Some("proxy.local"), Some(70_000)),
            (Some("proxy.local"), Some(-1)),
        ] {
            let e = endpoint(host, port);
            assert_eq!((e.host, e.port), (None, None), "{host:?} {port:?}");
        }
    }

    #[test]
    fn global_enabled_ignores_interfaces_and_addresses() {
        let interface = ProxyEndpoint::new(
            ProxyScope::Interface("en0".into()),
            ProxyProtocol::Https,
            true,
            Some("10.0.0.1"),
            Some(8080),
        );
        assert!(!ProxySnapshot::new(vec![interface.clone()]).is_globally_enabled());

        let global = ProxyEndpoint::new(ProxyScope::Global, ProxyProtocol::Https, true, None, None);
        let snapshot = ProxySnapshot::new(vec![global, interface]);
        assert!(snapshot.is_globally_enabled());
        assert!(snapshot.is_any_enabled());
        assert_eq!(snapshot.global().count(), 1);
        assert_eq!(snapshot.interfaces().count(), 1);
    }

    #[test]
    fn scope_serializes_with_interface_name() {
        let json = serde_json::to_value(ProxyScope::Interface("en0".into())).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({ "kind": "interface", "interface": "en0" }))
        );
        assert_eq!(ProxyScope::Global.to_string(), "global");
        assert_eq!(ProxyProtocol::Https.to_string(), "https");
    }
}
