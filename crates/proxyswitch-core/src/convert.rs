// ── Store-to-domain conversions ──
//
// Bridges raw `proxyswitch_api` records into `proxyswitch_core::model`
// types. Disabled protocols are dropped here, so a snapshot only ever
// lists enabled endpoints.

use proxyswitch_api::{ProtocolSettings, ProxySettings, ServiceRecord};

use crate::model::{NetworkInterfaceRef, ProxyEndpoint, ProxyProtocol, ProxyScope};

fn endpoint(
    scope: &ProxyScope,
    protocol: ProxyProtocol,
    settings: &ProtocolSettings,
) -> Option<ProxyEndpoint> {
    settings.enabled.then(|| {
        ProxyEndpoint::new(
            scope.clone(),
            protocol,
            true,
            settings.host.as_deref(),
            settings.port,
        )
    })
}

/// Enabled endpoints of one scope, HTTP before HTTPS.
pub fn endpoints(scope: &ProxyScope, settings: &ProxySettings) -> Vec<ProxyEndpoint> {
    [
        endpoint(scope, ProxyProtocol::Http, &settings.http),
        endpoint(scope, ProxyProtocol::Https, &settings.https),
    ]
    .into_iter()
    .flatten()
    .collect()
}

impl From<ServiceRecord> for NetworkInterfaceRef {
    fn from(record: ServiceRecord) -> Self {
        Self {
            service_id: record.id,
            service_name: record.name,
            bsd_name: record.bsd_name.unwrap_or_default(),
            is_enabled: record.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn disabled_protocols_are_omitted() {
        let settings = ProxySettings {
            http: ProtocolSettings {
                enabled: false,
                host: Some("10.0.0.1".into()),
                port: Some(8080),
            },
            https: ProtocolSettings::enabled_at("10.0.0.1", 8443),
        };
        let endpoints = endpoints(&ProxyScope::Global, &settings);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].protocol, ProxyProtocol::Https);
        assert_eq!(endpoints[0].port, Some(8443));
    }

    #[test]
    fn unbound_service_is_not_eligible() {
        let record = ServiceRecord {
            id: "VPN".into(),
            name: Some("Corp VPN".into()),
            bsd_name: None,
            enabled: true,
        };
        let interface = NetworkInterfaceRef::from(record);
        assert!(!interface.is_eligible());
        assert_eq!(interface.label(), "Corp VPN");
    }
}
