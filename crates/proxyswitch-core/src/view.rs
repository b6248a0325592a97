// ── Status presentation model ──
//
// What a status item shows: one of three states, the SF Symbol name for
// its icon, a tooltip, and the menu lines.

use serde::Serialize;
use strum::Display;

use crate::model::{ProxyEndpoint, ProxySnapshot, VpnState};

pub const ICON_OFF: &str = "network.slash";
pub const ICON_ON: &str = "network";
pub const ICON_VPN_BLOCKED: &str = "network.badge.shield.half.filled";

pub const LINE_DISABLED: &str = "Proxy is disabled";
pub const LINE_VPN_BLOCKED: &str = "VPN detected — proxy toggle disabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusState {
    Off,
    On,
    VpnBlocked,
}

impl StatusState {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Off => ICON_OFF,
            Self::On => ICON_ON,
            Self::VpnBlocked => ICON_VPN_BLOCKED,
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Self::Off => "Proxy off",
            Self::On => "Proxy on",
            Self::VpnBlocked => LINE_VPN_BLOCKED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub state: StatusState,
    pub icon: &'static str,
    pub tooltip: &'static str,
    pub lines: Vec<String>,
}

impl StatusView {
    pub fn render(snapshot: &ProxySnapshot, vpn: VpnState) -> Self {
        let state = if vpn.is_active() {
            StatusState::VpnBlocked
        } else if snapshot.is_globally_enabled() {
            StatusState::On
        } else {
            StatusState::Off
        };

        let lines = if state == StatusState::VpnBlocked {
            vec![LINE_VPN_BLOCKED.to_owned()]
        } else if snapshot.is_empty() {
            vec![LINE_DISABLED.to_owned()]
        } else {
            snapshot.endpoints.iter().map(endpoint_line).collect()
        };

        Self {
            state,
            icon: state.icon(),
            tooltip: state.tooltip(),
            lines,
        }
    }

    /// Whether a toggle may be offered.
    pub fn can_toggle(&self) -> bool {
        self.state != StatusState::VpnBlocked
    }
}

/// `http: host:port` for the global scope, `en0 http: host:port` per
/// interface, `enabled (no host/port)` when the address is incomplete.
pub fn endpoint_line(endpoint: &ProxyEndpoint) -> String {
    let label = if endpoint.scope.is_global() {
        endpoint.protocol.to_string()
    } else {
        format!("{} {}", endpoint.scope, endpoint.protocol)
    };
    match endpoint.address() {
        Some(address) => format!("{label}: {address}"),
        None => format!("{label}: enabled (no host/port)"),
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::model::{ProxyProtocol, ProxyScope};

    fn snapshot() -> ProxySnapshot {
        ProxySnapshot::new(vec![
            ProxyEndpoint::new(
                ProxyScope::Global,
                ProxyProtocol::Http,
                true,
                Some("10.0.0.1"),
                Some(8080),
            ),
            ProxyEndpoint::new(ProxyScope::Global, ProxyProtocol::Https, true, None, None),
            ProxyEndpoint::new(
                ProxyScope::Interface("en0".into()),
                ProxyProtocol::Http,
                true,
                Some("10.0.0.1"),
                Some(8080),
            ),
        ])
    }

    #[test]
    fn on_view_lists_every_endpoint() {
        let view = StatusView::render(&snapshot(), VpnState::Clear);
        assert_eq!(view.state, StatusState::On);
        assert_eq!(view.icon, "network");
        assert_snapshot!(view.lines.join("\n"), @r"
        http: 10.0.0.1:8080
        https: enabled (no host/port)
        en0 http: 10.0.0.1:8080
        ");
    }

    #[test]
    fn empty_snapshot_is_off_and_disabled() {
        let view = StatusView::render(&ProxySnapshot::empty(), VpnState::Clear);
        assert_eq!(view.state, StatusState::Off);
        assert_eq!(view.icon, "network.slash");
        assert_eq!(view.lines, [LINE_DISABLED]);
        assert!(view.can_toggle());
    }

    #[test]
    fn vpn_replaces_lines_and_blocks_toggle() {
        let view = StatusView::render(&snapshot(), VpnState::LikelyActive);
        assert_eq!(view.state, StatusState::VpnBlocked);
        assert_eq!(view.icon, ICON_VPN_BLOCKED);
        assert_eq!(view.lines, [LINE_VPN_BLOCKED]);
        assert_eq!(view.tooltip, LINE_VPN_BLOCKED);
        assert!(!view.can_toggle());
    }
}
