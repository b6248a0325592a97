// ── VPN heuristic ──
//
// A satisfied path with any interface that is not Wi-Fi, cellular, wired
// Ethernet or loopback is taken as a VPN tunnel. False positives
// (bridges, Thunderbolt networking) and negatives (VPNs riding an
// ordinary interface) are accepted.

use std::sync::Arc;

use proxyswitch_api::{SystemStore, WatchKeys};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{InterfaceKind, NetworkPath, PathStatus, VpnState};
use crate::monitor::MonitorHandle;

/// `true` iff the path is satisfied and carries an interface of kind
/// [`InterfaceKind::Other`].
pub fn evaluate(path: &NetworkPath) -> bool {
    path.status == PathStatus::Satisfied
        && path
            .interfaces
            .iter()
            .any(|interface| interface.kind == InterfaceKind::Other)
}

/// A path together with the heuristic's reading of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VpnVerdict {
    pub path: NetworkPath,
    pub state: VpnState,
}

impl VpnVerdict {
    pub fn from_path(path: NetworkPath) -> Self {
        let state = VpnState::from(evaluate(&path));
        Self { path, state }
    }

    /// Interfaces that tripped the heuristic.
    pub fn suspects(&self) -> impl Iterator<Item = &str> {
        self.path
            .interfaces
            .iter()
            .filter(|i| i.kind == InterfaceKind::Other)
            .map(|i| i.name.as_str())
    }
}

/// Evaluate the store's current path.
pub fn assess<S: SystemStore>(store: &S) -> Result<VpnVerdict, CoreError> {
    Ok(VpnVerdict::from_path(store.network_path()?))
}

/// Like [`assess`], but an unreadable path counts as "no VPN".
fn assess_or_clear<S: SystemStore>(store: &S) -> VpnVerdict {
    assess(store).unwrap_or_else(|err| {
        warn!(error = %err, "network path unreadable; assuming no VPN");
        VpnVerdict::default()
    })
}

/// Re-evaluates the heuristic on every path change and publishes the
/// verdict through a `watch` channel.
pub struct PathMonitor {
    rx: watch::Receiver<VpnVerdict>,
    _handle: MonitorHandle,
}

impl PathMonitor {
    pub fn start<S: SystemStore>(store: Arc<S>, name: &str) -> Result<Self, CoreError> {
        let (tx, rx) = watch::channel(assess_or_clear(store.as_ref()));
        let observed = Arc::clone(&store);
        let watch = store.watch(
            name,
            &WatchKeys::path_changes(),
            Arc::new(move || {
                let verdict = assess_or_clear(observed.as_ref());
                debug!(
                    state = ?verdict.state,
                    interfaces = verdict.path.interfaces.len(),
                    "path changed"
                );
                tx.send_replace(verdict);
            }),
        )?;
        Ok(Self {
            rx,
            _handle: MonitorHandle::new(watch),
        })
    }

    pub fn current(&self) -> VpnVerdict {
        self.rx.borrow().clone()
    }

    /// A receiver that observes every published verdict.
    pub fn subscribe(&self) -> watch::Receiver<VpnVerdict> {
        self.rx.clone()
    }

    /// Wait for the next published verdict.
    pub async fn changed(&mut self) -> Option<VpnVerdict> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AvailableInterface;

    fn path(status: PathStatus, interfaces: &[(&str, InterfaceKind)]) -> NetworkPath {
        NetworkPath {
            status,
            interfaces: interfaces
                .iter()
                .map(|(name, kind)| AvailableInterface::new(*name, *kind))
                .collect(),
        }
    }

    #[test]
    fn tunnel_on_satisfied_path_is_vpn() {
        let p = path(
            PathStatus::Satisfied,
            &[("en0", InterfaceKind::Wifi), ("utun3", InterfaceKind::Other)],
        );
        assert!(evaluate(&p));
        assert_eq!(
            VpnVerdict::from_path(p).suspects().collect::<Vec<_>>(),
            ["utun3"]
        );
    }

    #[test]
    fn standard_interfaces_only_is_clear() {
        let p = path(
            PathStatus::Satisfied,
            &[
                ("en0", InterfaceKind::Wifi),
                ("en5", InterfaceKind::WiredEthernet),
                ("pdp_ip0", InterfaceKind::Cellular),
                ("lo0", InterfaceKind::Loopback),
            ],
        );
        assert!(!evaluate(&p));
    }

    #[test]
    fn unsatisfied_path_is_never_vpn() {
        for status in [PathStatus::Unsatisfied, PathStatus::RequiresConnection] {
            let p = path(status, &[("utun3", InterfaceKind::Other)]);
            assert!(!evaluate(&p));
        }
        assert!(!evaluate(&NetworkPath::default()));
    }
}
