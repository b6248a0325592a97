// ── Network path ──
//
// Status comes from reachability of the unspecified address, the interface
// set from the BSD names of services with active IPv4/IPv6 state.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};

use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::CFString;
use system_configuration::dynamic_store::{SCDynamicStore, SCDynamicStoreBuilder};
use system_configuration::network_configuration::{SCNetworkInterfaceType, get_interfaces};
use system_configuration::network_reachability::{ReachabilityFlags, SCNetworkReachability};
use system_configuration::sys::schema_definitions::kSCPropInterfaceName;
use tracing::trace;

use crate::error::Error;
use crate::types::{AvailableInterface, InterfaceKind, NetworkPath, PathStatus};

const ACTIVE_SERVICE_PATTERN: &str = "State:/Network/Service/.*/IPv[46]";

pub(super) fn current(name: &str) -> Result<NetworkPath, Error> {
    Ok(NetworkPath {
        status: status()?,
        interfaces: interfaces(name),
    })
}

fn status() -> Result<PathStatus, Error> {
    let reachability = SCNetworkReachability::from(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)));
    let flags = reachability
        .reachability()
        .map_err(|_| Error::ReachabilityUnavailable)?;
    trace!(?flags, "reachability flags");
    Ok(status_from_flags(flags))
}

fn status_from_flags(flags: ReachabilityFlags) -> PathStatus {
    if !flags.contains(ReachabilityFlags::REACHABLE) {
        PathStatus::Unsatisfied
    } else if flags.contains(ReachabilityFlags::CONNECTION_REQUIRED) {
        PathStatus::RequiresConnection
    } else {
        PathStatus::Satisfied
    }
}

fn kind_of(bsd_name: &str, types: &HashMap<String, SCNetworkInterfaceType>) -> InterfaceKind {
    if bsd_name.starts_with("lo") {
        return InterfaceKind::Loopback;
    }
    match types.get(bsd_name) {
        Some(SCNetworkInterfaceType::IEEE80211) => InterfaceKind::Wifi,
        Some(SCNetworkInterfaceType::Ethernet) => InterfaceKind::WiredEthernet,
        Some(SCNetworkInterfaceType::WWAN) => InterfaceKind::Cellular,
        _ => InterfaceKind::Other,
    }
}

fn interface_types() -> HashMap<String, SCNetworkInterfaceType> {
    get_interfaces()
        .iter()
        .filter_map(|interface| {
            let bsd_name = interface.bsd_name()?.to_string();
            Some((bsd_name, interface.interface_type()?))
        })
        .collect()
}

fn interface_name(store: &SCDynamicStore, key: &CFString, name_key: &CFString) -> Option<String> {
    let dict = store.get(key.clone())?.downcast_into::<CFDictionary>()?;
    // SAFETY: reinterprets the same retained dictionary with typed keys;
    // dynamic-store dictionaries are keyed by CFString.
    let dict: CFDictionary<CFString, CFType> =
        unsafe { CFDictionary::wrap_under_get_rule(dict.as_concrete_TypeRef()) };
    dict.find(name_key)
        .and_then(|value| value.downcast::<CFString>())
        .map(|s| s.to_string())
}

fn interfaces(name: &str) -> Vec<AvailableInterface> {
    let Some(store) = SCDynamicStoreBuilder::new(name).build() else {
        return Vec::new();
    };
    let Some(keys) = store.get_keys(ACTIVE_SERVICE_PATTERN) else {
        return Vec::new();
    };
    // SAFETY: schema constant, immutable for the process lifetime.
    let name_key = unsafe { CFString::wrap_under_get_rule(kSCPropInterfaceName) };
    let types = interface_types();

    let mut seen = Vec::new();
    for key in &keys {
        if let Some(bsd_name) = interface_name(&store, &key, &name_key) {
            if !seen.contains(&bsd_name) {
                seen.push(bsd_name);
            }
        }
    }
    seen.into_iter()
        .map(|bsd_name| {
            let kind = kind_of(&bsd_name, &types);
            AvailableInterface::new(bsd_name, kind)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tunnels_and_unknown_interfaces_are_other() {
        let types = HashMap::from([
            ("en0".to_owned(), SCNetworkInterfaceType::IEEE80211),
            ("en5".to_owned(), SCNetworkInterfaceType::Ethernet),
            ("pdp_ip0".to_owned(), SCNetworkInterfaceType::WWAN),
            ("bridge0".to_owned(), SCNetworkInterfaceType::Bridge),
        ]);
        assert_eq!(kind_of("en0", &types), InterfaceKind::Wifi);
        assert_eq!(kind_of("en5", &types), InterfaceKind::WiredEthernet);
        assert_eq!(kind_of("pdp_ip0", &types), InterfaceKind::Cellular);
        assert_eq!(kind_of("lo0", &types), InterfaceKind::Loopback);
        assert_eq!(kind_of("utun3", &types), InterfaceKind::Other);
        assert_eq!(kind_of("bridge0", &types), InterfaceKind::Other);
    }

    #[test]
    fn reachability_flags_map_to_status() {
        assert_eq!(
            status_from_flags(ReachabilityFlags::empty()),
            PathStatus::Unsatisfied
        );
        assert_eq!(
            status_from_flags(ReachabilityFlags::REACHABLE),
            PathStatus::Satisfied
        );
        assert_eq!(
            status_from_flags(
                ReachabilityFlags::REACHABLE | ReachabilityFlags::CONNECTION_REQUIRED
            ),
            PathStatus::RequiresConnection
        );
    }
}
