// ── Dynamic-store notification keys ──
//
// Keys are matched literally, patterns are POSIX regular expressions as
// understood by `SCDynamicStoreSetNotificationKeys`. The in-memory backend
// only needs the `.*` wildcard, which is all these patterns use.

pub const GLOBAL_PROXIES: &str = "State:/Network/Global/Proxies";
pub const GLOBAL_IPV4: &str = "State:/Network/Global/IPv4";
pub const GLOBAL_IPV6: &str = "State:/Network/Global/IPv6";
pub const GLOBAL_DNS: &str = "State:/Network/Global/DNS";

pub const STATE_SERVICE_PROXIES: &str = "State:/Network/Service/.*/Proxies";
pub const SETUP_SERVICE_PROXIES: &str = "Setup:/Network/Service/.*/Proxies";
pub const STATE_SERVICE_IPV4: &str = "State:/Network/Service/.*/IPv4";
pub const STATE_SERVICE_IPV6: &str = "State:/Network/Service/.*/IPv6";
pub const INTERFACE_LINK: &str = "State:/Network/Interface/.*/Link";

/// Dynamic-store key for a service entity in the given domain.
pub fn service_key(domain: &str, service_id: &str, entity: &str) -> String {
    format!("{domain}:/Network/Service/{service_id}/{entity}")
}

/// A set of keys and key patterns to watch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchKeys {
    pub keys: Vec<String>,
    pub patterns: Vec<String>,
}

impl WatchKeys {
    /// Everything that can change the effective proxy configuration.
    pub fn proxy_changes() -> Self {
        Self {
            keys: [GLOBAL_PROXIES, GLOBAL_IPV4, GLOBAL_IPV6, GLOBAL_DNS]
                .map(String::from)
                .to_vec(),
            patterns: [STATE_SERVICE_PROXIES, SETUP_SERVICE_PROXIES]
                .map(String::from)
                .to_vec(),
        }
    }

    /// Everything that can change the set of usable interfaces.
    pub fn path_changes() -> Self {
        Self {
            keys: [GLOBAL_IPV4, GLOBAL_IPV6].map(String::from).to_vec(),
            patterns: [STATE_SERVICE_IPV4, STATE_SERVICE_IPV6, INTERFACE_LINK]
                .map(String::from)
                .to_vec(),
        }
    }

    /// Returns `true` if a change to `key` would be delivered.
    pub fn matches(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key) || self.patterns.iter().any(|p| wildcard_match(p, key))
    }
}

/// Matches `key` against a pattern whose only metacharacter is `.*`.
fn wildcard_match(pattern: &str, key: &str) -> bool {
    let mut parts = pattern.split(".*");
    let Some(first) = parts.next() else {
        return key.is_empty();
    };
    let Some(mut rest) = key.strip_prefix(first) else {
        return false;
    };
    let tail: Vec<&str> = parts.collect();
    let Some((last, middle)) = tail.split_last() else {
        return rest.is_empty();
    };
    for part in middle {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}
