// ── Proxies dictionary ──
//
// Reads and rewrites the `HTTPEnable`/`HTTPProxy`/`HTTPPort` (and HTTPS)
// entries of a Proxies configuration dictionary, whether it comes from
// the dynamic store or from a service's protocol configuration.

use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::{CFDictionary, CFMutableDictionary};
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use system_configuration::sys::schema_definitions::{
    kSCPropNetProxiesHTTPEnable, kSCPropNetProxiesHTTPPort, kSCPropNetProxiesHTTPProxy,
    kSCPropNetProxiesHTTPSEnable, kSCPropNetProxiesHTTPSPort, kSCPropNetProxiesHTTPSProxy,
};

use crate::types::{ProtocolSettings, ProxySettings};

pub(super) type ProxyDictionary = CFDictionary<CFString, CFType>;

struct ProtocolKeys {
    enable: CFString,
    host: CFString,
    port: CFString,
}

impl ProtocolKeys {
    fn http() -> Self {
        // SAFETY: schema constants are immutable CFStrings owned by the
        // framework for the lifetime of the process.
        unsafe {
            Self {
                enable: CFString::wrap_under_get_rule(kSCPropNetProxiesHTTPEnable),
                host: CFString::wrap_under_get_rule(kSCPropNetProxiesHTTPProxy),
                port: CFString::wrap_under_get_rule(kSCPropNetProxiesHTTPPort),
            }
        }
    }

    fn https() -> Self {
        // SAFETY: as for `http`.
        unsafe {
            Self {
                enable: CFString::wrap_under_get_rule(kSCPropNetProxiesHTTPSEnable),
                host: CFString::wrap_under_get_rule(kSCPropNetProxiesHTTPSProxy),
                port: CFString::wrap_under_get_rule(kSCPropNetProxiesHTTPSPort),
            }
        }
    }
}

fn number(dict: &ProxyDictionary, key: &CFString) -> Option<i64> {
    dict.find(key)
        .and_then(|value| value.downcast::<CFNumber>())
        .and_then(|n| n.to_i64())
}

fn protocol(dict: &ProxyDictionary, keys: &ProtocolKeys) -> ProtocolSettings {
    ProtocolSettings {
        enabled: number(dict, &keys.enable) == Some(1),
        host: dict
            .find(&keys.host)
            .and_then(|value| value.downcast::<CFString>())
            .map(|s| s.to_string()),
        port: number(dict, &keys.port),
    }
}

pub(super) fn settings_from(dict: &ProxyDictionary) -> ProxySettings {
    ProxySettings {
        http: protocol(dict, &ProtocolKeys::http()),
        https: protocol(dict, &ProtocolKeys::https()),
    }
}

/// Set both enable flags, leaving every other entry untouched.
pub(super) fn set_enabled(dict: &mut CFMutableDictionary<CFString, CFType>, enabled: bool) {
    let flag = CFNumber::from(i32::from(enabled));
    for keys in [ProtocolKeys::http(), ProtocolKeys::https()] {
        dict.set(keys.enable, flag.as_CFType());
    }
}
