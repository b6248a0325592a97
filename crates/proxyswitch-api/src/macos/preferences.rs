use std::ffi::c_int;
use std::ptr;

use core_foundation::base::{CFType, TCFType, kCFAllocatorDefault};
use core_foundation::dictionary::{
    CFDictionary, CFDictionaryCreateMutableCopy, CFDictionaryRef, CFMutableDictionary,
};
use core_foundation::string::CFString;
use core_foundation::{declare_TCFType, impl_TCFType};
use system_configuration::network_configuration::{SCNetworkService, SCNetworkSet};
use system_configuration::preferences::SCPreferences;
use system_configuration::sys::network_configuration::{
    SCNetworkProtocolGetConfiguration, SCNetworkProtocolGetTypeID, SCNetworkProtocolRef,
    SCNetworkProtocolSetConfiguration, SCNetworkServiceCopyProtocol, SCNetworkServiceGetEnabled,
    SCNetworkServiceGetName, SCNetworkSetCopyCurrent,
};
use system_configuration::sys::preferences::{
    SCPreferencesApplyChanges, SCPreferencesCommitChanges, SCPreferencesCreateWithAuthorization,
};
use system_configuration::sys::schema_definitions::kSCEntNetProxies;
use tracing::debug;

use super::authorization::MacAuthorization;
use super::proxies::{self, ProxyDictionary};
use crate::error::{Error, StatusCode};
use crate::store::{PreferencesSession, sort_by_service_order};
use crate::types::{ProxySettings, ServiceRecord};

#[link(name = "SystemConfiguration", kind = "framework")]
unsafe extern "C" {
    fn SCError() -> c_int;
}

/// Status of the most recent SystemConfiguration call on this thread.
pub(super) fn last_status() -> StatusCode {
    // SAFETY: `SCError` reads thread-local state and has no preconditions.
    StatusCode(unsafe { SCError() })
}

declare_TCFType!(ServiceProtocol, SCNetworkProtocolRef);
impl_TCFType!(
    ServiceProtocol,
    SCNetworkProtocolRef,
    SCNetworkProtocolGetTypeID
);

/// Privileged editing session over `/Library/Preferences/SystemConfiguration`.
pub struct MacSession {
    prefs: SCPreferences,
}

impl MacSession {
    pub(crate) fn open(name: &str, authorization: &MacAuthorization) -> Result<Self, Error> {
        let name = CFString::new(name);
        // SAFETY: every argument is either null (defaults) or a live CF
        // object / authorization reference borrowed for the call.
        let raw = unsafe {
            SCPreferencesCreateWithAuthorization(
                kCFAllocatorDefault,
                name.as_concrete_TypeRef(),
                ptr::null(),
                authorization.as_preferences_ref(),
            )
        };
        if raw.is_null() {
            return Err(Error::SessionUnavailable {
                status: last_status(),
            });
        }
        // SAFETY: `raw` is non-null and returned under the create rule.
        let prefs = unsafe { SCPreferences::wrap_under_create_rule(raw) };
        Ok(Self { prefs })
    }

    /// Services ordered by the current set's service order; services the
    /// order does not mention keep their enumeration order at the end.
    fn ordered_services(&self) -> Vec<SCNetworkService> {
        let mut services: Vec<SCNetworkService> = SCNetworkService::get_services(&self.prefs)
            .iter()
            .map(|service| service.clone())
            .collect();
        let order = self.service_order();
        sort_by_service_order(&mut services, &order, |service| {
            service.id().map(|id| id.to_string())
        });
        services
    }

    /// Service ids of the current set, or nothing when no set is current
    /// (fresh install, or every set removed).
    fn service_order(&self) -> Vec<String> {
        // SAFETY: the preferences session is live; the result follows the
        // copy rule and may be null.
        let raw = unsafe { SCNetworkSetCopyCurrent(self.prefs.as_concrete_TypeRef()) };
        if raw.is_null() {
            debug!("no current network set; keeping enumeration order");
            return Vec::new();
        }
        // SAFETY: non-null, returned under the copy (create) rule.
        let set = unsafe { SCNetworkSet::wrap_under_create_rule(raw) };
        set.service_order().iter().map(|id| id.to_string()).collect()
    }

    fn find_service(&self, service_id: &str) -> Result<SCNetworkService, Error> {
        SCNetworkService::get_services(&self.prefs)
            .iter()
            .find(|service| service.id().is_some_and(|id| id.to_string() == service_id))
            .map(|service| service.clone())
            .ok_or_else(|| Error::ServiceNotFound {
                service_id: service_id.to_owned(),
            })
    }

    fn proxies_protocol(
        service: &SCNetworkService,
        service_id: &str,
    ) -> Result<ServiceProtocol, Error> {
        // SAFETY: schema constant, immutable for the process lifetime.
        let protocol_type = unsafe { CFString::wrap_under_get_rule(kSCEntNetProxies) };
        // SAFETY: both references are live for the call.
        let raw = unsafe {
            SCNetworkServiceCopyProtocol(
                service.as_concrete_TypeRef(),
                protocol_type.as_concrete_TypeRef(),
            )
        };
        if raw.is_null() {
            return Err(Error::NoProxyProtocol {
                service_id: service_id.to_owned(),
            });
        }
        // SAFETY: non-null, returned under the copy (create) rule.
        Ok(unsafe { ServiceProtocol::wrap_under_create_rule(raw) })
    }

    fn configuration(
        protocol: &ServiceProtocol,
        service_id: &str,
    ) -> Result<ProxyDictionary, Error> {
        // SAFETY: the protocol is live; the result follows the get rule.
        let raw: CFDictionaryRef =
            unsafe { SCNetworkProtocolGetConfiguration(protocol.as_concrete_TypeRef()) };
        if raw.is_null() {
            return Err(Error::NoProxyProtocol {
                service_id: service_id.to_owned(),
            });
        }
        // SAFETY: non-null dictionary retained for our wrapper.
        Ok(unsafe { CFDictionary::wrap_under_get_rule(raw) })
    }
}

fn service_record(service: &SCNetworkService) -> Option<ServiceRecord> {
    let id = service.id()?.to_string();
    // SAFETY: the service reference is live for both calls; the name is a
    // borrowed (get rule) CFString or null.
    let (enabled, name) = unsafe {
        let enabled = SCNetworkServiceGetEnabled(service.as_concrete_TypeRef()) != 0;
        let name = SCNetworkServiceGetName(service.as_concrete_TypeRef());
        let name = (!name.is_null()).then(|| CFString::wrap_under_get_rule(name).to_string());
        (enabled, name)
    };
    let bsd_name = service
        .network_interface()
        .and_then(|interface| interface.bsd_name())
        .map(|bsd| bsd.to_string());
    Some(ServiceRecord {
        id,
        name,
        bsd_name,
        enabled,
    })
}

impl PreferencesSession for MacSession {
    fn services(&self) -> Result<Vec<ServiceRecord>, Error> {
        Ok(self
            .ordered_services()
            .iter()
            .filter_map(service_record)
            .collect())
    }

    fn proxy_settings(&self, service_id: &str) -> Result<ProxySettings, Error> {
        let service = self.find_service(service_id)?;
        let protocol = Self::proxies_protocol(&service, service_id)?;
        let config = Self::configuration(&protocol, service_id)?;
        Ok(proxies::settings_from(&config))
    }

    fn stage_proxy_enabled(&mut self, service_id: &str, enabled: bool) -> Result<(), Error> {
        let service = self.find_service(service_id)?;
        let protocol = Self::proxies_protocol(&service, service_id)?;
        let config = Self::configuration(&protocol, service_id)?;

        // SAFETY: `config` is a live dictionary; the copy follows the create rule.
        let mut updated: CFMutableDictionary<CFString, CFType> = unsafe {
            CFMutableDictionary::wrap_under_create_rule(CFDictionaryCreateMutableCopy(
                kCFAllocatorDefault,
                0,
                config.as_concrete_TypeRef(),
            ))
        };
        proxies::set_enabled(&mut updated, enabled);

        // SAFETY: protocol and dictionary are live for the call.
        let staged = unsafe {
            SCNetworkProtocolSetConfiguration(
                protocol.as_concrete_TypeRef(),
                updated.as_concrete_TypeRef().cast_const(),
            )
        };
        if staged == 0 {
            return Err(Error::Stage {
                service_id: service_id.to_owned(),
                status: last_status(),
            });
        }
        debug!(service_id, enabled, "proxy change staged");
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Error> {
        // SAFETY: the preferences session is live.
        if unsafe { SCPreferencesCommitChanges(self.prefs.as_concrete_TypeRef()) } == 0 {
            return Err(Error::Commit(last_status()));
        }
        Ok(())
    }

    fn apply(&mut self) -> Result<(), Error> {
        // SAFETY: the preferences session is live.
        if unsafe { SCPreferencesApplyChanges(self.prefs.as_concrete_TypeRef()) } == 0 {
            return Err(Error::Apply(last_status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_protocol_wraps_the_protocol_cf_type() {
        // SAFETY: the type-id lookup has no preconditions.
        let expected = unsafe { SCNetworkProtocolGetTypeID() };
        assert_eq!(<ServiceProtocol as TCFType>::type_id(), expected);
    }
}
