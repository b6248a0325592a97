#![allow(clippy::unwrap_used)]

mod common;

use pretty_assertions::assert_eq;
use proxyswitch_api::{AuthorizationMode, MemoryStore, ProtocolSettings, ProxySettings, StatusCode};
use proxyswitch_core::{ProxyProtocol, ProxyScope, Switcher, SwitcherConfig};

use common::{office, proxies, service, switcher};

#[test]
fn repeated_reads_agree() {
    let store = office(true);
    let switcher = switcher(&store);
    let first = switcher.snapshot();
    let second = switcher.snapshot();
    assert!(first.same_endpoints(&second));
    assert_eq!(first.endpoints.len(), 6);
}

#[test]
fn global_enabled_needs_no_address() {
    let store = MemoryStore::new().with_global(ProxySettings {
        http: ProtocolSettings::default(),
        https: ProtocolSettings {
            enabled: true,
            host: None,
            port: None,
        },
    });
    let switcher = switcher(&store);
    let snapshot = switcher.snapshot();
    assert!(snapshot.is_globally_enabled());
    assert_eq!(snapshot.endpoints.len(), 1);
    assert_eq!(snapshot.endpoints[0].protocol, ProxyProtocol::Https);
    assert_eq!(snapshot.endpoints[0].address(), None);
}

#[test]
fn interface_only_proxies_do_not_count_as_enabled() {
    let store =
        MemoryStore::new().with_service(service("WIFI", Some("en0"), true), Some(proxies(true)));
    let switcher = switcher(&store);
    let snapshot = switcher.snapshot();
    assert!(!snapshot.is_globally_enabled());
    assert!(
        snapshot
            .endpoints
            .iter()
            .all(|e| e.scope == ProxyScope::Interface("en0".into()))
    );
}

#[test]
fn unreadable_global_yields_empty_snapshot() {
    let store = office(true);
    store.fail_global_read();
    let switcher = switcher(&store);
    assert!(switcher.snapshot().is_empty());
    assert!(!switcher.is_enabled());
}

#[test]
fn refused_silent_authorization_degrades_to_global_scope() {
    let store = office(true);
    store.deny_authorization(AuthorizationMode::Silent);
    let switcher = switcher(&store);

    let snapshot = switcher.snapshot();
    assert_eq!(snapshot.endpoints.len(), 2);
    assert!(snapshot.endpoints.iter().all(|e| e.scope.is_global()));
    assert_eq!(store.counters().sessions, 0);
}

#[test]
fn unavailable_session_degrades_to_global_scope() {
    let store = office(true);
    store.fail_session(StatusCode::FAILED);
    let switcher = switcher(&store);
    assert_eq!(switcher.snapshot().endpoints.len(), 2);
}

#[test]
fn interfaces_retry_interactively_when_allowed() {
    let store = office(true);
    store.deny_authorization(AuthorizationMode::Silent);

    let interfaces = switcher(&store).interfaces().unwrap();
    let names: Vec<&str> = interfaces.iter().map(|i| i.bsd_name.as_str()).collect();
    assert_eq!(names, ["en0", "en5", "", "bridge0"]);
    assert_eq!(interfaces.iter().filter(|i| i.is_eligible()).count(), 2);

    let silent_only = Switcher::new(
        store.clone(),
        SwitcherConfig {
            interactive_auth: false,
            ..SwitcherConfig::default()
        },
    );
    assert!(silent_only.interfaces().is_err());
}
