#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use proxyswitch_api::{
    AuthorizationMode, MemoryStore, PreferencesSession, ProtocolSettings, ProxySettings,
    ServiceRecord, SystemStore, WatchKeys,
};

fn counting_watch(
    store: &MemoryStore,
    keys: &WatchKeys,
) -> (Arc<AtomicUsize>, proxyswitch_api::WatchHandle) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let handle = store
        .watch(
            "test",
            keys,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();
    (hits, handle)
}

fn wifi() -> ServiceRecord {
    ServiceRecord {
        id: "WIFI".into(),
        name: Some("Wi-Fi".into()),
        bsd_name: Some("en0".into()),
        enabled: true,
    }
}

#[test]
fn commit_and_apply_notify_proxy_watchers_only() {
    let store = MemoryStore::new().with_service(
        wifi(),
        Some(ProxySettings {
            http: ProtocolSettings::enabled_at("proxy.local", 3128),
            https: ProtocolSettings::default(),
        }),
    );
    let (proxy_hits, _proxy_handle) = counting_watch(&store, &WatchKeys::proxy_changes());
    let (path_hits, _path_handle) = counting_watch(&store, &WatchKeys::path_changes());

    let auth = store.authorize(AuthorizationMode::Interactive).unwrap();
    let mut session = store.open_session("test", &auth).unwrap();
    session.stage_proxy_enabled("WIFI", false).unwrap();
    assert_eq!(proxy_hits.load(Ordering::SeqCst), 0);

    session.commit().unwrap();
    session.apply().unwrap();
    assert_eq!(proxy_hits.load(Ordering::SeqCst), 2);
    assert_eq!(path_hits.load(Ordering::SeqCst), 0);

    let counters = store.counters();
    assert_eq!(counters.sessions, 1);
    assert_eq!(counters.commits, 1);
    assert_eq!(counters.applies, 1);
}

#[test]
fn apply_without_eligible_primary_keeps_global() {
    let global = ProxySettings {
        http: ProtocolSettings::enabled_at("10.1.1.1", 80),
        https: ProtocolSettings::default(),
    };
    let store = MemoryStore::new().with_global(global.clone());
    let auth = store.authorize(AuthorizationMode::Silent).unwrap();
    let mut session = store.open_session("test", &auth).unwrap();
    session.commit().unwrap();
    session.apply().unwrap();
    assert_eq!(store.global_proxies().unwrap(), global);
}
