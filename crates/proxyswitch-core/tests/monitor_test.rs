#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use proxyswitch_core::VpnState;
use tokio::time::timeout;
use tokio_stream::StreamExt;

use common::{office, proxies, switcher, vpn_path, wifi_path};

const WAIT: Duration = Duration::from_secs(1);

#[test]
fn callback_fires_for_external_changes_until_dropped() {
    let store = office(false);
    let switcher = switcher(&store);
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let handle = switcher
        .monitor_changes(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    store.set_global(proxies(true));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    drop(handle);
    store.set_global(proxies(false));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(store.watcher_count(), 0);
}

#[tokio::test]
async fn toggle_is_observed_through_the_change_stream() {
    let store = office(true);
    let switcher = switcher(&store);
    let mut changes = switcher.change_stream().unwrap();

    let worker = switcher.clone();
    tokio::task::spawn_blocking(move || worker.request_toggle())
        .await
        .unwrap()
        .unwrap();

    // Commit and apply each produce a notification.
    timeout(WAIT, changes.changed()).await.unwrap().unwrap();
    timeout(WAIT, changes.changed()).await.unwrap().unwrap();
    assert!(!switcher.is_enabled());
}

#[tokio::test]
async fn change_stream_yields_one_item_per_notification() {
    let store = office(true);
    let switcher = switcher(&store);
    let changes = switcher.change_stream().unwrap();

    store.set_global(proxies(false));
    store.set_global(proxies(true));

    let items: Vec<()> = timeout(WAIT, changes.take(2).collect()).await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn change_stream_next_sees_external_changes() {
    let store = office(false);
    let switcher = switcher(&store);
    let mut changes = switcher.change_stream().unwrap();

    store.set_global(proxies(true));
    assert_eq!(timeout(WAIT, changes.next()).await.unwrap(), Some(()));
    assert!(switcher.is_enabled());
}

#[tokio::test]
async fn closing_the_stream_ends_it() {
    let store = office(true);
    let switcher = switcher(&store);
    let changes = switcher.change_stream().unwrap();

    store.set_global(proxies(false));
    let mut rx = changes.close();
    assert_eq!(rx.recv().await, Some(()));
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn path_monitor_publishes_vpn_verdicts() {
    let store = office(true);
    let switcher = switcher(&store);
    let mut monitor = switcher.monitor_path().unwrap();
    assert_eq!(monitor.current().state, VpnState::Clear);

    store.set_path(vpn_path());
    let verdict = timeout(WAIT, monitor.changed()).await.unwrap().unwrap();
    assert_eq!(verdict.state, VpnState::LikelyActive);
    assert_eq!(verdict.suspects().collect::<Vec<_>>(), ["utun3"]);

    store.set_path(wifi_path());
    let verdict = timeout(WAIT, monitor.changed()).await.unwrap().unwrap();
    assert_eq!(verdict.state, VpnState::Clear);
}

#[tokio::test]
async fn proxy_changes_do_not_wake_the_path_monitor() {
    let store = office(true);
    let switcher = switcher(&store);
    let monitor = switcher.monitor_path().unwrap();
    let mut rx = monitor.subscribe();

    store.set_global(proxies(false));
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn change_stream_stays_pending_until_notified() {
    let store = office(true);
    let switcher = switcher(&store);
    let mut changes = switcher.change_stream().unwrap();

    let mut next = tokio_test::task::spawn(changes.changed());
    tokio_test::assert_pending!(next.poll());

    store.set_global(proxies(false));
    assert!(next.is_woken());
    tokio_test::assert_ready_eq!(next.poll(), Some(()));
}
