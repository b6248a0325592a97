// ── Change monitor ──
//
// Registers for every dynamic-store key that can change the effective
// proxy configuration. Notifications carry no payload; consumers re-read
// the full state. Callbacks run on the backend's delivery thread, so the
// channel variant exists to hop onto the task that owns the UI.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use proxyswitch_api::{SystemStore, WatchHandle, WatchKeys};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tracing::{debug, trace};

use crate::error::CoreError;

/// Keeps a subscription alive; dropping it stops delivery.
#[derive(Debug)]
pub struct MonitorHandle {
    _watch: WatchHandle,
}

impl MonitorHandle {
    pub(crate) fn new(watch: WatchHandle) -> Self {
        Self { _watch: watch }
    }
}

pub struct ChangeMonitor;

impl ChangeMonitor {
    /// Invoke `on_change` for every proxy-relevant change.
    pub fn subscribe<S, F>(store: &S, name: &str, on_change: F) -> Result<MonitorHandle, CoreError>
    where
        S: SystemStore,
        F: Fn() + Send + Sync + 'static,
    {
        let watch = store.watch(name, &WatchKeys::proxy_changes(), Arc::new(on_change))?;
        debug!(name, "proxy change monitor registered");
        Ok(MonitorHandle::new(watch))
    }

    /// Forward every notification into a channel drained by the caller.
    pub fn channel<S: SystemStore>(store: &S, name: &str) -> Result<ChangeStream, CoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Self::subscribe(store, name, move || {
            trace!("proxy configuration changed");
            let _ = tx.send(());
        })?;
        Ok(ChangeStream { rx, handle })
    }
}

/// One item per change notification. Owns the subscription.
pub struct ChangeStream {
    rx: mpsc::UnboundedReceiver<()>,
    handle: MonitorHandle,
}

impl ChangeStream {
    /// Wait for the next notification.
    pub async fn changed(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Stop delivery; already queued notifications can still be drained.
    pub fn close(self) -> mpsc::UnboundedReceiver<()> {
        drop(self.handle);
        self.rx
    }
}

impl Stream for ChangeStream {
    type Item = ();

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<()>> {
        self.rx.poll_recv(cx)
    }
}
