// ── Dynamic-store notifications ──
//
// Each registration owns a thread running a CFRunLoop with the store's
// run-loop source. The callback fires on that thread; dropping the
// `WatchHandle` stops the loop and releases the store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use core_foundation::array::CFArray;
use core_foundation::runloop::{CFRunLoop, kCFRunLoopDefaultMode};
use core_foundation::string::CFString;
use system_configuration::dynamic_store::{
    SCDynamicStore, SCDynamicStoreBuilder, SCDynamicStoreCallBackContext,
};
use tracing::{debug, trace};

use crate::error::Error;
use crate::keys::WatchKeys;
use crate::store::{ChangeCallback, WatchHandle};

/// Upper bound on how long a stop request can go unnoticed.
const STOP_POLL: Duration = Duration::from_millis(500);

fn deliver(_store: SCDynamicStore, changed: CFArray<CFString>, callback: &mut ChangeCallback) {
    trace!(changed = changed.len(), "dynamic store change");
    callback();
}

fn cf_strings(values: &[String]) -> CFArray<CFString> {
    let strings: Vec<CFString> = values.iter().map(|v| CFString::new(v)).collect();
    CFArray::from_CFTypes(&strings)
}

fn register(
    name: &str,
    keys: &WatchKeys,
    callback: ChangeCallback,
) -> Result<SCDynamicStore, Error> {
    let store = SCDynamicStoreBuilder::new(name)
        .callback_context(SCDynamicStoreCallBackContext {
            callout: deliver,
            info: callback,
        })
        .build()
        .ok_or_else(|| Error::Notification {
            reason: "dynamic store session could not be created".into(),
        })?;
    if !store.set_notification_keys(&cf_strings(&keys.keys), &cf_strings(&keys.patterns)) {
        return Err(Error::Notification {
            reason: "notification keys rejected".into(),
        });
    }
    Ok(store)
}

pub(super) fn spawn(
    name: &str,
    keys: &WatchKeys,
    callback: ChangeCallback,
) -> Result<WatchHandle, Error> {
    let (ready_tx, ready_rx) = mpsc::channel::<Result<CFRunLoop, Error>>();
    let stopped = Arc::new(AtomicBool::new(false));
    let thread_stopped = Arc::clone(&stopped);
    let name = name.to_owned();
    let keys = keys.clone();

    thread::Builder::new()
        .name(format!("{name}-watch"))
        .spawn(move || {
            let store = match register(&name, &keys, callback) {
                Ok(store) => store,
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };
            let Some(source) = store.create_run_loop_source() else {
                let _ = ready_tx.send(Err(Error::Notification {
                    reason: "run loop source could not be created".into(),
                }));
                return;
            };
            let run_loop = CFRunLoop::get_current();
            // SAFETY: `kCFRunLoopDefaultMode` is an immutable framework constant.
            let mode = unsafe { kCFRunLoopDefaultMode };
            run_loop.add_source(&source, mode);
            if ready_tx.send(Ok(run_loop.clone())).is_err() {
                return;
            }
            debug!(name = %name, "watching dynamic store");
            while !thread_stopped.load(Ordering::Acquire) {
                CFRunLoop::run_in_mode(mode, STOP_POLL, false);
            }
            run_loop.remove_source(&source, mode);
            debug!(name = %name, "dynamic store watch stopped");
        })
        .map_err(|e| Error::Notification {
            reason: e.to_string(),
        })?;

    let run_loop = ready_rx.recv().map_err(|_| Error::Notification {
        reason: "watch thread exited during setup".into(),
    })??;

    Ok(WatchHandle::new(move || {
        stopped.store(true, Ordering::Release);
        run_loop.stop();
    }))
}
