//! Process-wide global input hook
//!
//! `rdev::listen` blocks its thread forever and can only be attached once per
//! process, so a single hook thread is started lazily and fans events out to
//! any number of subscribers (the recorder, the hotkey handler).

use crate::capture::ListenerHandle;
use crate::error::{ReplayError, ReplayResult};
use crossbeam_channel::RecvTimeoutError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Callback invoked on the hook thread for every OS input event
pub type HookSubscriber = Arc<dyn Fn(&rdev::Event) + Send + Sync>;

/// How long to wait for `rdev::listen` to fail before assuming it attached
const ATTACH_GRACE: Duration = Duration::from_millis(200);

struct Hook {
    subscribers: Mutex<Vec<(u64, HookSubscriber)>>,
    next_id: AtomicU64,
}

impl Hook {
    fn dispatch(&self, event: &rdev::Event) {
        // Snapshot so subscribers can detach from inside their callback
        let subscribers: Vec<HookSubscriber> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(event);
        }
    }
}

static HOOK: OnceLock<Hook> = OnceLock::new();
static STARTED: OnceLock<Result<(), String>> = OnceLock::new();

fn hook() -> &'static Hook {
    HOOK.get_or_init(|| Hook {
        subscribers: Mutex::new(Vec::new()),
        next_id: AtomicU64::new(0),
    })
}

fn start_hook_thread() -> Result<(), String> {
    let (failure_tx, failure_rx) = crossbeam_channel::bounded::<String>(1);

    std::thread::Builder::new()
        .name("input-hook".to_string())
        .spawn(move || {
            let message = match rdev::listen(|event| hook().dispatch(&event)) {
                Ok(()) => "hook returned unexpectedly".to_string(),
                Err(e) => format!("{:?}", e),
            };
            tracing::error!("Global input hook stopped: {}", message);
            let _ = failure_tx.send(message);
        })
        .map_err(|e| format!("failed to spawn hook thread: {}", e))?;

    match failure_rx.recv_timeout(ATTACH_GRACE) {
        Ok(message) => Err(message),
        Err(RecvTimeoutError::Timeout) => {
            tracing::info!("Global input hook attached");
            Ok(())
        }
        Err(RecvTimeoutError::Disconnected) => Err("hook thread exited".to_string()),
    }
}

/// Register `subscriber` with the global hook, starting it on first use.
///
/// A hook that failed to attach is reported on every later call without
/// retrying.
pub fn subscribe(subscriber: HookSubscriber) -> ReplayResult<ListenerHandle> {
    STARTED
        .get_or_init(start_hook_thread)
        .clone()
        .map_err(ReplayError::ListenerFailed)?;

    let id = hook().next_id.fetch_add(1, Ordering::SeqCst);
    hook().subscribers.lock().push((id, subscriber));
    tracing::debug!("Input hook subscriber {} attached", id);

    Ok(ListenerHandle::new(move || {
        hook().subscribers.lock().retain(|(other, _)| *other != id);
        tracing::debug!("Input hook subscriber {} detached", id);
    }))
}
