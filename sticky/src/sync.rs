//! Background viewport polling and overlay debouncing.
//!
//! [`SyncManager`] owns one worker thread that polls the viewports of the
//! active window's views on a fixed interval and keeps their sticky overlays
//! in sync.
//! Recomputing the stack on every scroll tick flickers, so overlay
//! recomputation is gated behind a hysteresis window: the overlay must sit
//! still for [`HYSTERESIS`] before the stack is rebuilt. An overlay whose
//! position already matches the viewport is left alone entirely.
//!
//! The worker thread is the sole owner of the per-view state map; nothing
//! else reads or writes it. Stopping is cooperative: the stop flag is
//! observed within one poll interval via a condvar-interrupted sleep, and
//! the join is bounded so a wedged host call surfaces as
//! [`SyncError::StopTimeout`] instead of hanging the caller.

use crate::{
    host::{Host, HostView, HostWindow as _, PhantomId, Region, ViewId},
    phantom, settings,
};
use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;
use std::{
    sync::{mpsc, Arc},
    thread,
    time::{Duration, Instant},
};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Interval between viewport polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Minimum time the overlay must sit still before the stack is recomputed.
pub const HYSTERESIS: Duration = Duration::from_secs(1);

/// Bound on how long [`SyncManager::stop`] waits for the worker to exit.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum SyncError {
    /// The worker did not acknowledge the stop flag in time. The worker
    /// handle is cleared regardless, so a replacement can still be started.
    #[error("sync worker did not stop within {:?}", STOP_TIMEOUT)]
    StopTimeout,

    /// The worker thread could not be spawned.
    #[error("failed to spawn sync worker")]
    Spawn(#[source] std::io::Error),
}

/// Tracked overlay state for one view.
#[derive(Clone, Copy, Debug)]
struct ViewTrack {
    phantom: PhantomId,
    /// Phantom position at the last observed change.
    last_position: Region,
    /// When that change was observed.
    last_change: Instant,
}

/// Outcome of one debounce check for a tracked overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Debounce {
    /// The overlay already sits at the viewport; nothing to do.
    Synced,
    /// The overlay has not moved, but the hysteresis window has not elapsed.
    Waiting,
    /// The overlay sat still for the full window; recompute the stack.
    Stabilized,
    /// The overlay moved since the last check; restart the window.
    Moved(Region),
}

/// Pure debounce decision, separated from the clock for testability.
fn debounce(track: &ViewTrack, position: Region, viewport: Region, now: Instant) -> Debounce {
    if position == viewport {
        return Debounce::Synced;
    }

    if position == track.last_position {
        if now.duration_since(track.last_change) >= HYSTERESIS {
            return Debounce::Stabilized;
        }
        return Debounce::Waiting;
    }

    Debounce::Moved(position)
}

/// Recompute the view's overlay and capture its tracked state.
fn refresh(view: &dyn HostView, viewport: Region, now: Instant) -> Option<ViewTrack> {
    let phantom = phantom::display(view)?;
    let last_position = view.phantom_position(phantom).unwrap_or(viewport);
    Some(ViewTrack {
        phantom,
        last_position,
        last_change: now,
    })
}

/// Run the per-view state machine for one poll tick.
///
/// Failures local to this view (closed mid-poll, vanished phantom) drop its
/// tracked entry and never propagate.
fn poll_view(view: &dyn HostView, states: &mut FxHashMap<ViewId, ViewTrack>) {
    let id = view.id();

    if !view.is_open() {
        if states.remove(&id).is_some() {
            debug!(view = id.0, "view closed, dropping tracked overlay");
        }
        return;
    }

    if !settings::is_enabled(view) {
        if states.remove(&id).is_some() {
            phantom::hide(view);
        }
        return;
    }

    let Some(viewport) = view.visible_region() else {
        states.remove(&id);
        return;
    };

    let now = Instant::now();

    let Some(track) = states.get_mut(&id) else {
        if let Some(track) = refresh(view, viewport, now) {
            states.insert(id, track);
        }
        return;
    };

    let mut drop_entry = false;
    match view.phantom_position(track.phantom) {
        None => {
            // Host dropped the phantom out from under us; start over.
            warn!(view = id.0, "phantom handle no longer known to host");
            drop_entry = true;
        }
        Some(position) => match debounce(track, position, viewport, now) {
            Debounce::Synced => trace!(view = id.0, "overlay in sync"),
            Debounce::Waiting => trace!(view = id.0, "overlay settling"),
            Debounce::Moved(position) => {
                track.last_position = position;
                track.last_change = now;
            }
            Debounce::Stabilized => {
                trace!(view = id.0, "viewport stabilized, recomputing stack");
                match refresh(view, viewport, now) {
                    Some(next) => *track = next,
                    None => drop_entry = true,
                }
            }
        },
    }

    if drop_entry {
        states.remove(&id);
    }
}

struct Shared {
    stop: Mutex<bool>,
    wake: Condvar,
}

struct Worker {
    shared: Arc<Shared>,
    thread: thread::JoinHandle<()>,
    done_rx: mpsc::Receiver<()>,
}

/// Owns the background worker that keeps overlays in sync.
///
/// `start` and `stop` are mutually exclusive; settings-change callbacks and
/// lifecycle hooks all funnel through the same two entry points.
pub struct SyncManager {
    host: Arc<dyn Host>,
    worker: Mutex<Option<Worker>>,
}

impl SyncManager {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            worker: Mutex::new(None),
        }
    }

    /// Start the worker. No-op if it is already running.
    ///
    /// Before the thread spawns, every view of every window (transient ones
    /// included) gets one synchronous pass, so overlays appear without
    /// waiting for the first tick.
    pub fn start(&self) -> Result<(), SyncError> {
        let mut slot = self.worker.lock();
        if slot.is_some() {
            return Ok(());
        }

        let mut states = FxHashMap::default();
        for window in self.host.windows() {
            for view in window.views(true) {
                poll_view(view.as_ref(), &mut states);
            }
        }

        let shared = Arc::new(Shared {
            stop: Mutex::new(false),
            wake: Condvar::new(),
        });
        let (done_tx, done_rx) = mpsc::channel();

        let host = Arc::clone(&self.host);
        let thread_shared = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name("sticky-lines-sync".into())
            .spawn(move || {
                run(host, thread_shared, states);
                let _ = done_tx.send(());
            })
            .map_err(SyncError::Spawn)?;

        *slot = Some(Worker {
            shared,
            thread,
            done_rx,
        });
        Ok(())
    }

    /// Stop the worker, waiting at most [`STOP_TIMEOUT`] for it to exit.
    ///
    /// The worker handle is cleared even on timeout so no zombie control
    /// handle lingers; the abandoned thread detaches. No-op if the worker is
    /// not running.
    pub fn stop(&self) -> Result<(), SyncError> {
        let mut slot = self.worker.lock();
        let Some(worker) = slot.take() else {
            return Ok(());
        };

        *worker.shared.stop.lock() = true;
        worker.shared.wake.notify_one();

        match worker.done_rx.recv_timeout(STOP_TIMEOUT) {
            Ok(()) => {
                let _ = worker.thread.join();
                Ok(())
            }
            Err(_) => {
                warn!("sync worker missed the stop deadline");
                Err(SyncError::StopTimeout)
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }
}

/// Worker loop body. Runs until the stop flag is observed, then clears
/// overlays from every view before exiting.
fn run(host: Arc<dyn Host>, shared: Arc<Shared>, mut states: FxHashMap<ViewId, ViewTrack>) {
    if let Some(window) = host.active_window() {
        window.status_message("StickyLines started");
    }
    debug!("sync worker running");

    loop {
        {
            let mut stop = shared.stop.lock();
            if !*stop {
                let _ = shared.wake.wait_for(&mut stop, POLL_INTERVAL);
            }
            if *stop {
                break;
            }
        }

        // With auto-follow off, overlays only change on explicit commands.
        if !settings::auto_follow(host.as_ref()) {
            continue;
        }

        // No active window is not an error; just skip the tick.
        let Some(window) = host.active_window() else {
            continue;
        };
        for view in window.views(false) {
            poll_view(view.as_ref(), &mut states);
        }
    }

    for window in host.windows() {
        for view in window.views(false) {
            phantom::hide(view.as_ref());
        }
    }
    if let Some(window) = host.active_window() {
        window.status_message("StickyLines stopped");
    }
    debug!("sync worker stopped");
}
