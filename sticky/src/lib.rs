//! Sticky enclosing-symbol overlays for a host text editor.
//!
//! While scrolling, the chain of enclosing code symbols (functions, classes)
//! whose headers have left the viewport is pinned as a block overlay at the
//! top of the view, so the user keeps their context. The host editor is
//! consumed entirely through the traits in [`host`]; this crate carries the
//! reconstruction algorithm, the overlay lifecycle, and the background sync
//! worker.
//!
//! # Architecture
//!
//! - [`symbol`] wraps raw indexer occurrences and locates the symbol whose
//!   span contains a line.
//! - [`stack`] rebuilds the off-screen ancestor chain by indentation.
//! - [`phantom`] renders a stack and manages the per-view overlay.
//! - [`sync`] polls viewports from one worker thread, debouncing scroll
//!   bursts behind a hysteresis window.
//! - [`StickyLines`] is the process-wide context tying it together; the host
//!   calls [`StickyLines::load`] / [`StickyLines::unload`] from its plugin
//!   lifecycle hooks and routes commands to the methods in [`commands`].

pub mod commands;
pub mod host;
pub mod phantom;
pub mod settings;
pub mod stack;
pub mod symbol;
pub mod sync;

#[cfg(test)]
pub mod test;

use crate::{
    host::{Host, SettingsStore as _},
    sync::SyncManager,
};
use std::sync::Arc;
use tracing::warn;

/// Process-wide feature context.
///
/// Created once on feature load and passed explicitly to command handlers;
/// there are no ambient globals. Holds the host handle and the sync worker,
/// and keeps the worker consistent with the persisted settings via the
/// host's change notifications.
pub struct StickyLines {
    host: Arc<dyn Host>,
    sync: SyncManager,
}

impl StickyLines {
    /// Initialize the feature: subscribe to settings changes and, when the
    /// global switch is on, start the sync worker.
    pub fn load(host: Arc<dyn Host>) -> Arc<Self> {
        let context = Arc::new(Self {
            host: Arc::clone(&host),
            sync: SyncManager::new(Arc::clone(&host)),
        });

        let weak = Arc::downgrade(&context);
        host.settings().subscribe(
            settings::SUBSCRIPTION_TAG,
            Box::new(move || {
                if let Some(context) = weak.upgrade() {
                    context.apply_settings();
                }
            }),
        );

        context.apply_settings();
        context
    }

    /// Tear the feature down: unsubscribe and stop the worker.
    ///
    /// A worker that misses its stop deadline is surfaced on the host's
    /// blocking error channel; its control handle is cleared either way.
    pub fn unload(&self) {
        self.host
            .settings()
            .unsubscribe(settings::SUBSCRIPTION_TAG);

        if let Err(error) = self.sync.stop() {
            warn!(%error, "failed to stop sync worker");
            self.host
                .error_message("Could not stop the sticky lines worker");
        }
    }

    /// Whether the background worker is currently running.
    pub fn is_running(&self) -> bool {
        self.sync.is_running()
    }

    pub(crate) fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// Reconcile the worker with the persisted settings. Runs at load and on
    /// every settings-change notification.
    fn apply_settings(&self) {
        if settings::is_enabled_globally(self.host.as_ref()) {
            if let Err(error) = self.sync.start() {
                warn!(%error, "failed to start sync worker");
                self.host
                    .error_message("Could not start the sticky lines worker");
            }
        } else if let Err(error) = self.sync.stop() {
            warn!(%error, "failed to stop sync worker");
            self.host
                .error_message("Could not stop the sticky lines worker");
        }
    }
}
