//! User-invocable commands.
//!
//! The host's command surface maps 1:1 onto these methods; each takes the
//! target view where one is relevant. Settings writes go through the host
//! store, so the global toggles take effect via the change subscription
//! installed by [`StickyLines::load`](crate::StickyLines::load).

use crate::{
    host::{Host as _, HostView, HostWindow as _},
    phantom, settings,
    stack::build_stack,
    symbol::collect_symbols,
    StickyLines,
};
use tracing::info;

impl StickyLines {
    /// Toggle the feature for one view, applying the result immediately.
    pub fn toggle_view(&self, view: &dyn HostView) {
        let enabled = !settings::is_enabled(view);
        settings::set_enabled(view, enabled);

        if enabled {
            phantom::display(view);
            self.status("StickyLines enabled");
        } else {
            phantom::hide(view);
            self.status("StickyLines disabled");
        }
        info!(view = view.id().0, enabled, "view toggle");
    }

    /// Toggle the global master switch.
    ///
    /// The worker starts or stops through the settings subscription, not
    /// here, so host-driven settings edits behave identically.
    pub fn toggle_global(&self) {
        let enabled = !settings::is_enabled_globally(self.host());
        settings::set_enabled_globally(self.host(), enabled);
        info!(enabled, "global toggle");
    }

    /// Toggle auto-follow. The running worker reads the flag every tick.
    pub fn toggle_auto_follow(&self) {
        let enabled = !settings::auto_follow(self.host());
        settings::set_auto_follow(self.host(), enabled);
        info!(enabled, "auto-follow toggle");
    }

    /// Show the current enclosing-symbol stack as a popup near the selection.
    pub fn popup_at_selection(&self, view: &dyn HostView) {
        let Some(viewport) = view.visible_region() else {
            return;
        };

        let symbols = collect_symbols(view);
        let stack = build_stack(view, &symbols, viewport);
        let content = phantom::render_content(view, &stack);
        if content.is_empty() {
            return;
        }

        view.show_popup(&content);
    }

    fn status(&self, message: &str) {
        if let Some(window) = self.host().active_window() {
            window.status_message(message);
        }
    }
}
