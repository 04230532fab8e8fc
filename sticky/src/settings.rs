//! Typed accessors over the host settings store.
//!
//! Three booleans are persisted, nothing else:
//!
//! - [`VIEW_ENABLED`] -- per-view override, read by host-side activation
//!   checks as well as the sync loop.
//! - [`GLOBALLY_ENABLED`] -- master switch; flipping it starts or stops the
//!   background worker via the settings subscription.
//! - [`AUTO_FOLLOW`] -- whether overlays track scrolling continuously or only
//!   update on explicit user action.

use crate::host::{Host, HostView, SettingsStore as _};

/// Per-view enabled flag (default true).
pub const VIEW_ENABLED: &str = "sticky_lines_enabled";

/// Global master switch (default true).
pub const GLOBALLY_ENABLED: &str = "sticky_lines_enabled_globally";

/// Auto-follow mode (default true).
pub const AUTO_FOLLOW: &str = "sticky_lines_auto_follow";

/// Tag under which the feature subscribes to settings-change notifications.
pub const SUBSCRIPTION_TAG: &str = "sticky_lines";

pub fn is_enabled(view: &dyn HostView) -> bool {
    view.settings().get_bool(VIEW_ENABLED, true)
}

pub fn set_enabled(view: &dyn HostView, enabled: bool) {
    view.settings().set_bool(VIEW_ENABLED, enabled);
}

pub fn is_enabled_globally(host: &dyn Host) -> bool {
    host.settings().get_bool(GLOBALLY_ENABLED, true)
}

pub fn set_enabled_globally(host: &dyn Host, enabled: bool) {
    host.settings().set_bool(GLOBALLY_ENABLED, enabled);
}

pub fn auto_follow(host: &dyn Host) -> bool {
    host.settings().get_bool(AUTO_FOLLOW, true)
}

pub fn set_auto_follow(host: &dyn Host, enabled: bool) {
    host.settings().set_bool(AUTO_FOLLOW, enabled);
}
