//! Host editor abstractions.
//!
//! The feature never talks to a concrete editor. Everything it needs from the
//! host -- viewports, symbol occurrences, overlay primitives, settings -- comes
//! through the traits in this module, which enables dependency injection:
//! production code wires in real editor bindings while tests use
//! [`MockHost`](crate::test::MockHost).
//!
//! All trait implementations must be callable from the background sync worker
//! thread. Hosts that require UI-thread affinity for overlay mutation must
//! marshal those calls onto their own UI queue inside the implementation.

use std::sync::Arc;

/// Overlay key under which all sticky-line phantoms are registered.
pub const PHANTOM_KEY: &str = "sticky_lines";

/// Half-open offset range `[begin, end)` within one document.
///
/// Used for viewports, symbol occurrences, and phantom positions alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub begin: usize,
    pub end: usize,
}

impl Region {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Whether `offset` falls inside this region.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.begin && offset < self.end
    }
}

/// One raw symbol occurrence as reported by the host's indexer.
///
/// `syntax` is the host's syntax tag for the file the symbol lives in, used
/// to fence rendered overlay content for highlighting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolRegion {
    pub name: String,
    pub region: Region,
    pub syntax: String,
}

/// Stable host-assigned view identity.
///
/// Views can close while we hold references to them, so per-view state is
/// keyed by this id rather than by a live view handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewId(pub u64);

/// Opaque overlay handle assigned by the host on phantom creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhantomId(pub u64);

/// Callback invoked by the host whenever a watched settings store changes.
pub type SettingsCallback = Box<dyn Fn() + Send + Sync>;

/// The host editor process.
pub trait Host: Send + Sync {
    /// All currently open windows.
    fn windows(&self) -> Vec<Arc<dyn HostWindow>>;

    /// The focused window, if any.
    fn active_window(&self) -> Option<Arc<dyn HostWindow>>;

    /// Global settings store.
    fn settings(&self) -> Arc<dyn SettingsStore>;

    /// Blocking, user-visible error notification.
    fn error_message(&self, message: &str);
}

/// One host editor window.
pub trait HostWindow: Send + Sync {
    /// Views open in this window. Transient views (previews) are included
    /// only when `include_transient` is set.
    fn views(&self, include_transient: bool) -> Vec<Arc<dyn HostView>>;

    /// The focused view of this window, if any.
    fn active_view(&self) -> Option<Arc<dyn HostView>>;

    /// Transient status-bar message.
    fn status_message(&self, message: &str);
}

/// One host editor view onto a document.
///
/// A view can close at any time; after that, lookups return empty/`None`
/// rather than failing, and [`HostView::is_open`] returns false.
pub trait HostView: Send + Sync {
    /// Stable identity for this view.
    fn id(&self) -> ViewId;

    /// Whether the view is still open in its window.
    fn is_open(&self) -> bool;

    /// The currently visible offset range, or `None` once closed.
    fn visible_region(&self) -> Option<Region>;

    /// Total number of lines in the document.
    fn line_count(&self) -> u32;

    /// Symbol occurrences for the current document snapshot, in document
    /// order.
    fn symbol_regions(&self) -> Vec<SymbolRegion>;

    /// Indentation level of the line containing `offset`.
    fn indentation_level(&self, offset: usize) -> u32;

    /// Map an offset to its `(row, column)` pair.
    fn row_col(&self, offset: usize) -> (u32, u32);

    /// Full text of the line containing `offset`, trailing newline included.
    fn full_line(&self, offset: usize) -> String;

    /// Create a block-layout phantom under `key`, anchored at `region`.
    fn add_phantom(&self, key: &str, region: Region, content: &str) -> PhantomId;

    /// Current displayed position of a phantom, or `None` if the host no
    /// longer knows the handle.
    fn phantom_position(&self, id: PhantomId) -> Option<Region>;

    /// Erase every phantom registered under `key`. No-op if there are none.
    fn erase_phantoms(&self, key: &str);

    /// Show a transient popup near the current selection.
    fn show_popup(&self, content: &str);

    /// Per-view settings store.
    fn settings(&self) -> Arc<dyn SettingsStore>;
}

/// Persistent boolean settings, with change notification.
pub trait SettingsStore: Send + Sync {
    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn set_bool(&self, key: &str, value: bool);

    /// Register `callback` to run after any value changes. A later call with
    /// the same `tag` replaces the earlier registration.
    fn subscribe(&self, tag: &str, callback: SettingsCallback);

    fn unsubscribe(&self, tag: &str);
}
