//! Mock host infrastructure for tests.
//!
//! [`MockHost`] and [`MockView`] stand in for a real editor: documents are
//! plain strings, symbols are registered by line, and phantoms/popups are
//! recorded so tests can assert on overlay lifecycle without a host process.

use crate::host::{
    Host, HostView, HostWindow, PhantomId, Region, SettingsCallback, SettingsStore, SymbolRegion,
    ViewId,
};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// In-memory settings store that fires change callbacks synchronously.
#[derive(Clone, Default)]
pub struct MockSettings {
    inner: Arc<Mutex<SettingsInner>>,
}

#[derive(Default)]
struct SettingsInner {
    values: HashMap<String, bool>,
    subscribers: HashMap<String, Arc<dyn Fn() + Send + Sync>>,
}

impl SettingsStore for MockSettings {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.inner.lock().values.get(key).copied().unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) {
        // Callbacks run outside the lock so they can read settings back.
        let callbacks: Vec<_> = {
            let mut inner = self.inner.lock();
            inner.values.insert(key.to_owned(), value);
            inner.subscribers.values().cloned().collect()
        };
        for callback in callbacks {
            callback();
        }
    }

    fn subscribe(&self, tag: &str, callback: SettingsCallback) {
        self.inner
            .lock()
            .subscribers
            .insert(tag.to_owned(), Arc::from(callback));
    }

    fn unsubscribe(&self, tag: &str) {
        self.inner.lock().subscribers.remove(tag);
    }
}

struct MockPhantom {
    id: PhantomId,
    key: String,
    region: Region,
    content: String,
}

struct ViewInner {
    open: bool,
    /// Document lines, trailing newline included.
    lines: Vec<String>,
    /// Start offset of each line, plus the total length as a sentinel.
    offsets: Vec<usize>,
    symbols: Vec<SymbolRegion>,
    /// Indentation level by symbol start offset.
    indents: HashMap<usize, u32>,
    visible: Region,
    phantoms: Vec<MockPhantom>,
    next_phantom: u64,
    popups: Vec<String>,
    row_col_calls: usize,
}

/// One scripted editor view over an in-memory document.
#[derive(Clone)]
pub struct MockView {
    id: ViewId,
    inner: Arc<Mutex<ViewInner>>,
    settings: MockSettings,
}

impl MockView {
    /// View over the given document text.
    pub fn new(text: &str) -> Self {
        let lines: Vec<String> = text.split_inclusive('\n').map(str::to_owned).collect();
        let mut offsets = Vec::with_capacity(lines.len() + 1);
        let mut offset = 0;
        for line in &lines {
            offsets.push(offset);
            offset += line.len();
        }
        offsets.push(offset);

        let total = offset;
        Self {
            id: ViewId(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed)),
            inner: Arc::new(Mutex::new(ViewInner {
                open: true,
                lines,
                offsets,
                symbols: Vec::new(),
                indents: HashMap::new(),
                visible: Region::new(0, total),
                phantoms: Vec::new(),
                next_phantom: 1,
                popups: Vec::new(),
                row_col_calls: 0,
            })),
            settings: MockSettings::default(),
        }
    }

    /// View over a synthetic document of `count` fixed-width lines.
    pub fn with_lines(count: usize) -> Self {
        let text: String = (0..count)
            .map(|i| format!("{:<8}\n", format!("l{i}")))
            .collect();
        Self::new(&text)
    }

    /// Register a symbol starting at column 0 of `row`.
    pub fn add_symbol(&self, name: &str, row: usize, indent: u32) {
        self.add_symbol_at(name, row, 0, indent);
    }

    /// Register a symbol at an explicit `(row, col)` position.
    pub fn add_symbol_at(&self, name: &str, row: usize, col: usize, indent: u32) {
        let mut inner = self.inner.lock();
        let begin = inner.offsets[row] + col;
        inner.indents.insert(begin, indent);
        inner.symbols.push(SymbolRegion {
            name: name.to_owned(),
            region: Region::new(begin, begin + name.len()),
            syntax: "rust".to_owned(),
        });
    }

    /// Scroll the view so lines `[start_row, end_row)` are visible, and
    /// return the resulting viewport region.
    pub fn visible_lines(&self, start_row: usize, end_row: usize) -> Region {
        let mut inner = self.inner.lock();
        let region = Region::new(inner.offsets[start_row], inner.offsets[end_row]);
        inner.visible = region;
        region
    }

    /// Mark the view closed; all lookups become no-ops from here on.
    pub fn close(&self) {
        self.inner.lock().open = false;
    }

    pub fn phantom_count(&self) -> usize {
        self.inner.lock().phantoms.len()
    }

    pub fn phantom_content(&self, id: PhantomId) -> Option<String> {
        self.inner
            .lock()
            .phantoms
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.content.clone())
    }

    pub fn popups(&self) -> Vec<String> {
        self.inner.lock().popups.clone()
    }

    /// How many times the host was asked for a row/col mapping.
    pub fn row_col_calls(&self) -> usize {
        self.inner.lock().row_col_calls
    }

    fn row_of(offsets: &[usize], offset: usize) -> usize {
        offsets.partition_point(|&start| start <= offset).saturating_sub(1)
    }
}

impl HostView for MockView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn is_open(&self) -> bool {
        self.inner.lock().open
    }

    fn visible_region(&self) -> Option<Region> {
        let inner = self.inner.lock();
        inner.open.then_some(inner.visible)
    }

    fn line_count(&self) -> u32 {
        self.inner.lock().lines.len() as u32
    }

    fn symbol_regions(&self) -> Vec<SymbolRegion> {
        let inner = self.inner.lock();
        if !inner.open {
            return Vec::new();
        }
        inner.symbols.clone()
    }

    fn indentation_level(&self, offset: usize) -> u32 {
        self.inner.lock().indents.get(&offset).copied().unwrap_or(0)
    }

    fn row_col(&self, offset: usize) -> (u32, u32) {
        let mut inner = self.inner.lock();
        inner.row_col_calls += 1;
        let row = Self::row_of(&inner.offsets, offset);
        (row as u32, (offset - inner.offsets[row]) as u32)
    }

    fn full_line(&self, offset: usize) -> String {
        let inner = self.inner.lock();
        let row = Self::row_of(&inner.offsets, offset);
        inner.lines.get(row).cloned().unwrap_or_default()
    }

    fn add_phantom(&self, key: &str, region: Region, content: &str) -> PhantomId {
        let mut inner = self.inner.lock();
        let id = PhantomId(inner.next_phantom);
        inner.next_phantom += 1;
        inner.phantoms.push(MockPhantom {
            id,
            key: key.to_owned(),
            region,
            content: content.to_owned(),
        });
        id
    }

    fn phantom_position(&self, id: PhantomId) -> Option<Region> {
        self.inner
            .lock()
            .phantoms
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.region)
    }

    fn erase_phantoms(&self, key: &str) {
        self.inner.lock().phantoms.retain(|p| p.key != key);
    }

    fn show_popup(&self, content: &str) {
        self.inner.lock().popups.push(content.to_owned());
    }

    fn settings(&self) -> Arc<dyn SettingsStore> {
        Arc::new(self.settings.clone())
    }
}

struct WindowInner {
    views: Vec<MockView>,
    active: Option<usize>,
    statuses: Vec<String>,
}

/// The single window of a [`MockHost`].
#[derive(Clone)]
pub struct MockWindow {
    inner: Arc<Mutex<WindowInner>>,
}

impl HostWindow for MockWindow {
    fn views(&self, _include_transient: bool) -> Vec<Arc<dyn HostView>> {
        self.inner
            .lock()
            .views
            .iter()
            .map(|view| Arc::new(view.clone()) as Arc<dyn HostView>)
            .collect()
    }

    fn active_view(&self) -> Option<Arc<dyn HostView>> {
        let inner = self.inner.lock();
        let index = inner.active?;
        inner
            .views
            .get(index)
            .map(|view| Arc::new(view.clone()) as Arc<dyn HostView>)
    }

    fn status_message(&self, message: &str) {
        self.inner.lock().statuses.push(message.to_owned());
    }
}

/// Scripted host with one window and a shared global settings store.
#[derive(Clone)]
pub struct MockHost {
    window: MockWindow,
    settings: MockSettings,
    errors: Arc<Mutex<Vec<String>>>,
}

impl MockHost {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            window: MockWindow {
                inner: Arc::new(Mutex::new(WindowInner {
                    views: Vec::new(),
                    active: None,
                    statuses: Vec::new(),
                })),
            },
            settings: MockSettings::default(),
            errors: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a view to the window and make it the active one.
    pub fn add_view(&self, view: MockView) {
        let mut inner = self.window.inner.lock();
        inner.views.push(view);
        inner.active = Some(inner.views.len() - 1);
    }

    pub fn as_dyn(&self) -> Arc<dyn Host> {
        Arc::new(self.clone())
    }

    pub fn status_messages(&self) -> Vec<String> {
        self.window.inner.lock().statuses.clone()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

impl Host for MockHost {
    fn windows(&self) -> Vec<Arc<dyn HostWindow>> {
        vec![Arc::new(self.window.clone())]
    }

    fn active_window(&self) -> Option<Arc<dyn HostWindow>> {
        Some(Arc::new(self.window.clone()))
    }

    fn settings(&self) -> Arc<dyn SettingsStore> {
        Arc::new(self.settings.clone())
    }

    fn error_message(&self, message: &str) {
        self.errors.lock().push(message.to_owned());
    }
}
