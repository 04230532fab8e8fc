//! Symbol model and active-symbol location.
//!
//! A [`Symbol`] wraps one raw indexer occurrence with the indentation level
//! the host reports at its start and a lazily computed starting line. Symbol
//! lists are per-document-snapshot: a document change means collecting a
//! fresh list, never mutating an existing one.

use crate::host::{HostView, SymbolRegion};
use std::{cell::OnceCell, fmt};

/// One symbol occurrence, immutable after construction.
///
/// Holds a back-reference to the owning view; symbols are short-lived values
/// built once per poll, so the borrow never outlives the poll iteration.
#[derive(Clone)]
pub struct Symbol<'a> {
    view: &'a dyn HostView,
    pub indent: u32,
    pub region: SymbolRegion,
    line: OnceCell<u32>,
}

impl<'a> Symbol<'a> {
    /// Wrap a raw occurrence, reading its indentation level from the host.
    pub fn from_region(view: &'a dyn HostView, region: SymbolRegion) -> Self {
        let indent = view.indentation_level(region.region.begin);
        Self {
            view,
            indent,
            region,
            line: OnceCell::new(),
        }
    }

    /// Starting line of the symbol, computed on first access and cached.
    pub fn line(&self) -> u32 {
        *self
            .line
            .get_or_init(|| self.view.row_col(self.region.region.begin).0)
    }

    /// Start offset of the symbol's region.
    pub fn begin(&self) -> usize {
        self.region.region.begin
    }

    pub fn view(&self) -> &'a dyn HostView {
        self.view
    }
}

impl fmt::Debug for Symbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.region.name)
            .field("indent", &self.indent)
            .field("region", &self.region.region)
            .finish()
    }
}

/// Collect the view's symbol occurrences into [`Symbol`]s, in document order.
pub fn collect_symbols(view: &dyn HostView) -> Vec<Symbol<'_>> {
    view.symbol_regions()
        .into_iter()
        .map(|region| Symbol::from_region(view, region))
        .collect()
}

/// Find the symbol whose line span contains `current_line`.
///
/// Symbol `i` spans `[symbols[i].line(), symbols[i+1].line())`; the last
/// symbol spans to the document's total line count. Returns the index and
/// symbol of the first containing span, or `None` if the list is empty or
/// `current_line` precedes the first symbol.
pub fn locate<'s, 'a>(
    symbols: &'s [Symbol<'a>],
    current_line: u32,
) -> Option<(usize, &'s Symbol<'a>)> {
    for (i, symbol) in symbols.iter().enumerate() {
        let next_line = match symbols.get(i + 1) {
            Some(next) => next.line(),
            None => symbol.view().line_count(),
        };
        if current_line >= symbol.line() && current_line < next_line {
            return Some((i, symbol));
        }
    }
    None
}
