//! Enclosing-symbol stack reconstruction.
//!
//! Given a document-ordered symbol list and the visible viewport, rebuilds
//! the chain of enclosing symbols whose headers have scrolled off-screen.
//! The walk is purely indentation-driven: the host's indexer supplies flat
//! occurrences, and one ancestor is picked per strictly decreasing
//! indentation level.

use crate::{
    host::{HostView, Region},
    symbol::{locate, Symbol},
};

/// Build the stack of off-screen enclosing symbols for `viewport`.
///
/// The result reads outermost-first, the order the lines should stack
/// top-to-bottom in the overlay, and never contains a symbol whose start
/// offset is already visible.
///
/// The active symbol (the one whose span contains the viewport's first line)
/// seeds the ancestor walk but is itself part of the stack only in the
/// top-level case: an indent-0 active symbol with an off-screen header is
/// pinned alone, since it has no ancestors to chain.
pub fn build_stack<'a>(
    view: &'a dyn HostView,
    symbols: &[Symbol<'a>],
    viewport: Region,
) -> Vec<Symbol<'a>> {
    let first_viewport_line = view.row_col(viewport.begin).0;
    let Some((active_pos, active)) = locate(symbols, first_viewport_line) else {
        return Vec::new();
    };

    if active.indent == 0 {
        if viewport.contains(active.begin()) {
            return Vec::new();
        }
        return vec![active.clone()];
    }

    // Reverse document-order walk over the symbols preceding the active one.
    // A candidate joins the chain only when its indentation drops strictly
    // below the most recently accepted ancestor's; skipped candidates leave
    // the comparison point untouched.
    let mut chain = Vec::new();
    let mut ceiling = active.indent;
    for candidate in symbols[..active_pos].iter().rev() {
        if candidate.indent < ceiling {
            ceiling = candidate.indent;
            chain.push(candidate.clone());
        }
    }

    // Visible headers need no pinning. Filtering happens only after the walk
    // so mid-chain visibility cannot break the parent search.
    chain.retain(|symbol| !viewport.contains(symbol.begin()));
    chain.reverse();
    chain
}
