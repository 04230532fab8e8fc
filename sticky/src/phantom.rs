//! Overlay rendering and lifecycle.
//!
//! A symbol stack is materialized as one block-layout phantom anchored at the
//! viewport: a fenced code block whose body is the full source line of each
//! pinned symbol, outermost first. At most one phantom lives per view; the
//! previous one is always erased before a new one is created.

use crate::{
    host::{HostView, PhantomId, Region, PHANTOM_KEY},
    stack::build_stack,
    symbol::{collect_symbols, Symbol},
};
use tracing::trace;

/// Render a symbol stack as overlay content.
///
/// Empty stack renders to the empty string. Otherwise the content is a code
/// block fenced with the outermost symbol's syntax tag, containing each
/// symbol's full source line in stack order.
pub fn render_content(view: &dyn HostView, stack: &[Symbol<'_>]) -> String {
    let Some(outermost) = stack.first() else {
        return String::new();
    };

    let mut rendered = format!("```{}\n", outermost.region.syntax);
    for symbol in stack {
        rendered.push_str(&view.full_line(symbol.begin()));
    }
    rendered.push_str("\n```");
    rendered
}

/// Replace the view's phantom with `content`, anchored at `viewport`.
///
/// Any existing phantom is erased first, so the call is safe to repeat.
/// Empty content creates nothing and returns `None`.
pub fn show(view: &dyn HostView, viewport: Region, content: &str) -> Option<PhantomId> {
    hide(view);

    if content.is_empty() {
        return None;
    }

    Some(view.add_phantom(PHANTOM_KEY, viewport, content))
}

/// Erase the view's phantom. Idempotent; a second call is a no-op.
pub fn hide(view: &dyn HostView) {
    view.erase_phantoms(PHANTOM_KEY);
}

/// Recompute and show the sticky lines for the view's live viewport.
///
/// Reads the current symbol list, rebuilds the stack, and replaces the
/// phantom. Returns the new phantom's handle, or `None` when the stack is
/// empty (in which case any previous phantom has been cleared) or the view
/// has closed.
pub fn display(view: &dyn HostView) -> Option<PhantomId> {
    let viewport = view.visible_region()?;

    let symbols = collect_symbols(view);
    let stack = build_stack(view, &symbols, viewport);
    trace!(view = view.id().0, depth = stack.len(), "displaying stack");

    let content = render_content(view, &stack);
    show(view, viewport, &content)
}
