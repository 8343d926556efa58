//! Dispatcher routing the pending key chain to the active mode's reducer.
//!
//! Sub-modules:
//! * `normal` - commands, counts, `d{motion}`, undo/redo
//! * `insert` - text entry; every key is consumed immediately
//! * `visual` - selection extension and deletion for all three visual modes
//!
//! `Escape` is handled here before any reducer runs: it always wins, from
//! every mode, and leaves the editor in Normal with an empty chain.
//!
//! Each reducer inspects the newest tokens of `Editor::keys`, pops what it
//! consumed, and either mutates the live snapshot in place (motions, Insert
//! keys) or opens a new undo step through `Editor::push_snapshot` first.

use core_state::Mode;
use tracing::debug;

use crate::Editor;

mod insert;
mod normal;
mod visual;

/// Outcome of handling one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Something a renderer shows (text, cursor, mode, selection) changed.
    pub dirty: bool,
    /// A new undo step was created.
    pub snapshot: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            snapshot: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            snapshot: false,
        }
    }
    pub fn snapshot() -> Self {
        Self {
            dirty: true,
            snapshot: true,
        }
    }
}

pub(crate) fn dispatch(ed: &mut Editor) -> DispatchResult {
    let Some(last) = ed.keys.last() else {
        return DispatchResult::clean();
    };
    if last.label() == "Escape" {
        return escape(ed);
    }
    match ed.mode {
        Mode::Normal => normal::handle(ed),
        Mode::Insert => insert::handle(ed),
        Mode::Visual | Mode::VisualLine | Mode::VisualBlock => visual::handle(ed),
    }
}

fn escape(ed: &mut Editor) -> DispatchResult {
    let from = ed.mode;
    to_normal(ed);
    debug!(target: "actions.dispatch", %from, cursor = ?ed.query_cursor(), "escape");
    DispatchResult::dirty()
}

/// Return to Normal with no anchor and an empty chain.
pub(crate) fn to_normal(ed: &mut Editor) {
    ed.anchor = None;
    ed.keys.clear();
    ed.set_mode(Mode::Normal);
    // tighten the stored column to Normal's clamp
    let state = ed.state_mut();
    let x = state.x();
    state.set_x(x);
}
