//! Visual-mode reducer shared by Visual, VisualLine and VisualBlock.
//!
//! Motions extend the selection by moving the cursor; the anchor stays put.
//! `x`/`d` delete every highlight span in one undo step and return to Normal.
//! A character-wise selection spanning several rows merges its first two
//! touched rows after deletion; rows beyond those keep their remainders.

use core_state::{Mode, highlights};
use tracing::debug;

use super::{DispatchResult, to_normal};
use crate::{Editor, motion};

pub(super) fn handle(ed: &mut Editor) -> DispatchResult {
    let Some(anchor) = ed.anchor else {
        return DispatchResult::clean();
    };
    let mode = ed.mode;
    let state = ed.state();
    let Some(spans) = highlights(mode, anchor, state.position(), state.buffer()) else {
        return DispatchResult::clean();
    };

    if let Some(m) = motion::resolve(state, &ed.keys) {
        ed.keys.pop(m.consumed);
        ed.state_mut().set_cursor(m.cursor);
        return DispatchResult::dirty();
    }

    let deletes = ed.keys.last().is_some_and(|k| k.is("x") || k.is("d"));
    if !deletes {
        return DispatchResult::clean();
    }

    let state = ed.push_snapshot();
    let buffer = state.buffer_mut();
    for span in &spans {
        buffer.delete_selection(*span, mode == Mode::VisualLine);
    }
    if mode == Mode::Visual && spans.len() > 1 {
        let y_min = spans.iter().map(|s| s.y1).min().unwrap_or_default();
        buffer.merge_lines(y_min, y_min + 1);
    }
    buffer.compact();
    if let Some(top) = spans.first().map(|s| s.normalized()) {
        state.set_y(top.y1);
        if mode != Mode::VisualLine {
            state.set_x(top.x1);
        }
    }
    debug!(target: "actions.dispatch", %mode, spans = spans.len(), cursor = ?state.position(), "visual_delete");
    to_normal(ed);
    DispatchResult::snapshot()
}
