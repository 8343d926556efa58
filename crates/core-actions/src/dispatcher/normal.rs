//! Normal-mode reducer.
//!
//! Priority for the newest token:
//! 1. a literal after a pending `f`/`t` (always a find target)
//! 2. `i` `I` `a` `A` enter Insert
//! 3. `<C-v>` `V` `v` enter the visual modes, anchoring at the cursor
//! 4. `x`, `dd`, `u`, `<C-r>`
//! 5. a motion, which becomes `d{motion}` when a `d` waits before it
//!
//! Other keys carrying CTRL are absorbed without effect, like any key that
//! completes nothing; `Escape` or a later command clears them.

use core_keymap::count_or_one;
use core_state::Mode;
use core_text::Rect;
use tracing::{debug, trace};

use super::DispatchResult;
use crate::{Editor, motion};

pub(super) fn handle(ed: &mut Editor) -> DispatchResult {
    let Some(last) = ed.keys.last().cloned() else {
        return DispatchResult::clean();
    };
    if motion::find_pending(&ed.keys) {
        return motion_or_delete(ed);
    }
    let count = count_or_one(ed.keys.number_at(1));

    if last.is_ctrl("v") {
        return enter_visual(ed, Mode::VisualBlock);
    }
    if last.is_ctrl("r") {
        let taken = ed.history.redo(count);
        return after_history_walk(ed, "redo", count, taken);
    }
    if last.ctrl() {
        return DispatchResult::clean();
    }

    match last.label() {
        "i" | "I" => {
            let state = ed.push_snapshot();
            if last.label() == "I" {
                state.set_x(0);
            }
            ed.set_mode(Mode::Insert);
            ed.keys.clear();
            debug!(target: "actions.dispatch", key = last.label(), cursor = ?ed.query_cursor(), "enter_insert");
            DispatchResult::snapshot()
        }
        "a" | "A" => {
            // Insert's looser clamp must apply before moving past the last character
            ed.set_mode(Mode::Insert);
            let state = ed.push_snapshot();
            if last.label() == "A" {
                let len = state.buffer().line_len(state.y());
                state.set_x(len);
            } else {
                state.update_x(|x| x + 1);
            }
            ed.keys.clear();
            debug!(target: "actions.dispatch", key = last.label(), cursor = ?ed.query_cursor(), "enter_insert");
            DispatchResult::snapshot()
        }
        "V" => enter_visual(ed, Mode::VisualLine),
        "v" => enter_visual(ed, Mode::Visual),
        "x" => {
            let state = ed.push_snapshot();
            for _ in 0..count {
                if state.buffer().line_len(state.y()) == 0 {
                    break;
                }
                state.delete_text_at_cursor();
            }
            ed.keys.clear();
            trace!(target: "actions.dispatch", count, cursor = ?ed.query_cursor(), "delete_chars");
            DispatchResult::snapshot()
        }
        "d" if ed.keys.back(1).is_some_and(|k| k.is("d")) => {
            let lines = count_or_one(ed.keys.number_at(2)) as usize;
            let state = ed.push_snapshot();
            let y = state.y();
            let end = y.saturating_add(lines).min(state.buffer().line_count());
            for row in y..end {
                state.buffer_mut().delete_line(row);
            }
            state.buffer_mut().compact();
            state.set_y(y);
            ed.keys.clear();
            trace!(target: "actions.dispatch", lines, from_row = y, "delete_lines");
            DispatchResult::snapshot()
        }
        "u" => {
            let taken = ed.history.undo(count);
            after_history_walk(ed, "undo", count, taken)
        }
        _ => motion_or_delete(ed),
    }
}

fn enter_visual(ed: &mut Editor, mode: Mode) -> DispatchResult {
    ed.anchor = Some(ed.query_cursor());
    ed.set_mode(mode);
    ed.keys.clear();
    debug!(target: "actions.dispatch", %mode, anchor = ?ed.anchor, "enter_visual");
    DispatchResult::dirty()
}

/// Re-sync the restored snapshot with the editor mode after undo/redo.
fn after_history_walk(ed: &mut Editor, op: &'static str, requested: u32, taken: u32) -> DispatchResult {
    let mode = ed.mode;
    ed.state_mut().set_mode(mode);
    ed.keys.clear();
    debug!(target: "actions.dispatch", op, requested, taken, cursor = ?ed.query_cursor(), "history_walk");
    if taken > 0 {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

/// Apply the motion at the chain tip. When the cursor would move and a `d`
/// is left waiting beneath the motion tokens, delete the inclusive rectangle
/// between the old and new positions instead, in a new undo step.
fn motion_or_delete(ed: &mut Editor) -> DispatchResult {
    let state = ed.state();
    let find = motion::find_pending(&ed.keys);
    let Some(m) = motion::resolve(state, &ed.keys) else {
        return DispatchResult::clean();
    };
    let before = state.position();
    let after = m.cursor.position(state.buffer());
    ed.keys.pop(m.consumed);

    // a missed f/t cancels the operator waiting beneath it
    if find && before == after && ed.keys.last().is_some_and(|k| k.is("d")) {
        ed.keys.clear();
        debug!(target: "actions.dispatch", ?before, "delete_find_missed");
        return DispatchResult::clean();
    }

    if before != after && ed.keys.last().is_some_and(|k| k.is("d")) {
        let rect = Rect::between(before, after);
        let state = ed.push_snapshot();
        state.buffer_mut().delete_selection(rect, false);
        let top = rect.normalized();
        state.set_y(top.y1);
        state.set_x(top.x1);
        ed.keys.clear();
        debug!(target: "actions.dispatch", ?before, ?after, "delete_motion");
        return DispatchResult::snapshot();
    }

    ed.state_mut().set_cursor(m.cursor);
    trace!(target: "actions.dispatch", ?before, ?after, "motion");
    if before != after {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
