//! Insert-mode reducer.
//!
//! No chaining: the chain is cleared after every key, so digits never fuse
//! and a typed `d` is just text. Edits mutate the snapshot opened when Insert
//! was entered, making the whole session a single undo step.

use tracing::trace;

use super::DispatchResult;
use crate::Editor;

pub(super) fn handle(ed: &mut Editor) -> DispatchResult {
    let Some(last) = ed.keys.last().cloned() else {
        return DispatchResult::clean();
    };
    ed.keys.clear();
    if last.ctrl() {
        return DispatchResult::clean();
    }
    let state = ed.history.current_mut();
    match last.label() {
        "Tab" => state.insert_text_at_cursor(&ed.tab),
        "ArrowLeft" => {
            state.move_backward();
        }
        "ArrowRight" => {
            state.move_forward();
        }
        "Backspace" => state.delete_text_at_cursor(),
        "Enter" => state.split_line_at_cursor(),
        text if last.as_char().is_some() => state.insert_text_at_cursor(text),
        other => {
            trace!(target: "actions.dispatch", key = other, "insert_key_ignored");
            return DispatchResult::clean();
        }
    }
    trace!(target: "actions.dispatch", key = last.label(), cursor = ?state.position(), "insert_edit");
    DispatchResult::dirty()
}
