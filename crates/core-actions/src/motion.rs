//! Motion resolution.
//!
//! [`resolve`] reads the pending key chain (never mutating it) and computes
//! where a motion would leave the cursor, working on a scratch [`Cursor`]
//! copy so the snapshot is untouched until the caller adopts the result.
//! The count, when present, is the digit token directly before the motion
//! key; absent or zero means one.
//!
//! Every loop stops as soon as a step fails to move, so saturated counts
//! (`999999l`) terminate at the buffer edge instead of spinning.

use core_keymap::{KeyChain, count_or_one};
use core_state::{Cursor, CursorState};
use core_text::Buffer;

/// A resolved motion: the target cursor and how many chain tokens it used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub cursor: Cursor,
    pub consumed: usize,
}

/// True when the newest token is the target of a pending `f`/`t`. Such a
/// token is a literal character, never a command of its own.
pub fn find_pending(keys: &KeyChain) -> bool {
    let (Some(last), Some(prev)) = (keys.last(), keys.back(1)) else {
        return false;
    };
    (prev.is("f") || prev.is("t")) && !last.ctrl() && last.as_char().is_some()
}

/// Resolve the motion at the tip of `keys` against `state`, or `None` when
/// the tip does not complete a motion.
pub fn resolve(state: &CursorState, keys: &KeyChain) -> Option<Motion> {
    let last = keys.last()?;
    let buf = state.buffer();
    let mut cursor = state.cursor();

    if find_pending(keys) {
        let target = last.as_char()?;
        let till = keys.back(1).is_some_and(|k| k.is("t"));
        find_in_line(&mut cursor, buf, target, till);
        return Some(Motion {
            cursor,
            consumed: 2,
        });
    }
    if last.ctrl() {
        return None;
    }

    let prev_number = keys.number_at(1);
    let count = count_or_one(prev_number);
    let mut consumed = if prev_number.is_some() { 2 } else { 1 };

    match last.label() {
        "h" | "ArrowLeft" => repeat(count, || cursor.move_backward(buf)),
        "l" | "ArrowRight" => repeat(count, || cursor.move_forward(buf)),
        "j" | "ArrowDown" => {
            let y = cursor.y(buf).saturating_add(count as usize);
            cursor.set_y(buf, y);
        }
        "k" | "ArrowUp" => {
            let y = cursor.y(buf).saturating_sub(count as usize);
            cursor.set_y(buf, y);
        }
        "G" => match prev_number.filter(|n| *n > 0) {
            Some(n) => cursor.set_y(buf, n as usize - 1),
            None => cursor.set_y(buf, buf.line_count().saturating_sub(1)),
        },
        "g" => {
            if !keys.back(1).is_some_and(|k| k.is("g")) {
                return None;
            }
            let line_number = keys.number_at(2);
            match line_number.filter(|n| *n > 0) {
                Some(n) => cursor.set_y(buf, n as usize - 1),
                None => cursor.set_y(buf, 0),
            }
            consumed = if line_number.is_some() { 3 } else { 2 };
        }
        "w" | "W" => repeat(count, || word_forward(&mut cursor, buf)),
        "e" | "E" => repeat(count, || word_end(&mut cursor, buf)),
        "b" | "B" => repeat(count, || word_backward(&mut cursor, buf)),
        "0" => {
            cursor.set_x(buf, 0);
            consumed = 1;
        }
        "^" => {
            cursor.set_x(buf, 0);
            while cursor.char_under(buf) == Some(' ') && !cursor.is_end_of_line(buf) {
                cursor.move_forward(buf);
            }
            consumed = 1;
        }
        "$" => {
            if let Some(n) = prev_number.filter(|n| *n > 0) {
                let y = cursor.y(buf).saturating_add(n as usize - 1);
                cursor.set_y(buf, y);
            }
            let len = buf.line_len(cursor.y(buf));
            cursor.set_x(buf, len.saturating_sub(1));
        }
        _ => return None,
    }
    Some(Motion { cursor, consumed })
}

/// Run `step` up to `count` times, stopping early once it reports no movement.
fn repeat(count: u32, mut step: impl FnMut() -> bool) {
    for _ in 0..count {
        if !step() {
            break;
        }
    }
}

fn is_blank(c: Option<char>) -> bool {
    matches!(c, None | Some(' '))
}

/// Land on the first `target` at or after the cursor on its line; `till`
/// stops one column short, never behind the starting column.
fn find_in_line(cursor: &mut Cursor, buf: &Buffer, target: char, till: bool) {
    let (x, y) = (cursor.x(buf), cursor.y(buf));
    let Some(line) = buf.line(y) else {
        return;
    };
    let Some(found) = line.chars().skip(x).position(|c| c == target).map(|i| i + x) else {
        return;
    };
    let dest = if till { found.saturating_sub(1).max(x) } else { found };
    cursor.set_x(buf, dest);
}

/// Start of the next word. Wrapping onto a new line stops at its first
/// non-blank character, or at the line itself when it is empty.
fn word_forward(cursor: &mut Cursor, buf: &Buffer) -> bool {
    let start = cursor.position(buf);
    while cursor.y(buf) == start.y && !is_blank(cursor.char_under(buf)) {
        if !cursor.move_forward(buf) {
            return cursor.position(buf) != start;
        }
    }
    while is_blank(cursor.char_under(buf)) {
        let y = cursor.y(buf);
        if y != start.y && buf.line_len(y) == 0 {
            break;
        }
        if !cursor.move_forward(buf) {
            break;
        }
    }
    cursor.position(buf) != start
}

/// End of the current word, or of the next one when already on a word end.
fn word_end(cursor: &mut Cursor, buf: &Buffer) -> bool {
    if !cursor.move_forward(buf) {
        return false;
    }
    while is_blank(cursor.char_under(buf)) {
        if !cursor.move_forward(buf) {
            return true;
        }
    }
    loop {
        let next = buf.char_at(cursor.x(buf) + 1, cursor.y(buf));
        if is_blank(next) || !cursor.move_forward(buf) {
            return true;
        }
    }
}

/// Start of the current word, or of the previous one when already on a word start.
fn word_backward(cursor: &mut Cursor, buf: &Buffer) -> bool {
    if !cursor.move_backward(buf) {
        return false;
    }
    while is_blank(cursor.char_under(buf)) {
        if !cursor.move_backward(buf) {
            return true;
        }
    }
    while cursor.x(buf) > 0 && !is_blank(buf.char_at(cursor.x(buf) - 1, cursor.y(buf))) {
        cursor.move_backward(buf);
    }
    true
}
