//! Cursor position and the buffer snapshot it points into.
//!
//! [`Cursor`] is a plain `Copy` value whose methods borrow the buffer, so
//! motions can be resolved on a scratch copy without touching the snapshot.
//! [`CursorState`] pairs a cursor with the buffer it owns.
//!
//! The stored `x`/`y` are raw: they are clamped when written and clamped
//! again on every read, so a cursor stays valid after its buffer shrinks or
//! the mode changes underneath it. Vertical moves leave the raw column alone,
//! which lets the cursor return to its column after crossing a short line.

use core_text::{Buffer, Position, Rect};

use crate::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    x: usize,
    y: usize,
    mode: Mode,
}

impl Cursor {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn max_x(&self, buffer: &Buffer, y: usize) -> usize {
        let len = buffer.line_len(y);
        match self.mode {
            Mode::Insert => len,
            _ => len.saturating_sub(1),
        }
    }

    pub fn x(&self, buffer: &Buffer) -> usize {
        self.x.min(self.max_x(buffer, self.y(buffer)))
    }

    pub fn y(&self, buffer: &Buffer) -> usize {
        self.y.min(buffer.line_count().saturating_sub(1))
    }

    pub fn position(&self, buffer: &Buffer) -> Position {
        Position::new(self.x(buffer), self.y(buffer))
    }

    pub fn set_x(&mut self, buffer: &Buffer, x: usize) {
        self.x = x.min(self.max_x(buffer, self.y(buffer)));
    }

    pub fn set_y(&mut self, buffer: &Buffer, y: usize) {
        self.y = y.min(buffer.line_count().saturating_sub(1));
    }

    /// Advance one column, wrapping to the start of the next line at the
    /// column limit. Returns false at end of file.
    pub fn move_forward(&mut self, buffer: &Buffer) -> bool {
        let (start_x, y) = (self.x(buffer), self.y(buffer));
        self.set_x(buffer, start_x + 1);
        if self.x(buffer) != start_x {
            return true;
        }
        if y + 1 < buffer.line_count() {
            self.set_y(buffer, y + 1);
            self.x = 0;
            return true;
        }
        false
    }

    /// Step back one column, wrapping to the last character of the previous
    /// line at column 0. Returns false at start of file.
    pub fn move_backward(&mut self, buffer: &Buffer) -> bool {
        let (x, y) = (self.x(buffer), self.y(buffer));
        if x > 0 {
            self.set_x(buffer, x - 1);
            true
        } else if y > 0 {
            self.set_y(buffer, y - 1);
            self.set_x(buffer, buffer.line_len(y - 1).saturating_sub(1));
            true
        } else {
            false
        }
    }

    pub fn is_start_of_file(&self, buffer: &Buffer) -> bool {
        self.y(buffer) == 0 && self.x(buffer) == 0
    }

    pub fn is_end_of_file(&self, buffer: &Buffer) -> bool {
        self.y(buffer) + 1 >= buffer.line_count() && self.is_end_of_line(buffer)
    }

    pub fn is_end_of_line(&self, buffer: &Buffer) -> bool {
        self.x(buffer) + 1 >= buffer.line_len(self.y(buffer))
    }

    pub fn char_under(&self, buffer: &Buffer) -> Option<char> {
        buffer.char_at(self.x(buffer), self.y(buffer))
    }
}

/// One undo snapshot: a buffer and the cursor inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorState {
    cursor: Cursor,
    buffer: Buffer,
}

impl CursorState {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            cursor: Cursor::default(),
            buffer,
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Adopt a cursor computed elsewhere (e.g. a resolved motion).
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    pub fn mode(&self) -> Mode {
        self.cursor.mode
    }

    /// Mirror the editor mode; affects the column clamp from now on.
    pub fn set_mode(&mut self, mode: Mode) {
        self.cursor.mode = mode;
    }

    pub fn x(&self) -> usize {
        self.cursor.x(&self.buffer)
    }

    pub fn y(&self) -> usize {
        self.cursor.y(&self.buffer)
    }

    pub fn position(&self) -> Position {
        self.cursor.position(&self.buffer)
    }

    pub fn set_x(&mut self, x: usize) {
        self.cursor.set_x(&self.buffer, x);
    }

    /// Set the column from a function of the current (clamped) column.
    pub fn update_x(&mut self, f: impl FnOnce(usize) -> usize) {
        let x = f(self.x());
        self.set_x(x);
    }

    pub fn set_y(&mut self, y: usize) {
        self.cursor.set_y(&self.buffer, y);
    }

    pub fn update_y(&mut self, f: impl FnOnce(usize) -> usize) {
        let y = f(self.y());
        self.set_y(y);
    }

    pub fn move_forward(&mut self) -> bool {
        self.cursor.move_forward(&self.buffer)
    }

    pub fn move_backward(&mut self) -> bool {
        self.cursor.move_backward(&self.buffer)
    }

    pub fn is_start_of_file(&self) -> bool {
        self.cursor.is_start_of_file(&self.buffer)
    }

    pub fn is_end_of_file(&self) -> bool {
        self.cursor.is_end_of_file(&self.buffer)
    }

    pub fn is_end_of_line(&self) -> bool {
        self.cursor.is_end_of_line(&self.buffer)
    }

    pub fn char_under_cursor(&self) -> Option<char> {
        self.cursor.char_under(&self.buffer)
    }

    /// Text of the cursor's line.
    pub fn current_line(&self) -> &str {
        self.buffer.line(self.y()).unwrap_or_default()
    }

    /// Splice `text` in at the cursor and advance past it.
    pub fn insert_text_at_cursor(&mut self, text: &str) {
        let (x, y) = (self.x(), self.y());
        self.buffer.insert_text(text, x, y);
        self.set_x(x + text.chars().count());
    }

    /// Delete one character: the one under the cursor, or in Insert mode the
    /// one before it. Insert-mode deletion at column 0 joins the line onto
    /// the previous one.
    pub fn delete_text_at_cursor(&mut self) {
        let (x, y) = (self.x(), self.y());
        if self.mode() != Mode::Insert {
            let at = Position::new(x, y);
            self.buffer.delete_selection(Rect::between(at, at), false);
            return;
        }
        if x > 0 {
            let at = Position::new(x - 1, y);
            self.buffer.delete_selection(Rect::between(at, at), false);
            self.set_x(x - 1);
        } else if y > 0 {
            let join_at = self.buffer.line_len(y - 1);
            self.buffer.merge_lines(y - 1, y);
            self.buffer.compact();
            self.set_y(y - 1);
            self.set_x(join_at);
        }
    }

    /// Break the line at the cursor; the cursor lands at the start of the new line.
    pub fn split_line_at_cursor(&mut self) {
        let (x, y) = (self.x(), self.y());
        self.buffer.split_line(x, y);
        self.set_y(y + 1);
        self.set_x(0);
    }
}
