//! Line-vector text buffer with tombstoned deletion.
//!
//! Lines are stored as `Option<String>`: `None` marks a line that has been
//! deleted but not yet physically removed (a tombstone). Row indices stay
//! stable while a multi-row operation tombstones lines one at a time; a
//! final [`Buffer::compact`] drops the tombstones in one pass.
//!
//! Columns are measured in `char`s, never bytes. All column arguments are
//! clamped to the line, so callers may pass positions derived from another
//! snapshot without first validating them.
//!
//! Invariant: after `compact` the buffer holds at least one line. An empty
//! document is one empty line, never zero lines.

use tracing::trace;

pub mod rect;

pub use rect::{Position, Rect};

/// Ordered lines of text, some of which may be tombstoned.
#[derive(Debug, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<Option<String>>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new("")
    }
}

/// Cloning copies live lines only; tombstones are compacted away in the copy.
impl Clone for Buffer {
    fn clone(&self) -> Self {
        Self::from_lines(self.lines().map(str::to_owned).collect())
    }
}

impl Buffer {
    /// Build a buffer from a text blob, splitting on `\n`.
    ///
    /// A trailing newline yields a trailing empty line, matching a plain
    /// split; `""` yields a single empty line.
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(|l| Some(l.to_owned())).collect(),
        }
    }

    /// Build a buffer from already-split lines. An empty list becomes one empty line.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut buf = Self {
            lines: lines.into_iter().map(Some).collect(),
        };
        if buf.lines.is_empty() {
            buf.lines.push(Some(String::new()));
        }
        buf
    }

    /// Number of line slots, tombstones included.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Live text of line `y`; `None` when tombstoned or out of range.
    pub fn line(&self, y: usize) -> Option<&str> {
        self.lines.get(y).and_then(|l| l.as_deref())
    }

    /// Length of line `y` in chars (0 when tombstoned or out of range).
    pub fn line_len(&self, y: usize) -> usize {
        self.line(y).map_or(0, |l| l.chars().count())
    }

    /// Character at column `x` of line `y`.
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.line(y).and_then(|l| l.chars().nth(x))
    }

    /// Iterate live lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|l| l.as_deref())
    }

    /// Live lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }

    /// Remove the inclusive rectangle `rect` from every live line in its row range.
    ///
    /// With `remove_empty_lines`, a row whose whole content falls inside the
    /// column range is tombstoned instead of being left as an empty string.
    pub fn delete_selection(&mut self, rect: Rect, remove_empty_lines: bool) {
        let r = rect.normalized();
        for (y, slot) in self.lines.iter_mut().enumerate() {
            if y < r.y1 || y > r.y2 {
                continue;
            }
            let Some(line) = slot.as_mut() else {
                continue;
            };
            let len = line.chars().count();
            if remove_empty_lines && r.x1 == 0 && r.x2 + 1 >= len {
                *slot = None;
                trace!(target: "text.buffer", y, "line_tombstoned");
                continue;
            }
            let start = byte_index(line, r.x1);
            let end = byte_index(line, r.x2.saturating_add(1));
            line.replace_range(start..end, "");
        }
    }

    /// Tombstone line `y` unconditionally.
    pub fn delete_line(&mut self, y: usize) {
        if let Some(slot) = self.lines.get_mut(y) {
            *slot = None;
        }
    }

    /// Drop every tombstone. Never leaves the buffer with zero lines.
    pub fn compact(&mut self) {
        let before = self.lines.len();
        self.lines.retain(Option::is_some);
        if self.lines.is_empty() {
            self.lines.push(Some(String::new()));
        }
        trace!(target: "text.buffer", before, after = self.lines.len(), "compact");
    }

    /// Text inside the inclusive rectangle, one row per live line, joined with `\n`.
    pub fn selection(&self, rect: Rect) -> String {
        let r = rect.normalized();
        let mut rows = Vec::new();
        for (y, slot) in self.lines.iter().enumerate() {
            if y < r.y1 || y > r.y2 {
                continue;
            }
            if let Some(line) = slot {
                let start = byte_index(line, r.x1);
                let end = byte_index(line, r.x2.saturating_add(1));
                rows.push(&line[start..end]);
            }
        }
        rows.join("\n")
    }

    /// Append line `b` onto line `a` and tombstone `b`.
    pub fn merge_lines(&mut self, a: usize, b: usize) {
        if a == b || a >= self.lines.len() || b >= self.lines.len() {
            return;
        }
        let tail = self.lines[b].take().unwrap_or_default();
        self.lines[a].get_or_insert_with(String::new).push_str(&tail);
    }

    /// Splice `text` into line `y` at column `x` (clamped to the line end).
    ///
    /// A tombstoned slot is revived with `text` as its content.
    pub fn insert_text(&mut self, text: &str, x: usize, y: usize) {
        let Some(slot) = self.lines.get_mut(y) else {
            return;
        };
        match slot {
            Some(line) => {
                let at = byte_index(line, x);
                line.insert_str(at, text);
            }
            None => *slot = Some(text.to_owned()),
        }
    }

    /// Insert a new line at index `y` (clamped to the end), shifting later lines down.
    pub fn insert_line(&mut self, y: usize, text: &str) {
        let at = y.min(self.lines.len());
        self.lines.insert(at, Some(text.to_owned()));
    }

    /// Split line `y` at column `x`; the right-hand part becomes line `y + 1`.
    pub fn split_line(&mut self, x: usize, y: usize) {
        let Some(Some(line)) = self.lines.get_mut(y) else {
            return;
        };
        let at = byte_index(line, x);
        let tail = line.split_off(at);
        self.lines.insert(y + 1, Some(tail));
    }
}

/// Byte offset of char column `x` in `line`, clamped to `line.len()`.
fn byte_index(line: &str, x: usize) -> usize {
    line.char_indices().nth(x).map_or(line.len(), |(b, _)| b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEST_FILE: &str = "The quick brown fox\njumps over the lazy dog\nThe quick brown fox\njumps over the lazy dog";

    fn rect(x1: usize, y1: usize, x2: usize, y2: usize) -> Rect {
        Rect { x1, y1, x2, y2 }
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let b = Buffer::new("");
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0), Some(""));
    }

    #[test]
    fn delete_selection_row_leaves_empty_line() {
        let mut b = Buffer::new(TEST_FILE);
        let len = b.line_len(0);
        b.delete_selection(rect(0, 0, len - 1, 0), false);
        assert_eq!(
            b.text(),
            [
                "",
                "jumps over the lazy dog",
                "The quick brown fox",
                "jumps over the lazy dog"
            ]
            .join("\n")
        );
    }

    #[test]
    fn delete_selection_row_removes_line_when_requested() {
        let mut b = Buffer::new(TEST_FILE);
        let len = b.line_len(0);
        b.delete_selection(rect(0, 0, len - 1, 0), true);
        assert_eq!(b.line(0), None);
        b.compact();
        assert_eq!(b.line_count(), 3);
        assert_eq!(b.line(0), Some("jumps over the lazy dog"));
    }

    #[test]
    fn delete_selection_column() {
        let mut b = Buffer::new(TEST_FILE);
        let last = b.line_count() - 1;
        b.delete_selection(rect(0, 0, 0, last), false);
        assert_eq!(
            b.lines().collect::<Vec<_>>(),
            vec![
                "he quick brown fox",
                "umps over the lazy dog",
                "he quick brown fox",
                "umps over the lazy dog"
            ]
        );
    }

    #[test]
    fn delete_selection_normalizes_corners() {
        let mut b = Buffer::new("abcdef");
        b.delete_selection(rect(4, 0, 1, 0), false);
        assert_eq!(b.line(0), Some("af"));
    }

    #[test]
    fn selection_row_and_box() {
        let b = Buffer::new(TEST_FILE);
        assert_eq!(b.selection(rect(0, 0, b.line_len(0) - 1, 0)), "The quick brown fox");
        assert_eq!(b.selection(rect(5, 1, 10, 2)), " over \nuick b");
    }

    #[test]
    fn selection_past_line_end_is_empty_row() {
        let b = Buffer::new(TEST_FILE);
        assert_eq!(b.selection(rect(22, 1, 22, 3)), "g\n\ng");
    }

    #[test]
    fn selection_column() {
        let b = Buffer::new(TEST_FILE);
        assert_eq!(b.selection(rect(0, 0, 0, 3)), "T\nj\nT\nj");
    }

    #[test]
    fn compact_never_leaves_zero_lines() {
        let mut b = Buffer::new("a\nb");
        b.delete_line(0);
        b.delete_line(1);
        b.compact();
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0), Some(""));
    }

    #[test]
    fn merge_lines_tombstones_second() {
        let mut b = Buffer::new("Th\nps over");
        b.merge_lines(0, 1);
        assert_eq!(b.line(0), Some("Thps over"));
        assert_eq!(b.line(1), None);
        assert_eq!(b.line_len(1), 0);
    }

    #[test]
    fn clone_skips_tombstones() {
        let mut b = Buffer::new("a\nb\nc");
        b.delete_line(1);
        let c = b.clone();
        assert_eq!(c.line_count(), 2);
        assert_eq!(c.text(), "a\nc");
    }

    #[test]
    fn insert_text_multibyte_columns() {
        let mut b = Buffer::new("héllo");
        b.insert_text("X", 2, 0);
        assert_eq!(b.line(0), Some("héXllo"));
        b.insert_text("!", 99, 0);
        assert_eq!(b.line(0), Some("héXllo!"));
    }

    #[test]
    fn insert_line_and_split() {
        let mut b = Buffer::new("abcd");
        b.split_line(2, 0);
        assert_eq!(b.text(), "ab\ncd");
        b.insert_line(1, "mid");
        assert_eq!(b.text(), "ab\nmid\ncd");
        b.insert_line(10, "end");
        assert_eq!(b.line(3), Some("end"));
    }

    #[test]
    fn char_at_reads_chars() {
        let b = Buffer::new("aé b");
        assert_eq!(b.char_at(1, 0), Some('é'));
        assert_eq!(b.char_at(2, 0), Some(' '));
        assert_eq!(b.char_at(9, 0), None);
    }
}
