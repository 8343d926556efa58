#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use core_actions::{Editor, Position};

pub const TEST_FILE: &str = "The quick brown fox
jumps over the lazy dog
The quick brown fox
jumps over the lazy dog
The quick brown fox
jumps over the lazy dog";

/// Editor over `text` after replaying `keys` (Vim key notation).
pub fn run(text: &str, keys: &str) -> Editor {
    let mut ed = Editor::new(text);
    feed(&mut ed, keys);
    ed
}

pub fn feed(ed: &mut Editor, keys: &str) {
    ed.feed(keys).expect("valid key notation");
}

pub fn pos(x: usize, y: usize) -> Position {
    Position::new(x, y)
}

pub fn line(ed: &Editor, y: usize) -> String {
    ed.query_lines()[y].clone()
}
