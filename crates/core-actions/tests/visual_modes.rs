mod common;

use common::{TEST_FILE, feed, line, pos, run};
use core_actions::{Mode, Rect};
use pretty_assertions::assert_eq;

fn rect(x1: usize, y1: usize, x2: usize, y2: usize) -> Rect {
    Rect { x1, y1, x2, y2 }
}

#[test]
fn entering_visual_modes() {
    let mut ed = run(TEST_FILE, "v");
    assert_eq!(ed.query_mode(), Mode::Visual);
    assert_eq!(ed.query_highlights(), Some(vec![rect(0, 0, 0, 0)]));
    feed(&mut ed, "<Esc>V");
    assert_eq!(ed.query_mode(), Mode::VisualLine);
    feed(&mut ed, "<Esc><C-v>");
    assert_eq!(ed.query_mode(), Mode::VisualBlock);
    feed(&mut ed, "<Esc>");
    assert_eq!(ed.query_mode(), Mode::Normal);
}

#[test]
fn char_selection_highlights() {
    let ed = run(TEST_FILE, "v2l");
    assert_eq!(ed.query_highlights(), Some(vec![rect(0, 0, 2, 0)]));

    let ed = run(TEST_FILE, "llvj");
    assert_eq!(
        ed.query_highlights(),
        Some(vec![rect(2, 0, 18, 0), rect(0, 1, 2, 1)])
    );
}

#[test]
fn line_and_block_highlights() {
    let ed = run(TEST_FILE, "lVj");
    assert_eq!(
        ed.query_highlights(),
        Some(vec![rect(0, 0, 18, 0), rect(0, 1, 22, 1)])
    );
    let ed = run(TEST_FILE, "3l<C-v>jh");
    assert_eq!(ed.query_highlights(), Some(vec![rect(2, 0, 3, 1)]));
}

#[test]
fn escape_clears_selection() {
    let ed = run(TEST_FILE, "vjl<Esc>");
    assert_eq!(ed.query_highlights(), None);
    assert_eq!(ed.query_mode(), Mode::Normal);
    assert_eq!(ed.query_cursor(), pos(1, 1));
}

#[test]
fn char_delete_within_one_line() {
    let ed = run(TEST_FILE, "lvlx");
    assert_eq!(line(&ed, 0), "T quick brown fox");
    assert_eq!(ed.query_cursor(), pos(1, 0));
    assert_eq!(ed.query_mode(), Mode::Normal);

    let ed = run(TEST_FILE, "v3ld");
    assert_eq!(line(&ed, 0), "quick brown fox");
}

#[test]
fn char_delete_across_two_lines_merges_them() {
    let ed = run(TEST_FILE, "llvjx");
    assert_eq!(line(&ed, 0), "Thps over the lazy dog");
    assert_eq!(ed.query_lines().len(), 5);
    assert_eq!(ed.query_cursor(), pos(2, 0));
    assert_eq!(ed.query_highlights(), None);
}

#[test]
fn char_delete_across_three_lines_merges_only_first_two() {
    let ed = run(TEST_FILE, "llvjjx");
    assert_eq!(
        ed.query_lines(),
        vec![
            "Th",
            " quick brown fox",
            "jumps over the lazy dog",
            "The quick brown fox",
            "jumps over the lazy dog",
        ]
    );
}

#[test]
fn line_delete_removes_whole_rows() {
    let ed = run(TEST_FILE, "Vjd");
    assert_eq!(ed.query_lines().len(), 4);
    assert_eq!(line(&ed, 0), "The quick brown fox");
    assert_eq!(ed.query_cursor(), pos(0, 0));
    assert_eq!(ed.query_mode(), Mode::Normal);
}

#[test]
fn line_delete_on_empty_row() {
    let ed = run("a\n\nb", "jVd");
    assert_eq!(ed.query_lines(), vec!["a", "b"]);
}

#[test]
fn block_delete() {
    let ed = run(TEST_FILE, "l<C-v>jlx");
    assert_eq!(line(&ed, 0), "T quick brown fox");
    assert_eq!(line(&ed, 1), "jps over the lazy dog");
    assert_eq!(line(&ed, 2), "The quick brown fox");
    assert_eq!(ed.query_cursor(), pos(1, 0));
}

#[test]
fn find_target_in_visual_mode_is_a_motion() {
    let ed = run(TEST_FILE, "vfx");
    assert_eq!(ed.query_text(), TEST_FILE);
    assert_eq!(ed.query_mode(), Mode::Visual);
    assert_eq!(ed.query_cursor(), pos(18, 0));
}

#[test]
fn visual_delete_is_one_undo_step() {
    let mut ed = run(TEST_FILE, "llvjx");
    assert_eq!(ed.undo_depth(), 1);
    feed(&mut ed, "u");
    assert_eq!(ed.query_text(), TEST_FILE);
    assert_eq!(ed.query_mode(), Mode::Normal);
}

#[test]
fn unbound_keys_keep_the_selection() {
    let ed = run(TEST_FILE, "vlq");
    assert_eq!(ed.query_mode(), Mode::Visual);
    assert_eq!(ed.query_highlights(), Some(vec![rect(0, 0, 1, 0)]));
    assert_eq!(ed.pending_keys(), vec!["q"]);
}
