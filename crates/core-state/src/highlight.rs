//! Visual selection highlight spans.

use core_text::{Buffer, Position, Rect};

use crate::Mode;

/// Inclusive highlight rectangles for the active visual mode, or `None`
/// outside the visual modes.
///
/// - Block: a single min/max rectangle of anchor and cursor.
/// - Line: one full-width span per selected row.
/// - Char: the line spans, with the first starting at the anchor column and
///   the last ending at the cursor column.
pub fn highlights(mode: Mode, anchor: Position, cursor: Position, buffer: &Buffer) -> Option<Vec<Rect>> {
    let y1 = anchor.y.min(cursor.y);
    let y2 = anchor.y.max(cursor.y);
    match mode {
        Mode::VisualBlock => Some(vec![Rect {
            x1: anchor.x.min(cursor.x),
            y1,
            x2: anchor.x.max(cursor.x),
            y2,
        }]),
        Mode::VisualLine => Some(line_spans(y1, y2, buffer)),
        Mode::Visual => {
            let mut spans = line_spans(y1, y2, buffer);
            if let Some(first) = spans.first_mut() {
                first.x1 = anchor.x;
            }
            if let Some(last) = spans.last_mut() {
                last.x2 = cursor.x;
            }
            Some(spans)
        }
        Mode::Normal | Mode::Insert => None,
    }
}

fn line_spans(y1: usize, y2: usize, buffer: &Buffer) -> Vec<Rect> {
    (y1..=y2)
        .map(|y| Rect {
            x1: 0,
            y1: y,
            x2: buffer.line_len(y).saturating_sub(1),
            y2: y,
        })
        .collect()
}
