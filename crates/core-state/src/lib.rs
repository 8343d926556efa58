//! Editor state: mode, cursor snapshots, undo history, and visual highlights.
//!
//! A [`CursorState`] owns one [`core_text::Buffer`] together with an `(x, y)`
//! cursor into it. Every mutating command clones the current state into a new
//! snapshot inside [`History`], so undo and redo are index walks over an arena
//! of immutable-by-convention states rather than replayed edits.
//!
//! Mode lives on the editor and is mirrored into the current snapshot because
//! the cursor clamp depends on it: Insert allows one column past the last
//! character, every other mode stops on the last character.
//!
//! Telemetry:
//! - Snapshot lifecycle (`push_snapshot`, `history_trimmed`, `undo`, `redo`)
//!   is traced on target `state.undo`.

use serde::Serialize;
use std::fmt;

pub mod cursor;
pub mod highlight;
pub mod undo;

pub use cursor::{Cursor, CursorState};
pub use highlight::highlights;
pub use undo::{DEFAULT_HISTORY_LIMIT, History};

/// Active interpretation context for keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Mode {
    /// Command and navigation mode.
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "insert")]
    Insert,
    /// Character-wise selection.
    #[serde(rename = "visual")]
    Visual,
    /// Line-wise selection.
    #[serde(rename = "visual line")]
    VisualLine,
    /// Rectangular selection.
    #[serde(rename = "visual block")]
    VisualBlock,
}

impl Mode {
    pub fn is_visual(self) -> bool {
        matches!(self, Mode::Visual | Mode::VisualLine | Mode::VisualBlock)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Visual => "visual",
            Mode::VisualLine => "visual line",
            Mode::VisualBlock => "visual block",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
