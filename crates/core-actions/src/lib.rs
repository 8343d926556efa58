//! core-actions: the modal editing engine.
//!
//! [`Editor`] is the boundary a host talks to. It accepts one normalized
//! [`KeyEvent`] at a time through [`Editor::submit_key`] and exposes
//! read-only queries (`query_lines`, `query_cursor`, `query_mode`,
//! `query_highlights`, `query_text`, `query_view`) for a renderer.
//!
//! Key flow: event -> `core_keymap::KeyToken` -> pending `KeyChain` ->
//! `dispatcher` (Escape first, then the reducer for the active mode) ->
//! `motion::resolve` or a direct edit -> snapshot history in `core_state`.
//!
//! Every keypress is handled to completion before the next is accepted;
//! there is no background work and no timeout. Unknown keys are absorbed
//! into the pending chain without effect.

pub mod dispatcher;
pub mod editor;
pub mod motion;

pub use core_events::{KeyCode, KeyEvent, KeyModifiers, NotationError, parse_notation};
pub use core_state::Mode;
pub use core_text::{Position, Rect};
pub use dispatcher::DispatchResult;
pub use editor::{Editor, EditorView, StateListener};
