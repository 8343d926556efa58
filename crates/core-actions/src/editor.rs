//! The editor instance: input entry point and read-only queries.

use core_config::Config;
use core_events::{KeyEvent, NotationError, parse_notation};
use core_keymap::{KeyChain, KeyToken};
use core_state::{CursorState, History, Mode, highlights};
use core_text::{Buffer, Position, Rect};
use serde::Serialize;
use std::fmt;
use tracing::trace;

use crate::dispatcher;

/// Change-notification callback, invoked after every submitted key.
pub type StateListener = Box<dyn FnMut(&Editor)>;

/// Everything a renderer reads, captured at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorView {
    pub lines: Vec<String>,
    pub cursor: Position,
    pub mode: Mode,
    pub highlights: Option<Vec<Rect>>,
    pub pending_keys: Vec<String>,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

pub struct Editor {
    pub(crate) history: History,
    pub(crate) mode: Mode,
    /// Cursor position captured when a visual mode was entered.
    pub(crate) anchor: Option<Position>,
    pub(crate) keys: KeyChain,
    pub(crate) tab: String,
    listener: Option<StateListener>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("mode", &self.mode)
            .field("cursor", &self.query_cursor())
            .field("anchor", &self.anchor)
            .field("pending", &self.keys.labels())
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Editor {
    pub fn new(text: &str) -> Self {
        Self::with_config(text, &Config::default())
    }

    pub fn with_config(text: &str, config: &Config) -> Self {
        let root = CursorState::new(Buffer::new(text));
        Self {
            history: History::with_limit(root, config.history_limit()),
            mode: Mode::Normal,
            anchor: None,
            keys: KeyChain::with_limit(config.max_pending()),
            tab: config.tab().to_owned(),
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: impl FnMut(&Editor) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn set_listener(&mut self, listener: StateListener) {
        self.listener = Some(listener);
    }

    /// Feed one key event through the combinator and the active reducer,
    /// then notify the listener.
    pub fn submit_key(&mut self, event: &KeyEvent) {
        self.keys.push(KeyToken::from_event(event));
        let result = dispatcher::dispatch(self);
        trace!(target: "actions.dispatch", key = %event, mode = %self.mode, dirty = result.dirty, snapshot = result.snapshot, "key_handled");
        self.notify();
    }

    /// Parse Vim-style key notation (`"2dd<Esc>"`) and submit every key.
    /// Nothing is submitted when the notation is malformed.
    pub fn feed(&mut self, notation: &str) -> Result<(), NotationError> {
        for event in parse_notation(notation)? {
            self.submit_key(&event);
        }
        Ok(())
    }

    fn notify(&mut self) {
        if let Some(mut listener) = self.listener.take() {
            listener(&*self);
            if self.listener.is_none() {
                self.listener = Some(listener);
            }
        }
    }

    pub(crate) fn state(&self) -> &CursorState {
        self.history.current()
    }

    pub(crate) fn state_mut(&mut self) -> &mut CursorState {
        self.history.current_mut()
    }

    /// Switch mode, mirroring it into the live snapshot so clamping follows.
    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.history.current_mut().set_mode(mode);
    }

    /// Start a new undo step from the current state and return it.
    pub(crate) fn push_snapshot(&mut self) -> &mut CursorState {
        self.history.push_snapshot()
    }

    pub fn query_lines(&self) -> Vec<String> {
        self.state().buffer().lines().map(str::to_owned).collect()
    }

    pub fn query_cursor(&self) -> Position {
        self.state().position()
    }

    pub fn query_mode(&self) -> Mode {
        self.mode
    }

    /// Highlight spans of the active visual selection; `None` outside visual modes.
    pub fn query_highlights(&self) -> Option<Vec<Rect>> {
        let anchor = self.anchor?;
        let state = self.state();
        highlights(self.mode, anchor, state.position(), state.buffer())
    }

    pub fn query_text(&self) -> String {
        self.state().buffer().text()
    }

    pub fn query_view(&self) -> EditorView {
        EditorView {
            lines: self.query_lines(),
            cursor: self.query_cursor(),
            mode: self.mode,
            highlights: self.query_highlights(),
            pending_keys: self.pending_keys(),
            undo_depth: self.undo_depth(),
            redo_depth: self.redo_depth(),
        }
    }

    pub fn current_line(&self) -> &str {
        self.state().current_line()
    }

    pub fn current_line_len(&self) -> usize {
        let state = self.state();
        state.buffer().line_len(state.y())
    }

    /// Labels of keys waiting for a command to complete, oldest first.
    pub fn pending_keys(&self) -> Vec<String> {
        self.keys.labels()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }
}
