//! Snapshot history for undo and redo.

use tracing::trace;

use crate::CursorState;

/// Default number of snapshots retained in the history arena.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

#[derive(Debug)]
struct Node {
    state: CursorState,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Linear undo/redo chain of cursor snapshots.
///
/// Nodes live in a `Vec` in chain order and link to their neighbours by
/// index. `current` is the live snapshot: motions and Insert-mode keys
/// mutate it in place, while mutating commands first call
/// [`History::push_snapshot`] so the previous state stays reachable by undo.
#[derive(Debug)]
pub struct History {
    nodes: Vec<Node>,
    current: usize,
    limit: usize,
}

impl History {
    pub fn new(root: CursorState) -> Self {
        Self::with_limit(root, DEFAULT_HISTORY_LIMIT)
    }

    /// History retaining at most `limit` snapshots (at least one).
    pub fn with_limit(root: CursorState, limit: usize) -> Self {
        Self {
            nodes: vec![Node {
                state: root,
                prev: None,
                next: None,
            }],
            current: 0,
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> &CursorState {
        &self.nodes[self.current].state
    }

    pub fn current_mut(&mut self) -> &mut CursorState {
        &mut self.nodes[self.current].state
    }

    /// Number of snapshots held, current included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Steps available to undo. Nodes sit in chain order, so this is the
    /// current index.
    pub fn undo_depth(&self) -> usize {
        self.current
    }

    /// Steps available to redo.
    pub fn redo_depth(&self) -> usize {
        self.nodes.len() - 1 - self.current
    }

    /// Clone the current state into a new tip and make it current.
    ///
    /// Any redo branch beyond the current snapshot is discarded. When the
    /// chain exceeds the limit the root is dropped.
    pub fn push_snapshot(&mut self) -> &mut CursorState {
        let state = self.current().clone();
        let dropped_redo = self.nodes.len() - self.current - 1;
        self.nodes.truncate(self.current + 1);
        let prev = self.current;
        self.nodes.push(Node {
            state,
            prev: Some(prev),
            next: None,
        });
        self.current = self.nodes.len() - 1;
        self.nodes[prev].next = Some(self.current);
        trace!(target: "state.undo", len = self.nodes.len(), dropped_redo, lines = self.current().buffer().line_count(), "push_snapshot");
        if self.nodes.len() > self.limit {
            self.drop_root();
        }
        self.current_mut()
    }

    fn drop_root(&mut self) {
        self.nodes.remove(0);
        for node in &mut self.nodes {
            node.prev = node.prev.and_then(|i| i.checked_sub(1));
            node.next = node.next.map(|i| i - 1);
        }
        self.current -= 1;
        trace!(target: "state.undo", len = self.nodes.len(), limit = self.limit, "history_trimmed");
    }

    /// Walk up to `steps` snapshots back. Returns the number actually taken.
    pub fn undo(&mut self, steps: u32) -> u32 {
        let mut taken = 0;
        while taken < steps {
            let Some(prev) = self.nodes[self.current].prev else {
                break;
            };
            self.current = prev;
            taken += 1;
        }
        trace!(target: "state.undo", requested = steps, taken, current = self.current, "undo");
        taken
    }

    /// Walk up to `steps` snapshots forward. Returns the number actually taken.
    pub fn redo(&mut self, steps: u32) -> u32 {
        let mut taken = 0;
        while taken < steps {
            let Some(next) = self.nodes[self.current].next else {
                break;
            };
            self.current = next;
            taken += 1;
        }
        trace!(target: "state.undo", requested = steps, taken, current = self.current, "redo");
        taken
    }
}
