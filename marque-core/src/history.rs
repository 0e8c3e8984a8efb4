//! # History
//!
//! The undo/redo state machine: a linear sequence of committed snapshots with
//! a cursor. `past` and `future` surround the `present` snapshot; committing
//! anything new truncates `future`, so history is a line, not a tree. Undo and
//! redo at the boundaries are defined no-ops, never errors.
//!
//! The stack is seeded with the initial (empty) scene, so there is always a
//! `present` to return to and `undo` can never underflow.

use crate::snapshot::Snapshot;

/// Oldest entries are dropped beyond this depth. Snapshots are whole-scene
/// captures, so an unbounded session would grow without limit otherwise.
pub const MAX_DEPTH: usize = 100;

/// Past/present/future snapshot stacks.
pub struct History {
    /// Oldest first, most recent last. Excludes `present`.
    past: Vec<Snapshot>,
    present: Snapshot,
    /// Redo entries, most recent undo last. Non-empty only between an undo
    /// and the next commit.
    future: Vec<Snapshot>,
}

impl History {
    /// Construct with the initial committed state as `present`.
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
        }
    }

    /// Make `snapshot` the new present, pushing the old present into `past`.
    /// Any redo history is discarded - undone states are unreachable once a
    /// new edit happens.
    pub fn commit(&mut self, snapshot: Snapshot) {
        let old = std::mem::replace(&mut self.present, snapshot);
        self.past.push(old);
        if self.past.len() > MAX_DEPTH {
            let excess = self.past.len() - MAX_DEPTH;
            self.past.drain(..excess);
        }
        let dropped = self.future.len();
        self.future.clear();
        log::trace!("commit: {} past, {dropped} redo entries dropped", self.past.len());
    }

    /// Step back one committed state. `None` at the boundary: nothing moves,
    /// `present` is unchanged.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let popped = self.past.pop()?;
        let old = std::mem::replace(&mut self.present, popped);
        self.future.push(old);
        Some(&self.present)
    }
    /// Step forward again. Mirror image of [`Self::undo`].
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let popped = self.future.pop()?;
        let old = std::mem::replace(&mut self.present, popped);
        self.past.push(old);
        Some(&self.present)
    }

    /// The state an [`Self::undo`] would move to, without moving.
    #[must_use]
    pub fn peek_undo(&self) -> Option<&Snapshot> {
        self.past.last()
    }
    /// The state a [`Self::redo`] would move to, without moving.
    #[must_use]
    pub fn peek_redo(&self) -> Option<&Snapshot> {
        self.future.last()
    }

    #[must_use]
    pub fn present(&self) -> &Snapshot {
        &self.present
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}

#[cfg(test)]
mod test {
    use super::{History, MAX_DEPTH};
    use crate::snapshot::{encode, Snapshot};
    use crate::state::Scene;

    // Distinguishable snapshots: background alpha encodes a sequence number.
    fn snapshot(seq: u8) -> Snapshot {
        let mut scene = Scene::default();
        scene.set_background(
            crate::color::Rgba::new(0.0, 0.0, 0.0, f32::from(seq) / 255.0).unwrap(),
        );
        encode(&scene).unwrap()
    }

    #[test]
    fn boundary_undo_is_noop() {
        let mut history = History::new(snapshot(0));
        let before = history.present().clone();
        assert!(history.undo().is_none());
        assert_eq!(history.present(), &before);
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 0);
    }
    #[test]
    fn boundary_redo_is_noop() {
        let mut history = History::new(snapshot(0));
        history.commit(snapshot(1));
        let before = history.present().clone();
        assert!(history.redo().is_none());
        assert_eq!(history.present(), &before);
        assert_eq!(history.undo_depth(), 1);
    }
    #[test]
    fn undo_then_redo_restores_present() {
        let mut history = History::new(snapshot(0));
        for seq in 1..=5 {
            history.commit(snapshot(seq));
        }
        // Inverse law from every reachable state.
        for _ in 0..5 {
            let before = history.present().clone();
            assert!(history.undo().is_some());
            assert_eq!(history.redo(), Some(&before));
            assert!(history.undo().is_some());
        }
    }
    #[test]
    fn commit_clears_future() {
        let mut history = History::new(snapshot(0));
        history.commit(snapshot(1));
        history.commit(snapshot(2));
        assert!(history.undo().is_some());
        assert!(history.can_redo());

        history.commit(snapshot(3));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
    }
    #[test]
    fn walk_scenario() {
        // commit S1, S2 over initial S0; walk both boundaries.
        let (s0, s1, s2) = (snapshot(0), snapshot(1), snapshot(2));
        let mut history = History::new(s0.clone());
        history.commit(s1.clone());
        history.commit(s2.clone());

        assert_eq!(history.undo(), Some(&s1));
        assert_eq!(history.undo(), Some(&s0));
        assert!(history.undo().is_none());
        assert_eq!(history.present(), &s0);

        assert_eq!(history.redo(), Some(&s1));
        history.commit(snapshot(3));
        assert!(history.redo().is_none());
    }
    #[test]
    fn depth_is_capped() {
        let mut history = History::new(snapshot(0));
        for _ in 0..(MAX_DEPTH + 50) {
            history.commit(snapshot(1));
        }
        assert_eq!(history.undo_depth(), MAX_DEPTH);
    }
}
