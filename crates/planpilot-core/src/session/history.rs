//! Bounded linear undo/redo history of plan snapshots.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::models::Plan;

/// Number of snapshots kept on the undo stack.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    undo: VecDeque<Plan>,
    #[serde(default)]
    redo: VecDeque<Plan>,
}

impl History {
    /// Records the state before a mutation. Any redo branch is discarded.
    pub fn record(&mut self, previous: Plan) {
        self.undo.push_back(previous);
        while self.undo.len() > HISTORY_LIMIT {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Swaps `current` for the most recent undo snapshot.
    pub fn undo(&mut self, current: Plan) -> Result<Plan, Plan> {
        match self.undo.pop_back() {
            Some(previous) => {
                self.redo.push_back(current);
                Ok(previous)
            }
            None => Err(current),
        }
    }

    /// Swaps `current` for the most recent redo snapshot.
    pub fn redo(&mut self, current: Plan) -> Result<Plan, Plan> {
        match self.redo.pop_back() {
            Some(next) => {
                self.undo.push_back(current);
                Ok(next)
            }
            None => Err(current),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
