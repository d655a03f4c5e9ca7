//=========================================================================
// Transition Queue
//=========================================================================
//
// Queue for state-stack transitions requested by scene states.
//
// States cannot touch the stack that is currently calling them, so they
// queue transitions here through the `Context`. The engine applies the
// queue at the next phase boundary, in FIFO order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::SceneState;

//=== Scene Transition ====================================================

/// A state-stack operation.
pub enum SceneTransition {
    /// Cleans up and drops the top state (if any), then inits the new one.
    Change(Box<dyn SceneState>),

    /// Pauses the top state (if any), then inits the new one above it.
    Push(Box<dyn SceneState>),

    /// Cleans up and drops the top state, then resumes the one below.
    Pop,
}

impl fmt::Debug for SceneTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Change(s) => f.debug_tuple("Change").field(&s.name()).finish(),
            Self::Push(s) => f.debug_tuple("Push").field(&s.name()).finish(),
            Self::Pop => f.write_str("Pop"),
        }
    }
}

//=== Transition Queue ====================================================

#[derive(Debug, Default)]
pub struct TransitionQueue {
    queue: Vec<SceneTransition>,
}

impl TransitionQueue {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a transition to be applied at the next phase boundary.
    pub fn push(&mut self, transition: SceneTransition) {
        self.queue.push(transition);
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued transitions.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all transitions from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<SceneTransition> {
        std::mem::take(&mut self.queue)
    }
}

//=== Tests ===============================================================
