//=========================================================================
// State Stack
//=========================================================================
//
// LIFO of scene states. Owns every state from push until cleanup.
//
// Only the top element is active: it alone receives handle_events(),
// update() and draw(). Every element below it has been paused.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{SceneState, SceneTransition};
use crate::core::context::Context;

//=== State Stack =========================================================

#[derive(Default)]
pub struct StateStack {
    states: Vec<Box<dyn SceneState>>,
}

impl StateStack {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    //--- Stack Operations -------------------------------------------------

    /// Replaces the top state.
    ///
    /// The current top (if any) is cleaned up and dropped, then `state`
    /// is stored and initialised as the new active state.
    pub fn change(&mut self, state: Box<dyn SceneState>, ctx: &mut Context) {
        if let Some(mut old) = self.states.pop() {
            debug!(target: "scene", "Change: cleaning up {}", old.name());
            old.cleanup(ctx);
        }

        self.store_and_init(state, ctx);
    }

    /// Pauses the current top (if any) and stores `state` above it.
    pub fn push(&mut self, state: Box<dyn SceneState>, ctx: &mut Context) {
        if let Some(top) = self.states.last_mut() {
            debug!(target: "scene", "Push: pausing {}", top.name());
            top.pause(ctx);
        }

        self.store_and_init(state, ctx);
    }

    /// Cleans up and drops the top state, then resumes the one below.
    ///
    /// Popping an empty stack does nothing.
    pub fn pop(&mut self, ctx: &mut Context) {
        let Some(mut old) = self.states.pop() else {
            trace!(target: "scene", "Pop on empty stack ignored");
            return;
        };

        debug!(target: "scene", "Pop: cleaning up {}", old.name());
        old.cleanup(ctx);
        drop(old);

        if let Some(top) = self.states.last_mut() {
            debug!(target: "scene", "Pop: resuming {}", top.name());
            top.resume(ctx);
        }
    }

    /// Cleans up every state, top to bottom. Nothing is resumed on the way.
    pub fn clear(&mut self, ctx: &mut Context) {
        while let Some(mut state) = self.states.pop() {
            debug!(target: "scene", "Clear: cleaning up {}", state.name());
            state.cleanup(ctx);
        }
    }

    fn store_and_init(&mut self, state: Box<dyn SceneState>, ctx: &mut Context) {
        self.states.push(state);
        let depth = self.states.len();
        if let Some(top) = self.states.last_mut() {
            debug!(target: "scene", "Init {} (depth {})", top.name(), depth);
            top.init(ctx);
        }
    }

    //--- Queued Transitions -----------------------------------------------

    /// Applies every transition queued on the context, in request order.
    ///
    /// Transitions queued by the hooks run here (an `init()` that pushes
    /// another state, say) are applied in the same call.
    pub fn apply_pending(&mut self, ctx: &mut Context) {
        loop {
            let pending = ctx.transitions.take();
            if pending.is_empty() {
                break;
            }

            for transition in pending {
                trace!(target: "scene", "Applying {:?}", transition);
                match transition {
                    SceneTransition::Change(state) => self.change(state, ctx),
                    SceneTransition::Push(state) => self.push(state, ctx),
                    SceneTransition::Pop => self.pop(ctx),
                }
            }
        }
    }

    //--- Dispatch ---------------------------------------------------------

    pub fn handle_events(&mut self, ctx: &mut Context) {
        if let Some(top) = self.states.last_mut() {
            top.handle_events(ctx);
        }
    }

    pub fn update(&mut self, ctx: &mut Context) {
        if let Some(top) = self.states.last_mut() {
            top.update(ctx);
        }
    }

    pub fn draw(&mut self, ctx: &mut Context) {
        if let Some(top) = self.states.last_mut() {
            top.draw(ctx);
        }
    }

    //--- Queries ----------------------------------------------------------

    /// The active state, if any.
    pub fn top(&self) -> Option<&dyn SceneState> {
        self.states.last().map(|state| state.as_ref())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
