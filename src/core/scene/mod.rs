//=========================================================================
// Scene System
//=========================================================================
//
// Stack of scene states with well-defined lifecycle transitions.
//
// Architecture:
//   StateStack
//     └─ states: Vec<Box<dyn SceneState>>   (top = active)
//
// Per-element lifecycle:
//   init ─► active ─► { pause ─► resume }* ─► cleanup ─► dropped
//
// Flow:
//   handle_events() / update() / draw() → top only
//   Context::push_state() etc. → TransitionQueue → StateStack::apply_pending()
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::context::Context;

//=== Module Declarations =================================================

mod state_stack;
mod transition_queue;

//=== Public API ==========================================================

pub use state_stack::StateStack;
pub use transition_queue::{SceneTransition, TransitionQueue};

//=== SceneState Trait ====================================================

/// A scene driven by the engine while it sits on top of the stack.
///
/// Every hook receives the engine's service surface for the duration of
/// the call only. Only `update()` and `draw()` are required; the
/// lifecycle hooks default to doing nothing.
///
/// ```rust
/// # use stagehand_engine::prelude::*;
/// struct Title;
///
/// impl SceneState for Title {
///     fn update(&mut self, ctx: &mut Context) {
///         if ctx.input().was_pressed(KeyCode::Enter) {
///             ctx.play_beam();
///         }
///     }
///
///     fn draw(&mut self, _ctx: &mut Context) {}
/// }
/// ```
pub trait SceneState {
    /// Called once, right after the state is placed on the stack.
    fn init(&mut self, _ctx: &mut Context) {}

    /// Called once, right before the state is removed and dropped.
    fn cleanup(&mut self, _ctx: &mut Context) {}

    /// Called when another state is pushed on top of this one.
    fn pause(&mut self, _ctx: &mut Context) {}

    /// Called when this state becomes the top again after a pop.
    fn resume(&mut self, _ctx: &mut Context) {}

    /// Called in the event phase, after the input snapshot is current.
    fn handle_events(&mut self, _ctx: &mut Context) {}

    fn update(&mut self, ctx: &mut Context);

    fn draw(&mut self, ctx: &mut Context);

    /// Label used in log output.
    fn name(&self) -> &str {
        "scene"
    }
}
