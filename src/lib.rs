//=========================================================================
// Stagehand Engine: Library Root
//
// A small 2D game engine shell: a fixed-cadence frame loop driving a
// stack of scene states, with window, input, audio cues and timing
// exposed to those states through a single service surface.
//
// Typical usage:
// ```no_run
// use stagehand_engine::prelude::*;
//
// struct Title;
//
// impl SceneState for Title {
//     fn update(&mut self, ctx: &mut Context) {
//         if ctx.input().was_pressed(KeyCode::Space) {
//             ctx.play_beam();
//         }
//     }
//     fn draw(&mut self, _ctx: &mut Context) {}
// }
//
// fn main() -> Result<(), EngineError> {
//     let mut engine = EngineBuilder::new(EngineConfig::default()).build()?;
//     engine.push_state(Title);
//     engine.run();
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the backend-independent engine: clock, input, scene stack,
// audio cues, collaborator contracts and the `Context` service surface.
//
// `platform` holds the winit / wgpu / rodio collaborators used by default.
//
pub mod core;
pub mod engine;
pub mod logging;
pub mod platform;
pub mod prelude;

#[cfg(test)]
pub(crate) mod testing;

//--- Public Exports ------------------------------------------------------

pub use crate::core::config::EngineConfig;
pub use crate::core::context::Context;
pub use crate::core::error::{EngineError, EngineResult};
pub use crate::core::scene::SceneState;
pub use engine::{Engine, EngineBuilder};
