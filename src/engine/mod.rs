//=========================================================================
// Stagehand Engine
//
// Frame loop and state-stack driver.
//
// Architecture:
// ```text
//     EngineBuilder ──build()──> Engine ──run()──> [frame loop]
//                                  │
//                                  ├─ context: Context      (services)
//                                  └─ stack:   StateStack   (scenes)
// ```
//
// Each frame runs five phases, in this order:
//   1. update_fps()    FPS accounting
//   2. handle_event()  drain OS events → InputSnapshot → top.handle_events
//   3. update()        refresh delta → top.update
//   4. draw()          viewport, clear, blend, camera → top.draw
//   5. late_fps()      present, pace, debug title
//
// Transitions queued by a state are applied right after the phase that
// queued them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::audio::AudioCues;
use crate::core::context::{Context, RunState};
use crate::core::input::InputSnapshot;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::scene::{SceneState, StateStack};

//=== Module Declarations =================================================

mod builder;
mod fatal;

pub use builder::EngineBuilder;
pub use fatal::{ExitProcess, FatalSink};

//=== Constants ===========================================================

/// Frames between debug FPS title refreshes.
const DEBUG_TITLE_INTERVAL: u32 = 60;

//=== Engine ==============================================================

/// A running engine instance.
///
/// Create one with [`EngineBuilder`]. Either call [`run`](Self::run), or
/// drive the phases yourself:
///
/// ```no_run
/// # use stagehand_engine::prelude::*;
/// # let mut engine = EngineBuilder::new(EngineConfig::default()).build()?;
/// while engine.running() {
///     engine.update_fps();
///     engine.handle_event();
///     engine.update();
///     engine.draw();
///     engine.late_fps();
/// }
/// engine.cleanup();
/// # Ok::<(), EngineError>(())
/// ```
pub struct Engine {
    pub(crate) context: Context,
    pub(crate) stack: StateStack,
}

impl Engine {
    //--- State Stack ------------------------------------------------------

    /// Replaces the active state.
    pub fn change_state(&mut self, state: impl SceneState + 'static) {
        self.stack.change(Box::new(state), &mut self.context);
        self.stack.apply_pending(&mut self.context);
    }

    /// Pauses the active state and makes `state` active above it.
    pub fn push_state(&mut self, state: impl SceneState + 'static) {
        self.stack.push(Box::new(state), &mut self.context);
        self.stack.apply_pending(&mut self.context);
    }

    /// Removes the active state and resumes the one below. No-op on an
    /// empty stack.
    pub fn pop_state(&mut self) {
        self.stack.pop(&mut self.context);
        self.stack.apply_pending(&mut self.context);
    }

    pub fn top_state(&self) -> Option<&dyn SceneState> {
        self.stack.top()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    //--- Run State --------------------------------------------------------

    pub fn running(&self) -> bool {
        self.context.running()
    }

    pub fn quit(&mut self) {
        self.context.quit();
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    //--- Phase 1: FPS Accounting ------------------------------------------

    pub fn update_fps(&mut self) {
        let now = self.context.platform.monotonic_millis();
        self.context.clock.account_fps(now);
    }

    //--- Phase 2: Events --------------------------------------------------

    /// Drains every pending OS event into the input snapshot, reads the
    /// mouse, then lets the active state react.
    pub fn handle_event(&mut self) {
        let ctx = &mut self.context;

        // Edges from the previous frame stop being visible here.
        ctx.input.end_frame();

        while let Some(event) = ctx.platform.poll_event() {
            match event {
                PlatformEvent::KeyDown(code) => ctx.input.on_key(code, true),
                PlatformEvent::KeyUp(code) => {
                    ctx.input.on_key(code, false);
                    if code.is_escape() && ctx.escape_quits {
                        debug!(target: "engine", "Escape released, exiting");
                        ctx.quit();
                    }
                }
                PlatformEvent::Quit => {
                    debug!(target: "engine", "Quit event received");
                    ctx.quit();
                }
                PlatformEvent::Other => {}
            }
        }

        let mouse = ctx.platform.mouse_state();
        ctx.input.set_mouse(mouse.x, mouse.y, ctx.height as f32);
        ctx.input.set_buttons(mouse.left_down, mouse.right_down);

        self.stack.handle_events(&mut self.context);
        self.stack.apply_pending(&mut self.context);
    }

    //--- Phase 3: Update --------------------------------------------------

    pub fn update(&mut self) {
        let now = self.context.platform.monotonic_millis();
        self.context.clock.begin_frame(now);

        self.stack.update(&mut self.context);
        self.stack.apply_pending(&mut self.context);
    }

    //--- Phase 4: Draw ----------------------------------------------------

    pub fn draw(&mut self) {
        let ctx = &mut self.context;
        if let Some(gfx) = ctx.graphics.as_deref_mut() {
            gfx.set_viewport(ctx.width, ctx.height);
            gfx.clear(ctx.clear_color);
            gfx.set_blending(true);
        }

        self.push_camera_matrices();

        self.stack.draw(&mut self.context);
        if let Some(gfx) = self.context.graphics.as_deref_mut() {
            gfx.set_blending(false);
        }
        self.stack.apply_pending(&mut self.context);
    }

    /// Uploads the bound camera's view and projection to the sprite shader.
    fn push_camera_matrices(&mut self) {
        let ctx = &mut self.context;
        let Some(weak) = ctx.camera.as_ref() else {
            return;
        };
        let Some(camera) = weak.upgrade() else {
            debug!(target: "graphics", "Main camera dropped, unbinding");
            ctx.camera = None;
            return;
        };

        match ctx.shaders.shader_mut(&ctx.sprite_shader) {
            Some(shader) => {
                shader.set_matrix4("view", &camera.view(), true);
                shader.set_matrix4("projection", &camera.projection(), true);
            }
            None if !ctx.shader_warned => {
                warn!(target: "graphics", "Shader {:?} not loaded, camera matrices skipped", ctx.sprite_shader);
                ctx.shader_warned = true;
            }
            None => {}
        }
    }

    //--- Phase 5: Present + Pace ------------------------------------------

    pub fn late_fps(&mut self) {
        let ctx = &mut self.context;
        if let Some(gfx) = ctx.graphics.as_deref_mut() {
            gfx.swap();
        }

        let now = ctx.platform.monotonic_millis();
        let sleep = ctx.clock.pace(now);
        if sleep > 0 {
            ctx.platform.sleep_millis(sleep);
        }

        if ctx.debug_fps {
            ctx.frame_counter += 1;
            if ctx.frame_counter >= DEBUG_TITLE_INTERVAL {
                let title = format!("{} FPS: {}", ctx.title, ctx.frame_rate());
                trace!(target: "engine", "{}", title);
                ctx.platform.set_window_title(&title);
                ctx.frame_counter = 0;
            }
        }
    }

    //--- Driver -----------------------------------------------------------

    /// Runs the five phases once.
    pub fn run_frame(&mut self) {
        self.update_fps();
        self.handle_event();
        self.update();
        self.draw();
        self.late_fps();
    }

    /// Runs frames until a quit is requested, then cleans up.
    pub fn run(mut self) {
        info!(target: "engine", "Entering frame loop");

        while self.running() {
            self.run_frame();
        }

        info!(target: "engine", "Frame loop exited");
        self.cleanup();
    }

    /// Cleans up every state top to bottom, then releases input, audio,
    /// the graphics context and the window. Leaves the engine in the exit
    /// state. Safe to call more than once.
    pub fn cleanup(&mut self) {
        self.stack.clear(&mut self.context);

        let ctx = &mut self.context;
        let dropped = ctx.transitions.take();
        if !dropped.is_empty() {
            debug!(target: "scene", "Discarding {} unapplied transitions", dropped.len());
        }

        ctx.run_state = RunState::Exit;
        ctx.unset_main_camera();
        ctx.input = InputSnapshot::new();
        ctx.audio = AudioCues::silent();

        // The surface holds its own handle on the window.
        if ctx.graphics.take().is_some() {
            debug!(target: "graphics", "Graphics context released");
        }
        ctx.platform.shutdown();
        info!(target: "engine", "Engine shutdown complete");
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("context", &self.context)
            .field("stack_depth", &self.stack.len())
            .field("top", &self.stack.top().map(|state| state.name()))
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
