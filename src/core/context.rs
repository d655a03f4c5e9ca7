//=========================================================================
// Context
//=========================================================================
//
// The service surface handed to scene states.
//
// The engine owns one `Context` next to its `StateStack`. Every scene
// hook borrows it for the duration of the call:
//
//   Engine
//     ├─ context: Context     window, graphics, input, audio, clock
//     └─ stack:   StateStack  ──hook(&mut Context)──► SceneState
//
// States reach engine internals only through the methods below. Stack
// changes requested from a hook are queued and applied by the engine at
// the next phase boundary.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::rc::{Rc, Weak};

use glam::{UVec2, Vec3, Vec4};
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::audio::AudioCues;
use crate::core::clock::Clock;
use crate::core::config::EngineConfig;
use crate::core::graphics::{Camera, GraphicsContext, ShaderCache, Sprite};
use crate::core::input::InputSnapshot;
use crate::core::platform_bridge::Platform;
use crate::core::scene::{SceneState, SceneTransition, TransitionQueue};
use crate::engine::FatalSink;

//=== RunState ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Exit,
}

//=== Context =============================================================

pub struct Context {
    //--- Collaborators ----------------------------------------------------
    pub(crate) platform: Box<dyn Platform>,
    /// `None` once released by cleanup or the fatal path.
    pub(crate) graphics: Option<Box<dyn GraphicsContext>>,
    pub(crate) shaders: Box<dyn ShaderCache>,
    pub(crate) fatal: Box<dyn FatalSink>,

    //--- Owned State ------------------------------------------------------
    pub(crate) audio: AudioCues,
    pub(crate) input: InputSnapshot,
    pub(crate) clock: Clock,
    pub(crate) transitions: TransitionQueue,
    pub(crate) camera: Option<Weak<dyn Camera>>,
    pub(crate) run_state: RunState,
    pub(crate) frame_counter: u32,
    pub(crate) shader_warned: bool,

    //--- Settings ---------------------------------------------------------
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) debug_fps: bool,
    pub(crate) escape_quits: bool,
    pub(crate) clear_color: Vec4,
    pub(crate) sprite_shader: String,
}

impl Context {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(
        config: &EngineConfig,
        platform: Box<dyn Platform>,
        graphics: Box<dyn GraphicsContext>,
        shaders: Box<dyn ShaderCache>,
        audio: AudioCues,
        fatal: Box<dyn FatalSink>,
    ) -> Self {
        let now = platform.monotonic_millis();

        Self {
            platform,
            graphics: Some(graphics),
            shaders,
            fatal,
            audio,
            input: InputSnapshot::new(),
            clock: Clock::new(config.target_fps, config.time_scale, config.pacing, now),
            transitions: TransitionQueue::new(),
            camera: None,
            run_state: RunState::Running,
            frame_counter: 0,
            shader_warned: false,
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            debug_fps: config.debug_fps,
            escape_quits: config.escape_quits,
            clear_color: Vec4::from_array(config.clear_color),
            sprite_shader: config.sprite_shader.name.clone(),
        }
    }

    //--- Timing -----------------------------------------------------------

    /// Scaled milliseconds elapsed between the last two update phases.
    pub fn delta(&self) -> f32 {
        self.clock.delta_ms()
    }

    /// Frames counted in the last complete one-second window. Reads 0
    /// during the first second.
    pub fn frame_rate(&self) -> u32 {
        self.clock.last_reported_fps()
    }

    //--- Screen -----------------------------------------------------------

    pub fn screen_size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn screen_width(&self) -> u32 {
        self.width
    }

    pub fn screen_height(&self) -> u32 {
        self.height
    }

    //--- Input ------------------------------------------------------------

    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    /// Mouse position in engine space (origin bottom-left, z = 0).
    pub fn mouse_pos(&self) -> Vec3 {
        self.input.mouse_pos()
    }

    pub fn left_mouse_down(&self) -> bool {
        self.input.left_mouse_down()
    }

    pub fn right_mouse_down(&self) -> bool {
        self.input.right_mouse_down()
    }

    //--- Camera -----------------------------------------------------------

    /// Binds the camera whose matrices are pushed to the sprite shader
    /// each frame. The engine keeps only a weak reference: dropping the
    /// last `Rc` unbinds it.
    pub fn set_main_camera<C: Camera + 'static>(&mut self, camera: &Rc<C>) {
        let weak = Rc::downgrade(camera);
        self.camera = Some(weak as Weak<dyn Camera>);
    }

    pub fn unset_main_camera(&mut self) {
        self.camera = None;
    }

    //--- Rendering --------------------------------------------------------

    /// Renders `sprite` with the shared sprite shader. Meant for a state's
    /// `draw()`; does nothing once the graphics context is released.
    pub fn draw_sprite(&mut self, sprite: &mut dyn Sprite) {
        let Some(gfx) = self.graphics.as_deref_mut() else {
            return;
        };

        match self.shaders.shader_mut(&self.sprite_shader) {
            Some(shader) => sprite.render(gfx, shader),
            None if !self.shader_warned => {
                warn!(target: "graphics", "Shader {:?} not loaded, sprites skipped", self.sprite_shader);
                self.shader_warned = true;
            }
            None => {}
        }
    }

    /// The bound camera, if it is still alive.
    pub fn main_camera(&self) -> Option<Rc<dyn Camera>> {
        self.camera.as_ref().and_then(Weak::upgrade)
    }

    //--- Audio ------------------------------------------------------------

    pub fn play_bgm(&mut self) {
        self.audio.play_bgm();
    }

    pub fn play_beam(&mut self) {
        self.audio.play_beam();
    }

    pub fn play_explosion(&mut self) {
        self.audio.play_explosion();
    }

    pub fn play_hit(&mut self) {
        self.audio.play_hit();
    }

    pub fn audio(&mut self) -> &mut AudioCues {
        &mut self.audio
    }

    //--- Run State --------------------------------------------------------

    /// Stops the engine after the current frame.
    pub fn quit(&mut self) {
        if self.run_state == RunState::Running {
            debug!(target: "engine", "Quit requested");
        }
        self.run_state = RunState::Exit;
    }

    pub fn running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn set_debug_fps(&mut self, enabled: bool) {
        self.debug_fps = enabled;
    }

    //--- State Stack Requests ---------------------------------------------

    /// Replaces the active state once the current phase completes.
    pub fn change_state(&mut self, state: Box<dyn SceneState>) {
        self.transitions.push(SceneTransition::Change(state));
    }

    /// Pauses the active state and stacks `state` above it once the
    /// current phase completes.
    pub fn push_state(&mut self, state: Box<dyn SceneState>) {
        self.transitions.push(SceneTransition::Push(state));
    }

    /// Removes the active state once the current phase completes.
    pub fn pop_state(&mut self) {
        self.transitions.push(SceneTransition::Pop);
    }

    //--- Logging ----------------------------------------------------------

    /// Reports an unrecoverable error.
    ///
    /// Releases the windowing subsystem, leaves the engine in the exit
    /// state and hands the message to the fatal sink, which by default
    /// ends the process with status 1.
    pub fn log_error(&mut self, message: &str) {
        error!(target: "engine", "{}", message);
        self.graphics = None;
        self.platform.shutdown();
        self.run_state = RunState::Exit;
        self.fatal.fatal(message);
    }

    /// Diagnostic output, visible under the default log filter.
    pub fn log_debug(&self, message: &str) {
        info!(target: "scene", "{}", message);
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("title", &self.title)
            .field("size", &(self.width, self.height))
            .field("run_state", &self.run_state)
            .field("frame_counter", &self.frame_counter)
            .field("clock", &self.clock)
            .field("audio", &self.audio)
            .field("pending_transitions", &self.transitions.len())
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
