//=========================================================================
// Test Doubles
//=========================================================================
//
// Scripted collaborators for driving the engine without a window, a GPU
// or a sound card. Every double is a cheap handle over shared state, so a
// test keeps one clone for inspection and hands the other to the engine.
//
//   Fakes
//     ├─ platform: ScriptedPlatform   manual clock, queued events, mouse
//     ├─ graphics: RecordingGraphics  GfxCall log
//     ├─ shaders:  RecordingShaders   loaded names + uniform uploads
//     ├─ audio:    RecordingAudio     loaded paths + plays
//     └─ fatal:    RecordingSink      fatal messages
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::{Mat4, Vec4};

//=== Internal Dependencies ===============================================

use crate::core::audio::{AudioBackend, AudioError, ClipId};
use crate::core::config::EngineConfig;
use crate::core::context::Context;
use crate::core::graphics::{GraphicsContext, Shader, ShaderCache, ShaderError};
use crate::core::platform_bridge::{MouseState, Platform, PlatformError, PlatformEvent, WindowSpec};
use crate::core::scene::SceneState;
use crate::engine::{EngineBuilder, FatalSink};

//=== Fixtures ============================================================

/// 800x600 windowed, 60 fps target, no vsync, time scale 1.
pub(crate) fn config() -> EngineConfig {
    EngineConfig {
        title: "T".to_string(),
        width: 800,
        height: 600,
        vsync: false,
        target_fps: 60,
        time_scale: 1.0,
        ..EngineConfig::default()
    }
}

/// A built engine's context, plus the doubles behind it.
pub(crate) fn context() -> (Context, Fakes) {
    let fakes = Fakes::new();
    let engine = fakes
        .builder(config())
        .build()
        .expect("engine builds against test doubles");
    (engine.context, fakes)
}

//=== Fakes ===============================================================

pub(crate) struct Fakes {
    pub platform: ScriptedPlatform,
    pub graphics: RecordingGraphics,
    pub shaders: RecordingShaders,
    pub audio: RecordingAudio,
    pub fatal: RecordingSink,
}

impl Fakes {
    pub fn new() -> Self {
        let graphics = RecordingGraphics::default();
        Self {
            platform: ScriptedPlatform::new(graphics.clone()),
            graphics,
            shaders: RecordingShaders::default(),
            audio: RecordingAudio::new(),
            fatal: RecordingSink::default(),
        }
    }

    pub fn builder(&self, config: EngineConfig) -> EngineBuilder {
        EngineBuilder::new(config)
            .with_platform(self.platform.clone())
            .with_shader_cache(self.shaders.clone())
            .with_audio_backend(self.audio.clone())
            .with_fatal_sink(self.fatal.clone())
    }
}

//=== ScriptedPlatform ====================================================

#[derive(Default)]
struct PlatformState {
    now: u64,
    events: VecDeque<PlatformEvent>,
    mouse: MouseState,
    sleeps: Vec<u64>,
    titles: Vec<String>,
    window: Option<WindowSpec>,
    shut_down: bool,
    window_error: Option<String>,
    graphics_error: Option<String>,
}

/// Platform with a manual clock. Sleeping advances the clock by exactly
/// the requested amount.
#[derive(Clone)]
pub(crate) struct ScriptedPlatform {
    state: Rc<RefCell<PlatformState>>,
    graphics: RecordingGraphics,
}

impl ScriptedPlatform {
    pub fn new(graphics: RecordingGraphics) -> Self {
        Self {
            state: Rc::default(),
            graphics,
        }
    }

    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    pub fn advance(&self, millis: u64) {
        self.state.borrow_mut().now += millis;
    }

    /// Events returned by `poll_event()`, drained in the next event phase.
    pub fn queue_events(&self, events: impl IntoIterator<Item = PlatformEvent>) {
        self.state.borrow_mut().events.extend(events);
    }

    pub fn set_mouse(&self, mouse: MouseState) {
        self.state.borrow_mut().mouse = mouse;
    }

    pub fn fail_window(&self, message: &str) {
        self.state.borrow_mut().window_error = Some(message.to_string());
    }

    pub fn fail_graphics(&self, message: &str) {
        self.state.borrow_mut().graphics_error = Some(message.to_string());
    }

    pub fn sleeps(&self) -> Vec<u64> {
        self.state.borrow().sleeps.clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.state.borrow().titles.clone()
    }

    pub fn window_spec(&self) -> Option<WindowSpec> {
        self.state.borrow().window.clone()
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.borrow().shut_down
    }
}

impl Platform for ScriptedPlatform {
    fn create_window(&mut self, spec: &WindowSpec) -> Result<(), PlatformError> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.window_error.clone() {
            return Err(PlatformError::WindowCreation(message));
        }
        state.window = Some(spec.clone());
        Ok(())
    }

    fn create_graphics_context(&mut self) -> Result<Box<dyn GraphicsContext>, PlatformError> {
        if let Some(message) = self.state.borrow().graphics_error.clone() {
            return Err(PlatformError::GraphicsContext(message));
        }
        Ok(Box::new(self.graphics.clone()))
    }

    fn monotonic_millis(&self) -> u64 {
        self.state.borrow().now
    }

    fn sleep_millis(&mut self, millis: u64) {
        let mut state = self.state.borrow_mut();
        state.sleeps.push(millis);
        state.now += millis;
    }

    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.state.borrow_mut().events.pop_front()
    }

    fn mouse_state(&self) -> MouseState {
        self.state.borrow().mouse
    }

    fn set_window_title(&mut self, title: &str) {
        self.state.borrow_mut().titles.push(title.to_string());
    }

    fn shutdown(&mut self) {
        self.state.borrow_mut().shut_down = true;
    }
}

//=== RecordingGraphics ===================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GfxCall {
    SwapInterval(bool),
    Viewport(u32, u32),
    Clear(Vec4),
    Blending(bool),
    Swap,
}

#[derive(Clone, Default)]
pub(crate) struct RecordingGraphics {
    calls: Rc<RefCell<Vec<GfxCall>>>,
}

impl RecordingGraphics {
    pub fn calls(&self) -> Vec<GfxCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl GraphicsContext for RecordingGraphics {
    fn set_swap_interval(&mut self, vsync: bool) {
        self.calls.borrow_mut().push(GfxCall::SwapInterval(vsync));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.borrow_mut().push(GfxCall::Viewport(width, height));
    }

    fn clear(&mut self, color: Vec4) {
        self.calls.borrow_mut().push(GfxCall::Clear(color));
    }

    fn set_blending(&mut self, enabled: bool) {
        self.calls.borrow_mut().push(GfxCall::Blending(enabled));
    }

    fn swap(&mut self) {
        self.calls.borrow_mut().push(GfxCall::Swap);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== RecordingShaders ====================================================

/// (shader, uniform, matrix, use_program)
pub(crate) type Upload = (String, String, Mat4, bool);

#[derive(Default)]
struct ShaderState {
    loaded: Vec<String>,
    failing: Vec<String>,
    uploads: Vec<Upload>,
}

#[derive(Clone, Default)]
pub(crate) struct RecordingShaders {
    state: Rc<RefCell<ShaderState>>,
    programs: HashMap<String, RecordingShader>,
}

impl RecordingShaders {
    /// Makes `load_shader()` fail for `name`.
    pub fn fail_on(&self, name: &str) {
        self.state.borrow_mut().failing.push(name.to_string());
    }

    pub fn loaded(&self) -> Vec<String> {
        self.state.borrow().loaded.clone()
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.borrow().uploads.clone()
    }
}

impl ShaderCache for RecordingShaders {
    fn load_shader(&mut self, vertex: &Path, _fragment: &Path, name: &str) -> Result<(), ShaderError> {
        let mut state = self.state.borrow_mut();
        if state.failing.iter().any(|n| n == name) {
            return Err(ShaderError::Source {
                path: vertex.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        state.loaded.push(name.to_string());
        self.programs.insert(
            name.to_string(),
            RecordingShader {
                name: name.to_string(),
                state: Rc::clone(&self.state),
            },
        );
        Ok(())
    }

    fn shader_mut(&mut self, name: &str) -> Option<&mut dyn Shader> {
        self.programs
            .get_mut(name)
            .map(|shader| shader as &mut dyn Shader)
    }
}

#[derive(Clone)]
struct RecordingShader {
    name: String,
    state: Rc<RefCell<ShaderState>>,
}

impl Shader for RecordingShader {
    fn set_matrix4(&mut self, uniform: &str, matrix: &Mat4, use_program: bool) {
        self.state
            .borrow_mut()
            .uploads
            .push((self.name.clone(), uniform.to_string(), *matrix, use_program));
    }

    fn matrix4(&self, uniform: &str) -> Option<Mat4> {
        self.state
            .borrow()
            .uploads
            .iter()
            .rev()
            .find(|(shader, name, _, _)| *shader == self.name && name == uniform)
            .map(|(_, _, matrix, _)| *matrix)
    }
}

//=== RecordingAudio ======================================================

#[derive(Default)]
struct AudioState {
    no_device: bool,
    failing: Vec<PathBuf>,
    loaded: Vec<PathBuf>,
    plays: Vec<(ClipId, bool)>,
}

/// Audio backend that hands out sequential clip ids and logs plays.
#[derive(Clone, Default)]
pub(crate) struct RecordingAudio {
    state: Rc<RefCell<AudioState>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(self, path: &str) -> Self {
        self.state.borrow_mut().failing.push(PathBuf::from(path));
        self
    }

    pub fn without_device(self) -> Self {
        self.state.borrow_mut().no_device = true;
        self
    }

    pub fn clip_for(&self, path: &str) -> Option<ClipId> {
        self.state
            .borrow()
            .loaded
            .iter()
            .position(|p| p == Path::new(path))
            .map(ClipId)
    }

    pub fn plays(&self) -> Vec<(ClipId, bool)> {
        self.state.borrow().plays.clone()
    }

    pub fn loaded_paths(&self) -> Vec<PathBuf> {
        self.state.borrow().loaded.clone()
    }
}

impl AudioBackend for RecordingAudio {
    fn init(&mut self) -> Result<(), AudioError> {
        if self.state.borrow().no_device {
            return Err(AudioError::NoDevice("test double".to_string()));
        }
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<ClipId, AudioError> {
        let mut state = self.state.borrow_mut();
        if state.failing.iter().any(|p| p == path) {
            return Err(AudioError::Load {
                path: path.to_path_buf(),
                message: "scripted failure".to_string(),
            });
        }
        state.loaded.push(path.to_path_buf());
        Ok(ClipId(state.loaded.len() - 1))
    }

    fn play_2d(&mut self, clip: ClipId, looped: bool) {
        self.state.borrow_mut().plays.push((clip, looped));
    }
}

//=== RecordingSink =======================================================

#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl FatalSink for RecordingSink {
    fn fatal(&mut self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

//=== CallLog + ScriptedState ================================================

/// Ordered record of lifecycle calls, as `"<name>.<hook>"`.
#[derive(Clone, Default)]
pub(crate) struct CallLog {
    calls: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    /// Returns every call recorded so far and empties the log.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }
}

type Hook = Box<dyn FnMut(&mut Context)>;

/// Scene state that logs every hook and optionally runs a closure in
/// `init`, `update` or `draw`.
pub(crate) struct ScriptedState {
    name: &'static str,
    log: CallLog,
    on_init: Option<Hook>,
    on_update: Option<Hook>,
    on_draw: Option<Hook>,
}

impl ScriptedState {
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: log.clone(),
            on_init: None,
            on_update: None,
            on_draw: None,
        }
    }

    pub fn on_init(mut self, hook: impl FnMut(&mut Context) + 'static) -> Self {
        self.on_init = Some(Box::new(hook));
        self
    }

    pub fn on_update(mut self, hook: impl FnMut(&mut Context) + 'static) -> Self {
        self.on_update = Some(Box::new(hook));
        self
    }

    pub fn on_draw(mut self, hook: impl FnMut(&mut Context) + 'static) -> Self {
        self.on_draw = Some(Box::new(hook));
        self
    }

    fn record(&self, hook: &str) {
        self.log.push(format!("{}.{}", self.name, hook));
    }
}

impl SceneState for ScriptedState {
    fn init(&mut self, ctx: &mut Context) {
        self.record("init");
        if let Some(hook) = self.on_init.as_mut() {
            hook(ctx);
        }
    }

    fn cleanup(&mut self, _ctx: &mut Context) {
        self.record("cleanup");
    }

    fn pause(&mut self, _ctx: &mut Context) {
        self.record("pause");
    }

    fn resume(&mut self, _ctx: &mut Context) {
        self.record("resume");
    }

    fn handle_events(&mut self, _ctx: &mut Context) {
        self.record("handle_events");
    }

    fn update(&mut self, ctx: &mut Context) {
        self.record("update");
        if let Some(hook) = self.on_update.as_mut() {
            hook(ctx);
        }
    }

    fn draw(&mut self, ctx: &mut Context) {
        self.record("draw");
        if let Some(hook) = self.on_draw.as_mut() {
            hook(ctx);
        }
    }

    fn name(&self) -> &str {
        self.name
    }
}
