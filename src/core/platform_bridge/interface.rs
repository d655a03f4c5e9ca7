//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Contract between the engine core and a windowing provider.
//
// The core never talks to winit (or SDL, or a test double) directly. It
// drives a `Platform` through this trait: create the window, create the
// presentation context, drain events, read the mouse, read the clock.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::graphics::GraphicsContext;
use crate::core::input::KeyCode;

//=== PlatformEvent =======================================================

/// OS events the core consumes. Everything else is reported as `Other`
/// and ignored by the event drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),

    /// Window close requested by the user or the OS.
    Quit,

    Other,
}

//=== WindowMode ==========================================================

/// How the window is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Regular decorated window.
    #[default]
    Windowed,

    /// Fullscreen at desktop resolution (no video mode change).
    Fullscreen,

    /// Fullscreen with a video mode switch.
    ExclusiveFullscreen,

    /// Window without decorations.
    Borderless,
}

//=== WindowSpec ==========================================================

/// Parameters for window creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub mode: WindowMode,
}

//=== MouseState ==========================================================

/// Cursor position in window pixels (top-left origin) plus button state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub right_down: bool,
}

//=== PlatformError =======================================================

/// Acquisition failures. All of them are fatal to the engine.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop: {0}")]
    EventLoop(String),

    #[error("window: {0}")]
    WindowCreation(String),

    #[error("graphics context: {0}")]
    GraphicsContext(String),

    #[error("graphics loader: {0}")]
    GraphicsLoader(String),
}

//=== Platform ============================================================

/// Windowing provider used by the engine.
///
/// Implementations are single-threaded and owned exclusively by the engine.
pub trait Platform {
    /// Creates the one application window.
    fn create_window(&mut self, spec: &WindowSpec) -> Result<(), PlatformError>;

    /// Creates the presentation context bound to the window.
    ///
    /// Must be called after [`Platform::create_window`].
    fn create_graphics_context(&mut self) -> Result<Box<dyn GraphicsContext>, PlatformError>;

    /// Monotonic milliseconds since an arbitrary fixed point.
    fn monotonic_millis(&self) -> u64;

    fn sleep_millis(&mut self, millis: u64);

    /// Returns the next pending event, or `None` once the queue is empty.
    fn poll_event(&mut self) -> Option<PlatformEvent>;

    fn mouse_state(&self) -> MouseState;

    fn set_window_title(&mut self, title: &str);

    /// Releases the window and tears the windowing subsystem down.
    ///
    /// Safe to call more than once.
    fn shutdown(&mut self);
}
