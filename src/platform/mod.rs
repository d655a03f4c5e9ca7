//=========================================================================
// Platform Subsystem
//
// Winit, wgpu and rodio implementations of the engine's collaborators.
//
// Architecture:
// ```text
//  Engine (frame loop)
//   │ poll_event()
//   ▼
//  WinitPlatform ──pump_app_events()──► PlatformApp (ApplicationHandler)
//   ▲                                    ├─ creates the window in resumed()
//   │                                    ├─ InputProcessor: keys → events
//   │                                    │                  mouse → state
//   └──────── crossbeam Receiver ◄───────┴─ Sender<PlatformEvent>
// ```
//
// The engine owns the loop, so winit is pumped rather than run: every
// drain of `poll_event()` pumps the OS queue once without blocking.
//
// Responsibilities:
// - Create the window in the requested mode
// - Translate winit events into `PlatformEvent`s
// - Track the mouse for `mouse_state()`
// - Hand the window to the wgpu presentation context
// - Ship a wgpu `QuadSprite` for scene states to draw with
//
//=========================================================================

//=== Submodules ==========================================================

mod audio;
mod event_mapper;
mod input_processor;
mod quad;
mod surface;

pub use audio::RodioBackend;
pub use quad::QuadSprite;
pub use surface::{RenderCtx, RenderTarget, WgpuSurface};

//=== External Crates =====================================================

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    monitor::VideoModeHandle,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::graphics::GraphicsContext;
use crate::core::platform_bridge::{
    MouseState, Platform, PlatformError, PlatformEvent, WindowMode, WindowSpec,
};
use input_processor::InputProcessor;

//=== Constants ===========================================================

/// Pump attempts while waiting for the window to appear.
const WINDOW_CREATION_PUMPS: u32 = 200;
const WINDOW_CREATION_PUMP_TIMEOUT: Duration = Duration::from_millis(5);

//=== WinitPlatform =======================================================

/// Windowing provider on winit's pump-events API.
///
/// Must be created and used on the main thread.
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    app: PlatformApp,
    events: Receiver<PlatformEvent>,
    started: Instant,
    pumped: bool,
    exited: bool,
}

impl WinitPlatform {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Result<Self, PlatformError> {
        let event_loop = EventLoop::new().map_err(|e| PlatformError::EventLoop(e.to_string()))?;
        let (sender, events) = unbounded();

        info!(target: "platform", "Platform subsystem initialized");
        Ok(Self {
            event_loop,
            app: PlatformApp::new(sender),
            events,
            started: Instant::now(),
            pumped: false,
            exited: false,
        })
    }

    //--- Internal Helpers -------------------------------------------------

    /// Processes whatever the OS has queued. Returns false once winit has
    /// asked to exit.
    fn pump(&mut self, timeout: Duration) -> bool {
        if self.exited {
            return false;
        }
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(timeout), &mut self.app) {
            debug!(target: "platform", "Event loop exited with code {}", code);
            self.exited = true;
            return false;
        }
        true
    }
}

impl Platform for WinitPlatform {
    fn create_window(&mut self, spec: &WindowSpec) -> Result<(), PlatformError> {
        self.app.pending = Some(spec.clone());

        for _ in 0..WINDOW_CREATION_PUMPS {
            if self.app.window.is_some() || self.app.window_error.is_some() {
                break;
            }
            if !self.pump(WINDOW_CREATION_PUMP_TIMEOUT) {
                return Err(PlatformError::EventLoop(
                    "event loop exited before the window was created".to_string(),
                ));
            }
        }

        if let Some(message) = self.app.window_error.take() {
            return Err(PlatformError::WindowCreation(message));
        }
        if self.app.window.is_none() {
            return Err(PlatformError::WindowCreation(
                "event loop never became ready".to_string(),
            ));
        }
        Ok(())
    }

    fn create_graphics_context(&mut self) -> Result<Box<dyn GraphicsContext>, PlatformError> {
        let window = self.app.window.clone().ok_or_else(|| {
            PlatformError::GraphicsContext("no window to bind to".to_string())
        })?;
        Ok(Box::new(WgpuSurface::new(window)?))
    }

    fn monotonic_millis(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn sleep_millis(&mut self, millis: u64) {
        thread::sleep(Duration::from_millis(millis));
    }

    fn poll_event(&mut self) -> Option<PlatformEvent> {
        if let Ok(event) = self.events.try_recv() {
            return Some(event);
        }

        // One pump per drain: the next drain picks up anything newer.
        if !self.pumped {
            self.pumped = true;
            if !self.pump(Duration::ZERO) {
                return Some(PlatformEvent::Quit);
            }
            if let Ok(event) = self.events.try_recv() {
                return Some(event);
            }
        }

        self.pumped = false;
        None
    }

    fn mouse_state(&self) -> MouseState {
        self.app.processor.mouse_state()
    }

    fn set_window_title(&mut self, title: &str) {
        if let Some(window) = &self.app.window {
            window.set_title(title);
        }
    }

    fn shutdown(&mut self) {
        if self.app.window.take().is_some() {
            info!(target: "platform", "Window released");
        }
        self.exited = true;
    }
}

//=== PlatformApp =========================================================

/// Winit application handler. Lives inside `WinitPlatform` and only runs
/// while the event loop is being pumped.
struct PlatformApp {
    sender: Sender<PlatformEvent>,
    pending: Option<WindowSpec>,
    window: Option<Arc<Window>>,
    window_error: Option<String>,
    processor: InputProcessor,
}

impl PlatformApp {
    fn new(sender: Sender<PlatformEvent>) -> Self {
        Self {
            sender,
            pending: None,
            window: None,
            window_error: None,
            processor: InputProcessor::new(),
        }
    }

    fn send(&self, event: PlatformEvent) {
        if self.sender.send(event).is_err() {
            warn!(target: "platform::input", "Event channel disconnected, dropping {:?}", event);
        }
    }

    fn window_attributes(event_loop: &ActiveEventLoop, spec: &WindowSpec) -> WindowAttributes {
        let attrs = Window::default_attributes()
            .with_title(spec.title.as_str())
            .with_inner_size(LogicalSize::new(spec.width, spec.height))
            .with_resizable(false);

        match spec.mode {
            WindowMode::Windowed => attrs,
            WindowMode::Fullscreen => attrs.with_fullscreen(Some(Fullscreen::Borderless(None))),
            WindowMode::ExclusiveFullscreen => match best_video_mode(event_loop, spec) {
                Some(mode) => attrs.with_fullscreen(Some(Fullscreen::Exclusive(mode))),
                None => {
                    warn!(target: "platform", "No exclusive video mode available, using desktop fullscreen");
                    attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
                }
            },
            WindowMode::Borderless => attrs.with_decorations(false),
        }
    }
}

impl ApplicationHandler for PlatformApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }
        let Some(spec) = self.pending.take() else {
            return;
        };

        match event_loop.create_window(Self::window_attributes(event_loop, &spec)) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI ({:?})",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor(),
                    spec.mode
                );
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.window_error = Some(e.to_string());
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::Quit);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.repeat {
                    return;
                }
                let event = self.processor.key_event(key_event.physical_key, key_event.state);
                if event != PlatformEvent::Other {
                    self.send(event);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical = position.to_logical::<f32>(scale);
                self.processor.cursor_moved(logical.x, logical.y);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.processor.mouse_button(button, state);
            }

            _ => {}
        }
    }
}

//=== Helpers =============================================================

/// Primary monitor mode closest to the requested size, highest refresh
/// rate first among equals.
fn best_video_mode(event_loop: &ActiveEventLoop, spec: &WindowSpec) -> Option<VideoModeHandle> {
    let monitor = event_loop.primary_monitor()?;
    monitor.video_modes().min_by_key(|mode| {
        let size = mode.size();
        let distance = size.width.abs_diff(spec.width) + size.height.abs_diff(spec.height);
        (distance, std::cmp::Reverse(mode.refresh_rate_millihertz()))
    })
}
