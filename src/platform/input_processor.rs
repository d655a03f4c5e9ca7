//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit input into engine `PlatformEvent`s and tracks the mouse.
//
// Architecture:
//   KeyboardInput ──► key_event()    ──► PlatformEvent::KeyDown / KeyUp
//   CursorMoved   ──► cursor_moved() ──┐
//   MouseInput    ──► mouse_button() ──┴► MouseState (read once per frame)
//
// Mouse state is not turned into events: the engine samples it after the
// event drain, the same way it would query the OS cursor.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;
use winit::event::{ElementState, MouseButton as WinitMouseButton};
use winit::keyboard::PhysicalKey;

//=== Internal Dependencies ===============================================

use crate::core::input::{KeyCode, MouseButton};
use crate::core::platform_bridge::{MouseState, PlatformEvent};

//=== InputProcessor ======================================================

#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    mouse: MouseState,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Keyboard ---------------------------------------------------------

    /// Converts a key transition. Keys the engine does not know about are
    /// reported as `Other`.
    pub(crate) fn key_event(&self, key: PhysicalKey, state: ElementState) -> PlatformEvent {
        let code = KeyCode::from(key);
        if code == KeyCode::Unidentified {
            trace!(target: "platform::input", "Unmapped key {:?} ignored", key);
            return PlatformEvent::Other;
        }

        match state {
            ElementState::Pressed => PlatformEvent::KeyDown(code),
            ElementState::Released => PlatformEvent::KeyUp(code),
        }
    }

    //--- Mouse ------------------------------------------------------------

    /// Records the cursor position in window pixels, top-left origin.
    pub(crate) fn cursor_moved(&mut self, x: f32, y: f32) {
        self.mouse.x = x;
        self.mouse.y = y;
    }

    pub(crate) fn mouse_button(&mut self, button: WinitMouseButton, state: ElementState) {
        let down = state == ElementState::Pressed;
        match MouseButton::from(button) {
            MouseButton::Left => self.mouse.left_down = down,
            MouseButton::Right => self.mouse.right_down = down,
            other => trace!(target: "platform::input", "Mouse button {:?} ignored", other),
        }
    }

    pub(crate) fn mouse_state(&self) -> MouseState {
        self.mouse
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
