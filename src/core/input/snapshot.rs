//=========================================================================
// Input Snapshot
//=========================================================================
//
// Per-frame keyboard and mouse state as seen by scene states.
//
// Architecture:
//   PlatformEvent → on_key() / set_mouse() → HashMap<KeyCode, KeyState> → query
//
// Frame lifecycle: end_frame() → on_key()* → set_mouse() → query (rest of frame)
//
// The snapshot reflects every event drained up to the current frame's
// event phase and does not change again until the next event phase.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use glam::Vec3;

//=== Internal Dependencies ===============================================

use super::event::KeyCode;

//=== KeyState ============================================================

/// Per-key record: held state plus the 0→1 edge of the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub is_down: bool,
    pub was_pressed_this_frame: bool,
}

//=== InputSnapshot =======================================================

/// Tracks held keys, per-frame press edges and the mouse.
///
/// Mouse coordinates are stored in engine space: origin bottom-left,
/// y growing upward.
#[derive(Debug, Default)]
pub struct InputSnapshot {
    //--- Persistent State (survives frame boundary) ----------------------
    keys: HashMap<KeyCode, KeyState>,
    mouse_position: Vec3,
    left_down: bool,
    right_down: bool,
}

impl InputSnapshot {
    /// Creates an empty snapshot: no keys known, mouse at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Records a key transition.
    ///
    /// Unknown codes get an entry on first write. Only an up → down
    /// transition raises the press edge; repeated key-down reports (OS
    /// auto-repeat) leave it untouched.
    pub fn on_key(&mut self, code: KeyCode, down: bool) {
        let state = self.keys.entry(code).or_default();
        if down && !state.is_down {
            state.was_pressed_this_frame = true;
        }
        state.is_down = down;
    }

    /// Stores the mouse position, flipping from top-left window pixels to
    /// the bottom-left engine origin.
    pub fn set_mouse(&mut self, x_pixels: f32, y_pixels: f32, screen_height: f32) {
        self.mouse_position = Vec3::new(x_pixels, screen_height - y_pixels, 0.0);
    }

    /// Stores the left/right mouse button state.
    pub fn set_buttons(&mut self, left_down: bool, right_down: bool) {
        self.left_down = left_down;
        self.right_down = right_down;
    }

    /// Clears every press edge. Called once per frame, after the active
    /// state has handled its events.
    pub fn end_frame(&mut self) {
        for state in self.keys.values_mut() {
            state.was_pressed_this_frame = false;
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Returns `true` while the key is held. Unknown keys read as up.
    pub fn is_down(&self, code: KeyCode) -> bool {
        self.keys.get(&code).is_some_and(|s| s.is_down)
    }

    /// Returns `true` only in the frame the key went down.
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.keys.get(&code).is_some_and(|s| s.was_pressed_this_frame)
    }

    /// Returns the raw record for a key, if it has ever been seen.
    pub fn key_state(&self, code: KeyCode) -> Option<KeyState> {
        self.keys.get(&code).copied()
    }

    /// Mouse position in engine space as `(x, y, 0)`.
    pub fn mouse_pos(&self) -> Vec3 {
        self.mouse_position
    }

    pub fn left_mouse_down(&self) -> bool {
        self.left_down
    }

    pub fn right_mouse_down(&self) -> bool {
        self.right_down
    }

    /// Returns an iterator over all keys currently held.
    pub fn keys_down(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys
            .iter()
            .filter(|(_, s)| s.is_down)
            .map(|(code, _)| *code)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
