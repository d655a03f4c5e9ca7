//=========================================================================
// Input Identifiers
//
// Defines the engine-side identifiers for keys and mouse buttons.
//
// This module abstracts away platform-specific key codes (e.g. Winit, SDL)
// into a stable, engine-friendly set used by the input snapshot and by
// scene states.
//
// Responsibilities:
// - Represent keyboard keys and mouse buttons in a portable way
// - Provide a fallback (`Unidentified`) for anything not mapped
//
// Design:
// Identifiers are `Copy` and hash-stable so they can key a `HashMap`
// directly without allocation.
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The engine only exposes left/right button state to scene states; the
/// other variants exist so the platform layer can translate every button
/// without losing information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// For example, `KeyA` is always the same physical key regardless of
/// keyboard layout (QWERTY vs AZERTY).
///
/// Platform mapping:
/// - Winit: `winit::keyboard::KeyCode` (see `platform::event_mapper`)
///
/// Additional keys can be added as needed without breaking existing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,

    /// Escape key. A key-up of this key ends the main loop unless the
    /// engine is configured otherwise.
    Escape,

    Tab,
    Backspace,
    Delete,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,

    /// Fallback for keys not explicitly mapped by the platform layer.
    Unidentified,
}

impl KeyCode {
    /// Returns `true` for the escape key.
    pub fn is_escape(self) -> bool {
        matches!(self, KeyCode::Escape)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
