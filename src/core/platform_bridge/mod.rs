//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit, or a scripted double in tests) with
// the core engine.
//
// This module defines the contract between platform implementations and
// core logic, so platform backends can be swapped without changing core
// code.
//
//=========================================================================

mod interface;

pub use interface::{MouseState, Platform, PlatformError, PlatformEvent, WindowMode, WindowSpec};
