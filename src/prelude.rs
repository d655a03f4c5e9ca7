//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagehand_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, ExitProcess, FatalSink};

// Service surface and configuration
pub use crate::core::config::EngineConfig;
pub use crate::core::context::Context;
pub use crate::core::error::{EngineError, EngineResult};

// Scene system
pub use crate::core::scene::SceneState;

// Input
pub use crate::core::input::{KeyCode, MouseButton};

// Collaborator contracts
pub use crate::core::audio::Cue;
pub use crate::core::graphics::{Camera, Sprite};
pub use crate::core::platform_bridge::WindowMode;
pub use crate::platform::QuadSprite;

// Logging
pub use crate::logging::{init_logging, LoggingConfig};
