//=========================================================================
// Engine Core
//
// Everything the frame loop needs that is independent of winit, wgpu and
// rodio: timing, input, the scene stack, audio cues, the collaborator
// contracts and the service surface handed to scene states.
//
// Module map:
//   clock            frame delta, FPS accounting, pacing
//   input            KeyCode / MouseButton, InputSnapshot
//   scene            SceneState, StateStack, queued transitions
//   audio            Cue catalog, AudioBackend contract, AudioCues
//   graphics         GraphicsContext / Shader / Camera / Sprite contracts
//   platform_bridge  Platform contract (window, events, time)
//   context          Context (service surface)
//   config           EngineConfig
//   error            EngineError
//
//=========================================================================

pub mod audio;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod graphics;
pub mod input;
pub mod platform_bridge;
pub mod scene;
