//=========================================================================
// Engine Builder
//=========================================================================
//
// Collaborator injection and engine initialisation.
//
//   EngineBuilder::new(config)
//     ├─ with_platform()        default: WinitPlatform
//     ├─ with_audio_backend()   default: RodioBackend
//     ├─ with_shader_cache()    default: ShaderLibrary
//     ├─ with_fatal_sink()      default: ExitProcess
//     └─ build() ──► Engine
//
// Acquisition order inside build():
//   platform → window → graphics context (+ swap interval)
//            → sprite shader → audio cues → Context
//
// A failure before the graphics context exists is fatal and goes through
// the sink. Shader and audio misses are warnings.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use super::{Engine, ExitProcess, FatalSink};
use crate::core::audio::{AudioBackend, AudioCues};
use crate::core::config::EngineConfig;
use crate::core::context::Context;
use crate::core::error::{EngineError, EngineResult};
use crate::core::graphics::{ShaderCache, ShaderLibrary};
use crate::core::platform_bridge::Platform;
use crate::core::scene::StateStack;
use crate::platform::{RodioBackend, WinitPlatform};

//=== EngineBuilder =======================================================

/// Builder for an initialised [`Engine`].
///
/// # Examples
///
/// ```no_run
/// use stagehand_engine::prelude::*;
///
/// let config = EngineConfig::load_or_default("stagehand.toml")?;
/// let mut engine = EngineBuilder::new(config).build()?;
/// # Ok::<(), EngineError>(())
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
    platform: Option<Box<dyn Platform>>,
    audio: Option<Box<dyn AudioBackend>>,
    shaders: Option<Box<dyn ShaderCache>>,
    fatal: Option<Box<dyn FatalSink>>,
}

impl EngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            platform: None,
            audio: None,
            shaders: None,
            fatal: None,
        }
    }

    //--- Collaborators ----------------------------------------------------

    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Some(Box::new(platform));
        self
    }

    pub fn with_audio_backend(mut self, backend: impl AudioBackend + 'static) -> Self {
        self.audio = Some(Box::new(backend));
        self
    }

    pub fn with_shader_cache(mut self, shaders: impl ShaderCache + 'static) -> Self {
        self.shaders = Some(Box::new(shaders));
        self
    }

    /// Replaces the default process-exit behaviour for fatal errors.
    pub fn with_fatal_sink(mut self, sink: impl FatalSink + 'static) -> Self {
        self.fatal = Some(Box::new(sink));
        self
    }

    //--- Build ------------------------------------------------------------

    /// Acquires the window and graphics context and initialises every
    /// subsystem.
    ///
    /// Acquisition failures are reported to the fatal sink (by default
    /// the process exits with status 1). If the sink returns, the error
    /// is handed back to the caller.
    pub fn build(self) -> EngineResult<Engine> {
        let Self {
            config,
            platform,
            audio,
            shaders,
            fatal,
        } = self;
        let mut fatal = fatal.unwrap_or_else(|| Box::new(ExitProcess));

        if let Err(message) = config.validate() {
            return Err(fail(fatal.as_mut(), None, EngineError::InvalidConfig(message)));
        }

        //--- 1. Windowing subsystem ---------------------------------------
        let mut platform = match platform {
            Some(platform) => platform,
            None => match WinitPlatform::new() {
                Ok(platform) => Box::new(platform) as Box<dyn Platform>,
                Err(e) => return Err(fail(fatal.as_mut(), None, e.into())),
            },
        };

        //--- 2. Window ----------------------------------------------------
        if let Err(e) = platform.create_window(&config.window_spec()) {
            return Err(fail(fatal.as_mut(), Some(&mut platform), e.into()));
        }

        //--- 3. Graphics context ------------------------------------------
        let mut graphics = match platform.create_graphics_context() {
            Ok(graphics) => graphics,
            Err(e) => return Err(fail(fatal.as_mut(), Some(&mut platform), e.into())),
        };
        graphics.set_swap_interval(config.vsync);

        //--- 4. Sprite shader ---------------------------------------------
        let mut shaders = shaders.unwrap_or_else(|| Box::new(ShaderLibrary::new()));
        let sprite = &config.sprite_shader;
        if let Err(e) = shaders.load_shader(&sprite.vertex, &sprite.fragment, &sprite.name) {
            warn!(target: "graphics", "Sprite shader {:?} unavailable: {}", sprite.name, e);
        }

        //--- 5. Audio -----------------------------------------------------
        let backend = audio.unwrap_or_else(|| Box::new(RodioBackend::new()));
        let audio = AudioCues::init(backend, &config.audio.catalog());

        //--- 6. Context ---------------------------------------------------
        let context = Context::new(&config, platform, graphics, shaders, audio, fatal);

        info!(
            target: "engine",
            "Engine initialised: {:?} {}x{} ({:?}, vsync {}, target {} fps, time scale {})",
            config.title,
            config.width,
            config.height,
            config.window_mode,
            config.vsync,
            config.target_fps,
            config.time_scale
        );

        Ok(Engine {
            context,
            stack: StateStack::new(),
        })
    }
}

/// Routes an acquisition failure through the fatal path.
fn fail(
    sink: &mut dyn FatalSink,
    platform: Option<&mut Box<dyn Platform>>,
    err: EngineError,
) -> EngineError {
    error!(target: "engine", "{}", err);
    if let Some(platform) = platform {
        platform.shutdown();
    }
    sink.fatal(&err.to_string());
    err
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::audio::Cue;
    use crate::testing::{self, GfxCall};

    #[test]
    fn build_applies_swap_interval_and_loads_sprite_shader() {
        let fakes = testing::Fakes::new();
        let config = EngineConfig {
            vsync: true,
            ..testing::config()
        };

        let engine = fakes.builder(config).build().unwrap();

        assert!(engine.running());
        assert_eq!(fakes.graphics.calls(), [GfxCall::SwapInterval(true)]);
        assert_eq!(fakes.shaders.loaded(), ["Sprite"]);
        assert_eq!(fakes.platform.window_spec().map(|s| s.title), Some("T".to_string()));
    }

    #[test]
    fn build_resolves_audio_catalog() {
        let fakes = testing::Fakes::new();
        let engine = fakes.builder(testing::config()).build().unwrap();

        assert_eq!(fakes.audio.loaded_paths().len(), Cue::ALL.len());
        assert!(engine.context().audio.is_loaded(Cue::Beam));
    }

    #[test]
    fn window_failure_is_fatal() {
        let fakes = testing::Fakes::new();
        fakes.platform.fail_window("no display");

        let err = fakes.builder(testing::config()).build().unwrap_err();

        assert!(matches!(err, EngineError::WindowCreation(_)));
        assert_eq!(fakes.fatal.messages(), ["failed to create window: no display"]);
        assert!(fakes.platform.is_shut_down());
    }

    #[test]
    fn graphics_context_failure_is_fatal() {
        let fakes = testing::Fakes::new();
        fakes.platform.fail_graphics("no adapter");

        let err = fakes.builder(testing::config()).build().unwrap_err();

        assert!(matches!(err, EngineError::GraphicsContext(_)));
        assert_eq!(fakes.fatal.messages().len(), 1);
        assert!(fakes.platform.is_shut_down());
    }

    #[test]
    fn invalid_config_is_rejected_before_acquisition() {
        let fakes = testing::Fakes::new();
        let config = EngineConfig {
            width: 0,
            ..testing::config()
        };

        let err = fakes.builder(config).build().unwrap_err();

        assert!(matches!(err, EngineError::InvalidConfig(_)));
        assert!(fakes.platform.window_spec().is_none());
        assert_eq!(fakes.fatal.messages().len(), 1);
    }

    #[test]
    fn missing_shader_is_not_fatal() {
        let fakes = testing::Fakes::new();
        let config = EngineConfig {
            sprite_shader: crate::core::config::SpriteShaderConfig {
                name: "Missing".into(),
                ..Default::default()
            },
            ..testing::config()
        };
        fakes.shaders.fail_on("Missing");

        let engine = fakes.builder(config).build().unwrap();

        assert!(engine.running());
        assert!(fakes.fatal.messages().is_empty());
    }
}
