//=========================================================================
// Engine Configuration
//=========================================================================
//
// The record the engine is initialised from. Every field has a default,
// so a TOML file only needs to name what it changes:
//
//   title = "Space Shooter"
//   width = 1024
//   target_fps = 60
//   window_mode = "borderless"
//
//   [audio]
//   beam = "./assets/laser.ogg"
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::audio::{default_catalog, AudioCatalog, Cue};
use crate::core::clock::Pacing;
use crate::core::error::{EngineError, EngineResult};
use crate::core::platform_bridge::{WindowMode, WindowSpec};

//=== EngineConfig ========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub window_mode: WindowMode,

    /// 0 = uncapped.
    pub target_fps: u32,

    /// Multiplies every frame delta.
    pub time_scale: f32,

    /// Append the measured FPS to the window title every 60 frames.
    pub debug_fps: bool,

    /// Key-up of Escape stops the engine.
    pub escape_quits: bool,

    pub pacing: Pacing,

    /// RGBA, each channel in `0.0..=1.0`.
    pub clear_color: [f32; 4],

    pub sprite_shader: SpriteShaderConfig,

    pub audio: AudioConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Stagehand".to_string(),
            width: 800,
            height: 600,
            vsync: false,
            window_mode: WindowMode::Windowed,
            target_fps: 60,
            time_scale: 1.0,
            debug_fps: false,
            escape_quits: true,
            pacing: Pacing::Fixed,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            sprite_shader: SpriteShaderConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl EngineConfig {
    //--- Loading ----------------------------------------------------------

    /// Reads and validates a TOML config. A missing file is an error.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::parse(path, &text)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(path, &text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(target: "engine", "No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn parse(path: &Path, text: &str) -> EngineResult<Self> {
        let config: EngineConfig = toml::from_str(text).map_err(|e| EngineError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate().map_err(|message| EngineError::Config {
            path: path.to_path_buf(),
            message,
        })?;

        debug!(target: "engine", "Loaded config from {}", path.display());
        Ok(config)
    }

    //--- Validation -------------------------------------------------------

    /// Checks the values serde cannot express in types.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(format!(
                "time_scale must be a finite, non-negative number, got {}",
                self.time_scale
            ));
        }
        Ok(())
    }

    //--- Derived Values ---------------------------------------------------

    pub fn window_spec(&self) -> WindowSpec {
        WindowSpec {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            mode: self.window_mode,
        }
    }
}

//=== SpriteShaderConfig ==================================================

/// The shader the camera matrices are pushed to each frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteShaderConfig {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    pub name: String,
}

impl Default for SpriteShaderConfig {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("sprite.vert"),
            fragment: PathBuf::from("sprite.frag"),
            name: "Sprite".to_string(),
        }
    }
}

//=== AudioConfig =========================================================

/// Clip path for every cue. Unset keys fall back to the stock layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub bgm: PathBuf,
    pub beam: PathBuf,
    pub explosion: PathBuf,
    pub hit: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let mut stock = default_catalog();
        let mut take = |cue: Cue| stock.remove(&cue).unwrap_or_default();
        Self {
            bgm: take(Cue::Bgm),
            beam: take(Cue::Beam),
            explosion: take(Cue::Explosion),
            hit: take(Cue::Hit),
        }
    }
}

impl AudioConfig {
    pub fn catalog(&self) -> AudioCatalog {
        AudioCatalog::from([
            (Cue::Bgm, self.bgm.clone()),
            (Cue::Beam, self.beam.clone()),
            (Cue::Explosion, self.explosion.clone()),
            (Cue::Hit, self.hit.clone()),
        ])
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
