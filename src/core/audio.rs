//=========================================================================
// Audio Cues
//=========================================================================
//
// Fire-and-forget playback of a small, fixed catalog of clips.
//
// Architecture:
//   AudioCatalog (cue → path) ──init()──► AudioBackend::load() ──► ClipId
//   play(cue) ──► AudioBackend::play_2d(clip, looped = false)
//
// A cue whose clip failed to load stays silent; nothing here is fatal.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Cue =================================================================

/// The fixed set of named clips the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Bgm,
    Beam,
    Explosion,
    Hit,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Bgm, Cue::Beam, Cue::Explosion, Cue::Hit];
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cue::Bgm => "bgm",
            Cue::Beam => "beam",
            Cue::Explosion => "explosion",
            Cue::Hit => "hit",
        };
        f.write_str(name)
    }
}

/// Cue name → clip path. Read from the `[audio]` table of the config.
pub type AudioCatalog = BTreeMap<Cue, PathBuf>;

/// Catalog pointing at the stock asset layout.
pub fn default_catalog() -> AudioCatalog {
    let base = Path::new("./resource/audio");
    AudioCatalog::from([
        (Cue::Bgm, base.join("loop alt2.mp3")),
        (Cue::Beam, base.join("beam.mp3")),
        (Cue::Explosion, base.join("explosion.mp3")),
        (Cue::Hit, base.join("hit.mp3")),
    ])
}

//=== Backend Contract ====================================================

/// Opaque handle to a clip loaded by an [`AudioBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub usize);

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoDevice(String),

    #[error("failed to load clip {path}: {message}")]
    Load { path: PathBuf, message: String },
}

/// Audio playback provider. It may mix on its own thread; the engine
/// treats every call as a synchronous hand-off.
pub trait AudioBackend {
    fn init(&mut self) -> Result<(), AudioError>;

    fn load(&mut self, path: &Path) -> Result<ClipId, AudioError>;

    /// Starts an independent 2D playback of `clip`.
    fn play_2d(&mut self, clip: ClipId, looped: bool);
}

//=== AudioCues ===========================================================

pub struct AudioCues {
    backend: Option<Box<dyn AudioBackend>>,
    clips: HashMap<Cue, ClipId>,
}

impl AudioCues {
    /// Cues with no backend: every play is a no-op.
    pub fn silent() -> Self {
        Self {
            backend: None,
            clips: HashMap::new(),
        }
    }

    /// Initialises the backend and resolves every cue in `catalog`.
    ///
    /// Failures are logged and leave the affected cues silent.
    pub fn init(mut backend: Box<dyn AudioBackend>, catalog: &AudioCatalog) -> Self {
        if let Err(e) = backend.init() {
            warn!(target: "audio", "Audio backend unavailable, cues disabled: {}", e);
            return Self::silent();
        }

        let mut clips = HashMap::with_capacity(catalog.len());
        for (&cue, path) in catalog {
            match backend.load(path) {
                Ok(clip) => {
                    debug!(target: "audio", "Cue {} loaded from {}", cue, path.display());
                    clips.insert(cue, clip);
                }
                Err(e) => warn!(target: "audio", "Cue {} will be silent: {}", cue, e),
            }
        }

        Self {
            backend: Some(backend),
            clips,
        }
    }

    /// Plays a cue once. Overlapping plays of the same cue are allowed.
    pub fn play(&mut self, cue: Cue) {
        let (Some(backend), Some(&clip)) = (self.backend.as_mut(), self.clips.get(&cue)) else {
            trace!(target: "audio", "Cue {} not loaded, skipping", cue);
            return;
        };
        backend.play_2d(clip, false);
    }

    pub fn play_bgm(&mut self) {
        self.play(Cue::Bgm);
    }

    pub fn play_beam(&mut self) {
        self.play(Cue::Beam);
    }

    pub fn play_explosion(&mut self) {
        self.play(Cue::Explosion);
    }

    pub fn play_hit(&mut self) {
        self.play(Cue::Hit);
    }

    pub fn is_loaded(&self, cue: Cue) -> bool {
        self.backend.is_some() && self.clips.contains_key(&cue)
    }
}

impl fmt::Debug for AudioCues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioCues")
            .field("backend", &self.backend.is_some())
            .field("clips", &self.clips)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
