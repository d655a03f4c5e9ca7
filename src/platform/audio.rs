//=========================================================================
// Rodio Backend
//=========================================================================
//
// `AudioBackend` on the default output device.
//
// Clips are read fully into memory at load time. Every play decodes a
// fresh cursor over the shared bytes into its own detached sink, so
// overlapping plays of one clip never interfere.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

//=== Internal Dependencies ===============================================

use crate::core::audio::{AudioBackend, AudioError, ClipId};

//=== RodioBackend ========================================================

#[derive(Default)]
pub struct RodioBackend {
    /// Held for its lifetime: dropping the stream silences every sink.
    stream: Option<(OutputStream, OutputStreamHandle)>,
    clips: Vec<Arc<[u8]>>,
}

impl RodioBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioBackend for RodioBackend {
    fn init(&mut self) -> Result<(), AudioError> {
        let stream = OutputStream::try_default().map_err(|e| AudioError::NoDevice(e.to_string()))?;
        info!(target: "audio", "Audio output opened");
        self.stream = Some(stream);
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<ClipId, AudioError> {
        let load_error = |message: String| AudioError::Load {
            path: path.to_path_buf(),
            message,
        };

        let bytes: Arc<[u8]> = fs::read(path).map_err(|e| load_error(e.to_string()))?.into();

        // Decode once so a corrupt file fails here, not on every play.
        Decoder::new(Cursor::new(Arc::clone(&bytes))).map_err(|e| load_error(e.to_string()))?;

        self.clips.push(bytes);
        Ok(ClipId(self.clips.len() - 1))
    }

    fn play_2d(&mut self, clip: ClipId, looped: bool) {
        let (Some((_, handle)), Some(bytes)) = (self.stream.as_ref(), self.clips.get(clip.0)) else {
            debug!(target: "audio", "Play of {:?} ignored: no stream or clip", clip);
            return;
        };

        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(e) => {
                warn!(target: "audio", "Could not open sink: {}", e);
                return;
            }
        };
        let source = match Decoder::new(Cursor::new(Arc::clone(bytes))) {
            Ok(source) => source,
            Err(e) => {
                warn!(target: "audio", "Could not decode {:?}: {}", clip, e);
                return;
            }
        };

        if looped {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        sink.detach();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
