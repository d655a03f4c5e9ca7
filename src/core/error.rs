//=========================================================================
// Engine Errors
//=========================================================================
//
// Errors that can surface out of the engine. Only acquisition failures
// (window, presentation context, graphics loader) and configuration
// problems propagate; everything else is absorbed and logged where it
// happens.
//
//=========================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::core::platform_bridge::PlatformError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The windowing subsystem could not be brought up.
    #[error("failed to initialise windowing subsystem: {0}")]
    EventLoop(String),

    #[error("failed to create window: {0}")]
    WindowCreation(String),

    #[error("failed to create graphics context: {0}")]
    GraphicsContext(String),

    /// Adapter/device (extension loader) acquisition failed.
    #[error("failed to initialise graphics loader: {0}")]
    GraphicsLoader(String),

    #[error("config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A config built in code failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PlatformError> for EngineError {
    fn from(e: PlatformError) -> Self {
        match e {
            PlatformError::EventLoop(msg) => Self::EventLoop(msg),
            PlatformError::WindowCreation(msg) => Self::WindowCreation(msg),
            PlatformError::GraphicsContext(msg) => Self::GraphicsContext(msg),
            PlatformError::GraphicsLoader(msg) => Self::GraphicsLoader(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_errors_map_to_matching_variants() {
        let err: EngineError = PlatformError::WindowCreation("no display".into()).into();
        assert!(matches!(err, EngineError::WindowCreation(ref m) if m == "no display"));

        let err: EngineError = PlatformError::GraphicsLoader("no adapter".into()).into();
        assert_eq!(err.to_string(), "failed to initialise graphics loader: no adapter");
    }

    #[test]
    fn config_error_names_the_file() {
        let err = EngineError::Config {
            path: PathBuf::from("stagehand.toml"),
            message: "width must be non-zero".into(),
        };
        assert_eq!(
            err.to_string(),
            "config error in stagehand.toml: width must be non-zero"
        );
    }
}
