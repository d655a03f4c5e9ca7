//=========================================================================
// Fatal Sink
//=========================================================================
//
// The single exit path for unrecoverable errors.
//
// `Context::log_error()` and `EngineBuilder::build()` log the message,
// release the windowing subsystem and then hand the message here. The
// default sink ends the process with a non-zero code; tests inject one
// that records.
//
//=========================================================================

/// Receives fatal error messages. The message has already been logged.
pub trait FatalSink {
    /// Called once the windowing subsystem has been shut down. An
    /// implementation may return, in which case the engine is left in
    /// the exit state.
    fn fatal(&mut self, message: &str);
}

/// Default sink: exits the process with status 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExitProcess;

impl FatalSink for ExitProcess {
    fn fatal(&mut self, _message: &str) {
        std::process::exit(1);
    }
}
