//=========================================================================
// Input
//=========================================================================
//
// Engine-side input identifiers and the per-frame input snapshot.
//
// The engine owns one `InputSnapshot`, feeds it from the platform event
// drain each frame, and lends it to scene states read-only.
//
//=========================================================================

pub mod event;
mod snapshot;

pub use event::{KeyCode, MouseButton};
pub use snapshot::{InputSnapshot, KeyState};
