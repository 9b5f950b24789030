//! Playback session: the playlist, the active index and the one live engine.
//!
//! Every transition away from a track runs unsubscribe → stop → dispose on
//! the old engine before a replacement is loaded. Engine notifications are
//! accepted through `PlaybackSession::accept`, which drops anything sent by
//! an engine that is no longer current.

mod model;
mod state;

pub use model::*;
pub use state::*;
