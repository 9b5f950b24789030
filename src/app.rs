//! Application module: the state the runtime mutates and the UI draws.
//!
//! `App` owns the playback session and its transport binding, plus the
//! playlist cursor and the open prompt.

mod model;

pub use model::*;
