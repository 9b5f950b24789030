//! Transport UI binding: seek slider, volume slider, time label and the
//! play/pause glyph.
//!
//! Engine-driven updates never issue commands back to the engine. The only
//! slider path that seeks is the end of a user drag (`end_seek`), and while a
//! drag is in progress position notifications leave the slider alone.

mod binding;
mod slider;

pub use binding::*;
pub use slider::{SeekSlider, VolumeSlider};
