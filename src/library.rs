//! Turning file references into playlist tracks.
//!
//! Paths arrive from the open prompt, from terminal drops (bracketed paste)
//! and from the command line. Directories are expanded, files are filtered by
//! the configured media extensions and probed for tag metadata.

mod display;
mod model;
mod paths;
mod scan;

pub use model::Track;
pub use paths::parse_path_list;
pub use scan::expand;

#[cfg(test)]
mod tests;
