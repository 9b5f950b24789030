use std::path::{Path, PathBuf};
use std::time::Duration;

/// One playlist entry. Immutable once added.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    /// Name shown in the playlist.
    pub display: String,
}

impl Track {
    /// A track with no tag metadata; the title falls back to the file stem.
    pub fn from_path(path: &Path, display: String) -> Self {
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self {
            path: path.to_path_buf(),
            title,
            artist: None,
            album: None,
            duration: None,
            display,
        }
    }
}
