use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::Track;

fn is_media_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Build a `Track` for `path`, reading tags when the file has any.
pub(super) fn read_track(path: &Path, settings: &LibrarySettings) -> Track {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist: Option<String> = None;
    let mut album: Option<String> = None;
    let mut duration: Option<Duration> = None;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = non_empty(tag.title()) {
                    title = v;
                }
                artist = non_empty(tag.artist());
                album = non_empty(tag.album());
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    let display = display_from_fields(
        path,
        &title,
        artist.as_deref(),
        album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );

    Track {
        path: path.to_path_buf(),
        title,
        artist,
        album,
        duration,
        display,
    }
}

/// Collect the media files under `dir`, sorted by display name.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_media_file(path, settings)
        {
            tracks.push(read_track(path, settings));
        }
    }

    tracks.sort_by(|a, b| a.display.to_lowercase().cmp(&b.display.to_lowercase()));
    tracks
}

/// Resolve dropped or typed paths into tracks, preserving the given order.
///
/// Directories expand to their sorted contents. Files with unknown extensions
/// and paths that do not exist are skipped.
pub fn expand(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks = Vec::new();
    for path in paths {
        if path.is_dir() {
            tracks.extend(scan(path, settings));
        } else if path.is_file() && is_media_file(path, settings) {
            tracks.push(read_track(path, settings));
        } else {
            debug!(path = %path.display(), "skipping non-media path");
        }
    }
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackDisplayField;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_media_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_media_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_media_file(Path::new("/tmp/a.MP4"), &settings));
        assert!(is_media_file(Path::new("/tmp/a.wav"), &settings));
        assert!(!is_media_file(Path::new("/tmp/a.flac"), &settings));
        assert!(!is_media_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_media_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn extensions_are_extensible_and_tolerate_leading_dots() {
        let settings = LibrarySettings {
            extensions: vec![".FLAC".into(), " ogg ".into()],
            ..LibrarySettings::default()
        };
        assert!(is_media_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_media_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_media_file(Path::new("/tmp/a.mp3"), &settings));
    }

    #[test]
    fn scan_filters_non_media_and_sorts_by_display_case_insensitive() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.wav"), b"not a real wav").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].display, "A.wav");
        assert_eq!(tracks[0].title, "A");
        assert_eq!(tracks[1].display, "b.MP3");
        assert_eq!(tracks[1].duration, None);
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            display_fields: vec![TrackDisplayField::Filename],
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display, "visible");
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            display_fields: vec![TrackDisplayField::Filename],
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].display, "root");
    }

    #[test]
    fn expand_keeps_argument_order_and_expands_directories() {
        let dir = tempdir().unwrap();
        let album = dir.path().join("album");
        fs::create_dir_all(&album).unwrap();
        fs::write(album.join("02.mp3"), b"x").unwrap();
        fs::write(album.join("01.mp3"), b"x").unwrap();
        let single = dir.path().join("zz.wav");
        fs::write(&single, b"x").unwrap();
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, b"x").unwrap();

        let paths = vec![
            single.clone(),
            notes,
            dir.path().join("missing.mp3"),
            album,
            single,
        ];
        let tracks = expand(&paths, &LibrarySettings::default());
        let names: Vec<&str> = tracks.iter().map(|t| t.display.as_str()).collect();
        assert_eq!(names, vec!["zz.wav", "01.mp3", "02.mp3", "zz.wav"]);
    }
}
