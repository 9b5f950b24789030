use std::path::Path;

use crate::config::TrackDisplayField;

fn trimmed(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn field_text(
    field: TrackDisplayField,
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
) -> Option<String> {
    match field {
        TrackDisplayField::Name => trimmed(path.file_name().and_then(|s| s.to_str())),
        TrackDisplayField::Filename => trimmed(path.file_stem().and_then(|s| s.to_str())),
        TrackDisplayField::Title => trimmed(Some(title)),
        TrackDisplayField::Artist => trimmed(artist),
        TrackDisplayField::Album => trimmed(album),
        TrackDisplayField::Path => Some(path.display().to_string()),
    }
}

/// Playlist label for a track: the non-empty `fields` joined with `sep`, or
/// `title` when none of them has a value.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let parts: Vec<String> = fields
        .iter()
        .filter_map(|&f| field_text(f, path, title, artist, album))
        .collect();

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
