use super::display::display_from_fields;
use super::model::Track;
use crate::config::TrackDisplayField;
use std::path::Path;

#[test]
fn display_defaults_to_the_file_name() {
    let p = Path::new("/tmp/Some Song.mp3");
    assert_eq!(
        display_from_fields(p, "Song", Some("Artist"), None, &[TrackDisplayField::Name], " - "),
        "Some Song.mp3"
    );
}

#[test]
fn display_from_fields_can_format_artist_title() {
    let p = Path::new("/tmp/Song.mp3");
    assert_eq!(
        display_from_fields(
            p,
            "Song",
            Some("  Artist  "),
            None,
            &[TrackDisplayField::Artist, TrackDisplayField::Title],
            " - ",
        ),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields(
            p,
            "Song",
            None,
            None,
            &[TrackDisplayField::Artist, TrackDisplayField::Title],
            " - ",
        ),
        "Song"
    );
}

#[test]
fn display_falls_back_to_title_when_nothing_matches() {
    let p = Path::new("/tmp/x.mp3");
    assert_eq!(
        display_from_fields(p, "Fallback", None, None, &[TrackDisplayField::Album], "/"),
        "Fallback"
    );
}

#[test]
fn track_from_path_uses_the_stem_as_title() {
    let t = Track::from_path(Path::new("/v/clip.final.mp4"), "clip".into());
    assert_eq!(t.title, "clip.final");
    assert_eq!(t.display, "clip");
    assert!(t.artist.is_none() && t.duration.is_none());
}
