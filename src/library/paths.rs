//! Parsing of dropped / typed path lists.
//!
//! Terminals deliver a file drop as pasted text. Depending on the terminal
//! that is a whitespace separated list of shell-escaped paths, quoted paths,
//! or `file://` URIs one per line.

use std::path::PathBuf;

use percent_encoding::percent_decode_str;

/// Split `text` into paths. Does not touch the filesystem except to accept a
/// single unescaped path containing spaces.
pub fn parse_path_list(text: &str) -> Vec<PathBuf> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    // Some terminals paste one raw path with spaces left unescaped.
    let whole = PathBuf::from(trimmed);
    if trimmed.contains(' ') && whole.exists() {
        return vec![whole];
    }

    split_words(trimmed)
        .into_iter()
        .map(|word| match word.strip_prefix("file://") {
            Some(rest) => {
                let rest = rest.strip_prefix("localhost").unwrap_or(rest);
                PathBuf::from(percent_decode(rest))
            }
            None => PathBuf::from(word),
        })
        .collect()
}

fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

fn percent_decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_and_honours_backslash_escapes() {
        let got = parse_path_list("/music/a.mp3 /music/My\\ Song.mp3\n");
        assert_eq!(
            got,
            vec![
                PathBuf::from("/music/a.mp3"),
                PathBuf::from("/music/My Song.mp3")
            ]
        );
    }

    #[test]
    fn quoted_paths_keep_their_spaces() {
        let got = parse_path_list("'/music/It''s.mp3' \"/video/clip one.mp4\"");
        assert_eq!(
            got,
            vec![
                PathBuf::from("/music/Its.mp3"),
                PathBuf::from("/video/clip one.mp4")
            ]
        );
    }

    #[test]
    fn file_uris_are_percent_decoded() {
        let got = parse_path_list("file:///music/My%20Song.mp3\r\nfile://localhost/v/x.mp4");
        assert_eq!(
            got,
            vec![
                PathBuf::from("/music/My Song.mp3"),
                PathBuf::from("/v/x.mp4")
            ]
        );
    }

    #[test]
    fn malformed_percent_sequences_are_left_alone() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("a%zzb"), "a%zzb");
        assert_eq!(percent_decode("%41%42"), "AB");
        assert_eq!(percent_decode("caf%C3%A9"), "café");
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(parse_path_list("").is_empty());
        assert!(parse_path_list("  \n\t").is_empty());
    }

    #[test]
    fn existing_path_with_raw_spaces_is_taken_whole() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("two words.mp3");
        std::fs::write(&p, b"x").unwrap();

        let got = parse_path_list(&format!("{}\n", p.display()));
        assert_eq!(got, vec![p]);
    }
}
