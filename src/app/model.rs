//! Application model: `App` and `InputMode`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::LibrarySettings;
use crate::engine::EngineEvent;
use crate::library::{Track, expand, parse_path_list};
use crate::session::PlaybackSession;
use crate::transport::TransportBinding;

/// Two clicks on the same row within this window play it.
pub const DOUBLE_CLICK: Duration = Duration::from_millis(400);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing paths into the open prompt.
    Open,
}

/// The main application model.
pub struct App {
    pub session: PlaybackSession,
    pub transport: TransportBinding,
    pub selected: usize,
    pub mode: InputMode,
    pub prompt: String,
    /// One-line message for the footer.
    pub status: Option<String>,

    last_active: Option<usize>,
    last_click: Option<(usize, Instant)>,
}

impl App {
    pub fn new(session: PlaybackSession, initial_volume: u8) -> Self {
        let mut app = Self {
            session,
            transport: TransportBinding::new(initial_volume),
            selected: 0,
            mode: InputMode::Normal,
            prompt: String::new(),
            status: None,
            last_active: None,
            last_click: None,
        };
        app.sync();
        app
    }

    pub fn tracks(&self) -> &[Track] {
        self.session.playlist()
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks().is_empty()
    }

    /// Set the cursor, clamped to the playlist.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.tracks().len().saturating_sub(1));
    }

    /// Move the cursor down, wrapping to the top.
    pub fn select_next(&mut self) {
        let len = self.tracks().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn select_prev(&mut self) {
        let len = self.tracks().len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn play_selected(&mut self) {
        if self.has_tracks() {
            self.session.play(self.selected);
            self.sync();
        }
    }

    pub fn remove_selected(&mut self) {
        if self.has_tracks() {
            self.session.remove(self.selected);
            self.set_selected(self.selected);
            self.sync();
        }
    }

    pub fn toggle_play_pause(&mut self) {
        self.session.toggle_play_pause();
        self.sync();
    }

    /// Start the cursor track when nothing is loaded, otherwise resume.
    pub fn play(&mut self) {
        if self.session.is_loaded() {
            if !self.session.state().playing {
                self.toggle_play_pause();
            }
        } else {
            self.play_selected();
        }
    }

    pub fn pause(&mut self) {
        if self.session.state().playing {
            self.toggle_play_pause();
        }
    }

    pub fn stop(&mut self) {
        self.session.stop();
        self.sync();
    }

    pub fn next_track(&mut self) {
        self.session.next();
        self.sync();
    }

    pub fn prev_track(&mut self) {
        self.session.previous();
        self.sync();
    }

    pub fn seek_by(&mut self, secs: f64) {
        self.session.seek_relative(secs);
        self.sync();
    }

    pub fn volume_by(&mut self, delta: i16) {
        self.transport.nudge_volume(delta, &mut self.session);
    }

    pub fn set_volume(&mut self, percent: u8) {
        self.transport.set_volume(percent, &mut self.session);
    }

    pub fn begin_seek(&mut self, ratio: f64) {
        self.transport.begin_seek(ratio);
    }

    pub fn drag_seek(&mut self, ratio: f64) {
        self.transport.drag_seek(ratio);
    }

    pub fn end_seek(&mut self) {
        self.transport.end_seek(&mut self.session);
    }

    /// Feed one engine message through the session and into the widgets.
    /// Returns false for messages the session dropped.
    pub fn handle_engine_event(&mut self, event: EngineEvent) -> bool {
        match self.session.accept(event) {
            Some(note) => {
                self.transport.apply(note, &mut self.session);
                self.sync();
                true
            }
            None => false,
        }
    }

    /// Add every playable file named in `text` (a paste, a drop or the open
    /// prompt). Returns the number of tracks added.
    pub fn import_text(&mut self, text: &str, library: &LibrarySettings) -> usize {
        let paths = parse_path_list(text);
        if paths.is_empty() {
            return 0;
        }
        self.import_paths(&paths, library)
    }

    /// Add the playable files among `paths`, expanding directories.
    pub fn import_paths(&mut self, paths: &[PathBuf], library: &LibrarySettings) -> usize {
        let tracks = expand(paths, library);
        let added = tracks.len();
        if added == 0 {
            self.status = Some("nothing playable in selection".to_string());
            return 0;
        }

        info!(paths = paths.len(), tracks = added, "import");
        self.status = Some(match added {
            1 => "added 1 track".to_string(),
            n => format!("added {n} tracks"),
        });
        self.session.add_tracks(tracks);
        self.sync();
        added
    }

    pub fn open_prompt(&mut self) {
        self.mode = InputMode::Open;
        self.prompt.clear();
    }

    pub fn cancel_prompt(&mut self) {
        self.mode = InputMode::Normal;
        self.prompt.clear();
    }

    pub fn push_prompt_char(&mut self, c: char) {
        self.prompt.push(c);
    }

    pub fn pop_prompt_char(&mut self) {
        self.prompt.pop();
    }

    pub fn submit_prompt(&mut self, library: &LibrarySettings) -> usize {
        let text = std::mem::take(&mut self.prompt);
        self.mode = InputMode::Normal;
        self.import_text(&text, library)
    }

    /// A click on playlist row `idx`. A second click on the same row within
    /// [`DOUBLE_CLICK`] plays it.
    pub fn click_row(&mut self, idx: usize, now: Instant) {
        if idx >= self.tracks().len() {
            return;
        }
        let double = self
            .last_click
            .is_some_and(|(row, at)| row == idx && now.duration_since(at) <= DOUBLE_CLICK);
        self.selected = idx;
        if double {
            self.last_click = None;
            self.play_selected();
        } else {
            self.last_click = Some((idx, now));
        }
    }

    /// Pull session state into the widgets after anything that may have
    /// changed it.
    fn sync(&mut self) {
        self.transport.refresh(&self.session);

        let active = self.session.active_index();
        if active != self.last_active {
            if let Some(i) = active {
                self.selected = i;
            }
            self.last_active = active;
        }
        if self.selected >= self.tracks().len() {
            self.set_selected(self.selected);
        }

        if let Some(err) = self.session.take_last_error() {
            self.status = Some(format!("cannot play: {err}"));
        }
    }
}
