use std::time::Duration;

/// Coarse transport status as shown to the outside world (MPRIS, status line).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Snapshot of what the session is doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlaybackState {
    /// Playlist position loaded into the engine, `None` when nothing is loaded.
    pub active: Option<usize>,
    pub playing: bool,
    pub position: Duration,
    /// Unknown until the engine reports ready.
    pub duration: Option<Duration>,
    /// 0-100.
    pub volume: u8,
}

impl PlaybackState {
    pub fn new(volume: u8) -> Self {
        Self {
            active: None,
            playing: false,
            position: Duration::ZERO,
            duration: None,
            volume: volume.min(100),
        }
    }

    /// Back to the zero state. Volume is a user preference and survives.
    pub fn reset(&mut self) {
        *self = Self::new(self.volume);
    }

    pub fn status(&self) -> PlaybackStatus {
        match (self.active, self.playing) {
            (None, _) => PlaybackStatus::Stopped,
            (Some(_), true) => PlaybackStatus::Playing,
            (Some(_), false) => PlaybackStatus::Paused,
        }
    }
}
