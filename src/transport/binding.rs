use std::time::Duration;

use tracing::debug;

use crate::engine::EngineId;
use crate::session::{Notification, PlaybackSession};

use super::slider::{SeekSlider, VolumeSlider};

pub const PLAY_GLYPH: &str = "▶";
pub const PAUSE_GLYPH: &str = "❚❚";

/// Label shown when nothing is loaded.
pub const EMPTY_TIME_LABEL: &str = "00:00 / 00:00";

/// `MM:SS`, truncated to whole seconds. Minutes keep growing past 59.
pub fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `current / total`; an unknown total renders as `00:00`.
pub fn format_time(current: Duration, total: Option<Duration>) -> String {
    format!(
        "{} / {}",
        format_clock(current),
        format_clock(total.unwrap_or_default())
    )
}

/// Visual transport state kept in sync with a [`PlaybackSession`].
#[derive(Debug, Clone)]
pub struct TransportBinding {
    seek: SeekSlider,
    volume: VolumeSlider,
    time_label: String,
    playing: bool,
    /// Engine the sliders were last synced against.
    engine: Option<EngineId>,
}

impl TransportBinding {
    pub fn new(initial_volume: u8) -> Self {
        Self {
            seek: SeekSlider::default(),
            volume: VolumeSlider::new(initial_volume),
            time_label: EMPTY_TIME_LABEL.to_string(),
            playing: false,
            engine: None,
        }
    }

    pub fn seek(&self) -> &SeekSlider {
        &self.seek
    }

    pub fn volume(&self) -> VolumeSlider {
        self.volume
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    /// Glyph on the play/pause button: pause while playing, play otherwise.
    pub fn glyph(&self) -> &'static str {
        if self.playing { PAUSE_GLYPH } else { PLAY_GLYPH }
    }

    /// React to a notification the session accepted.
    pub fn apply(&mut self, note: Notification, session: &mut PlaybackSession) {
        match note {
            Notification::Position(p) => {
                if !self.seek.is_dragging() {
                    self.seek.set_value(p);
                }
                self.time_label = format_time(p, session.state().duration);
            }
            Notification::Ready(total) => {
                self.seek.set_max(total.unwrap_or_default());
                if !self.seek.is_dragging() {
                    self.seek.set_value(Duration::ZERO);
                }
                self.time_label = format_time(Duration::ZERO, total);
                session.set_volume(self.volume.value());
            }
            Notification::EndOfMedia => {}
        }
        self.refresh(session);
    }

    /// Re-read session state after a user command or notification.
    ///
    /// A drag in progress is cancelled when the loaded engine changes, so a
    /// release never seeks a track the drag did not start on. Otherwise the
    /// slider value is left alone while dragging.
    pub fn refresh(&mut self, session: &PlaybackSession) {
        let engine = session.engine_id();
        if engine != self.engine {
            if self.seek.is_dragging() {
                debug!(?engine, "track changed, seek drag cancelled");
                self.seek.set_dragging(false);
            }
            self.engine = engine;
        }

        let state = session.state();
        self.playing = state.playing;
        if state.active.is_none() {
            self.seek.reset();
            self.time_label = EMPTY_TIME_LABEL.to_string();
            return;
        }
        if state.duration.is_none() {
            self.seek.set_max(Duration::ZERO);
        }
        if !self.seek.is_dragging() {
            self.seek.set_value(state.position);
        }
        self.time_label = format_time(state.position, state.duration);
    }

    /// The user grabbed the seek slider.
    pub fn begin_seek(&mut self, ratio: f64) {
        self.seek.set_dragging(true);
        self.drag_seek(ratio);
    }

    /// Move the slider under the pointer. Does not seek.
    pub fn drag_seek(&mut self, ratio: f64) {
        if !self.seek.is_dragging() {
            return;
        }
        let value = self.seek.value_at(ratio);
        self.seek.set_value(value);
    }

    /// The user let go: seek the session to the slider value.
    pub fn end_seek(&mut self, session: &mut PlaybackSession) {
        if !self.seek.is_dragging() {
            return;
        }
        self.seek.set_dragging(false);
        let target = self.seek.value();
        debug!(target_ms = target.as_millis() as u64, "seek from slider");
        session.seek_to(target);
        self.refresh(session);
    }

    /// Move the volume slider and forward the value to the engine.
    pub fn set_volume(&mut self, percent: u8, session: &mut PlaybackSession) {
        self.volume.set(percent);
        session.set_volume(self.volume.value());
    }

    pub fn nudge_volume(&mut self, delta: i16, session: &mut PlaybackSession) {
        let next = (i16::from(self.volume.value()) + delta).clamp(0, 100);
        self.set_volume(next as u8, session);
    }
}
