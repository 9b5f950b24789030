use std::time::Duration;

use crate::app::App;
use crate::mpris::MprisHandle;
use crate::session::PlaybackStatus;

/// What MPRIS clients were last told about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MprisSnapshot {
    index: Option<usize>,
    status: PlaybackStatus,
    duration: Option<Duration>,
}

impl MprisSnapshot {
    pub fn of(app: &App) -> Self {
        let state = app.session.state();
        Self {
            index: state.active,
            status: state.status(),
            duration: state.duration,
        }
    }
}

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let state = app.session.state();
    mpris.set_track_metadata(state.active, app.session.current_track());
    mpris.set_length(state.duration);
    mpris.set_playback(state.status());
    mpris.set_position(state.position);
}
