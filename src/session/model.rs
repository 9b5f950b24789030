use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::engine::{
    Engine, EngineEvent, EngineEventKind, EngineFactory, EngineId, EngineStatus, Listener,
};
use crate::library::Track;

use super::state::PlaybackState;

/// An engine notification that survived the staleness check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Position(Duration),
    Ready(Option<Duration>),
    EndOfMedia,
}

/// The engine slot. Existing iff `PlaybackState::active` is `Some`.
struct Loaded {
    index: usize,
    id: EngineId,
    engine: Box<dyn Engine>,
}

pub struct PlaybackSession {
    playlist: Vec<Track>,
    current: Option<Loaded>,
    state: PlaybackState,
    factory: Box<dyn EngineFactory>,
    events: Sender<EngineEvent>,
    next_id: EngineId,
    last_error: Option<String>,
}

impl PlaybackSession {
    /// `events` is where every engine created by this session reports.
    pub fn new(factory: Box<dyn EngineFactory>, events: Sender<EngineEvent>, volume: u8) -> Self {
        Self {
            playlist: Vec::new(),
            current: None,
            state: PlaybackState::new(volume),
            factory,
            events,
            next_id: 1,
            last_error: None,
        }
    }

    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.active
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.active.and_then(|i| self.playlist.get(i))
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Id of the live engine, if any.
    pub fn engine_id(&self) -> Option<EngineId> {
        self.current.as_ref().map(|c| c.id)
    }

    /// The most recent load failure, cleared by the next successful load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Hand the last load failure to the caller, clearing it.
    pub fn take_last_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Append `tracks`; start the first of them if nothing is loaded.
    pub fn add_tracks(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }
        let first_new = self.playlist.len();
        info!(count = tracks.len(), "adding tracks");
        self.playlist.extend(tracks);
        if self.current.is_none() {
            self.play(first_new);
        }
    }

    /// Load and start the track at `index`. Out of range is a no-op.
    pub fn play(&mut self, index: usize) {
        if index >= self.playlist.len() {
            return;
        }

        self.release();

        let id = self.next_id;
        self.next_id += 1;
        let track = &self.playlist[index];

        match self.factory.load(id, track) {
            Ok(mut engine) => {
                engine.subscribe(Listener::new(id, self.events.clone()));
                engine.set_volume(f32::from(self.state.volume) / 100.0);
                engine.play();
                info!(index, engine = id, track = %track.display, "playing");

                self.current = Some(Loaded { index, id, engine });
                self.state.active = Some(index);
                self.state.playing = true;
                self.state.position = Duration::ZERO;
                self.state.duration = None;
                self.last_error = None;
            }
            Err(e) => {
                warn!(index, error = %e, "could not load track");
                self.last_error = Some(e.to_string());
                self.state.reset();
            }
        }
    }

    /// Pause when playing, resume when paused, restart when the media has ended.
    pub fn toggle_play_pause(&mut self) {
        let Some(cur) = self.current.as_mut() else {
            return;
        };
        match cur.engine.status() {
            EngineStatus::Playing => {
                cur.engine.pause();
                self.state.playing = false;
            }
            EngineStatus::Paused => {
                cur.engine.play();
                self.state.playing = true;
            }
            EngineStatus::Stopped => {
                let index = cur.index;
                self.play(index);
            }
        }
    }

    pub fn next(&mut self) {
        let next = match self.state.active {
            Some(i) => i + 1,
            None => 0,
        };
        if next < self.playlist.len() {
            self.play(next);
        }
    }

    pub fn previous(&mut self) {
        if let Some(i) = self.state.active {
            if i > 0 {
                self.play(i - 1);
            }
        }
    }

    /// Seek by `delta_secs` from the engine's current position, clamped to
    /// `[0, duration]`. Needs a loaded engine and a known duration.
    pub fn seek_relative(&mut self, delta_secs: f64) {
        if !delta_secs.is_finite() {
            return;
        }
        let Some(duration) = self.state.duration else {
            debug!("seek ignored: duration not known yet");
            return;
        };
        let Some(cur) = self.current.as_ref() else {
            return;
        };
        let from = cur.engine.position().as_secs_f64();
        let target = (from + delta_secs).clamp(0.0, duration.as_secs_f64());
        self.seek_to(Duration::from_secs_f64(target));
    }

    /// Seek to an absolute position, clamped to `[0, duration]`.
    pub fn seek_to(&mut self, target: Duration) {
        let Some(duration) = self.state.duration else {
            debug!("seek ignored: duration not known yet");
            return;
        };
        let Some(cur) = self.current.as_mut() else {
            return;
        };
        let target = target.min(duration);
        cur.engine.seek(target);
        self.state.position = target;
    }

    /// Record a 0-100 volume and apply it to the engine. Without an engine
    /// only the recorded value changes; the next load picks it up.
    pub fn set_volume(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.state.volume = percent;
        if let Some(cur) = self.current.as_mut() {
            cur.engine.set_volume(f32::from(percent) / 100.0);
        }
    }

    /// Remove the track at `index`. Removing the active track moves playback
    /// to the track that takes its place, or the new last track.
    pub fn remove(&mut self, index: usize) {
        if index >= self.playlist.len() {
            return;
        }

        match self.state.active {
            Some(active) if active == index => {
                self.release();
                let removed = self.playlist.remove(index);
                debug!(index, track = %removed.display, "removed active track");
                if self.playlist.is_empty() {
                    self.state.reset();
                } else {
                    self.play(index.min(self.playlist.len() - 1));
                }
            }
            Some(active) => {
                self.playlist.remove(index);
                if index < active {
                    self.state.active = Some(active - 1);
                    if let Some(cur) = self.current.as_mut() {
                        cur.index = active - 1;
                    }
                }
            }
            None => {
                self.playlist.remove(index);
            }
        }
    }

    /// Unload the engine and return to the zero state. The playlist is kept.
    pub fn stop(&mut self) {
        self.release();
        self.state.reset();
    }

    /// End of session: nothing may stay loaded.
    pub fn shutdown(&mut self) {
        self.release();
        self.state.reset();
        info!("session closed");
    }

    /// Consume one engine message on the UI thread.
    ///
    /// Messages from engines that were already released are dropped here.
    pub fn accept(&mut self, event: EngineEvent) -> Option<Notification> {
        let current = self.current.as_ref()?;
        if event.engine != current.id {
            trace!(engine = event.engine, current = current.id, "stale engine event");
            return None;
        }

        match event.kind {
            EngineEventKind::Position(p) => {
                self.state.position = p;
                Some(Notification::Position(p))
            }
            EngineEventKind::Ready(d) => {
                self.state.duration = d.or_else(|| current.engine.duration());
                Some(Notification::Ready(self.state.duration))
            }
            EngineEventKind::EndOfMedia => {
                self.next();
                self.state.playing = self
                    .current
                    .as_ref()
                    .is_some_and(|c| c.engine.status() == EngineStatus::Playing);
                Some(Notification::EndOfMedia)
            }
        }
    }

    fn release(&mut self) {
        if let Some(Loaded {
            id, mut engine, ..
        }) = self.current.take()
        {
            engine.unsubscribe();
            engine.stop();
            engine.dispose();
            debug!(engine = id, "released engine");
        }
        self.state.active = None;
        self.state.playing = false;
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.release();
    }
}
