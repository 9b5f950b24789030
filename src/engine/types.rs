//! Engine-facing types: the collaborator traits, notifications and errors.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::Duration;

use thiserror::Error;

use crate::library::Track;

/// Identifies one engine instance for the lifetime of the process.
pub type EngineId = u64;

/// What the engine reports about its own transport.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Playing,
    Paused,
    /// Stopped explicitly, or the media ran out.
    Stopped,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineEventKind {
    /// The playback clock moved.
    Position(Duration),
    /// Metadata is available; carries the total duration when known.
    Ready(Option<Duration>),
    /// The source has been played to the end.
    EndOfMedia,
}

/// A notification tagged with the engine that produced it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    pub engine: EngineId,
    pub kind: EngineEventKind,
}

/// Sending half handed to an engine on `subscribe`.
#[derive(Debug, Clone)]
pub struct Listener {
    engine: EngineId,
    tx: Sender<EngineEvent>,
}

impl Listener {
    pub fn new(engine: EngineId, tx: Sender<EngineEvent>) -> Self {
        Self { engine, tx }
    }

    pub fn engine(&self) -> EngineId {
        self.engine
    }

    /// Returns `false` once the receiving side is gone.
    pub fn notify(&self, kind: EngineEventKind) -> bool {
        self.tx
            .send(EngineEvent {
                engine: self.engine,
                kind,
            })
            .is_ok()
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("no audio output device: {0}")]
    Output(String),
}

/// One loaded media source.
///
/// Commands are fire-and-forget. Notifications flow through the `Listener`
/// registered with `subscribe`, never through return values.
pub trait Engine {
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, to: Duration);
    /// `volume` is linear, `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    fn status(&self) -> EngineStatus;
    fn subscribe(&mut self, listener: Listener);
    fn unsubscribe(&mut self);
    /// Release every resource held by this instance.
    fn dispose(self: Box<Self>);
}

/// Constructs engines bound to a track.
pub trait EngineFactory {
    fn load(&mut self, id: EngineId, track: &Track) -> Result<Box<dyn Engine>, EngineError>;
}
