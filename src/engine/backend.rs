use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::library::Track;

use super::sink::open_sink;
use super::ticker::{Shared, spawn_ticker};
use super::types::{Engine, EngineError, EngineFactory, EngineId, EngineStatus, Listener};

/// Owns the audio output stream and hands out one `RodioEngine` per track.
pub struct RodioFactory {
    stream: OutputStream,
    tick: Duration,
}

impl RodioFactory {
    /// Open the default output device. `tick` is the notification interval.
    pub fn open_default(tick: Duration) -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        Ok(Self { stream, tick })
    }
}

impl EngineFactory for RodioFactory {
    fn load(&mut self, id: EngineId, track: &Track) -> Result<Box<dyn Engine>, EngineError> {
        let (sink, decoded_total) = open_sink(&self.stream, &track.path)?;
        // Tag-derived duration first; decoders only know it for some formats.
        let duration = track
            .duration
            .or(decoded_total)
            .filter(|d| !d.is_zero());
        debug!(engine = id, path = %track.path.display(), ?duration, "loaded media");
        Ok(Box::new(RodioEngine::start(sink, duration, self.tick)))
    }
}

pub struct RodioEngine {
    sink: Arc<Sink>,
    shared: Arc<Shared>,
    duration: Option<Duration>,
    ticker: Option<JoinHandle<()>>,
}

impl RodioEngine {
    fn start(sink: Sink, duration: Option<Duration>, tick: Duration) -> Self {
        let sink = Arc::new(sink);
        let shared = Arc::new(Shared::default());
        let ticker = spawn_ticker(sink.clone(), shared.clone(), duration, tick);
        Self {
            sink,
            shared,
            duration,
            ticker: Some(ticker),
        }
    }

    fn shutdown(&mut self) {
        self.shared.quit.store(true, Ordering::Release);
        if let Some(handle) = self.ticker.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                warn!("engine ticker panicked");
            }
        }
        self.sink.stop();
    }
}

impl Engine for RodioEngine {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.shared.stopped.store(true, Ordering::Release);
        self.sink.stop();
    }

    fn seek(&mut self, to: Duration) {
        if let Err(e) = self.sink.try_seek(to) {
            warn!(error = %e, ?to, "seek failed");
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, 1.0));
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn status(&self) -> EngineStatus {
        if self.shared.stopped.load(Ordering::Acquire) || self.sink.empty() {
            EngineStatus::Stopped
        } else if self.sink.is_paused() {
            EngineStatus::Paused
        } else {
            EngineStatus::Playing
        }
    }

    fn subscribe(&mut self, listener: Listener) {
        if let Ok(mut slot) = self.shared.listener.lock() {
            *slot = Some(listener);
        }
    }

    fn unsubscribe(&mut self) {
        if let Ok(mut slot) = self.shared.listener.lock() {
            *slot = None;
        }
    }

    fn dispose(mut self: Box<Self>) {
        self.shutdown();
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        // No-op after `dispose`; covers engines dropped without one.
        if self.ticker.is_some() {
            self.shutdown();
        }
    }
}
