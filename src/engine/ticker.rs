//! Per-engine ticker thread.
//!
//! `rodio` has no callbacks, so each engine polls its sink on a short
//! interval and turns what it sees into `EngineEvent`s.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::Sink;

use super::types::{EngineEventKind, Listener};

/// State shared between an engine and its ticker.
#[derive(Debug, Default)]
pub(super) struct Shared {
    pub listener: Mutex<Option<Listener>>,
    /// Set by `Engine::stop`; a stopped sink is empty but has not "ended".
    pub stopped: AtomicBool,
    pub quit: AtomicBool,
}

pub(super) fn spawn_ticker(
    sink: Arc<Sink>,
    shared: Arc<Shared>,
    duration: Option<Duration>,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut ready_sent = false;
        let mut ended = false;
        let mut last_position: Option<Duration> = None;

        loop {
            // Woken early by `unpark` on dispose.
            thread::park_timeout(tick);
            if shared.quit.load(Ordering::Acquire) {
                break;
            }

            let Ok(guard) = shared.listener.lock() else {
                break;
            };
            // Nothing is delivered while unsubscribed.
            let Some(listener) = guard.as_ref() else {
                continue;
            };

            if !ready_sent {
                listener.notify(EngineEventKind::Ready(duration));
                ready_sent = true;
            }

            if shared.stopped.load(Ordering::Acquire) || ended {
                continue;
            }

            let position = sink.get_pos();
            if last_position != Some(position) {
                listener.notify(EngineEventKind::Position(position));
                last_position = Some(position);
            }

            if sink.empty() {
                ended = true;
                listener.notify(EngineEventKind::EndOfMedia);
            }
        }
    })
}
