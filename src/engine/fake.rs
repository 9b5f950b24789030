//! Recording engine used by session, transport and app tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::library::Track;

use super::types::{Engine, EngineError, EngineFactory, EngineId, EngineStatus, Listener};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(EngineId, PathBuf),
    Play(EngineId),
    Pause(EngineId),
    Stop(EngineId),
    Seek(EngineId, Duration),
    Volume(EngineId, f32),
    Subscribe(EngineId),
    Unsubscribe(EngineId),
    Dispose(EngineId),
}

/// Knobs shared by the factory and whichever engine is live.
#[derive(Debug, Default)]
pub struct Controls {
    pub calls: Vec<Call>,
    pub position: Duration,
    pub ended: bool,
    pub failing: HashSet<PathBuf>,
    pub duration: Option<Duration>,
}

pub type FakeHandle = Rc<RefCell<Controls>>;

pub struct FakeFactory {
    controls: FakeHandle,
}

impl FakeFactory {
    pub fn new() -> (Self, FakeHandle) {
        let controls = FakeHandle::default();
        (
            Self {
                controls: controls.clone(),
            },
            controls,
        )
    }
}

impl EngineFactory for FakeFactory {
    fn load(&mut self, id: EngineId, track: &Track) -> Result<Box<dyn Engine>, EngineError> {
        let mut c = self.controls.borrow_mut();
        c.calls.push(Call::Load(id, track.path.clone()));
        if c.failing.contains(&track.path) {
            return Err(EngineError::Open {
                path: track.path.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        c.position = Duration::ZERO;
        c.ended = false;
        Ok(Box::new(FakeEngine {
            id,
            controls: self.controls.clone(),
            paused: true,
            stopped: false,
        }))
    }
}

pub struct FakeEngine {
    id: EngineId,
    controls: FakeHandle,
    paused: bool,
    stopped: bool,
}

impl FakeEngine {
    fn record(&self, call: Call) {
        self.controls.borrow_mut().calls.push(call);
    }
}

impl Engine for FakeEngine {
    fn play(&mut self) {
        self.paused = false;
        self.record(Call::Play(self.id));
    }

    fn pause(&mut self) {
        self.paused = true;
        self.record(Call::Pause(self.id));
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.record(Call::Stop(self.id));
    }

    fn seek(&mut self, to: Duration) {
        self.controls.borrow_mut().position = to;
        self.record(Call::Seek(self.id, to));
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(Call::Volume(self.id, volume));
    }

    fn position(&self) -> Duration {
        self.controls.borrow().position
    }

    fn duration(&self) -> Option<Duration> {
        self.controls.borrow().duration
    }

    fn status(&self) -> EngineStatus {
        if self.stopped || self.controls.borrow().ended {
            EngineStatus::Stopped
        } else if self.paused {
            EngineStatus::Paused
        } else {
            EngineStatus::Playing
        }
    }

    fn subscribe(&mut self, listener: Listener) {
        assert_eq!(listener.engine(), self.id);
        self.record(Call::Subscribe(self.id));
    }

    fn unsubscribe(&mut self) {
        self.record(Call::Unsubscribe(self.id));
    }

    fn dispose(self: Box<Self>) {
        self.record(Call::Dispose(self.id));
    }
}

/// A track whose path is just `name`.
pub fn track(name: &str) -> Track {
    Track::from_path(Path::new(name), name.to_string())
}

/// Engine ids that received `Dispose`, in order.
pub fn disposed(controls: &FakeHandle) -> Vec<EngineId> {
    controls
        .borrow()
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Dispose(id) => Some(*id),
            _ => None,
        })
        .collect()
}

/// Paths handed to the factory, in order.
pub fn loaded(controls: &FakeHandle) -> Vec<PathBuf> {
    controls
        .borrow()
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Load(_, p) => Some(p.clone()),
            _ => None,
        })
        .collect()
}
