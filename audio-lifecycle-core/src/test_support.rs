//! Recording fakes for unit tests.

use std::path::PathBuf;
use std::sync::{Arc, Barrier};

use parking_lot::Mutex;

use crate::models::config::SessionConfiguration;
use crate::models::error::{CaptureError, LoadError, PlaybackError, SessionError};
use crate::traits::capture_backend::CaptureBackend;
use crate::traits::playback_backend::{OutputPlayer, PlaybackBackend};
use crate::traits::resource_loader::{ResourceHandle, ResourceLoader};
use crate::traits::session_backend::SessionBackend;

#[derive(Debug, Default)]
pub(crate) struct Faults {
    pub reject_category: bool,
    pub fail_activation: bool,
    pub fail_deactivation: bool,
    pub fail_build: bool,
    pub fail_start: bool,
    pub reconstructing: bool,
    pub undecodable: bool,
}

/// Parks the next session activation until the test releases it.
#[derive(Debug, Clone)]
pub(crate) struct Gate {
    pub entered: Arc<Barrier>,
    pub release: Arc<Barrier>,
}

impl Gate {
    pub fn new() -> Self {
        Self {
            entered: Arc::new(Barrier::new(2)),
            release: Arc::new(Barrier::new(2)),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub faults: Faults,
    pub activation_gate: Option<Gate>,
    pub events: Vec<String>,
    pub active: bool,
    pub graph_built: bool,
    pub capture_running: bool,
    pub open_players: usize,
    pub max_open_players: usize,
}

impl FakeState {
    fn log(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }
}

pub(crate) type Shared = Arc<Mutex<FakeState>>;

pub(crate) struct FakeSession(pub Shared);

impl SessionBackend for FakeSession {
    fn set_category(&self, config: &SessionConfiguration) -> Result<(), SessionError> {
        let mut s = self.0.lock();
        if s.faults.reject_category {
            return Err(SessionError::ConfigurationRejected("fake rejection".into()));
        }
        s.log(format!("set_category:{}", config.category.as_str()));
        Ok(())
    }

    fn set_active(&self, active: bool) -> Result<(), SessionError> {
        let gate = if active {
            self.0.lock().activation_gate.take()
        } else {
            None
        };
        if let Some(gate) = gate {
            gate.entered.wait();
            gate.release.wait();
        }

        let mut s = self.0.lock();
        if active && s.faults.fail_activation {
            return Err(SessionError::ActivationFailed("fake busy".into()));
        }
        if !active && s.faults.fail_deactivation {
            return Err(SessionError::ActivationFailed("fake deactivate".into()));
        }
        s.active = active;
        s.log(format!("set_active:{}", active));
        Ok(())
    }

    fn sample_rate(&self) -> f64 {
        if self.0.lock().active {
            48000.0
        } else {
            44100.0
        }
    }

    fn input_gain(&self) -> f32 {
        0.5
    }

    fn is_other_audio_playing(&self) -> bool {
        false
    }
}

pub(crate) struct FakeCapture(pub Shared);

impl CaptureBackend for FakeCapture {
    fn build_graph(&mut self, voice_processing: bool) -> Result<(), CaptureError> {
        let mut s = self.0.lock();
        if s.faults.fail_build {
            return Err(CaptureError::VoiceProcessingUnsupported("fake".into()));
        }
        s.graph_built = true;
        s.log(format!("build_graph:{}", voice_processing));
        Ok(())
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        let mut s = self.0.lock();
        if s.faults.fail_start {
            return Err(CaptureError::StartFailed("fake".into()));
        }
        s.capture_running = true;
        s.log("capture_start");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        let mut s = self.0.lock();
        s.capture_running = false;
        s.log("capture_stop");
        Ok(())
    }

    fn release_graph(&mut self) -> Result<(), CaptureError> {
        let mut s = self.0.lock();
        s.graph_built = false;
        s.log("release_graph");
        Ok(())
    }

    fn is_chain_reconstructing(&self) -> bool {
        self.0.lock().faults.reconstructing
    }
}

pub(crate) struct FakePlayer {
    shared: Shared,
    name: String,
    released: bool,
}

impl OutputPlayer for FakePlayer {
    fn set_volume(&mut self, _volume: f32) {}

    fn prepare(&mut self) -> Result<(), LoadError> {
        Ok(())
    }

    fn rewind(&mut self) {
        self.shared.lock().log(format!("rewind:{}", self.name));
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.shared.lock().log(format!("play:{}", self.name));
        Ok(())
    }

    fn stop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let mut s = self.shared.lock();
        s.open_players -= 1;
        s.log(format!("player_stop:{}", self.name));
    }
}

pub(crate) struct FakePlayback(pub Shared);

impl PlaybackBackend for FakePlayback {
    type Player = FakePlayer;

    fn open(&mut self, resource: &ResourceHandle) -> Result<FakePlayer, LoadError> {
        let mut s = self.0.lock();
        if s.faults.undecodable {
            return Err(LoadError::DecodeFailed(resource.name.clone()));
        }
        s.open_players += 1;
        s.max_open_players = s.max_open_players.max(s.open_players);
        s.log(format!("open:{}", resource.name));
        Ok(FakePlayer {
            shared: Arc::clone(&self.0),
            name: resource.name.clone(),
            released: false,
        })
    }
}

pub(crate) struct FakeLoader {
    pub known: Vec<String>,
}

impl ResourceLoader for FakeLoader {
    fn resolve(&self, name: &str, extension: &str) -> Result<ResourceHandle, LoadError> {
        if self.known.iter().any(|k| k == name) {
            Ok(ResourceHandle {
                name: name.to_string(),
                location: PathBuf::from(format!("{}.{}", name, extension)),
            })
        } else {
            Err(LoadError::ResourceNotFound(format!("{}.{}", name, extension)))
        }
    }
}

pub(crate) fn shared() -> Shared {
    Arc::new(Mutex::new(FakeState::default()))
}

pub(crate) fn loader() -> FakeLoader {
    FakeLoader {
        known: vec!["sound".into(), "click".into()],
    }
}
