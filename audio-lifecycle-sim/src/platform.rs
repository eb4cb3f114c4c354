//! Shared state of the simulated device.
//!
//! Every simulated backend holds a clone of the same `Arc<Mutex<_>>`, the
//! way real backends all talk to one process-wide audio server.
//!
//! Sample-rate model:
//! ```text
//! session inactive                 → 44100 Hz
//! session active                   → 48000 Hz
//! voice-processing graph allocated → 24000 Hz (until released)
//! ```
//! A player records the rate it was opened and started at, and is flagged
//! when the hardware rate moves while it is playing.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use audio_lifecycle_core::SessionConfiguration;

use crate::capture::SimulatedCapture;
use crate::playback::SimulatedPlayback;
use crate::resources::SimulatedLoader;
use crate::session::SimulatedSession;

pub const INACTIVE_SAMPLE_RATE: f64 = 44100.0;
pub const ACTIVE_SAMPLE_RATE: f64 = 48000.0;
pub const VOICE_PROCESSING_SAMPLE_RATE: f64 = 24000.0;

/// Failures to inject into the simulated platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultPlan {
    pub reject_category: bool,
    pub fail_activation: bool,
    pub fail_deactivation: bool,
    pub voice_processing_unsupported: bool,
    pub fail_capture_start: bool,
}

/// Everything the simulated platform did, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum PlatformEvent {
    CategorySet { category: String, mode: String, options: u32 },
    SessionActivated,
    SessionDeactivated,
    GraphBuilt { voice_processing: bool },
    CaptureStarted,
    CaptureStopped,
    GraphReleased,
    PlayerOpened { id: u64, name: String },
    PlayerStarted { id: u64 },
    PlayerStopped { id: u64 },
    SampleRateChanged { from: f64, to: f64 },
}

/// What happened to one simulated player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerReport {
    pub id: u64,
    pub name: String,
    pub opened_rate: f64,
    pub started_rate: Option<f64>,
    pub volume: f32,
    pub rate_changed_while_playing: bool,
    pub open: bool,
    pub playing: bool,
}

#[derive(Debug)]
pub(crate) struct PlatformState {
    pub faults: FaultPlan,
    pub events: Vec<PlatformEvent>,
    pub config: Option<SessionConfiguration>,
    pub active: bool,
    /// `Some(voice_processing)` while a capture graph is allocated.
    pub graph: Option<bool>,
    pub capture_running: bool,
    pub reconstructing: bool,
    pub input_gain: f32,
    pub other_audio_playing: bool,
    pub players: Vec<PlayerReport>,
    pub max_concurrent_players: usize,
    /// Registered samples and whether they decode.
    pub resources: HashMap<String, bool>,
    next_player_id: u64,
}

impl PlatformState {
    fn new() -> Self {
        Self {
            faults: FaultPlan::default(),
            events: Vec::new(),
            config: None,
            active: false,
            graph: None,
            capture_running: false,
            reconstructing: false,
            input_gain: 1.0,
            other_audio_playing: false,
            players: Vec::new(),
            max_concurrent_players: 0,
            resources: HashMap::new(),
            next_player_id: 1,
        }
    }

    pub fn hardware_rate(&self) -> f64 {
        if self.graph == Some(true) {
            VOICE_PROCESSING_SAMPLE_RATE
        } else if self.active {
            ACTIVE_SAMPLE_RATE
        } else {
            INACTIVE_SAMPLE_RATE
        }
    }

    /// Apply a change that may move the hardware rate, flagging any player
    /// that was playing across the change.
    pub fn reconfigure<F: FnOnce(&mut Self)>(&mut self, change: F) {
        let before = self.hardware_rate();
        change(self);
        let after = self.hardware_rate();
        if before != after {
            self.events.push(PlatformEvent::SampleRateChanged { from: before, to: after });
            for player in self.players.iter_mut().filter(|p| p.playing) {
                player.rate_changed_while_playing = true;
            }
        }
    }

    pub fn open_players(&self) -> usize {
        self.players.iter().filter(|p| p.open).count()
    }

    pub fn any_playing(&self) -> bool {
        self.players.iter().any(|p| p.playing)
    }

    pub fn register_player(&mut self, name: &str) -> u64 {
        let id = self.next_player_id;
        self.next_player_id += 1;
        let opened_rate = self.hardware_rate();
        self.players.push(PlayerReport {
            id,
            name: name.to_string(),
            opened_rate,
            started_rate: None,
            volume: 1.0,
            rate_changed_while_playing: false,
            open: true,
            playing: false,
        });
        self.max_concurrent_players = self.max_concurrent_players.max(self.open_players());
        self.events.push(PlatformEvent::PlayerOpened {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn player_mut(&mut self, id: u64) -> Option<&mut PlayerReport> {
        self.players.iter_mut().find(|p| p.id == id)
    }
}

pub(crate) type SharedPlatform = Arc<Mutex<PlatformState>>;

/// A deterministic in-process stand-in for a device audio stack.
#[derive(Clone)]
pub struct SimulatedPlatform {
    state: SharedPlatform,
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PlatformState::new())),
        }
    }

    /// Register a bundled sample. Undecodable samples resolve but fail to open.
    pub fn with_resource(self, name: &str, decodable: bool) -> Self {
        self.state.lock().resources.insert(name.to_string(), decodable);
        self
    }

    pub fn set_faults(&self, faults: FaultPlan) {
        self.state.lock().faults = faults;
    }

    pub fn update_faults<F: FnOnce(&mut FaultPlan)>(&self, update: F) {
        update(&mut self.state.lock().faults);
    }

    pub fn begin_chain_reconstruction(&self) {
        self.state.lock().reconstructing = true;
    }

    pub fn end_chain_reconstruction(&self) {
        self.state.lock().reconstructing = false;
    }

    pub fn set_input_gain(&self, gain: f32) {
        self.state.lock().input_gain = gain.clamp(0.0, 1.0);
    }

    /// Simulate another app holding the output.
    pub fn set_other_audio_playing(&self, playing: bool) {
        self.state.lock().other_audio_playing = playing;
    }

    pub fn sample_rate(&self) -> f64 {
        self.state.lock().hardware_rate()
    }

    pub fn is_session_active(&self) -> bool {
        self.state.lock().active
    }

    pub fn has_capture_graph(&self) -> bool {
        self.state.lock().graph.is_some()
    }

    pub fn is_capture_running(&self) -> bool {
        self.state.lock().capture_running
    }

    pub fn open_player_count(&self) -> usize {
        self.state.lock().open_players()
    }

    pub fn max_concurrent_players(&self) -> usize {
        self.state.lock().max_concurrent_players
    }

    pub fn events(&self) -> Vec<PlatformEvent> {
        self.state.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    pub fn players(&self) -> Vec<PlayerReport> {
        self.state.lock().players.clone()
    }

    pub fn last_player(&self) -> Option<PlayerReport> {
        self.state.lock().players.last().cloned()
    }

    pub fn session(&self) -> Arc<SimulatedSession> {
        Arc::new(SimulatedSession::new(Arc::clone(&self.state)))
    }

    pub fn capture(&self) -> SimulatedCapture {
        SimulatedCapture::new(Arc::clone(&self.state))
    }

    pub fn playback(&self) -> SimulatedPlayback {
        SimulatedPlayback::new(Arc::clone(&self.state))
    }

    pub fn loader(&self) -> SimulatedLoader {
        SimulatedLoader::new(Arc::clone(&self.state))
    }

    #[cfg(test)]
    pub(crate) fn state_for_tests(&self) -> &SharedPlatform {
        &self.state
    }
}
