use serde::Serialize;

/// Device-wide session activation state.
///
/// ```text
/// inactive → configuring → active
///     ↑_________________________|
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Inactive,
    /// Category, mode and options applied; not yet active.
    Configuring,
    Active,
}

/// Input capture graph state.
///
/// State transitions:
/// ```text
/// uninitialized → configured → running ↔ stopped
///       ↑______________________________________| (tear_down)
/// ```
/// The voice-processing flag is fixed from `Configured` until `tear_down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CaptureState {
    Uninitialized,
    Configured { voice_processing: bool },
    Running { voice_processing: bool },
    Stopped { voice_processing: bool },
}

impl CaptureState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    /// The voice-processing flag of the current cycle, if a graph exists.
    pub fn voice_processing(&self) -> Option<bool> {
        match self {
            Self::Uninitialized => None,
            Self::Configured { voice_processing }
            | Self::Running { voice_processing }
            | Self::Stopped { voice_processing } => Some(*voice_processing),
        }
    }
}

/// State of the single playback source slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Absent,
    Loaded,
    Playing,
    /// Output released; the unit must be replaced before playing again.
    Stopped,
}

/// Coordinator-level phase, derived from the component states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    Idle,
    Starting,
    Running,
    /// Session and capture are running, playback failed to load.
    AwaitingPlayback,
    Stopping,
}

impl LifecyclePhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a stop request would release anything.
    pub fn is_stop_available(&self) -> bool {
        matches!(self, Self::Running | Self::AwaitingPlayback)
    }
}

/// Teardown steps, in the order a stop executes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownStep {
    StopPlayback,
    StopCapture,
    TearDownCapture,
    DeactivateSession,
}
