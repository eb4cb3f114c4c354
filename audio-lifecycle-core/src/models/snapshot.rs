use serde::Serialize;

use super::config::{SessionCategory, SessionMode};
use super::ordering::StartOrdering;
use super::state::{CaptureState, LifecyclePhase, PlaybackState, SessionState};

/// Read-only session readout for presentation pollers.
///
/// Category, mode and options are what this process last applied; sample
/// rate and input gain are read live from the platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub sample_rate: f64,
    pub input_gain: f32,
    pub category: Option<SessionCategory>,
    pub mode: Option<SessionMode>,
    pub category_options: u32,
    pub other_audio_playing: bool,
    pub captured_at: String,
}

impl SessionSnapshot {
    /// Multi-line text in the layout of the on-device debug label.
    pub fn readout(&self) -> String {
        format!(
            "sampleRate : {}\nmode       : {}\ninputGain  : {}\ncategory   : {}\ncat options: {}",
            self.sample_rate,
            self.mode.map(|m| m.as_str()).unwrap_or("-"),
            self.input_gain,
            self.category.map(|c| c.as_str()).unwrap_or("-"),
            self.category_options,
        )
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Coordinator state as seen from outside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleSnapshot {
    pub phase: LifecyclePhase,
    pub ordering: Option<StartOrdering>,
    pub voice_processing: Option<bool>,
    pub cycle_id: Option<String>,
    pub session: SessionState,
    pub capture: CaptureState,
    pub playback: PlaybackState,
    pub can_stop: bool,
    pub chain_reconstructing: bool,
    pub last_error: Option<String>,
}

impl Default for LifecycleSnapshot {
    fn default() -> Self {
        Self {
            phase: LifecyclePhase::Idle,
            ordering: None,
            voice_processing: None,
            cycle_id: None,
            session: SessionState::Inactive,
            capture: CaptureState::Uninitialized,
            playback: PlaybackState::Absent,
            can_stop: false,
            chain_reconstructing: false,
            last_error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionSnapshot {
        SessionSnapshot {
            state: SessionState::Active,
            sample_rate: 48000.0,
            input_gain: 1.0,
            category: Some(SessionCategory::PlayAndRecord),
            mode: Some(SessionMode::Measurement),
            category_options: 8,
            other_audio_playing: false,
            captured_at: "2026-01-01T00:00:00+00:00".into(),
        }
    }

    #[test]
    fn readout_lists_every_field() {
        let text = sample().readout();
        assert!(text.contains("sampleRate : 48000"));
        assert!(text.contains("mode       : measurement"));
        assert!(text.contains("category   : play_and_record"));
        assert!(text.ends_with("cat options: 8"));
    }

    #[test]
    fn json_uses_snake_case_states() {
        let json = sample().to_json().unwrap();
        assert!(json.contains(r#""state":"active""#));
        assert!(json.contains(r#""category":"play_and_record""#));
    }

    #[test]
    fn default_lifecycle_snapshot_is_idle() {
        let snap = LifecycleSnapshot::default();
        assert!(snap.phase.is_idle());
        assert!(!snap.can_stop);
        assert_eq!(snap.playback, PlaybackState::Absent);
    }
}
