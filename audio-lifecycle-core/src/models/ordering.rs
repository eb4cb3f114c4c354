use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One step of a start protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartStep {
    /// Resolve and open the playback sample.
    CreatePlayback,
    /// Rewind and play the loaded sample.
    PlayPlayback,
    /// Configure + activate the session, then set up and start capture.
    StartEngine,
}

/// The start orderings under test.
///
/// Each converges on the same running state; they differ only in whether
/// session/capture initialization happens before or after playback begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartOrdering {
    PlaybackFirst,
    CaptureFirstThenPlay,
    CaptureFirstInterleaved,
    CaptureOnlyNoVoiceProcessing,
}

impl StartOrdering {
    pub const ALL: [StartOrdering; 4] = [
        Self::PlaybackFirst,
        Self::CaptureFirstThenPlay,
        Self::CaptureFirstInterleaved,
        Self::CaptureOnlyNoVoiceProcessing,
    ];

    pub fn steps(&self) -> &'static [StartStep] {
        use StartStep::*;
        match self {
            Self::PlaybackFirst => &[CreatePlayback, PlayPlayback, StartEngine],
            Self::CaptureFirstThenPlay => &[StartEngine, CreatePlayback, PlayPlayback],
            Self::CaptureFirstInterleaved => &[CreatePlayback, StartEngine, PlayPlayback],
            Self::CaptureOnlyNoVoiceProcessing => &[StartEngine, CreatePlayback, PlayPlayback],
        }
    }

    /// Voice processing actually used for a requested flag.
    pub fn effective_voice_processing(&self, requested: bool) -> bool {
        match self {
            Self::CaptureOnlyNoVoiceProcessing => false,
            _ => requested,
        }
    }

    /// Whether the engine is confirmed running before any playback step.
    pub fn plays_after_capture(&self) -> bool {
        self.steps().first() == Some(&StartStep::StartEngine)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlaybackFirst => "playback-first",
            Self::CaptureFirstThenPlay => "capture-first-then-play",
            Self::CaptureFirstInterleaved => "capture-first-interleaved",
            Self::CaptureOnlyNoVoiceProcessing => "capture-only-no-voice-processing",
        }
    }
}

impl fmt::Display for StartOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| format!("unknown ordering: {}", s))
    }
}

/// A start request: which ordering, with or without voice processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub ordering: StartOrdering,
    pub voice_processing: bool,
    /// Overrides the configured resource name for this attempt.
    pub resource: Option<String>,
}

impl StartRequest {
    pub fn new(ordering: StartOrdering, voice_processing: bool) -> Self {
        Self {
            ordering,
            voice_processing,
            resource: None,
        }
    }

    pub fn with_resource(mut self, name: impl Into<String>) -> Self {
        self.resource = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_ordering_runs_each_step_once() {
        for ordering in StartOrdering::ALL {
            let steps = ordering.steps();
            assert_eq!(steps.len(), 3, "{}", ordering);
            let create = steps.iter().position(|s| *s == StartStep::CreatePlayback);
            let play = steps.iter().position(|s| *s == StartStep::PlayPlayback);
            assert!(create < play, "{} plays before creating", ordering);
            assert!(steps.contains(&StartStep::StartEngine));
        }
    }

    #[test]
    fn no_voice_processing_ordering_forces_flag_off() {
        assert!(!StartOrdering::CaptureOnlyNoVoiceProcessing.effective_voice_processing(true));
        assert!(StartOrdering::PlaybackFirst.effective_voice_processing(true));
    }

    #[test]
    fn playback_last_orderings() {
        assert!(StartOrdering::CaptureFirstThenPlay.plays_after_capture());
        assert!(StartOrdering::CaptureOnlyNoVoiceProcessing.plays_after_capture());
        assert!(!StartOrdering::PlaybackFirst.plays_after_capture());
        assert!(!StartOrdering::CaptureFirstInterleaved.plays_after_capture());
    }

    #[test]
    fn parses_display_names() {
        for ordering in StartOrdering::ALL {
            assert_eq!(ordering.to_string().parse::<StartOrdering>(), Ok(ordering));
        }
        assert!("sideways".parse::<StartOrdering>().is_err());
    }
}
