//! Runs a start ordering against the simulated platform and reports what
//! the session negotiated.

use serde::Serialize;
use thiserror::Error;

use audio_lifecycle_core::{
    EngineLifecycleCoordinator, LifecycleConfiguration, LifecycleError, LifecyclePhase,
    SessionSnapshot, StartOrdering, StartRequest,
};

use crate::capture::SimulatedCapture;
use crate::platform::{PlatformEvent, PlayerReport, SimulatedPlatform};
use crate::playback::SimulatedPlayback;
use crate::resources::SimulatedLoader;
use crate::session::SimulatedSession;

/// Coordinator wired to the simulated platform.
pub type SimCoordinator =
    EngineLifecycleCoordinator<SimulatedSession, SimulatedCapture, SimulatedPlayback, SimulatedLoader>;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

pub fn build_coordinator(
    platform: &SimulatedPlatform,
    config: LifecycleConfiguration,
) -> Result<SimCoordinator, LifecycleError> {
    EngineLifecycleCoordinator::new(
        platform.session(),
        platform.capture(),
        platform.playback(),
        platform.loader(),
        config,
    )
}

/// Result of one probe run.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub ordering: StartOrdering,
    pub voice_processing: bool,
    pub phase: LifecyclePhase,
    pub start_error: Option<String>,
    /// Session readout while running (or after the failed start).
    pub session: SessionSnapshot,
    pub player: Option<PlayerReport>,
    /// Player opened at a different rate than it started at.
    pub opened_at_stale_rate: bool,
    pub max_concurrent_players: usize,
    pub stop_clean: bool,
    pub events: Vec<PlatformEvent>,
}

impl ProbeReport {
    pub fn summary(&self) -> String {
        let player = match &self.player {
            Some(p) => format!(
                "player opened@{} started@{} rate-changed-while-playing={}",
                p.opened_rate,
                p.started_rate.map(|r| r.to_string()).unwrap_or_else(|| "-".into()),
                p.rate_changed_while_playing
            ),
            None => "no player".into(),
        };
        format!(
            "{:<34} vp={:<5} phase={:?} rate={} {} stale-open={}{}",
            self.ordering.as_str(),
            self.voice_processing,
            self.phase,
            self.session.sample_rate,
            player,
            self.opened_at_stale_rate,
            self.start_error
                .as_ref()
                .map(|e| format!(" error=\"{}\"", e))
                .unwrap_or_default()
        )
    }
}

/// Start `ordering`, let `hold` observe the running coordinator, then stop.
pub fn run_probe_with<F>(
    platform: &SimulatedPlatform,
    config: LifecycleConfiguration,
    request: StartRequest,
    hold: F,
) -> Result<ProbeReport, ProbeError>
where
    F: FnOnce(&SimCoordinator),
{
    let coordinator = build_coordinator(platform, config)?;
    platform.clear_events();

    let ordering = request.ordering;
    let voice_processing = ordering.effective_voice_processing(request.voice_processing);
    let start_error = coordinator.start(request).err().map(|e| e.to_string());

    let phase = coordinator.phase();
    let session = coordinator.session_observer().snapshot();
    if start_error.is_none() {
        hold(&coordinator);
    }

    let stop_clean = coordinator.stop().is_ok();
    let player = platform.last_player();
    let opened_at_stale_rate = player
        .as_ref()
        .and_then(|p| p.started_rate.map(|r| r != p.opened_rate))
        .unwrap_or(false);

    Ok(ProbeReport {
        ordering,
        voice_processing,
        phase,
        start_error,
        session,
        player,
        opened_at_stale_rate,
        max_concurrent_players: platform.max_concurrent_players(),
        stop_clean,
        events: platform.events(),
    })
}

pub fn run_probe(
    platform: &SimulatedPlatform,
    config: LifecycleConfiguration,
    request: StartRequest,
) -> Result<ProbeReport, ProbeError> {
    run_probe_with(platform, config, request, |_| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{ACTIVE_SAMPLE_RATE, VOICE_PROCESSING_SAMPLE_RATE};
    use approx::assert_relative_eq;

    fn platform() -> SimulatedPlatform {
        SimulatedPlatform::new().with_resource("sound", true)
    }

    #[test]
    fn playback_first_plays_across_rate_changes() {
        let report = run_probe(
            &platform(),
            LifecycleConfiguration::default(),
            StartRequest::new(StartOrdering::PlaybackFirst, true),
        )
        .unwrap();

        assert_eq!(report.phase, LifecyclePhase::Running);
        assert_relative_eq!(report.session.sample_rate, VOICE_PROCESSING_SAMPLE_RATE);
        assert!(report.player.unwrap().rate_changed_while_playing);
        assert!(report.stop_clean);
    }

    #[test]
    fn capture_first_opens_at_negotiated_rate() {
        let report = run_probe(
            &platform(),
            LifecycleConfiguration::default(),
            StartRequest::new(StartOrdering::CaptureFirstThenPlay, true),
        )
        .unwrap();

        let player = report.player.clone().unwrap();
        assert_relative_eq!(player.opened_rate, VOICE_PROCESSING_SAMPLE_RATE);
        assert!(!player.rate_changed_while_playing);
        assert!(!report.opened_at_stale_rate);
    }

    #[test]
    fn interleaved_opens_at_stale_rate() {
        let report = run_probe(
            &platform(),
            LifecycleConfiguration::default(),
            StartRequest::new(StartOrdering::CaptureFirstInterleaved, true),
        )
        .unwrap();

        assert!(report.opened_at_stale_rate);
        assert!(!report.player.unwrap().rate_changed_while_playing);
    }

    #[test]
    fn no_voice_processing_keeps_session_rate() {
        let report = run_probe(
            &platform(),
            LifecycleConfiguration::default(),
            StartRequest::new(StartOrdering::CaptureOnlyNoVoiceProcessing, true),
        )
        .unwrap();

        assert!(!report.voice_processing);
        assert_relative_eq!(report.session.sample_rate, ACTIVE_SAMPLE_RATE);
        assert!(!report.opened_at_stale_rate);
        assert!(report.summary().contains("capture-only-no-voice-processing"));
    }

    #[test]
    fn failed_start_is_reported_not_raised() {
        let platform = platform();
        platform.update_faults(|f| f.fail_activation = true);

        let report = run_probe(
            &platform,
            LifecycleConfiguration::default(),
            StartRequest::new(StartOrdering::PlaybackFirst, true),
        )
        .unwrap();

        assert_eq!(report.phase, LifecyclePhase::Idle);
        assert!(report.start_error.is_some());
        assert!(report.summary().contains("error="));
    }

    #[test]
    fn hold_sees_running_coordinator() {
        let mut seen = None;
        run_probe_with(
            &platform(),
            LifecycleConfiguration::default(),
            StartRequest::new(StartOrdering::CaptureFirstThenPlay, false),
            |c| seen = Some(c.snapshot().phase),
        )
        .unwrap();
        assert_eq!(seen, Some(LifecyclePhase::Running));
    }
}
