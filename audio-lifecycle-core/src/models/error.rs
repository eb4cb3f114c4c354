use thiserror::Error;

use super::state::TeardownStep;

/// Errors raised by the device-wide audio session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("configuration rejected: {0}")]
    ConfigurationRejected(String),

    #[error("activation failed: {0}")]
    ActivationFailed(String),

    #[error("invalid session state: {0}")]
    InvalidState(String),
}

/// Errors raised by the input capture graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("invalid capture state: {0}")]
    InvalidState(String),

    #[error("capture graph setup failed: {0}")]
    SetupFailed(String),

    #[error("voice processing unsupported: {0}")]
    VoiceProcessingUnsupported(String),

    #[error("capture start failed: {0}")]
    StartFailed(String),

    #[error("audio chain is being reconstructed")]
    ChainReconstructing,

    #[error("capture teardown failed: {0}")]
    TeardownFailed(String),
}

/// Errors raised while resolving or opening a playback sample.
///
/// Always recoverable: the caller may retry with a different resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("decode failed: {0}")]
    DecodeFailed(String),
}

/// Errors raised by a loaded playback unit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("invalid playback state: {0}")]
    InvalidState(String),

    #[error("output failed: {0}")]
    OutputFailed(String),
}

/// A single teardown step that could not be completed cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownFailure {
    pub step: TeardownStep,
    pub message: String,
}

/// Outcome of a stop request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopReport {
    /// Steps that actually had something to release, in execution order.
    pub performed: Vec<TeardownStep>,
    pub failures: Vec<TeardownFailure>,
}

impl StopReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record(&mut self, step: TeardownStep, result: Result<(), String>) {
        self.performed.push(step);
        if let Err(message) = result {
            log::warn!("teardown step {:?} failed: {}", step, message);
            self.failures.push(TeardownFailure { step, message });
        }
    }
}

/// Errors surfaced by the lifecycle coordinator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("session configuration rejected: {0}")]
    Configuration(String),

    #[error("session activation failed: {0}")]
    Activation(String),

    #[error("capture setup failed: {0}")]
    CaptureSetup(CaptureError),

    #[error("playback load failed: {0}")]
    Load(#[from] LoadError),

    #[error("playback failed: {0}")]
    Playback(#[from] PlaybackError),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("teardown incomplete: {} step(s) failed", .0.failures.len())]
    Teardown(StopReport),
}

impl LifecycleError {
    /// Load errors may be retried with a different resource; everything
    /// else is fatal for the attempt.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Load(_))
    }
}

impl From<SessionError> for LifecycleError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::ConfigurationRejected(msg) => Self::Configuration(msg),
            SessionError::ActivationFailed(msg) => Self::Activation(msg),
            SessionError::InvalidState(msg) => Self::InvalidState(msg),
        }
    }
}

impl From<CaptureError> for LifecycleError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::InvalidState(msg) => Self::InvalidState(msg),
            other => Self::CaptureSetup(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_map_to_taxonomy() {
        let cfg: LifecycleError = SessionError::ConfigurationRejected("bad mode".into()).into();
        assert!(matches!(cfg, LifecycleError::Configuration(_)));

        let act: LifecycleError = SessionError::ActivationFailed("busy".into()).into();
        assert!(matches!(act, LifecycleError::Activation(_)));
    }

    #[test]
    fn capture_invalid_state_is_not_a_setup_error() {
        let err: LifecycleError = CaptureError::InvalidState("running".into()).into();
        assert!(matches!(err, LifecycleError::InvalidState(_)));

        let err: LifecycleError = CaptureError::ChainReconstructing.into();
        assert_eq!(err, LifecycleError::CaptureSetup(CaptureError::ChainReconstructing));
    }

    #[test]
    fn only_load_errors_are_recoverable() {
        assert!(LifecycleError::from(LoadError::ResourceNotFound("x".into())).is_recoverable());
        assert!(!LifecycleError::Activation("busy".into()).is_recoverable());
        assert!(!LifecycleError::Teardown(StopReport::default()).is_recoverable());
    }

    #[test]
    fn teardown_display_counts_failures() {
        let mut report = StopReport::default();
        report.record(TeardownStep::StopPlayback, Ok(()));
        report.record(TeardownStep::DeactivateSession, Err("in use".into()));

        assert!(!report.is_clean());
        assert_eq!(report.performed.len(), 2);
        let msg = LifecycleError::Teardown(report).to_string();
        assert_eq!(msg, "teardown incomplete: 1 step(s) failed");
    }
}
