use crate::models::config::SessionConfiguration;
use crate::models::error::SessionError;

/// Interface to the platform's process-wide audio session.
///
/// The session is shared with every other audio consumer on the device, so
/// implementations take `&self` and synchronize internally. Implemented by:
/// - `SimulatedSession` (audio-lifecycle-sim)
pub trait SessionBackend: Send + Sync {
    /// Apply category, mode and options. Does not activate.
    fn set_category(&self, config: &SessionConfiguration) -> Result<(), SessionError>;

    /// Activate or deactivate the session.
    fn set_active(&self, active: bool) -> Result<(), SessionError>;

    /// Current hardware sample rate in Hz.
    fn sample_rate(&self) -> f64;

    /// Current input gain, 0.0–1.0.
    fn input_gain(&self) -> f32;

    /// Whether another process currently holds audio output.
    fn is_other_audio_playing(&self) -> bool;
}
