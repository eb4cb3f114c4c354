use audio_lifecycle_core::{
    CategoryOptions, SessionBackend, SessionConfiguration, SessionError, SessionMode,
};

use crate::platform::{PlatformEvent, SharedPlatform};

/// Simulated process-wide audio session.
pub struct SimulatedSession {
    platform: SharedPlatform,
}

impl SimulatedSession {
    pub(crate) fn new(platform: SharedPlatform) -> Self {
        Self { platform }
    }
}

impl SessionBackend for SimulatedSession {
    fn set_category(&self, config: &SessionConfiguration) -> Result<(), SessionError> {
        let mut s = self.platform.lock();
        if s.faults.reject_category {
            return Err(SessionError::ConfigurationRejected(format!(
                "platform refused {}/{}",
                config.category.as_str(),
                config.mode.as_str()
            )));
        }
        if config.mode == SessionMode::Measurement {
            // Measurement disables automatic gain.
            s.input_gain = 1.0;
        }
        s.config = Some(*config);
        log::debug!(
            "sim session category {}/{} options {}",
            config.category.as_str(),
            config.mode.as_str(),
            config.options
        );
        s.events.push(PlatformEvent::CategorySet {
            category: config.category.as_str().to_string(),
            mode: config.mode.as_str().to_string(),
            options: config.options.raw(),
        });
        Ok(())
    }

    fn set_active(&self, active: bool) -> Result<(), SessionError> {
        let mut s = self.platform.lock();
        if active {
            if s.faults.fail_activation {
                return Err(SessionError::ActivationFailed(
                    "session activation refused by platform".into(),
                ));
            }
            if s.config.is_none() {
                return Err(SessionError::ActivationFailed("no category set".into()));
            }
            if s.active {
                return Ok(());
            }
            let mixes = s
                .config
                .map(|c| c.options.contains(CategoryOptions::MIX_WITH_OTHERS))
                .unwrap_or(false);
            if !mixes {
                // Activating a non-mixable session interrupts other apps.
                s.other_audio_playing = false;
            }
            s.reconfigure(|s| s.active = true);
            log::debug!("sim session active at {} Hz", s.hardware_rate());
            s.events.push(PlatformEvent::SessionActivated);
            return Ok(());
        }

        if s.faults.fail_deactivation {
            return Err(SessionError::ActivationFailed(
                "session deactivation refused by platform".into(),
            ));
        }
        if s.capture_running || s.any_playing() {
            log::warn!("sim session deactivation refused: I/O still running");
            return Err(SessionError::ActivationFailed(
                "deactivating a session with running I/O".into(),
            ));
        }
        if s.active {
            s.reconfigure(|s| s.active = false);
            log::debug!("sim session inactive");
            s.events.push(PlatformEvent::SessionDeactivated);
        }
        Ok(())
    }

    fn sample_rate(&self) -> f64 {
        self.platform.lock().hardware_rate()
    }

    fn input_gain(&self) -> f32 {
        self.platform.lock().input_gain
    }

    fn is_other_audio_playing(&self) -> bool {
        self.platform.lock().other_audio_playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{SimulatedPlatform, ACTIVE_SAMPLE_RATE};
    use approx::assert_relative_eq;

    #[test]
    fn activation_requires_category() {
        let platform = SimulatedPlatform::new();
        let session = platform.session();
        assert!(session.set_active(true).is_err());

        session.set_category(&SessionConfiguration::default()).unwrap();
        session.set_active(true).unwrap();
        assert_relative_eq!(session.sample_rate(), ACTIVE_SAMPLE_RATE);
    }

    #[test]
    fn non_mixable_activation_interrupts_others() {
        let platform = SimulatedPlatform::new();
        platform.set_other_audio_playing(true);
        let session = platform.session();
        session.set_category(&SessionConfiguration::default()).unwrap();
        session.set_active(true).unwrap();
        assert!(!session.is_other_audio_playing());
    }

    #[test]
    fn deactivation_with_running_capture_fails() {
        let platform = SimulatedPlatform::new();
        let session = platform.session();
        session.set_category(&SessionConfiguration::default()).unwrap();
        session.set_active(true).unwrap();
        platform.state_for_tests().lock().capture_running = true;

        assert!(matches!(
            session.set_active(false),
            Err(SessionError::ActivationFailed(_))
        ));
        assert!(platform.is_session_active());
    }
}
