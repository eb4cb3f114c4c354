use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::SessionConfiguration;
use crate::models::error::SessionError;
use crate::models::snapshot::SessionSnapshot;
use crate::models::state::SessionState;
use crate::traits::session_backend::SessionBackend;

/// What this process last applied to the shared session.
#[derive(Debug, Clone, Copy)]
struct AppliedSession {
    state: SessionState,
    config: Option<SessionConfiguration>,
}

/// Owns this process's view of the device-wide audio session.
///
/// Category/mode/options must be applied before activation. Changes are
/// observable by every other audio consumer on the device.
pub struct SessionConfigurator<S: SessionBackend> {
    backend: Arc<S>,
    applied: Arc<Mutex<AppliedSession>>,
}

impl<S: SessionBackend> SessionConfigurator<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self {
            backend,
            applied: Arc::new(Mutex::new(AppliedSession {
                state: SessionState::Inactive,
                config: None,
            })),
        }
    }

    pub fn state(&self) -> SessionState {
        self.applied.lock().state
    }

    pub fn applied_configuration(&self) -> Option<SessionConfiguration> {
        self.applied.lock().config
    }

    /// Apply category, mode and options. Transitions: inactive → configuring.
    ///
    /// Reapplying while active is allowed and leaves the session active.
    pub fn configure(&mut self, config: SessionConfiguration) -> Result<(), SessionError> {
        config.validate()?;
        self.backend.set_category(&config)?;

        let mut applied = self.applied.lock();
        applied.config = Some(config);
        if applied.state == SessionState::Inactive {
            applied.state = SessionState::Configuring;
        }
        log::debug!(
            "session configured: category={} mode={} options={}",
            config.category.as_str(),
            config.mode.as_str(),
            config.options
        );
        Ok(())
    }

    /// Activate or deactivate the session.
    ///
    /// `activate(true)` is a no-op when already active. Deactivation always
    /// records the session as inactive, even if the platform reports a
    /// failure; the error is still returned to the caller.
    pub fn activate(&mut self, active: bool) -> Result<(), SessionError> {
        let state = self.state();
        if active {
            match state {
                SessionState::Active => return Ok(()),
                SessionState::Inactive => {
                    return Err(SessionError::InvalidState(
                        "category, mode and routing must be applied before activation".into(),
                    ))
                }
                SessionState::Configuring => {}
            }
            self.backend.set_active(true)?;
            self.applied.lock().state = SessionState::Active;
            log::debug!("session active at {} Hz", self.backend.sample_rate());
            return Ok(());
        }

        if state != SessionState::Active {
            self.applied.lock().state = SessionState::Inactive;
            return Ok(());
        }
        let result = self.backend.set_active(false);
        self.applied.lock().state = SessionState::Inactive;
        result
    }

    /// Cloneable read-only view for pollers.
    pub fn observer(&self) -> SessionObserver<S> {
        SessionObserver {
            backend: Arc::clone(&self.backend),
            applied: Arc::clone(&self.applied),
        }
    }
}

/// Side-effect-free session query handle.
///
/// Never blocks behind a lifecycle transition; safe to poll on a timer.
pub struct SessionObserver<S: SessionBackend> {
    backend: Arc<S>,
    applied: Arc<Mutex<AppliedSession>>,
}

impl<S: SessionBackend> Clone for SessionObserver<S> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            applied: Arc::clone(&self.applied),
        }
    }
}

impl<S: SessionBackend> SessionObserver<S> {
    pub fn state(&self) -> SessionState {
        self.applied.lock().state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let applied = *self.applied.lock();
        SessionSnapshot {
            state: applied.state,
            sample_rate: self.backend.sample_rate(),
            input_gain: self.backend.input_gain(),
            category: applied.config.map(|c| c.category),
            mode: applied.config.map(|c| c.mode),
            category_options: applied.config.map(|c| c.options.raw()).unwrap_or(0),
            other_audio_playing: self.backend.is_other_audio_playing(),
            captured_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
