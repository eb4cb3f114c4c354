use crate::models::error::CaptureError;
use crate::models::state::CaptureState;
use crate::traits::capture_backend::CaptureBackend;

/// Owns the optional input-capture graph.
///
/// `setup` runs once per cycle and fixes the voice-processing flag until
/// `tear_down`; the platform does not support switching it mid-flight.
pub struct InputCaptureEngine<C: CaptureBackend> {
    backend: C,
    state: CaptureState,
}

impl<C: CaptureBackend> InputCaptureEngine<C> {
    pub fn new(backend: C) -> Self {
        Self {
            backend,
            state: CaptureState::Uninitialized,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_chain_reconstructing(&self) -> bool {
        self.backend.is_chain_reconstructing()
    }

    /// Build the capture graph. Transitions: uninitialized → configured.
    pub fn setup(&mut self, voice_processing: bool) -> Result<(), CaptureError> {
        if !self.state.is_uninitialized() {
            return Err(CaptureError::InvalidState(format!(
                "setup requires an uninitialized graph, current state {:?}",
                self.state
            )));
        }

        self.backend.build_graph(voice_processing)?;
        self.state = CaptureState::Configured { voice_processing };
        log::debug!("capture graph built (voice processing: {})", voice_processing);
        Ok(())
    }

    /// Start capture. Transitions: configured/stopped → running.
    ///
    /// Returns success without touching the graph when already running.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        let voice_processing = match self.state {
            CaptureState::Running { .. } => return Ok(()),
            CaptureState::Uninitialized => {
                return Err(CaptureError::InvalidState(
                    "start requires a configured graph".into(),
                ))
            }
            CaptureState::Configured { voice_processing }
            | CaptureState::Stopped { voice_processing } => voice_processing,
        };

        if self.backend.is_chain_reconstructing() {
            return Err(CaptureError::ChainReconstructing);
        }

        self.backend.start()?;
        self.state = CaptureState::Running { voice_processing };
        log::debug!("capture running");
        Ok(())
    }

    /// Stop capture. Transitions: running → stopped; no-op otherwise.
    ///
    /// The state advances even if the backend reports a failure.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        let CaptureState::Running { voice_processing } = self.state else {
            return Ok(());
        };
        self.state = CaptureState::Stopped { voice_processing };
        self.backend.stop()
    }

    /// Release the graph. The only way back to uninitialized; safe to call
    /// repeatedly. Stops a running graph first.
    pub fn tear_down(&mut self) -> Result<(), CaptureError> {
        if self.state.is_uninitialized() {
            return Ok(());
        }
        let stop_result = self.stop();
        let release_result = self.backend.release_graph();
        self.state = CaptureState::Uninitialized;
        log::debug!("capture graph released");
        stop_result.and(release_result)
    }
}
