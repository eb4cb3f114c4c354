use audio_lifecycle_core::{CaptureBackend, CaptureError};

use crate::platform::{PlatformEvent, SharedPlatform};

/// Simulated input-capture graph.
///
/// Building a graph needs an active session whose category records, the
/// same precondition a real input node has.
pub struct SimulatedCapture {
    platform: SharedPlatform,
}

impl SimulatedCapture {
    pub(crate) fn new(platform: SharedPlatform) -> Self {
        Self { platform }
    }
}

impl CaptureBackend for SimulatedCapture {
    fn build_graph(&mut self, voice_processing: bool) -> Result<(), CaptureError> {
        let mut s = self.platform.lock();
        if s.graph.is_some() {
            return Err(CaptureError::SetupFailed("capture graph already allocated".into()));
        }
        let records = s.config.map(|c| c.category.records()).unwrap_or(false);
        if !s.active || !records {
            return Err(CaptureError::SetupFailed(
                "input unavailable: session not active for recording".into(),
            ));
        }
        if voice_processing && s.faults.voice_processing_unsupported {
            return Err(CaptureError::VoiceProcessingUnsupported(
                "no voice-processing I/O unit on this route".into(),
            ));
        }

        s.reconfigure(|s| s.graph = Some(voice_processing));
        log::debug!(
            "sim capture graph built (voice processing: {}) at {} Hz",
            voice_processing,
            s.hardware_rate()
        );
        s.events.push(PlatformEvent::GraphBuilt { voice_processing });
        Ok(())
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        let mut s = self.platform.lock();
        if s.graph.is_none() {
            return Err(CaptureError::StartFailed("no capture graph".into()));
        }
        if s.faults.fail_capture_start {
            return Err(CaptureError::StartFailed("input device refused to start".into()));
        }
        if !s.capture_running {
            s.capture_running = true;
            s.events.push(PlatformEvent::CaptureStarted);
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        let mut s = self.platform.lock();
        if s.capture_running {
            s.capture_running = false;
            s.events.push(PlatformEvent::CaptureStopped);
        }
        Ok(())
    }

    fn release_graph(&mut self) -> Result<(), CaptureError> {
        let mut s = self.platform.lock();
        if s.capture_running {
            s.capture_running = false;
            s.events.push(PlatformEvent::CaptureStopped);
        }
        if s.graph.is_some() {
            s.reconfigure(|s| s.graph = None);
            log::debug!("sim capture graph released");
            s.events.push(PlatformEvent::GraphReleased);
        }
        Ok(())
    }

    fn is_chain_reconstructing(&self) -> bool {
        self.platform.lock().reconstructing
    }
}
