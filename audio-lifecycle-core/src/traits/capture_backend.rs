use crate::models::error::CaptureError;

/// Interface to the platform input-capture graph.
///
/// The graph pulls audio on its own platform thread; these calls only
/// build, start, stop and release it.
pub trait CaptureBackend: Send {
    /// Allocate the input graph. With `voice_processing` the hardware
    /// echo-cancelling path is used instead of plain capture.
    fn build_graph(&mut self, voice_processing: bool) -> Result<(), CaptureError>;

    /// Start pulling audio from the input device.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop pulling audio. The graph stays allocated.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Release everything `build_graph` allocated.
    fn release_graph(&mut self) -> Result<(), CaptureError>;

    /// True while the platform is rebuilding the audio chain (route change,
    /// media services reset).
    fn is_chain_reconstructing(&self) -> bool;
}
