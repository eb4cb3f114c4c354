use crate::models::error::{LoadError, PlaybackError};
use crate::traits::resource_loader::ResourceHandle;

/// A decoded, buffered sample bound to the output device.
pub trait OutputPlayer: Send {
    fn set_volume(&mut self, volume: f32);

    /// Preload buffers so `play` starts without delay.
    fn prepare(&mut self) -> Result<(), LoadError>;

    /// Seek to the start of the sample.
    fn rewind(&mut self);

    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Stop rendering and release the output.
    fn stop(&mut self);
}

/// Interface to the platform's buffered-sample player.
pub trait PlaybackBackend: Send {
    type Player: OutputPlayer;

    /// Open and decode the sample. Fails with `DecodeFailed` if the file
    /// exists but cannot be decoded.
    fn open(&mut self, resource: &ResourceHandle) -> Result<Self::Player, LoadError>;
}
