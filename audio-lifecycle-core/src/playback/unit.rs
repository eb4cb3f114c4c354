use crate::models::error::{LoadError, PlaybackError};
use crate::models::state::PlaybackState;
use crate::traits::playback_backend::{OutputPlayer, PlaybackBackend};
use crate::traits::resource_loader::ResourceHandle;

/// A single one-shot buffered playback source.
///
/// Once stopped the unit has released the output and cannot play again;
/// create a fresh one instead. Dropping a unit stops it.
pub struct PlaybackUnit<P: OutputPlayer> {
    player: P,
    resource: ResourceHandle,
    state: PlaybackState,
}

impl<P: OutputPlayer> PlaybackUnit<P> {
    /// Open, set volume and prepare the sample. No unit is produced on failure.
    pub fn create<B>(
        backend: &mut B,
        resource: ResourceHandle,
        volume: f32,
    ) -> Result<Self, LoadError>
    where
        B: PlaybackBackend<Player = P>,
    {
        let mut player = backend.open(&resource)?;
        player.set_volume(volume);
        if let Err(e) = player.prepare() {
            player.stop();
            return Err(e);
        }
        log::debug!("playback source loaded: {}", resource.location.display());
        Ok(Self {
            player,
            resource,
            state: PlaybackState::Loaded,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn resource(&self) -> &ResourceHandle {
        &self.resource
    }

    /// Play from the beginning, restarting if already playing.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if self.state == PlaybackState::Stopped {
            return Err(PlaybackError::InvalidState(format!(
                "playback of {} was stopped; create a new unit",
                self.resource.name
            )));
        }
        self.player.rewind();
        self.player.play()?;
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Stop and release the output. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        self.player.stop();
        self.state = PlaybackState::Stopped;
    }
}

impl<P: OutputPlayer> Drop for PlaybackUnit<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loader, shared, FakePlayback, FakePlayer, Shared};
    use crate::traits::resource_loader::ResourceLoader;
    use std::sync::Arc;

    fn unit() -> (Shared, PlaybackUnit<FakePlayer>) {
        let state = shared();
        let mut backend = FakePlayback(Arc::clone(&state));
        let handle = loader().resolve("sound", "wav").unwrap();
        let unit = PlaybackUnit::create(&mut backend, handle, 1.0).unwrap();
        (state, unit)
    }

    #[test]
    fn create_loads_without_playing() {
        let (fake, unit) = unit();
        assert_eq!(unit.state(), PlaybackState::Loaded);
        assert_eq!(unit.resource().name, "sound");
        assert_eq!(fake.lock().open_players, 1);
    }

    #[test]
    fn play_rewinds_every_time() {
        let (fake, mut unit) = unit();
        unit.play().unwrap();
        unit.play().unwrap();

        assert_eq!(unit.state(), PlaybackState::Playing);
        let rewinds = fake.lock().events.iter().filter(|e| *e == "rewind:sound").count();
        assert_eq!(rewinds, 2);
    }

    #[test]
    fn play_after_stop_is_invalid() {
        let (fake, mut unit) = unit();
        unit.play().unwrap();
        unit.stop();
        unit.stop();

        assert!(matches!(unit.play(), Err(PlaybackError::InvalidState(_))));
        assert_eq!(fake.lock().open_players, 0);
    }

    #[test]
    fn drop_releases_output() {
        let (fake, unit) = unit();
        drop(unit);
        assert_eq!(fake.lock().open_players, 0);
    }

    #[test]
    fn decode_failure_produces_no_unit() {
        let state = shared();
        state.lock().faults.undecodable = true;
        let mut backend = FakePlayback(Arc::clone(&state));
        let handle = loader().resolve("sound", "wav").unwrap();

        let result = PlaybackUnit::create(&mut backend, handle, 1.0);
        assert!(matches!(result, Err(LoadError::DecodeFailed(_))));
        assert_eq!(state.lock().open_players, 0);
    }
}
