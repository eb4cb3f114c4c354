use audio_lifecycle_core::{LoadError, OutputPlayer, PlaybackBackend, PlaybackError, ResourceHandle};

use crate::platform::{PlatformEvent, SharedPlatform};

/// Simulated buffered-sample player factory.
pub struct SimulatedPlayback {
    platform: SharedPlatform,
}

impl SimulatedPlayback {
    pub(crate) fn new(platform: SharedPlatform) -> Self {
        Self { platform }
    }
}

impl PlaybackBackend for SimulatedPlayback {
    type Player = SimulatedPlayer;

    fn open(&mut self, resource: &ResourceHandle) -> Result<SimulatedPlayer, LoadError> {
        let mut s = self.platform.lock();
        match s.resources.get(&resource.name) {
            None => return Err(LoadError::ResourceNotFound(resource.location.display().to_string())),
            Some(false) => {
                return Err(LoadError::DecodeFailed(format!(
                    "{} is not a decodable sample",
                    resource.location.display()
                )))
            }
            Some(true) => {}
        }
        let id = s.register_player(&resource.name);
        Ok(SimulatedPlayer {
            platform: self.platform.clone(),
            id,
            released: false,
        })
    }
}

/// One simulated player bound to the output. Stopping releases it for good.
pub struct SimulatedPlayer {
    platform: SharedPlatform,
    id: u64,
    released: bool,
}

impl SimulatedPlayer {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl OutputPlayer for SimulatedPlayer {
    fn set_volume(&mut self, volume: f32) {
        if let Some(p) = self.platform.lock().player_mut(self.id) {
            p.volume = volume;
        }
    }

    fn prepare(&mut self) -> Result<(), LoadError> {
        Ok(())
    }

    fn rewind(&mut self) {}

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.released {
            return Err(PlaybackError::InvalidState("player released".into()));
        }
        let mut s = self.platform.lock();
        let rate = s.hardware_rate();
        let Some(player) = s.player_mut(self.id) else {
            return Err(PlaybackError::OutputFailed("unknown player".into()));
        };
        player.playing = true;
        player.started_rate = Some(rate);
        s.events.push(PlatformEvent::PlayerStarted { id: self.id });
        Ok(())
    }

    fn stop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let mut s = self.platform.lock();
        if let Some(player) = s.player_mut(self.id) {
            player.playing = false;
            player.open = false;
        }
        s.events.push(PlatformEvent::PlayerStopped { id: self.id });
    }
}
