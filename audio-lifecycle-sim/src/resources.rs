use std::path::PathBuf;

use audio_lifecycle_core::{LoadError, ResourceHandle, ResourceLoader};

use crate::platform::SharedPlatform;

/// Resolves names against the samples registered on the platform.
pub struct SimulatedLoader {
    platform: SharedPlatform,
}

impl SimulatedLoader {
    pub(crate) fn new(platform: SharedPlatform) -> Self {
        Self { platform }
    }
}

impl ResourceLoader for SimulatedLoader {
    fn resolve(&self, name: &str, extension: &str) -> Result<ResourceHandle, LoadError> {
        let file = format!("{}.{}", name, extension);
        if !self.platform.lock().resources.contains_key(name) {
            return Err(LoadError::ResourceNotFound(file));
        }
        Ok(ResourceHandle {
            name: name.to_string(),
            location: PathBuf::from("bundle").join(file),
        })
    }
}
