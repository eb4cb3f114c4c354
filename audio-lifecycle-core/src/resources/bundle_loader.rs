use std::path::PathBuf;

use crate::models::error::LoadError;
use crate::traits::resource_loader::{ResourceHandle, ResourceLoader};

/// Resolves bundled samples as `<root>/<name>.<extension>` on disk.
#[derive(Debug, Clone)]
pub struct BundleDirectoryLoader {
    root: PathBuf,
}

impl BundleDirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceLoader for BundleDirectoryLoader {
    fn resolve(&self, name: &str, extension: &str) -> Result<ResourceHandle, LoadError> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(LoadError::ResourceNotFound(format!(
                "invalid resource name: {:?}",
                name
            )));
        }

        let location = self.root.join(format!("{}.{}", name, extension));
        if !location.is_file() {
            return Err(LoadError::ResourceNotFound(location.display().to_string()));
        }

        Ok(ResourceHandle {
            name: name.to_string(),
            location,
        })
    }
}
