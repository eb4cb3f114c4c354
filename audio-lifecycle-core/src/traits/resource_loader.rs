use std::path::PathBuf;

use crate::models::error::LoadError;

/// A resolved bundled sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    /// Logical name, e.g. "sound".
    pub name: String,
    pub location: PathBuf,
}

/// Looks up bundled samples by logical name.
pub trait ResourceLoader: Send + Sync {
    /// Resolve `name.extension`, failing with `ResourceNotFound` if absent.
    fn resolve(&self, name: &str, extension: &str) -> Result<ResourceHandle, LoadError>;
}
