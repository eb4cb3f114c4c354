pub mod capture_backend;
pub mod lifecycle_delegate;
pub mod playback_backend;
pub mod resource_loader;
pub mod session_backend;
