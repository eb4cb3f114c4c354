//! # audio-lifecycle-core
//!
//! Platform-agnostic audio engine lifecycle coordination.
//!
//! Sequences three independently-owned subsystems, the device-wide audio
//! session, an optional voice-processing input capture graph and a one-shot
//! playback source, into a single start/stop protocol. Platform backends
//! implement the traits in `traits/` and plug into the generic
//! `EngineLifecycleCoordinator`.
//!
//! ## Architecture
//!
//! ```text
//! audio-lifecycle-core (this crate)
//! ├── traits/     ← SessionBackend, CaptureBackend, PlaybackBackend, ResourceLoader, LifecycleDelegate
//! ├── models/     ← errors, states, configuration, start orderings, snapshots
//! ├── session/    ← SessionConfigurator, SessionObserver
//! ├── capture/    ← InputCaptureEngine
//! ├── playback/   ← PlaybackUnit
//! ├── resources/  ← BundleDirectoryLoader
//! └── lifecycle/  ← EngineLifecycleCoordinator
//! ```

pub mod capture;
pub mod lifecycle;
pub mod models;
pub mod playback;
pub mod resources;
pub mod session;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export key types at crate root for convenience.
pub use capture::input_engine::InputCaptureEngine;
pub use lifecycle::coordinator::EngineLifecycleCoordinator;
pub use models::config::{
    CategoryOptions, LifecycleConfiguration, SessionCategory, SessionConfiguration, SessionMode,
};
pub use models::error::{
    CaptureError, LifecycleError, LoadError, PlaybackError, SessionError, StopReport,
    TeardownFailure,
};
pub use models::ordering::{StartOrdering, StartRequest, StartStep};
pub use models::snapshot::{LifecycleSnapshot, SessionSnapshot};
pub use models::state::{CaptureState, LifecyclePhase, PlaybackState, SessionState, TeardownStep};
pub use playback::unit::PlaybackUnit;
pub use resources::bundle_loader::BundleDirectoryLoader;
pub use session::configurator::{SessionConfigurator, SessionObserver};
pub use traits::capture_backend::CaptureBackend;
pub use traits::lifecycle_delegate::LifecycleDelegate;
pub use traits::playback_backend::{OutputPlayer, PlaybackBackend};
pub use traits::resource_loader::{ResourceHandle, ResourceLoader};
pub use traits::session_backend::SessionBackend;
