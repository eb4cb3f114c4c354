//! # audio-lifecycle-sim
//!
//! Simulated audio platform for audio-lifecycle-core.
//!
//! Provides:
//! - `SimulatedPlatform`: shared device state with fault injection and an event log
//! - `SimulatedSession`, `SimulatedCapture`, `SimulatedPlayback`, `SimulatedLoader`: backend trait implementations
//! - `probe`: runs a start ordering and reports the negotiated sample rate
//!
//! ## Usage
//! ```ignore
//! use audio_lifecycle_core::{LifecycleConfiguration, StartOrdering, StartRequest};
//! use audio_lifecycle_sim::{build_coordinator, SimulatedPlatform};
//!
//! let platform = SimulatedPlatform::new().with_resource("sound", true);
//! let coordinator = build_coordinator(&platform, LifecycleConfiguration::default())?;
//! coordinator.start(StartRequest::new(StartOrdering::PlaybackFirst, true))?;
//! ```

pub mod capture;
pub mod platform;
pub mod playback;
pub mod probe;
pub mod resources;
pub mod session;

pub use capture::SimulatedCapture;
pub use platform::{FaultPlan, PlatformEvent, PlayerReport, SimulatedPlatform};
pub use playback::{SimulatedPlayback, SimulatedPlayer};
pub use probe::{build_coordinator, run_probe, run_probe_with, ProbeError, ProbeReport, SimCoordinator};
pub use resources::SimulatedLoader;
pub use session::SimulatedSession;
