use crate::models::error::{LifecycleError, StopReport};
use crate::models::state::LifecyclePhase;

/// Event delegate for lifecycle notifications.
///
/// Called synchronously on the thread driving the transition. Keep
/// implementations short; marshal to a UI thread if needed.
pub trait LifecycleDelegate: Send + Sync {
    fn on_phase_changed(&self, phase: LifecyclePhase);

    /// Called when a start attempt fails, after rollback.
    fn on_error(&self, error: &LifecycleError);

    /// Called after every stop that released something.
    fn on_stopped(&self, report: &StopReport);
}
