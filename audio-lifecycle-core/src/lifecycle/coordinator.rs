use std::sync::Arc;

use parking_lot::Mutex;

use crate::capture::input_engine::InputCaptureEngine;
use crate::models::config::LifecycleConfiguration;
use crate::models::error::{LifecycleError, PlaybackError, StopReport};
use crate::models::ordering::{StartOrdering, StartRequest, StartStep};
use crate::models::snapshot::LifecycleSnapshot;
use crate::models::state::{LifecyclePhase, PlaybackState, SessionState, TeardownStep};
use crate::playback::unit::PlaybackUnit;
use crate::session::configurator::{SessionConfigurator, SessionObserver};
use crate::traits::capture_backend::CaptureBackend;
use crate::traits::lifecycle_delegate::LifecycleDelegate;
use crate::traits::playback_backend::PlaybackBackend;
use crate::traits::resource_loader::ResourceLoader;
use crate::traits::session_backend::SessionBackend;

/// Everything a lifecycle transition mutates. Only touched under the
/// coordinator's transition lock.
struct Components<S: SessionBackend, C: CaptureBackend, P: PlaybackBackend, R: ResourceLoader> {
    session: SessionConfigurator<S>,
    capture: InputCaptureEngine<C>,
    playback_backend: P,
    playback: Option<PlaybackUnit<P::Player>>,
    loader: R,
}

impl<S, C, P, R> Components<S, C, P, R>
where
    S: SessionBackend,
    C: CaptureBackend,
    P: PlaybackBackend,
    R: ResourceLoader,
{
    fn holds_resources(&self) -> bool {
        self.playback.is_some()
            || !self.capture.state().is_uninitialized()
            || self.session.state() != SessionState::Inactive
    }

    fn playback_state(&self) -> PlaybackState {
        self.playback
            .as_ref()
            .map(|unit| unit.state())
            .unwrap_or(PlaybackState::Absent)
    }

    /// Configure + activate the session, then set up and start capture.
    fn start_engine(
        &mut self,
        config: &LifecycleConfiguration,
        voice_processing: bool,
    ) -> Result<(), LifecycleError> {
        self.session.configure(config.session)?;
        self.session.activate(true)?;
        self.capture.setup(voice_processing)?;
        self.capture.start()?;
        Ok(())
    }

    /// Replace the playback source with a freshly loaded one.
    ///
    /// A lookup failure leaves any existing unit untouched. The existing
    /// unit is released before the new one is opened so two sources never
    /// hold the output at once.
    fn create_playback(
        &mut self,
        config: &LifecycleConfiguration,
        name: &str,
    ) -> Result<(), LifecycleError> {
        let handle = self.loader.resolve(name, &config.resource_extension)?;
        if let Some(mut previous) = self.playback.take() {
            previous.stop();
        }
        let unit = PlaybackUnit::create(&mut self.playback_backend, handle, config.playback_volume)?;
        self.playback = Some(unit);
        Ok(())
    }

    fn play_playback(&mut self) -> Result<(), LifecycleError> {
        let unit = self.playback.as_mut().ok_or_else(|| {
            PlaybackError::InvalidState("no playback source loaded".into())
        })?;
        unit.play()?;
        Ok(())
    }

    /// Best-effort teardown of whatever subset is held: playback, capture
    /// stop, capture teardown, session deactivation. Every step runs even if
    /// an earlier one failed.
    fn release_all(&mut self) -> StopReport {
        let mut report = StopReport::default();

        if let Some(mut unit) = self.playback.take() {
            unit.stop();
            report.record(TeardownStep::StopPlayback, Ok(()));
        }
        if self.capture.state().is_running() {
            let result = self.capture.stop().map_err(|e| e.to_string());
            report.record(TeardownStep::StopCapture, result);
        }
        if !self.capture.state().is_uninitialized() {
            let result = self.capture.tear_down().map_err(|e| e.to_string());
            report.record(TeardownStep::TearDownCapture, result);
        }
        if self.session.state() != SessionState::Inactive {
            let result = self.session.activate(false).map_err(|e| e.to_string());
            report.record(TeardownStep::DeactivateSession, result);
        }

        report
    }
}

/// Sequences session activation, input capture and playback into a single
/// start/stop protocol.
///
/// Start and stop are serialized: a request arriving mid-transition waits
/// for the transition to reach a stable phase. Status queries and the
/// session observer never wait on a transition.
///
/// Delegate callbacks run while the transition lock is held and must not
/// call `start`, `stop` or `retry_playback`.
pub struct EngineLifecycleCoordinator<S, C, P, R>
where
    S: SessionBackend,
    C: CaptureBackend,
    P: PlaybackBackend,
    R: ResourceLoader,
{
    config: LifecycleConfiguration,
    components: Mutex<Components<S, C, P, R>>,
    status: Arc<Mutex<LifecycleSnapshot>>,
    observer: SessionObserver<S>,
    delegate: Option<Arc<dyn LifecycleDelegate>>,
}

impl<S, C, P, R> EngineLifecycleCoordinator<S, C, P, R>
where
    S: SessionBackend,
    C: CaptureBackend,
    P: PlaybackBackend,
    R: ResourceLoader,
{
    pub fn new(
        session: Arc<S>,
        capture: C,
        playback: P,
        loader: R,
        config: LifecycleConfiguration,
    ) -> Result<Self, LifecycleError> {
        config.validate().map_err(LifecycleError::Configuration)?;

        let session = SessionConfigurator::new(session);
        let observer = session.observer();
        Ok(Self {
            config,
            components: Mutex::new(Components {
                session,
                capture: InputCaptureEngine::new(capture),
                playback_backend: playback,
                playback: None,
                loader,
            }),
            status: Arc::new(Mutex::new(LifecycleSnapshot::default())),
            observer,
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn LifecycleDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn configuration(&self) -> &LifecycleConfiguration {
        &self.config
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.status.lock().phase
    }

    pub fn is_stop_available(&self) -> bool {
        self.phase().is_stop_available()
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        self.status.lock().clone()
    }

    /// Read-only session handle for presentation pollers.
    pub fn session_observer(&self) -> SessionObserver<S> {
        self.observer.clone()
    }

    /// Run the start protocol for `request.ordering`.
    ///
    /// Any resources still held from a previous cycle are released first.
    /// On failure everything acquired is rolled back and the phase returns
    /// to idle, except when a playback-last ordering fails to load its
    /// sample and `retain_capture_on_load_failure` is set: session and
    /// capture then stay up in `AwaitingPlayback`.
    pub fn start(&self, request: StartRequest) -> Result<(), LifecycleError> {
        let mut components = self.components.lock();

        if components.holds_resources() || !self.phase().is_idle() {
            log::info!("start requested with a cycle still held; stopping it first");
            let report = self.stop_locked(&mut components);
            if !report.is_clean() {
                log::warn!(
                    "previous cycle released with {} failure(s); continuing start",
                    report.failures.len()
                );
            }
        }

        let ordering = request.ordering;
        let voice_processing = ordering.effective_voice_processing(request.voice_processing);
        let resource = request
            .resource
            .unwrap_or_else(|| self.config.resource_name.clone());
        let cycle_id = uuid::Uuid::new_v4().to_string();

        {
            let mut status = self.status.lock();
            status.ordering = Some(ordering);
            status.voice_processing = Some(voice_processing);
            status.cycle_id = Some(cycle_id.clone());
            status.last_error = None;
        }
        self.set_phase(LifecyclePhase::Starting);
        log::info!(
            "[{}] starting {} (voice processing: {})",
            cycle_id,
            ordering,
            voice_processing
        );

        let mut engine_running = false;
        for &step in ordering.steps() {
            log::debug!("[{}] step {:?}", cycle_id, step);
            let result = match step {
                StartStep::CreatePlayback => components.create_playback(&self.config, &resource),
                StartStep::PlayPlayback => components.play_playback(),
                StartStep::StartEngine => components.start_engine(&self.config, voice_processing),
            };
            self.sync_status(&components);

            if let Err(err) = result {
                return Err(self.abort_start(&mut components, &cycle_id, ordering, engine_running, err));
            }
            if step == StartStep::StartEngine {
                engine_running = true;
            }
        }

        self.set_phase(LifecyclePhase::Running);
        log::info!(
            "[{}] running at {} Hz",
            cycle_id,
            self.observer.snapshot().sample_rate
        );
        Ok(())
    }

    /// Complete a start left in `AwaitingPlayback` with another resource.
    ///
    /// A further load failure keeps the coordinator awaiting playback; any
    /// other failure rolls back to idle.
    pub fn retry_playback(&self, resource: &str) -> Result<(), LifecycleError> {
        let mut components = self.components.lock();
        let phase = self.phase();
        if phase != LifecyclePhase::AwaitingPlayback {
            return Err(LifecycleError::InvalidState(format!(
                "retry_playback requires awaiting_playback, current phase {:?}",
                phase
            )));
        }

        let result = components
            .create_playback(&self.config, resource)
            .and_then(|_| components.play_playback());
        self.sync_status(&components);

        match result {
            Ok(()) => {
                self.status.lock().last_error = None;
                self.set_phase(LifecyclePhase::Running);
                log::info!("playback retry with {} succeeded", resource);
                Ok(())
            }
            Err(err) if err.is_recoverable() => {
                log::warn!("playback retry with {} failed: {}", resource, err);
                self.status.lock().last_error = Some(err.to_string());
                self.notify_error(&err);
                Err(err)
            }
            Err(err) => {
                log::error!("playback retry failed fatally: {}; rolling back", err);
                self.rollback(&mut components, &err);
                Err(err)
            }
        }
    }

    /// Tear everything down: playback, capture stop, capture teardown,
    /// session deactivation.
    ///
    /// A no-op returning an empty report when idle. Every step runs even if
    /// one fails; failures come back as `LifecycleError::Teardown` after the
    /// phase has returned to idle.
    pub fn stop(&self) -> Result<StopReport, LifecycleError> {
        let mut components = self.components.lock();

        if self.phase().is_idle() && !components.holds_resources() {
            log::debug!("stop requested while idle");
            return Ok(StopReport::default());
        }

        let report = self.stop_locked(&mut components);
        if report.is_clean() {
            Ok(report)
        } else {
            let err = LifecycleError::Teardown(report);
            self.status.lock().last_error = Some(err.to_string());
            Err(err)
        }
    }

    // --- Internal helpers ---

    fn stop_locked(&self, components: &mut Components<S, C, P, R>) -> StopReport {
        self.set_phase(LifecyclePhase::Stopping);
        let report = components.release_all();
        self.sync_status(components);
        {
            let mut status = self.status.lock();
            status.ordering = None;
            status.voice_processing = None;
            status.cycle_id = None;
            status.last_error = None;
        }
        self.set_phase(LifecyclePhase::Idle);
        log::info!("stopped ({} step(s) released)", report.performed.len());
        if let Some(ref delegate) = self.delegate {
            delegate.on_stopped(&report);
        }
        report
    }

    fn abort_start(
        &self,
        components: &mut Components<S, C, P, R>,
        cycle_id: &str,
        ordering: StartOrdering,
        engine_running: bool,
        err: LifecycleError,
    ) -> LifecycleError {
        let retain = matches!(err, LifecycleError::Load(_))
            && engine_running
            && ordering.plays_after_capture()
            && self.config.retain_capture_on_load_failure;

        if retain {
            log::warn!(
                "[{}] playback load failed ({}); session and capture kept running",
                cycle_id,
                err
            );
            self.status.lock().last_error = Some(err.to_string());
            self.set_phase(LifecyclePhase::AwaitingPlayback);
            self.notify_error(&err);
            return err;
        }

        log::error!("[{}] start failed: {}; rolling back", cycle_id, err);
        self.rollback(components, &err);
        err
    }

    fn rollback(&self, components: &mut Components<S, C, P, R>, err: &LifecycleError) {
        self.set_phase(LifecyclePhase::Stopping);
        let report = components.release_all();
        if !report.is_clean() {
            log::warn!("rollback left {} failure(s)", report.failures.len());
        }
        self.sync_status(components);
        {
            let mut status = self.status.lock();
            status.ordering = None;
            status.voice_processing = None;
            status.cycle_id = None;
            status.last_error = Some(err.to_string());
        }
        self.set_phase(LifecyclePhase::Idle);
        self.notify_error(err);
    }

    fn sync_status(&self, components: &Components<S, C, P, R>) {
        let mut status = self.status.lock();
        status.session = components.session.state();
        status.capture = components.capture.state();
        status.playback = components.playback_state();
        status.chain_reconstructing = components.capture.is_chain_reconstructing();
    }

    fn set_phase(&self, phase: LifecyclePhase) {
        let changed = {
            let mut status = self.status.lock();
            let changed = status.phase != phase;
            status.phase = phase;
            status.can_stop = phase.is_stop_available();
            changed
        };
        if changed {
            if let Some(ref delegate) = self.delegate {
                delegate.on_phase_changed(phase);
            }
        }
    }

    fn notify_error(&self, err: &LifecycleError) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(err);
        }
    }
}

impl<S, C, P, R> Drop for EngineLifecycleCoordinator<S, C, P, R>
where
    S: SessionBackend,
    C: CaptureBackend,
    P: PlaybackBackend,
    R: ResourceLoader,
{
    fn drop(&mut self) {
        let components = self.components.get_mut();
        if components.holds_resources() {
            let report = components.release_all();
            log::debug!("released {} step(s) on drop", report.performed.len());
        }
    }
}
