use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

use parking_lot::Mutex;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use vidra_engine::{
    BackendProvider, CapabilityProbe, EngineSession, OutputHandle, PlaybackSource, SessionConfig,
};
use vidra_events::{ClassifiedError, EngineEvent, Event, EventBus};
use vidra_levels::{resolve, QualityLevel, QualityPreference, Resolution};

use crate::{
    debounce::{Debouncer, InputChannel},
    error::PlayerError,
    hooks::PlayerHooks,
    keys::Key,
    recovery::{RecoveryAction, RecoveryMachine},
    sampler,
    state::PlaybackState,
};

const SEEK_STEP_SECS: f64 = 5.0;
const VOLUME_STEP: f32 = 0.1;

pub(crate) struct Inner {
    pub(crate) bus: EventBus,
    pub(crate) probe: Arc<dyn CapabilityProbe>,
    pub(crate) provider: Arc<dyn BackendProvider>,
    pub(crate) hooks: PlayerHooks,
    pub(crate) state: Mutex<PlaybackState>,
    pub(crate) levels: Mutex<Vec<QualityLevel>>,
    pub(crate) session: Mutex<Option<EngineSession>>,
    pub(crate) config: Mutex<SessionConfig>,
    pub(crate) epoch: AtomicU64,
    pub(crate) recovery: Mutex<RecoveryMachine>,
    pub(crate) debounce: Debouncer,
}

/// Uniform imperative control surface over one playback session at a time.
///
/// Owns the state store; all engine commands flow through here so state
/// and engine stay consistent. Engine events are reconciled by a single
/// dispatch task, in emission order, so by the time an event is handled
/// the store already reflects everything before it.
///
/// Construct inside a tokio runtime. Teardown ([`destroy`]) is idempotent
/// and also runs on drop.
///
/// [`destroy`]: PlayerController::destroy
pub struct PlayerController {
    inner: Arc<Inner>,
    cancel: CancellationToken,
}

impl PlayerController {
    pub fn new(
        probe: Arc<dyn CapabilityProbe>,
        provider: Arc<dyn BackendProvider>,
        hooks: PlayerHooks,
    ) -> Self {
        let inner = Arc::new(Inner {
            bus: EventBus::default(),
            probe,
            provider,
            hooks,
            state: Mutex::new(PlaybackState::default()),
            levels: Mutex::new(Vec::new()),
            session: Mutex::new(None),
            config: Mutex::new(SessionConfig::new()),
            epoch: AtomicU64::new(0),
            recovery: Mutex::new(RecoveryMachine::new()),
            debounce: Debouncer::new(),
        });
        let cancel = CancellationToken::new();
        spawn_dispatch(Arc::clone(&inner), cancel.clone());
        if inner.hooks.on_stats.is_some() {
            sampler::spawn(Arc::clone(&inner), cancel.clone());
        }
        Self { inner, cancel }
    }

    // -- source lifecycle ---------------------------------------------------

    /// Bind a new source, tearing down any previous session synchronously
    /// first (at most one session is ever alive).
    ///
    /// # Errors
    ///
    /// [`PlayerError::Unplayable`] when no decoding strategy exists for
    /// the source; the state store's `error` field and the failure hook
    /// carry the same classified error.
    pub fn load_source(
        &self,
        source: PlaybackSource,
        config: SessionConfig,
    ) -> Result<(), PlayerError> {
        if let Some(previous) = self.inner.session.lock().take() {
            previous.destroy();
        }
        let epoch = self.inner.epoch.fetch_add(1, Ordering::AcqRel) + 1;

        *self.inner.state.lock() = PlaybackState::for_new_session(config.muted);
        self.inner.levels.lock().clear();
        *self.inner.recovery.lock() = RecoveryMachine::new();
        *self.inner.config.lock() = config.clone();

        let initialized = EngineSession::initialize(
            self.inner.probe.as_ref(),
            self.inner.provider.as_ref(),
            &source,
            &config,
            &self.inner.bus,
            epoch,
        );
        match initialized {
            Ok(session) => {
                *self.inner.session.lock() = Some(session);
                Ok(())
            }
            Err(error) => {
                let _ = self.inner.recovery.lock().on_error(&error, true);
                self.inner.state.lock().error = Some(error.clone());
                self.inner.hooks.error(&error);
                Err(PlayerError::Unplayable(error))
            }
        }
    }

    /// Tear everything down: dispatch task, telemetry, session, backend.
    /// Safe to call any number of times.
    pub fn destroy(&self) {
        self.cancel.cancel();
        if let Some(session) = self.inner.session.lock().take() {
            session.destroy();
        }
    }

    // -- transport ----------------------------------------------------------

    /// Start playback.
    ///
    /// # Errors
    ///
    /// [`PlayerError::NoSession`] without a bound source;
    /// [`PlayerError::Rejected`] when the host refuses (e.g. autoplay
    /// policy). Rejections also go through the failure hook.
    pub fn play(&self) -> Result<(), PlayerError> {
        let result = {
            let session = self.inner.session.lock();
            let Some(session) = session.as_ref() else {
                return Err(PlayerError::NoSession);
            };
            session.play()
        };
        match result {
            Ok(()) => {
                self.inner.state.lock().playing = true;
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "play rejected");
                self.inner.hooks.error(&error);
                Err(PlayerError::Rejected(error))
            }
        }
    }

    pub fn pause(&self) {
        if let Some(session) = self.inner.session.lock().as_ref() {
            session.pause();
        }
        self.inner.state.lock().playing = false;
    }

    /// Debounced play/pause toggle. Bursts on one channel inside the
    /// suppression window collapse to a single flip; channels are
    /// independent.
    pub fn toggle_play(&self, channel: InputChannel) {
        if !self.inner.debounce.try_acquire(channel, Instant::now()) {
            return;
        }
        let playing = self.inner.state.lock().playing;
        if playing {
            self.pause();
        } else if let Err(error) = self.play() {
            tracing::debug!(%error, "toggle could not start playback");
        }
    }

    // -- audio --------------------------------------------------------------

    pub fn toggle_mute(&self) {
        let (volume, muted) = {
            let mut state = self.inner.state.lock();
            state.muted = !state.muted;
            (state.volume, state.muted)
        };
        if let Some(session) = self.inner.session.lock().as_ref() {
            session.set_volume(volume, muted);
        }
    }

    /// Set volume, clamped to `[0, 1]`. Mute follows the zero point: 0
    /// forces mute on, anything above clears it.
    pub fn set_volume(&self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        let muted = volume == 0.0;
        {
            let mut state = self.inner.state.lock();
            state.volume = volume;
            state.muted = muted;
        }
        if let Some(session) = self.inner.session.lock().as_ref() {
            session.set_volume(volume, muted);
        }
    }

    pub fn adjust_volume(&self, delta: f32) {
        let current = self.inner.state.lock().volume;
        self.set_volume(current + delta);
    }

    // -- timeline -----------------------------------------------------------

    /// Seek to an absolute position, clamped to `[0, duration]`.
    pub fn seek_to(&self, position_secs: f64) {
        let duration = self.inner.state.lock().duration_secs;
        let target = position_secs.clamp(0.0, duration.max(0.0));
        if let Some(session) = self.inner.session.lock().as_ref() {
            session.seek(target);
        }
        self.inner.state.lock().position_secs = target;
    }

    pub fn seek_by(&self, delta_secs: f64) {
        let current = self.inner.state.lock().position_secs;
        self.seek_to(current + delta_secs);
    }

    // -- quality ------------------------------------------------------------

    /// Apply a quality preference against the current level set. A no-op
    /// under native playback and for out-of-range preferences.
    pub fn set_quality(&self, preference: QualityPreference) {
        self.inner.apply_preference(preference);
    }

    /// Current engine level index; -1 while automatic or unresolved.
    #[must_use]
    pub fn current_level(&self) -> i64 {
        self.inner.state.lock().current_level
    }

    /// Level set in presentation order. Empty under native playback.
    #[must_use]
    pub fn levels(&self) -> Vec<QualityLevel> {
        self.inner.levels.lock().clone()
    }

    // -- host interop -------------------------------------------------------

    /// Handle to the media output for host interop (fullscreen and the
    /// like).
    #[must_use]
    pub fn output_handle(&self) -> Option<OutputHandle> {
        self.inner
            .session
            .lock()
            .as_ref()
            .map(EngineSession::output_handle)
    }

    pub fn toggle_fullscreen(&self) {
        let mut state = self.inner.state.lock();
        state.fullscreen = !state.fullscreen;
    }

    /// Keyboard surface. The host forwards keys only while the controller
    /// is mounted and no text input has focus.
    pub fn handle_key(&self, key: Key) {
        match key {
            Key::Space | Key::KeyK => self.toggle_play(InputChannel::Keyboard),
            Key::KeyM => self.toggle_mute(),
            Key::KeyF => self.toggle_fullscreen(),
            Key::ArrowLeft => self.seek_by(-SEEK_STEP_SECS),
            Key::ArrowRight => self.seek_by(SEEK_STEP_SECS),
            Key::ArrowUp => self.adjust_volume(VOLUME_STEP),
            Key::ArrowDown => self.adjust_volume(-VOLUME_STEP),
        }
    }

    // -- observation --------------------------------------------------------

    /// Snapshot of the UI-observable state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.inner.state.lock().clone()
    }

    /// Subscribe to the unified event stream (normalized engine events and
    /// telemetry samples).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        self.destroy();
    }
}

// -- dispatch ---------------------------------------------------------------

fn spawn_dispatch(inner: Arc<Inner>, cancel: CancellationToken) {
    let mut rx = inner.bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Ok(Event::Engine { epoch, event }) => {
                        if epoch == inner.epoch.load(Ordering::Acquire) {
                            inner.apply(event);
                        } else {
                            tracing::debug!(epoch, "event from stale session dropped");
                        }
                    }
                    Ok(Event::Stats(_)) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "dispatch lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    });
}

impl Inner {
    /// Apply one normalized event to the state store, then fire hooks.
    fn apply(&self, event: EngineEvent) {
        match event {
            EngineEvent::Ready => {
                self.hooks.ready();
            }
            EngineEvent::LoadStarted => {
                self.state.lock().loading = true;
            }
            EngineEvent::CanPlay => {
                self.state.lock().loading = false;
                self.recovery.lock().note_healthy();
            }
            EngineEvent::LevelsAvailable { levels } => {
                *self.levels.lock() = levels;
                let preference = self.config.lock().initial_quality;
                if !preference.is_auto() {
                    self.apply_preference(preference);
                }
            }
            EngineEvent::QualityChanged { level } => {
                self.state.lock().current_level = level as i64;
                let found = self
                    .levels
                    .lock()
                    .iter()
                    .find(|candidate| candidate.index == level)
                    .copied();
                match found {
                    Some(found) => self.hooks.quality_changed(found),
                    None => tracing::debug!(level, "switch to level outside the known set"),
                }
            }
            EngineEvent::DurationChanged { duration_secs } => {
                self.state.lock().duration_secs = duration_secs;
            }
            EngineEvent::TimeUpdate {
                position_secs,
                buffered_end_secs,
            } => {
                let mut state = self.state.lock();
                state.position_secs = position_secs;
                if let Some(end) = buffered_end_secs {
                    state.buffered_secs = end;
                }
            }
            EngineEvent::VolumeChanged { volume, muted } => {
                let mut state = self.state.lock();
                state.volume = volume;
                state.muted = muted;
            }
            EngineEvent::Started => {
                self.state.lock().playing = true;
                self.hooks.play();
            }
            EngineEvent::Paused => {
                self.state.lock().playing = false;
                self.hooks.pause();
            }
            EngineEvent::Ended => {
                self.state.lock().playing = false;
                self.hooks.ended();
            }
            EngineEvent::Error { error, fatal } => self.handle_error(error, fatal),
        }
    }

    fn handle_error(&self, error: ClassifiedError, fatal: bool) {
        let action = self.recovery.lock().on_error(&error, fatal);
        match action {
            RecoveryAction::ReportOnly => self.hooks.error(&error),
            RecoveryAction::RecoverMedia => {
                self.state.lock().loading = true;
                if let Some(session) = self.session.lock().as_ref() {
                    session.recover_media();
                }
                self.hooks.error(&error);
            }
            RecoveryAction::FatalKeepEngine => {
                self.state.lock().error = Some(error.clone());
                self.hooks.error(&error);
            }
            RecoveryAction::FatalDestroyEngine => {
                if let Some(session) = self.session.lock().take() {
                    session.destroy();
                }
                self.state.lock().error = Some(error.clone());
                self.hooks.error(&error);
            }
            RecoveryAction::Discard => {
                tracing::debug!(%error, "error after fatal state, discarded");
            }
        }
    }

    fn apply_preference(&self, preference: QualityPreference) {
        let session = self.session.lock();
        let Some(session) = session.as_ref() else {
            tracing::debug!("quality preference with no session");
            return;
        };
        if session.is_native() {
            tracing::debug!("quality preference ignored under native playback");
            return;
        }
        let resolution = resolve(preference, &self.levels.lock());
        match resolution {
            Resolution::Auto => session.set_level(-1),
            Resolution::Apply(index) => session.set_level(index as i64),
            // Already logged by the resolver.
            Resolution::NoOp => {}
        }
    }
}
