use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use vidra_events::{
    AdaptiveEvent, ClassifiedError, EngineEvent, ErrorKind, Event, EventBus, MediaEvent,
    RawErrorKind,
};
use vidra_levels::from_manifest;

use crate::{
    backend::{Backend, BackendProvider, OutputHandle},
    config::SessionConfig,
    probe::{CapabilityProbe, StreamKind},
    source::PlaybackSource,
};

/// Lifecycle of an engine session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Initializing,
    Ready,
    Destroyed,
}

/// One live binding of a [`PlaybackSource`] to a decoding strategy.
///
/// Owns the backend and the normalization task that translates the
/// backend's raw vocabulary into [`EngineEvent`]s on the shared bus, each
/// stamped with this session's epoch. At most one session is alive at a
/// time; the controller destroys the previous one before creating the
/// next.
///
/// Created inside a tokio runtime (the normalization task is spawned on
/// it).
pub struct EngineSession {
    epoch: u64,
    backend: Backend,
    phase: Arc<Mutex<SessionPhase>>,
    destroyed: AtomicBool,
    cancel: CancellationToken,
}

impl EngineSession {
    /// Bind a source to a strategy and start normalizing its events.
    ///
    /// Strategy selection: if the probe reports native support for the
    /// detected format and the host can build a native decoder, native
    /// playback wins; otherwise the adaptive engine is used.
    ///
    /// # Errors
    ///
    /// Returns an `Unsupported` classified error when neither strategy is
    /// available.
    pub fn initialize(
        probe: &dyn CapabilityProbe,
        provider: &dyn BackendProvider,
        source: &PlaybackSource,
        config: &SessionConfig,
        bus: &EventBus,
        epoch: u64,
    ) -> Result<Self, ClassifiedError> {
        let kind = StreamKind::detect(&source.url);

        if probe.supports_native(kind.mime_hint()) {
            if let Some(decoder) = provider.native(source, config) {
                tracing::debug!(epoch, url = %source.url, "native playback selected");
                decoder.load(&source.url);
                let session = Self::with_backend(Backend::Native(decoder.clone()), epoch);
                session.spawn_native_pump(decoder.events(), bus.clone());
                // The host governs ABR internally: no level set, ready at once.
                *session.phase.lock() = SessionPhase::Ready;
                bus.publish(Event::Engine {
                    epoch,
                    event: EngineEvent::Ready,
                });
                return Ok(session);
            }
        }

        if let Some(engine) = provider.adaptive(source, config) {
            tracing::debug!(epoch, url = %source.url, "adaptive engine selected");
            engine.load(&source.url);
            let session = Self::with_backend(Backend::Adaptive(engine.clone()), epoch);
            session.spawn_adaptive_pump(engine.events(), bus.clone());
            return Ok(session);
        }

        tracing::warn!(url = %source.url, "no playable strategy for source");
        Err(ClassifiedError::unsupported())
    }

    fn with_backend(backend: Backend, epoch: u64) -> Self {
        Self {
            epoch,
            backend,
            phase: Arc::new(Mutex::new(SessionPhase::Initializing)),
            destroyed: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    fn spawn_native_pump(
        &self,
        mut rx: tokio::sync::broadcast::Receiver<MediaEvent>,
        bus: EventBus,
    ) {
        let cancel = self.cancel.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(event) => bus.publish(Event::Engine {
                            epoch,
                            event: normalize_media(event),
                        }),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "native event stream lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });
    }

    fn spawn_adaptive_pump(
        &self,
        mut rx: tokio::sync::broadcast::Receiver<AdaptiveEvent>,
        bus: EventBus,
    ) {
        let cancel = self.cancel.clone();
        let phase = Arc::clone(&self.phase);
        let epoch = self.epoch;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(event) => {
                            if matches!(event, AdaptiveEvent::ManifestParsed { .. }) {
                                *phase.lock() = SessionPhase::Ready;
                            }
                            for normalized in normalize_adaptive(event) {
                                bus.publish(Event::Engine {
                                    epoch,
                                    event: normalized,
                                });
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "adaptive event stream lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });
    }

    // -- commands -----------------------------------------------------------

    /// Start playback.
    ///
    /// # Errors
    ///
    /// Propagates a synchronous host rejection (e.g. autoplay policy), or
    /// rejects outright when the session is already destroyed.
    pub fn play(&self) -> Result<(), ClassifiedError> {
        if self.is_destroyed() {
            return Err(ClassifiedError::new(
                ErrorKind::Generic,
                "session destroyed",
            ));
        }
        match &self.backend {
            Backend::Native(decoder) => decoder.play(),
            Backend::Adaptive(engine) => engine.play(),
        }
    }

    pub fn pause(&self) {
        if self.is_destroyed() {
            return;
        }
        match &self.backend {
            Backend::Native(decoder) => decoder.pause(),
            Backend::Adaptive(engine) => engine.pause(),
        }
    }

    pub fn seek(&self, position_secs: f64) {
        if self.is_destroyed() {
            return;
        }
        match &self.backend {
            Backend::Native(decoder) => decoder.seek(position_secs),
            Backend::Adaptive(engine) => engine.seek(position_secs),
        }
    }

    pub fn set_volume(&self, volume: f32, muted: bool) {
        if self.is_destroyed() {
            return;
        }
        match &self.backend {
            Backend::Native(decoder) => decoder.set_volume(volume, muted),
            Backend::Adaptive(engine) => engine.set_volume(volume, muted),
        }
    }

    /// Pin a level, or -1 for automatic selection. No-op under native
    /// playback, where the host governs ABR.
    pub fn set_level(&self, level: i64) {
        if self.is_destroyed() {
            return;
        }
        match &self.backend {
            Backend::Native(_) => {
                tracing::debug!(level, "quality control ignored under native playback");
            }
            Backend::Adaptive(engine) => engine.set_level(level),
        }
    }

    /// One media-layer recovery attempt. No-op under native playback.
    pub fn recover_media(&self) {
        if self.is_destroyed() {
            return;
        }
        if let Backend::Adaptive(engine) = &self.backend {
            engine.recover_media_error();
        }
    }

    // -- introspection ------------------------------------------------------

    #[must_use]
    pub fn bandwidth_estimate_bps(&self) -> Option<f64> {
        if self.is_destroyed() {
            return None;
        }
        match &self.backend {
            Backend::Native(_) => None,
            Backend::Adaptive(engine) => engine.bandwidth_estimate_bps(),
        }
    }

    #[must_use]
    pub fn buffered_end_secs(&self) -> Option<f64> {
        if self.is_destroyed() {
            return None;
        }
        match &self.backend {
            Backend::Native(decoder) => decoder.buffered_end_secs(),
            Backend::Adaptive(engine) => engine.buffered_end_secs(),
        }
    }

    #[must_use]
    pub fn output_handle(&self) -> OutputHandle {
        match &self.backend {
            Backend::Native(decoder) => decoder.output_handle(),
            Backend::Adaptive(engine) => engine.output_handle(),
        }
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        self.backend.is_native()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        *self.phase.lock()
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    // -- teardown -----------------------------------------------------------

    /// Release the backend and stop the normalization task.
    ///
    /// Idempotent: repeated calls are no-ops. After this returns, no event
    /// from this session reaches the bus.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            tracing::debug!(epoch = self.epoch, "destroy on already-destroyed session");
            return;
        }
        self.cancel.cancel();
        if let Backend::Adaptive(engine) = &self.backend {
            engine.destroy();
        }
        *self.phase.lock() = SessionPhase::Destroyed;
        tracing::debug!(epoch = self.epoch, "session destroyed");
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        self.destroy();
    }
}

// -- normalization ----------------------------------------------------------

fn normalize_media(event: MediaEvent) -> EngineEvent {
    match event {
        MediaEvent::LoadStart => EngineEvent::LoadStarted,
        MediaEvent::CanPlay => EngineEvent::CanPlay,
        MediaEvent::Play => EngineEvent::Started,
        MediaEvent::Pause => EngineEvent::Paused,
        MediaEvent::Ended => EngineEvent::Ended,
        MediaEvent::TimeUpdate {
            position_secs,
            buffered_end_secs,
        } => EngineEvent::TimeUpdate {
            position_secs,
            buffered_end_secs,
        },
        MediaEvent::DurationChange { duration_secs } => {
            EngineEvent::DurationChanged { duration_secs }
        }
        MediaEvent::VolumeChange { volume, muted } => EngineEvent::VolumeChanged { volume, muted },
        // The element has no recovery surface of its own.
        MediaEvent::Error { detail } => EngineEvent::Error {
            error: ClassifiedError::new(ErrorKind::Generic, detail),
            fatal: true,
        },
    }
}

fn normalize_adaptive(event: AdaptiveEvent) -> Vec<EngineEvent> {
    match event {
        AdaptiveEvent::ManifestParsed { levels } => vec![
            EngineEvent::LevelsAvailable {
                levels: from_manifest(&levels),
            },
            EngineEvent::Ready,
        ],
        AdaptiveEvent::LevelSwitched { level } => vec![EngineEvent::QualityChanged { level }],
        AdaptiveEvent::Error {
            kind,
            detail,
            fatal,
        } => vec![EngineEvent::Error {
            error: classify(kind, detail),
            fatal,
        }],
        AdaptiveEvent::Media(media) => vec![normalize_media(media)],
    }
}

fn classify(kind: RawErrorKind, detail: String) -> ClassifiedError {
    let kind = match kind {
        RawErrorKind::Network => ErrorKind::Network,
        RawErrorKind::Media => ErrorKind::Media,
        RawErrorKind::Other => ErrorKind::Generic,
    };
    ClassifiedError::new(kind, detail)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;
    use unimock::{matching, MockFn, Unimock};
    use url::Url;
    use vidra_levels::RawLevel;

    use super::*;
    use crate::{
        backend::{AdaptiveEngine, NativeDecoder},
        mock::{RecordedCommand, ScriptedAdaptiveEngine, ScriptedNativeDecoder},
        probe::CapabilityProbeMock,
    };
    use crate::backend::BackendProviderMock;

    fn source() -> PlaybackSource {
        PlaybackSource::new(Url::parse("https://cdn.example/stream/master.m3u8").unwrap())
    }

    fn probe(native: bool) -> Unimock {
        Unimock::new(
            CapabilityProbeMock::supports_native
                .each_call(matching!(_))
                .returns(native),
        )
    }

    fn adaptive_provider(engine: &Arc<ScriptedAdaptiveEngine>) -> Unimock {
        let engine: Arc<dyn AdaptiveEngine> = Arc::clone(engine) as _;
        Unimock::new(
            BackendProviderMock::adaptive
                .each_call(matching!(_, _))
                .returns(Some(engine)),
        )
    }

    fn native_provider(decoder: &Arc<ScriptedNativeDecoder>) -> Unimock {
        let decoder: Arc<dyn NativeDecoder> = Arc::clone(decoder) as _;
        Unimock::new(
            BackendProviderMock::native
                .each_call(matching!(_, _))
                .returns(Some(decoder)),
        )
    }

    async fn next_engine_event(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> EngineEvent {
        loop {
            let event = timeout(Duration::from_millis(500), rx.recv())
                .await
                .expect("timed out waiting for event")
                .expect("bus closed");
            if let Event::Engine { event, .. } = event {
                return event;
            }
        }
    }

    #[tokio::test]
    async fn native_session_is_ready_immediately_with_no_levels() {
        let decoder = ScriptedNativeDecoder::new();
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let session = EngineSession::initialize(
            &probe(true),
            &native_provider(&decoder),
            &source(),
            &SessionConfig::new(),
            &bus,
            1,
        )
        .unwrap();

        assert!(session.is_native());
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(next_engine_event(&mut rx).await, EngineEvent::Ready);
        assert!(decoder
            .commands()
            .iter()
            .any(|c| matches!(c, RecordedCommand::Load)));

        // Quality control is a no-op on this strategy.
        session.set_level(2);
        assert!(!decoder
            .commands()
            .iter()
            .any(|c| matches!(c, RecordedCommand::SetLevel(_))));
    }

    #[tokio::test]
    async fn adaptive_manifest_yields_sorted_levels_then_ready() {
        let engine = ScriptedAdaptiveEngine::new();
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let session = EngineSession::initialize(
            &probe(false),
            &adaptive_provider(&engine),
            &source(),
            &SessionConfig::new(),
            &bus,
            7,
        )
        .unwrap();
        assert_eq!(session.phase(), SessionPhase::Initializing);

        engine.emit(AdaptiveEvent::ManifestParsed {
            levels: vec![
                RawLevel {
                    height: Some(360),
                    bitrate_bps: Some(800_000),
                },
                RawLevel {
                    height: Some(1080),
                    bitrate_bps: Some(5_000_000),
                },
            ],
        });

        let levels = match next_engine_event(&mut rx).await {
            EngineEvent::LevelsAvailable { levels } => levels,
            other => panic!("expected LevelsAvailable, got {other:?}"),
        };
        assert_eq!(levels[0].height, Some(1080));
        assert_eq!(levels[0].index, 1);
        assert_eq!(levels[1].height, Some(360));

        assert_eq!(next_engine_event(&mut rx).await, EngineEvent::Ready);
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[tokio::test]
    async fn unsupported_when_no_strategy_exists() {
        let provider = Unimock::new(
            BackendProviderMock::adaptive
                .each_call(matching!(_, _))
                .returns(None::<Arc<dyn AdaptiveEngine>>),
        );
        let result = EngineSession::initialize(
            &probe(false),
            &provider,
            &source(),
            &SessionConfig::new(),
            &EventBus::default(),
            0,
        );
        assert!(matches!(
            result,
            Err(ClassifiedError {
                kind: ErrorKind::Unsupported,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn native_probe_without_native_decoder_falls_back_to_adaptive() {
        let engine = ScriptedAdaptiveEngine::new();
        let adaptive: Arc<dyn AdaptiveEngine> = Arc::clone(&engine) as _;
        let provider = Unimock::new((
            BackendProviderMock::native
                .each_call(matching!(_, _))
                .returns(None::<Arc<dyn NativeDecoder>>),
            BackendProviderMock::adaptive
                .each_call(matching!(_, _))
                .returns(Some(adaptive)),
        ));
        let session = EngineSession::initialize(
            &probe(true),
            &provider,
            &source(),
            &SessionConfig::new(),
            &EventBus::default(),
            0,
        )
        .unwrap();
        assert!(!session.is_native());
    }

    #[tokio::test]
    async fn destroy_is_idempotent() {
        let engine = ScriptedAdaptiveEngine::new();
        let session = EngineSession::initialize(
            &probe(false),
            &adaptive_provider(&engine),
            &source(),
            &SessionConfig::new(),
            &EventBus::default(),
            0,
        )
        .unwrap();

        session.destroy();
        session.destroy();
        assert_eq!(engine.destroy_count(), 1);
        assert_eq!(session.phase(), SessionPhase::Destroyed);
    }

    #[tokio::test]
    async fn destroyed_session_rejects_commands() {
        let engine = ScriptedAdaptiveEngine::new();
        let session = EngineSession::initialize(
            &probe(false),
            &adaptive_provider(&engine),
            &source(),
            &SessionConfig::new(),
            &EventBus::default(),
            0,
        )
        .unwrap();
        session.destroy();

        assert!(session.play().is_err());
        session.pause();
        session.seek(10.0);
        session.set_level(1);
        // Only load was ever forwarded.
        assert_eq!(session.bandwidth_estimate_bps(), None);
        assert!(!engine
            .commands()
            .iter()
            .any(|c| matches!(c, RecordedCommand::Pause | RecordedCommand::Seek(_))));
    }

    #[tokio::test]
    async fn no_events_flow_after_destroy() {
        let engine = ScriptedAdaptiveEngine::new();
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let session = EngineSession::initialize(
            &probe(false),
            &adaptive_provider(&engine),
            &source(),
            &SessionConfig::new(),
            &bus,
            0,
        )
        .unwrap();

        session.destroy();
        // Give the pump task a chance to observe cancellation.
        tokio::time::sleep(Duration::from_millis(20)).await;
        engine.emit(AdaptiveEvent::LevelSwitched { level: 1 });
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Empty)
        ));
    }
}
