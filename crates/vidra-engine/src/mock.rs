//! Scripted backend fakes for tests.
//!
//! These record every command and let a test drive the raw event stream by
//! hand. The pure trait surfaces (`CapabilityProbe`, `BackendProvider`)
//! are mocked with the generated unimock APIs instead.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use url::Url;
use vidra_events::{AdaptiveEvent, ClassifiedError, MediaEvent};

use crate::backend::{AdaptiveEngine, NativeDecoder, OutputHandle};

pub use crate::backend::BackendProviderMock;
pub use crate::probe::CapabilityProbeMock;

/// A command observed by a scripted backend.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedCommand {
    Load,
    Play,
    Pause,
    Seek(f64),
    SetVolume { volume: f32, muted: bool },
    SetLevel(i64),
    RecoverMedia,
}

/// Scripted [`AdaptiveEngine`]: records commands, emits whatever raw
/// events the test injects.
pub struct ScriptedAdaptiveEngine {
    events_tx: broadcast::Sender<AdaptiveEvent>,
    commands: Mutex<Vec<RecordedCommand>>,
    play_result: Mutex<Result<(), ClassifiedError>>,
    bandwidth_bps: Mutex<Option<f64>>,
    buffered_end_secs: Mutex<Option<f64>>,
    destroy_count: AtomicUsize,
}

impl ScriptedAdaptiveEngine {
    #[must_use]
    pub fn new() -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(64);
        Arc::new(Self {
            events_tx,
            commands: Mutex::new(Vec::new()),
            play_result: Mutex::new(Ok(())),
            bandwidth_bps: Mutex::new(None),
            buffered_end_secs: Mutex::new(None),
            destroy_count: AtomicUsize::new(0),
        })
    }

    /// Inject a raw event as if the engine emitted it.
    pub fn emit(&self, event: impl Into<AdaptiveEvent>) {
        let _ = self.events_tx.send(event.into());
    }

    #[must_use]
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.lock().clone()
    }

    #[must_use]
    pub fn destroy_count(&self) -> usize {
        self.destroy_count.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn recover_count(&self) -> usize {
        self.commands
            .lock()
            .iter()
            .filter(|c| matches!(c, RecordedCommand::RecoverMedia))
            .count()
    }

    pub fn script_play_result(&self, result: Result<(), ClassifiedError>) {
        *self.play_result.lock() = result;
    }

    pub fn script_bandwidth_bps(&self, estimate: Option<f64>) {
        *self.bandwidth_bps.lock() = estimate;
    }

    pub fn script_buffered_end_secs(&self, end: Option<f64>) {
        *self.buffered_end_secs.lock() = end;
    }

    fn record(&self, command: RecordedCommand) {
        self.commands.lock().push(command);
    }
}

impl AdaptiveEngine for ScriptedAdaptiveEngine {
    fn load(&self, _url: &Url) {
        self.record(RecordedCommand::Load);
    }

    fn play(&self) -> Result<(), ClassifiedError> {
        self.record(RecordedCommand::Play);
        self.play_result.lock().clone()
    }

    fn pause(&self) {
        self.record(RecordedCommand::Pause);
    }

    fn seek(&self, position_secs: f64) {
        self.record(RecordedCommand::Seek(position_secs));
    }

    fn set_volume(&self, volume: f32, muted: bool) {
        self.record(RecordedCommand::SetVolume { volume, muted });
    }

    fn set_level(&self, level: i64) {
        self.record(RecordedCommand::SetLevel(level));
    }

    fn recover_media_error(&self) {
        self.record(RecordedCommand::RecoverMedia);
    }

    fn bandwidth_estimate_bps(&self) -> Option<f64> {
        *self.bandwidth_bps.lock()
    }

    fn buffered_end_secs(&self) -> Option<f64> {
        *self.buffered_end_secs.lock()
    }

    fn output_handle(&self) -> OutputHandle {
        OutputHandle(0xad)
    }

    fn events(&self) -> broadcast::Receiver<AdaptiveEvent> {
        self.events_tx.subscribe()
    }

    fn destroy(&self) {
        self.destroy_count.fetch_add(1, Ordering::AcqRel);
    }
}

/// Scripted [`NativeDecoder`] counterpart.
pub struct ScriptedNativeDecoder {
    events_tx: broadcast::Sender<MediaEvent>,
    commands: Mutex<Vec<RecordedCommand>>,
    play_result: Mutex<Result<(), ClassifiedError>>,
    buffered_end_secs: Mutex<Option<f64>>,
}

impl ScriptedNativeDecoder {
    #[must_use]
    pub fn new() -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(64);
        Arc::new(Self {
            events_tx,
            commands: Mutex::new(Vec::new()),
            play_result: Mutex::new(Ok(())),
            buffered_end_secs: Mutex::new(None),
        })
    }

    pub fn emit(&self, event: MediaEvent) {
        let _ = self.events_tx.send(event);
    }

    #[must_use]
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.lock().clone()
    }

    pub fn script_play_result(&self, result: Result<(), ClassifiedError>) {
        *self.play_result.lock() = result;
    }

    pub fn script_buffered_end_secs(&self, end: Option<f64>) {
        *self.buffered_end_secs.lock() = end;
    }

    fn record(&self, command: RecordedCommand) {
        self.commands.lock().push(command);
    }
}

impl NativeDecoder for ScriptedNativeDecoder {
    fn load(&self, _url: &Url) {
        self.record(RecordedCommand::Load);
    }

    fn play(&self) -> Result<(), ClassifiedError> {
        self.record(RecordedCommand::Play);
        self.play_result.lock().clone()
    }

    fn pause(&self) {
        self.record(RecordedCommand::Pause);
    }

    fn seek(&self, position_secs: f64) {
        self.record(RecordedCommand::Seek(position_secs));
    }

    fn set_volume(&self, volume: f32, muted: bool) {
        self.record(RecordedCommand::SetVolume { volume, muted });
    }

    fn buffered_end_secs(&self) -> Option<f64> {
        *self.buffered_end_secs.lock()
    }

    fn output_handle(&self) -> OutputHandle {
        OutputHandle(0x11)
    }

    fn events(&self) -> broadcast::Receiver<MediaEvent> {
        self.events_tx.subscribe()
    }
}
