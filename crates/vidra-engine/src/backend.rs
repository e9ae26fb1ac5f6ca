use std::sync::Arc;

use tokio::sync::broadcast;
use url::Url;
use vidra_events::{AdaptiveEvent, ClassifiedError, MediaEvent};

use crate::{config::SessionConfig, source::PlaybackSource};

/// Opaque handle to the underlying media output, for host interop
/// (fullscreen attachment and the like).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutputHandle(pub u64);

/// Host-side direct decoder for formats the runtime plays natively.
///
/// Commands are fire-and-forget: outcomes, if any, arrive later on the
/// event stream. The one exception is `play`, which may be rejected
/// synchronously by host policy (e.g. autoplay restrictions).
#[cfg_attr(
    any(test, feature = "test-utils"),
    unimock::unimock(api = NativeDecoderMock)
)]
pub trait NativeDecoder: Send + Sync + 'static {
    fn load(&self, url: &Url);

    fn play(&self) -> Result<(), ClassifiedError>;

    fn pause(&self);

    fn seek(&self, position_secs: f64);

    fn set_volume(&self, volume: f32, muted: bool);

    /// End of the last buffered range, if anything is buffered.
    fn buffered_end_secs(&self) -> Option<f64>;

    fn output_handle(&self) -> OutputHandle;

    fn events(&self) -> broadcast::Receiver<MediaEvent>;
}

/// Host-side adaptive (ABR) engine for formats the runtime cannot play
/// directly.
///
/// Same command rules as [`NativeDecoder`]; additionally exposes the
/// variant ladder controls and the recovery/teardown surface.
#[cfg_attr(
    any(test, feature = "test-utils"),
    unimock::unimock(api = AdaptiveEngineMock)
)]
pub trait AdaptiveEngine: Send + Sync + 'static {
    fn load(&self, url: &Url);

    fn play(&self) -> Result<(), ClassifiedError>;

    fn pause(&self);

    fn seek(&self, position_secs: f64);

    fn set_volume(&self, volume: f32, muted: bool);

    /// Pin a level index, or -1 to resume automatic selection.
    fn set_level(&self, level: i64);

    /// One media-layer recovery attempt after a fatal media error.
    fn recover_media_error(&self);

    /// Current bandwidth estimate in bits per second, if one exists.
    fn bandwidth_estimate_bps(&self) -> Option<f64>;

    fn buffered_end_secs(&self) -> Option<f64>;

    fn output_handle(&self) -> OutputHandle;

    fn events(&self) -> broadcast::Receiver<AdaptiveEvent>;

    /// Release the engine. Must be safe to call more than once.
    fn destroy(&self);
}

/// Factory for the two backend strategies.
///
/// The host returns `None` when a strategy is unavailable in the current
/// runtime; with both unavailable the session reports `Unsupported`.
/// Element-level hints from the config (and captions/poster from the
/// source) are applied by the provider when constructing the output.
#[cfg_attr(
    any(test, feature = "test-utils"),
    unimock::unimock(api = BackendProviderMock)
)]
pub trait BackendProvider: Send + Sync + 'static {
    fn native(
        &self,
        source: &PlaybackSource,
        config: &SessionConfig,
    ) -> Option<Arc<dyn NativeDecoder>>;

    fn adaptive(
        &self,
        source: &PlaybackSource,
        config: &SessionConfig,
    ) -> Option<Arc<dyn AdaptiveEngine>>;
}

/// The strategy a session ended up with.
#[derive(Clone)]
pub enum Backend {
    Native(Arc<dyn NativeDecoder>),
    Adaptive(Arc<dyn AdaptiveEngine>),
}

impl Backend {
    /// Quality control is a no-op under native playback.
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native(_) => f.write_str("Backend::Native"),
            Self::Adaptive(_) => f.write_str("Backend::Adaptive"),
        }
    }
}
