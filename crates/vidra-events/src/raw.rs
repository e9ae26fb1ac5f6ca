use vidra_levels::RawLevel;

/// Raw event vocabulary of the media output element.
///
/// This is the full vocabulary of a native decoder; the adaptive engine
/// emits these too, wrapped in [`AdaptiveEvent::Media`], since it still
/// drives a media element underneath.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaEvent {
    LoadStart,
    CanPlay,
    Play,
    Pause,
    Ended,
    TimeUpdate {
        position_secs: f64,
        /// End of the last buffered range, if any.
        buffered_end_secs: Option<f64>,
    },
    DurationChange {
        duration_secs: f64,
    },
    VolumeChange {
        volume: f32,
        muted: bool,
    },
    Error {
        detail: String,
    },
}

/// Error categories as reported by the adaptive engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawErrorKind {
    Network,
    Media,
    Other,
}

/// Raw event vocabulary of the adaptive engine.
#[derive(Clone, Debug, PartialEq)]
pub enum AdaptiveEvent {
    /// Manifest parsed; variant ladder known.
    ManifestParsed { levels: Vec<RawLevel> },
    /// The engine switched to a level (automatic or pinned).
    LevelSwitched { level: usize },
    /// Engine-reported failure.
    Error {
        kind: RawErrorKind,
        detail: String,
        fatal: bool,
    },
    /// Pass-through from the media element the engine drives.
    Media(MediaEvent),
}

impl From<MediaEvent> for AdaptiveEvent {
    fn from(event: MediaEvent) -> Self {
        Self::Media(event)
    }
}
