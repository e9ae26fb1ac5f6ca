use vidra_levels::QualityLevel;

use crate::error::ClassifiedError;

/// Normalized session event vocabulary.
///
/// Both backend strategies are reduced to this one set; the controller's
/// dispatch loop consumes nothing else.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// The session can accept playback commands.
    Ready,
    /// The output element started loading; a loading indicator may show.
    LoadStarted,
    /// Enough data buffered to begin playback; loading indicator clears.
    CanPlay,
    /// Level set known, in presentation order. Empty under native playback.
    LevelsAvailable { levels: Vec<QualityLevel> },
    /// The engine is now rendering this level.
    QualityChanged { level: usize },
    DurationChanged { duration_secs: f64 },
    TimeUpdate {
        position_secs: f64,
        buffered_end_secs: Option<f64>,
    },
    VolumeChanged { volume: f32, muted: bool },
    Started,
    Paused,
    Ended,
    Error {
        error: ClassifiedError,
        /// Non-fatal errors are observability only; fatal ones drive the
        /// recovery machine.
        fatal: bool,
    },
}
