use vidra_events::ClassifiedError;

/// Errors returned by the controller's imperative surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum PlayerError {
    #[error("no active playback session")]
    NoSession,

    #[error("playback rejected: {0}")]
    Rejected(ClassifiedError),

    #[error("source unplayable: {0}")]
    Unplayable(ClassifiedError),
}
