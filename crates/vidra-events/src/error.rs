use std::fmt;

/// Failure taxonomy for a playback session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No playable strategy exists for the source.
    Unsupported,
    /// Fatal to the session, but the decoder is kept alive — the fault may
    /// be transient network, not engine corruption.
    Network,
    /// Recoverable by a single automatic media-layer recovery attempt.
    Media,
    /// Fatal; the engine is destroyed immediately.
    Generic,
}

impl ErrorKind {
    /// Message shown by the error-display fallback.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unsupported => "HLS is not supported in this environment.",
            Self::Network => "Network error occurred. Please check your connection.",
            Self::Media => "A media error occurred.",
            Self::Generic => "A fatal error occurred during playback.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unsupported => "unsupported",
            Self::Network => "network",
            Self::Media => "media",
            Self::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// A classified engine failure: taxonomy kind plus the underlying payload.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error: {detail}")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    /// Engine-reported detail, verbatim.
    pub detail: String,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// The error raised when neither playback strategy applies.
    #[must_use]
    pub fn unsupported() -> Self {
        Self::new(ErrorKind::Unsupported, "no playable strategy for source")
    }
}
