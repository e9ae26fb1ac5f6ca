use vidra_events::ClassifiedError;

/// UI-observable playback state.
///
/// Single source of truth, exclusively owned by the controller: patched
/// only by event dispatch and user commands, read by the UI as snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub playing: bool,
    pub muted: bool,
    pub fullscreen: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    /// Volume in `[0, 1]`.
    pub volume: f32,
    pub loading: bool,
    /// End of the last buffered range, in seconds.
    pub buffered_secs: f64,
    /// Engine level index, or -1 while automatic/unresolved.
    pub current_level: i64,
    /// Set when the session hit a fatal fault; drives the error panel.
    pub error: Option<ClassifiedError>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            playing: false,
            muted: false,
            fullscreen: false,
            position_secs: 0.0,
            duration_secs: 0.0,
            volume: 1.0,
            loading: true,
            buffered_secs: 0.0,
            current_level: -1,
            error: None,
        }
    }
}

impl PlaybackState {
    /// Fresh state for a new session, carrying over the configured mute.
    #[must_use]
    pub fn for_new_session(muted: bool) -> Self {
        Self {
            muted,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let state = PlaybackState::default();
        assert!(!state.playing);
        assert!(state.loading);
        assert_eq!(state.volume, 1.0);
        assert_eq!(state.current_level, -1);
        assert!(state.error.is_none());
    }

    #[test]
    fn new_session_state_keeps_configured_mute() {
        assert!(PlaybackState::for_new_session(true).muted);
        assert!(!PlaybackState::for_new_session(false).muted);
    }
}
