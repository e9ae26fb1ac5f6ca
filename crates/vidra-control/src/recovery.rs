use vidra_events::{ClassifiedError, ErrorKind};

/// Recovery machine state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecoveryState {
    #[default]
    Healthy,
    /// A media-layer recovery attempt is in flight.
    Recovering,
    /// Terminal for the session; a new source is required to leave it.
    Fatal(ErrorKind),
}

/// What the dispatch loop must do in response to a classified error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Issue one media-layer recovery attempt; session stays usable.
    RecoverMedia,
    /// Surface the fault; keep the decoder alive (fault may be transient
    /// network, not engine corruption).
    FatalKeepEngine,
    /// Surface the fault and destroy the engine immediately.
    FatalDestroyEngine,
    /// Non-fatal: report through the failure hook, nothing else.
    ReportOnly,
    /// Session already fatal; no further events are processed.
    Discard,
}

/// Classifies engine faults and decides the reaction.
///
/// One automatic media recovery per healthy period: a second media error
/// while already recovering escalates to a generic fatal, which stops
/// infinite recovery loops. Whether a bounded retry budget (N attempts per
/// session) would serve better is an open tunable; the escalation point is
/// `on_error`'s `Recovering` arm.
#[derive(Debug, Default)]
pub struct RecoveryMachine {
    state: RecoveryState,
}

impl RecoveryMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> RecoveryState {
        self.state
    }

    /// Re-arm the single recovery attempt once playback proves healthy
    /// again. Fatal is terminal and stays put.
    pub fn note_healthy(&mut self) {
        if self.state == RecoveryState::Recovering {
            tracing::debug!("media recovery succeeded");
            self.state = RecoveryState::Healthy;
        }
    }

    /// Feed a classified error and get the required reaction.
    pub fn on_error(&mut self, error: &ClassifiedError, fatal: bool) -> RecoveryAction {
        if let RecoveryState::Fatal(_) = self.state {
            return RecoveryAction::Discard;
        }
        if !fatal {
            return RecoveryAction::ReportOnly;
        }

        match (self.state, error.kind) {
            (RecoveryState::Healthy, ErrorKind::Media) => {
                tracing::warn!(%error, "media error, attempting recovery");
                self.state = RecoveryState::Recovering;
                RecoveryAction::RecoverMedia
            }
            // A second media error while recovering escalates: no loops.
            (RecoveryState::Recovering, ErrorKind::Media) => {
                tracing::error!(%error, "media error during recovery, giving up");
                self.state = RecoveryState::Fatal(ErrorKind::Generic);
                RecoveryAction::FatalDestroyEngine
            }
            (_, ErrorKind::Network) => {
                tracing::error!(%error, "network error, keeping decoder alive");
                self.state = RecoveryState::Fatal(ErrorKind::Network);
                RecoveryAction::FatalKeepEngine
            }
            (_, ErrorKind::Unsupported) => {
                self.state = RecoveryState::Fatal(ErrorKind::Unsupported);
                RecoveryAction::FatalKeepEngine
            }
            (_, ErrorKind::Generic | ErrorKind::Media) => {
                tracing::error!(%error, "fatal engine error");
                self.state = RecoveryState::Fatal(ErrorKind::Generic);
                RecoveryAction::FatalDestroyEngine
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn error(kind: ErrorKind) -> ClassifiedError {
        ClassifiedError::new(kind, "test")
    }

    #[rstest]
    #[case(ErrorKind::Media, RecoveryAction::RecoverMedia, RecoveryState::Recovering)]
    #[case(ErrorKind::Network, RecoveryAction::FatalKeepEngine, RecoveryState::Fatal(ErrorKind::Network))]
    #[case(ErrorKind::Generic, RecoveryAction::FatalDestroyEngine, RecoveryState::Fatal(ErrorKind::Generic))]
    fn healthy_transitions(
        #[case] kind: ErrorKind,
        #[case] expected_action: RecoveryAction,
        #[case] expected_state: RecoveryState,
    ) {
        let mut machine = RecoveryMachine::new();
        assert_eq!(machine.on_error(&error(kind), true), expected_action);
        assert_eq!(machine.state(), expected_state);
    }

    #[test]
    fn second_media_error_while_recovering_escalates() {
        let mut machine = RecoveryMachine::new();
        assert_eq!(
            machine.on_error(&error(ErrorKind::Media), true),
            RecoveryAction::RecoverMedia
        );
        assert_eq!(
            machine.on_error(&error(ErrorKind::Media), true),
            RecoveryAction::FatalDestroyEngine
        );
        assert_eq!(machine.state(), RecoveryState::Fatal(ErrorKind::Generic));
    }

    #[test]
    fn recovery_success_rearms_the_single_attempt() {
        let mut machine = RecoveryMachine::new();
        machine.on_error(&error(ErrorKind::Media), true);
        machine.note_healthy();
        assert_eq!(machine.state(), RecoveryState::Healthy);
        // An isolated later media error gets its own attempt.
        assert_eq!(
            machine.on_error(&error(ErrorKind::Media), true),
            RecoveryAction::RecoverMedia
        );
    }

    #[test]
    fn non_fatal_errors_only_report() {
        let mut machine = RecoveryMachine::new();
        assert_eq!(
            machine.on_error(&error(ErrorKind::Media), false),
            RecoveryAction::ReportOnly
        );
        assert_eq!(machine.state(), RecoveryState::Healthy);
    }

    #[test]
    fn fatal_is_terminal() {
        let mut machine = RecoveryMachine::new();
        machine.on_error(&error(ErrorKind::Network), true);
        assert_eq!(
            machine.on_error(&error(ErrorKind::Media), true),
            RecoveryAction::Discard
        );
        machine.note_healthy();
        assert_eq!(machine.state(), RecoveryState::Fatal(ErrorKind::Network));
    }

    #[test]
    fn network_error_during_recovery_goes_fatal_without_destroy() {
        let mut machine = RecoveryMachine::new();
        machine.on_error(&error(ErrorKind::Media), true);
        assert_eq!(
            machine.on_error(&error(ErrorKind::Network), true),
            RecoveryAction::FatalKeepEngine
        );
    }
}
