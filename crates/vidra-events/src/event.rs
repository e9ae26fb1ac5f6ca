use crate::{engine::EngineEvent, stats::StatsSample};

/// Unified event published on the [`EventBus`](crate::EventBus).
#[derive(Clone, Debug)]
pub enum Event {
    /// Normalized session event, stamped with the epoch of the session
    /// that produced it. Events whose epoch no longer matches the live
    /// session are discarded by the dispatch loop.
    Engine { epoch: u64, event: EngineEvent },
    /// Telemetry snapshot.
    Stats(StatsSample),
}

impl From<StatsSample> for Event {
    fn from(sample: StatsSample) -> Self {
        Self::Stats(sample)
    }
}
