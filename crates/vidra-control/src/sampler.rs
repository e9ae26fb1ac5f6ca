use std::{sync::Arc, time::Duration};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use vidra_events::StatsSample;

use crate::controller::Inner;

/// Telemetry cadence. A fixed constant, not caller-configurable.
pub const STATS_INTERVAL: Duration = Duration::from_secs(5);

/// Spawn the periodic telemetry task.
///
/// Only started when a stats hook is configured. Each tick is best-effort:
/// a missing or native session skips the tick silently; sampling never
/// blocks playback.
pub(crate) fn spawn(
    inner: Arc<Inner>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + STATS_INTERVAL;
        let mut ticker = tokio::time::interval_at(start, STATS_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Some(sample) = take_sample(&inner) {
                        inner.hooks.stats(sample);
                        inner.bus.publish(sample);
                    }
                }
            }
        }
    })
}

fn take_sample(inner: &Inner) -> Option<StatsSample> {
    let (bandwidth_bps, buffered_end_secs) = {
        let session = inner.session.lock();
        let session = session.as_ref()?;
        if session.is_native() {
            // The host governs ABR and exposes no estimate to read.
            return None;
        }
        (session.bandwidth_estimate_bps(), session.buffered_end_secs())
    };
    let position_secs = inner.state.lock().position_secs;
    let buffer_secs = (buffered_end_secs.unwrap_or(0.0) - position_secs).max(0.0);
    Some(StatsSample {
        bandwidth_kbps: bandwidth_bps.map(|bps| (bps / 1000.0).round() as u32),
        buffer_secs,
    })
}
