/// One best-effort telemetry snapshot.
///
/// Produced on a fixed cadence while a session is alive; has no persisted
/// identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsSample {
    /// Engine bandwidth estimate, if one exists yet.
    pub bandwidth_kbps: Option<u32>,
    /// Buffered headroom ahead of the playback position, in seconds.
    pub buffer_secs: f64,
}
