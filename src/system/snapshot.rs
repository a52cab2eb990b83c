use std::time::Instant;

use super::record::ProcessRecord;

/// Instantaneous system-wide counters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SystemSnapshot {
    /// Sum of every CPU time category since boot, in clock ticks.
    pub total_cpu_ticks: u64,
    pub total_memory_kb: u64,
    pub load_average: [f64; 3],
    pub uptime_seconds: f64,
}

/// Everything one sampling cycle publishes to a consumer.
///
/// `records` holds the live table after compaction plus the records that
/// exited during this cycle (with `alive == false`), so each exit is observed
/// exactly once.
#[derive(Clone, Debug)]
pub struct Frame {
    pub records: Vec<ProcessRecord>,
    pub total_observed: usize,
    pub total_running: usize,
    pub system: SystemSnapshot,
    /// Alert cooldowns in the daemon are measured against this.
    pub sampled_at: Instant,
}

impl Frame {
    pub fn alive(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.records.iter().filter(|r| r.alive)
    }
}
