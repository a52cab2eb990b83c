use super::record::ProcessRecord;
use super::snapshot::SystemSnapshot;

/// Whole-system tick delta between two snapshots, floored at 1 so samples
/// taken faster than the tick resolution never divide by zero.
pub fn system_delta(prev_total: u64, cur_total: u64) -> u64 {
    cur_total.saturating_sub(prev_total).max(1)
}

/// Turns cumulative counters into utilization percentages.
///
/// Holds the previous whole-system tick total so every record of one cycle
/// is measured against the same delta.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    prev_total_ticks: u64,
}

impl MetricsEngine {
    pub fn new(baseline: &SystemSnapshot) -> Self {
        Self {
            prev_total_ticks: baseline.total_cpu_ticks,
        }
    }

    /// Updates every alive record in one pass and returns the delta used.
    pub fn update(&mut self, records: &mut [ProcessRecord], system: &SystemSnapshot) -> u64 {
        let sys_delta = system_delta(self.prev_total_ticks, system.total_cpu_ticks);
        apply(records, sys_delta, system.total_memory_kb);
        self.prev_total_ticks = system.total_cpu_ticks;
        sys_delta
    }
}

pub fn apply(records: &mut [ProcessRecord], sys_delta: u64, total_memory_kb: u64) {
    let sys_delta = sys_delta.max(1);
    for record in records.iter_mut().filter(|r| r.alive) {
        record.cpu_percent = if record.prev_cpu_ticks == 0 {
            0.0
        } else {
            let proc_delta = record.cur_cpu_ticks.saturating_sub(record.prev_cpu_ticks);
            proc_delta as f64 * 100.0 / sys_delta as f64
        };

        if total_memory_kb > 0 {
            record.mem_percent = record.resident_kb as f64 * 100.0 / total_memory_kb as f64;
        }

        record.prev_cpu_ticks = record.cur_cpu_ticks;
    }
}
