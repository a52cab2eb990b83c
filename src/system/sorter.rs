use std::cmp::Ordering;

use super::record::ProcessRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Cpu,
    Memory,
    Pid,
    User,
    VirtualSize,
    ResidentSize,
    Time,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Cpu,
        SortColumn::Memory,
        SortColumn::Pid,
        SortColumn::User,
        SortColumn::VirtualSize,
        SortColumn::ResidentSize,
        SortColumn::Time,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Cpu => "CPU",
            SortColumn::Memory => "MEM",
            SortColumn::Pid => "PID",
            SortColumn::User => "USER",
            SortColumn::VirtualSize => "VSIZE",
            SortColumn::ResidentSize => "RSS",
            SortColumn::Time => "TIME",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mem" | "memory" => SortColumn::Memory,
            "pid" => SortColumn::Pid,
            "user" => SortColumn::User,
            "vsize" | "virt" => SortColumn::VirtualSize,
            "rss" | "res" => SortColumn::ResidentSize,
            "time" => SortColumn::Time,
            _ => SortColumn::Cpu,
        }
    }
}

/// Active sort column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortColumn::Cpu)
    }
}

impl SortSpec {
    pub fn new(column: SortColumn) -> Self {
        Self {
            column,
            descending: true,
        }
    }

    /// Same column flips direction; a new column starts descending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == column {
            self.descending = !self.descending;
        } else {
            self.column = column;
            self.descending = true;
        }
    }

    pub fn arrow(self) -> &'static str {
        if self.descending { "↓" } else { "↑" }
    }
}

fn directed(ord: Ordering, descending: bool) -> Ordering {
    if descending { ord.reverse() } else { ord }
}

/// Total order over records for `spec`.
///
/// The CPU ranking puts alive records first, then CPU% in the requested
/// direction, then resident size descending, then pid ascending. Every other
/// column compares its single key in the requested direction and breaks ties
/// by pid ascending.
pub fn compare(a: &ProcessRecord, b: &ProcessRecord, spec: SortSpec) -> Ordering {
    let primary = match spec.column {
        SortColumn::Cpu => {
            return b
                .alive
                .cmp(&a.alive)
                .then_with(|| directed(a.cpu_percent.total_cmp(&b.cpu_percent), spec.descending))
                .then_with(|| b.resident_kb.cmp(&a.resident_kb))
                .then_with(|| a.pid.cmp(&b.pid));
        }
        SortColumn::Memory => a.mem_percent.total_cmp(&b.mem_percent),
        SortColumn::Pid => a.pid.cmp(&b.pid),
        SortColumn::User => a
            .owner_name
            .to_lowercase()
            .cmp(&b.owner_name.to_lowercase()),
        SortColumn::VirtualSize => a.virtual_kb.cmp(&b.virtual_kb),
        SortColumn::ResidentSize => a.resident_kb.cmp(&b.resident_kb),
        SortColumn::Time => a.cur_cpu_ticks.cmp(&b.cur_cpu_ticks),
    };
    directed(primary, spec.descending).then_with(|| a.pid.cmp(&b.pid))
}

pub fn sort_records(records: &mut [ProcessRecord], spec: SortSpec) {
    records.sort_by(|a, b| compare(a, b, spec));
}

/// Filtered, ordered copy of `records`, capped at `limit` rows (0 = no cap).
/// The input slice is never reordered.
pub fn ranked_view(
    records: &[ProcessRecord],
    filter: &str,
    spec: SortSpec,
    limit: usize,
) -> Vec<ProcessRecord> {
    let needle = filter.to_lowercase();
    let mut view: Vec<ProcessRecord> = records
        .iter()
        .filter(|r| r.matches_filter(&needle))
        .cloned()
        .collect();
    sort_records(&mut view, spec);
    if limit > 0 {
        view.truncate(limit);
    }
    view
}
