use std::collections::{HashMap, HashSet};

#[cfg(test)]
use super::record::RawProcess;
use super::procfs::SnapshotSource;
use super::record::ProcessRecord;
use super::users::UserDirectory;

/// Counts gathered by one scan, for header display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total_observed: usize,
    pub total_running: usize,
}

/// Identity-keyed process records carried across sampling cycles.
#[derive(Debug, Default)]
pub struct ProcessTable {
    records: Vec<ProcessRecord>,
    index: HashMap<u32, usize>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [ProcessRecord] {
        &mut self.records
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessRecord> {
        self.index.get(&pid).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reconciles the current process listing against the table.
    ///
    /// Known pids are updated in place, unseen pids get a fresh record, and
    /// every record not observed in this pass is marked dead. A pid whose start
    /// time changed, or that reappears while its old record is still marked
    /// dead, belongs to a new process and replaces the old record.
    pub fn scan<S: SnapshotSource + ?Sized>(
        &mut self,
        source: &S,
        users: &mut UserDirectory,
    ) -> ScanSummary {
        let _span = tracing::debug_span!("collector.scan").entered();

        users.begin_scan();
        let mut summary = ScanSummary::default();
        let mut seen = HashSet::new();

        let Some(pids) = source.list_pids() else {
            tracing::warn!("process listing unreadable, marking all records dead");
            for record in &mut self.records {
                record.alive = false;
            }
            return summary;
        };

        for pid in pids {
            if seen.contains(&pid) {
                continue;
            }
            let Some(raw) = source.read_process(pid) else {
                continue;
            };
            seen.insert(pid);
            let owner = users.name_for(raw.uid);

            let i = match self.index.get(&pid) {
                Some(&i)
                    if self.records[i].alive && self.records[i].start_time == raw.start_time =>
                {
                    self.records[i].refresh(raw, owner);
                    i
                }
                Some(&i) => {
                    tracing::debug!(pid, "pid reused by a new process");
                    self.records[i] = ProcessRecord::new(raw, owner);
                    i
                }
                None => {
                    self.index.insert(pid, self.records.len());
                    self.records.push(ProcessRecord::new(raw, owner));
                    self.records.len() - 1
                }
            };

            summary.total_observed += 1;
            if self.records[i].is_running() {
                summary.total_running += 1;
            }
        }

        for record in &mut self.records {
            if !seen.contains(&record.pid) {
                record.alive = false;
            }
        }

        summary
    }

    /// Removes dead records from the table and its index, returning them so
    /// their final state can still be published once.
    ///
    /// Must run after the metrics for the current cycle.
    pub fn compact(&mut self) -> Vec<ProcessRecord> {
        let (alive, dead): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.records).into_iter().partition(|r| r.alive);
        self.records = alive;
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.pid, i))
            .collect();
        dead
    }
}

#[cfg(test)]
pub(crate) struct VecSource(pub Vec<RawProcess>);

#[cfg(test)]
impl SnapshotSource for VecSource {
    fn read_system(&self) -> super::snapshot::SystemSnapshot {
        super::snapshot::SystemSnapshot::default()
    }

    fn list_pids(&self) -> Option<Vec<u32>> {
        Some(self.0.iter().map(|p| p.pid).collect())
    }

    fn read_process(&self, pid: u32) -> Option<RawProcess> {
        self.0.iter().find(|p| p.pid == pid).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::record::raw;

    fn users() -> UserDirectory {
        UserDirectory::fixed([(1000, "alice")])
    }

    #[test]
    fn first_sighting_inserts_alive_record() {
        let mut table = ProcessTable::new();
        let summary = table.scan(&VecSource(vec![raw(1, 10, 100), raw(2, 20, 200)]), &mut users());
        assert_eq!(summary.total_observed, 2);
        assert_eq!(table.len(), 2);
        let rec = table.get(1).unwrap();
        assert!(rec.alive);
        assert_eq!(rec.prev_cpu_ticks, 0);
        assert_eq!(rec.owner_name, "alice");
    }

    #[test]
    fn running_processes_are_counted() {
        let mut running = raw(3, 0, 0);
        running.state = 'R';
        let mut table = ProcessTable::new();
        let summary = table.scan(&VecSource(vec![raw(1, 0, 0), running]), &mut users());
        assert_eq!(summary.total_running, 1);
    }

    #[test]
    fn rescan_updates_in_place_and_keeps_baseline() {
        let mut table = ProcessTable::new();
        let mut users = users();
        table.scan(&VecSource(vec![raw(1, 10, 100)]), &mut users);
        table.records_mut()[0].prev_cpu_ticks = 10;

        table.scan(&VecSource(vec![raw(1, 25, 150)]), &mut users);
        let rec = table.get(1).unwrap();
        assert_eq!(rec.prev_cpu_ticks, 10);
        assert_eq!(rec.cur_cpu_ticks, 25);
        assert_eq!(rec.resident_kb, 150);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn missing_pid_is_marked_dead_then_compacted() {
        let mut table = ProcessTable::new();
        let mut users = users();
        table.scan(&VecSource(vec![raw(1, 0, 0), raw(2, 0, 0)]), &mut users);
        table.scan(&VecSource(vec![raw(1, 0, 0)]), &mut users);

        assert!(!table.get(2).unwrap().alive);
        let dead = table.compact();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].pid, 2);
        assert!(table.get(2).is_none());
        assert!(table.get(1).unwrap().alive);
    }

    #[test]
    fn compact_keeps_records_seen_in_latest_scan() {
        let mut table = ProcessTable::new();
        let mut users = users();
        table.scan(&VecSource(vec![raw(1, 0, 0), raw(2, 0, 0), raw(3, 0, 0)]), &mut users);
        let dead = table.compact();
        assert!(dead.is_empty());
        assert_eq!(table.len(), 3);
        for pid in 1..=3 {
            assert_eq!(table.get(pid).unwrap().pid, pid);
        }
    }

    #[test]
    fn reused_pid_with_new_start_time_gets_fresh_baseline() {
        let mut table = ProcessTable::new();
        let mut users = users();
        table.scan(&VecSource(vec![raw(5, 400, 0)]), &mut users);
        table.records_mut()[0].prev_cpu_ticks = 400;

        let mut reborn = raw(5, 3, 0);
        reborn.start_time = 9_000;
        table.scan(&VecSource(vec![reborn]), &mut users);

        let rec = table.get(5).unwrap();
        assert_eq!(rec.prev_cpu_ticks, 0);
        assert_eq!(rec.cur_cpu_ticks, 3);
        assert_eq!(rec.start_time, 9_000);
    }

    #[test]
    fn pid_reappearing_after_death_is_a_new_record() {
        let mut table = ProcessTable::new();
        let mut users = users();
        table.scan(&VecSource(vec![raw(5, 400, 0)]), &mut users);
        table.records_mut()[0].prev_cpu_ticks = 400;
        table.scan(&VecSource(vec![]), &mut users);
        assert!(!table.get(5).unwrap().alive);

        // Reappears before compaction ran.
        table.scan(&VecSource(vec![raw(5, 410, 0)]), &mut users);
        let rec = table.get(5).unwrap();
        assert!(rec.alive);
        assert_eq!(rec.prev_cpu_ticks, 0);
    }

    #[test]
    fn vanished_process_is_skipped() {
        struct Flaky;
        impl SnapshotSource for Flaky {
            fn read_system(&self) -> crate::system::snapshot::SystemSnapshot {
                Default::default()
            }
            fn list_pids(&self) -> Option<Vec<u32>> {
                Some(vec![1, 2])
            }
            fn read_process(&self, pid: u32) -> Option<RawProcess> {
                (pid == 1).then(|| raw(1, 0, 0))
            }
        }

        let mut table = ProcessTable::new();
        let summary = table.scan(&Flaky, &mut users());
        assert_eq!(summary.total_observed, 1);
        assert!(table.get(2).is_none());
    }

    #[test]
    fn unreadable_listing_marks_everything_dead() {
        struct Broken;
        impl SnapshotSource for Broken {
            fn read_system(&self) -> crate::system::snapshot::SystemSnapshot {
                Default::default()
            }
            fn list_pids(&self) -> Option<Vec<u32>> {
                None
            }
            fn read_process(&self, _pid: u32) -> Option<RawProcess> {
                None
            }
        }

        let mut table = ProcessTable::new();
        let mut users = users();
        table.scan(&VecSource(vec![raw(1, 0, 0)]), &mut users);
        let summary = table.scan(&Broken, &mut users);
        assert_eq!(summary, ScanSummary::default());
        assert!(!table.get(1).unwrap().alive);
    }
}
