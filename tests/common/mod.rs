use std::sync::{Arc, Mutex};

use sentinel::system::procfs::SnapshotSource;
use sentinel::system::record::RawProcess;
use sentinel::system::snapshot::SystemSnapshot;

#[derive(Default)]
struct World {
    total_ticks: u64,
    processes: Vec<RawProcess>,
}

/// In-memory process source whose state the test mutates between ticks.
#[derive(Clone, Default)]
pub struct Synthetic(Arc<Mutex<World>>);

impl Synthetic {
    pub fn set(&self, total_ticks: u64, processes: Vec<RawProcess>) {
        let mut world = self.0.lock().unwrap();
        world.total_ticks = total_ticks;
        world.processes = processes;
    }
}

impl SnapshotSource for Synthetic {
    fn read_system(&self) -> SystemSnapshot {
        SystemSnapshot {
            total_cpu_ticks: self.0.lock().unwrap().total_ticks,
            total_memory_kb: 1_000_000,
            load_average: [1.0, 0.5, 0.25],
            uptime_seconds: 100.0,
        }
    }

    fn list_pids(&self) -> Option<Vec<u32>> {
        Some(self.0.lock().unwrap().processes.iter().map(|p| p.pid).collect())
    }

    fn read_process(&self, pid: u32) -> Option<RawProcess> {
        self.0
            .lock()
            .unwrap()
            .processes
            .iter()
            .find(|p| p.pid == pid)
            .cloned()
    }
}

pub fn proc(pid: u32, ticks: u64, start_time: u64) -> RawProcess {
    RawProcess {
        pid,
        uid: 0,
        short_name: format!("p{pid}"),
        command_line: format!("p{pid} --run"),
        state: 'S',
        priority: 20,
        niceness: 0,
        threads: 1,
        start_time,
        virtual_kb: 4096,
        resident_kb: 1024,
        cpu_ticks: ticks,
    }
}
