/// Attributes read for a single process during one scan, before they are
/// reconciled into the process table.
#[derive(Clone, Debug, PartialEq)]
pub struct RawProcess {
    pub pid: u32,
    pub uid: u32,
    pub short_name: String,
    pub command_line: String,
    pub state: char,
    pub priority: i64,
    pub niceness: i64,
    pub threads: i64,
    /// Start time in clock ticks after boot. Together with the pid this
    /// identifies one process lifetime.
    pub start_time: u64,
    pub virtual_kb: u64,
    pub resident_kb: u64,
    /// utime + stime, cumulative since the process started.
    pub cpu_ticks: u64,
}

/// One entry of the process table.
///
/// `cpu_percent` and `mem_percent` are derived by the metrics engine and can
/// only be read from outside the crate.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub owner_uid: u32,
    pub owner_name: String,
    pub short_name: String,
    pub command_line: String,
    pub state: char,
    pub priority: i64,
    pub niceness: i64,
    pub threads: i64,
    pub start_time: u64,
    pub virtual_kb: u64,
    pub resident_kb: u64,
    pub prev_cpu_ticks: u64,
    pub cur_cpu_ticks: u64,
    pub(crate) cpu_percent: f64,
    pub(crate) mem_percent: f64,
    pub alive: bool,
}

impl ProcessRecord {
    /// Creates a record for a process seen for the first time. The zero
    /// baseline makes its first cycle report 0% CPU.
    pub fn new(raw: RawProcess, owner_name: String) -> Self {
        Self {
            pid: raw.pid,
            owner_uid: raw.uid,
            owner_name,
            short_name: raw.short_name,
            command_line: raw.command_line,
            state: raw.state,
            priority: raw.priority,
            niceness: raw.niceness,
            threads: raw.threads,
            start_time: raw.start_time,
            virtual_kb: raw.virtual_kb,
            resident_kb: raw.resident_kb,
            prev_cpu_ticks: 0,
            cur_cpu_ticks: raw.cpu_ticks,
            cpu_percent: 0.0,
            mem_percent: 0.0,
            alive: true,
        }
    }

    /// Overwrites the mutable attributes with a fresh observation of the same
    /// process lifetime. `prev_cpu_ticks` is left for the metrics engine.
    pub(crate) fn refresh(&mut self, raw: RawProcess, owner_name: String) {
        self.owner_uid = raw.uid;
        self.owner_name = owner_name;
        self.short_name = raw.short_name;
        self.command_line = raw.command_line;
        self.state = raw.state;
        self.priority = raw.priority;
        self.niceness = raw.niceness;
        self.threads = raw.threads;
        self.virtual_kb = raw.virtual_kb;
        self.resident_kb = raw.resident_kb;
        self.cur_cpu_ticks = raw.cpu_ticks;
        self.alive = true;
    }

    pub fn cpu_percent(&self) -> f64 {
        self.cpu_percent
    }

    pub fn mem_percent(&self) -> f64 {
        self.mem_percent
    }

    pub fn is_running(&self) -> bool {
        self.state == 'R'
    }

    /// Full command line, or `[name]` for kernel threads and zombies whose
    /// command line is empty.
    pub fn display_command(&self) -> String {
        if self.command_line.is_empty() {
            format!("[{}]", self.short_name)
        } else {
            self.command_line.clone()
        }
    }

    /// Program name taken from the first word of the command line, falling back
    /// to the kernel-reported name.
    pub fn program(&self) -> &str {
        self.command_line
            .split(' ')
            .next()
            .filter(|first| !first.is_empty())
            .map(|first| first.rsplit('/').next().unwrap_or(first))
            .unwrap_or(&self.short_name)
    }

    /// Case-insensitive substring match against command line, owner and
    /// program name. `needle` must already be lowercase.
    pub fn matches_filter(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.command_line.to_lowercase().contains(needle)
            || self.owner_name.to_lowercase().contains(needle)
            || self.short_name.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
pub(crate) fn raw(pid: u32, cpu_ticks: u64, resident_kb: u64) -> RawProcess {
    RawProcess {
        pid,
        uid: 1000,
        short_name: format!("proc{pid}"),
        command_line: format!("/usr/bin/proc{pid} --serve"),
        state: 'S',
        priority: 20,
        niceness: 0,
        threads: 1,
        start_time: 100,
        virtual_kb: resident_kb * 4,
        resident_kb,
        cpu_ticks,
    }
}
