//! Snapshot reader backed by the Linux proc filesystem.
//!
//! Every read is failure tolerant: an unreadable system file yields zeroes and
//! a process that vanished between listing and reading yields `None`.

use std::fs;
use std::path::{Path, PathBuf};

use super::platform;
use super::record::RawProcess;
use super::snapshot::SystemSnapshot;

/// Source of system-wide and per-process counters.
pub trait SnapshotSource {
    fn read_system(&self) -> SystemSnapshot;

    /// All pids currently listed. `None` only when the process listing itself
    /// cannot be read.
    fn list_pids(&self) -> Option<Vec<u32>>;

    /// `None` when the process is not present (exited or unreadable).
    fn read_process(&self, pid: u32) -> Option<RawProcess>;
}

pub struct ProcFs {
    root: PathBuf,
    page_size_kb: u64,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcFs {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            page_size_kb: (platform::page_size_bytes() / 1024).max(1),
        }
    }

    pub fn with_page_size_kb(mut self, page_size_kb: u64) -> Self {
        self.page_size_kb = page_size_kb.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.root.join(rel)).ok()
    }
}

impl SnapshotSource for ProcFs {
    fn read_system(&self) -> SystemSnapshot {
        SystemSnapshot {
            total_cpu_ticks: self.read("stat").map_or(0, |s| parse_cpu_total(&s)),
            total_memory_kb: self
                .read("meminfo")
                .and_then(|s| parse_mem_total_kb(&s))
                .unwrap_or(0),
            load_average: self
                .read("loadavg")
                .map_or([0.0; 3], |s| parse_loadavg(&s)),
            uptime_seconds: self.read("uptime").map_or(0.0, |s| parse_uptime(&s)),
        }
    }

    fn list_pids(&self) -> Option<Vec<u32>> {
        let entries = fs::read_dir(&self.root).ok()?;
        let pids = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_str()?;
                if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                name.parse().ok()
            })
            .collect();
        Some(pids)
    }

    fn read_process(&self, pid: u32) -> Option<RawProcess> {
        let stat = parse_stat(&self.read(&format!("{pid}/stat"))?, self.page_size_kb)?;
        let uid = self
            .read(&format!("{pid}/status"))
            .and_then(|s| parse_status_uid(&s))
            .unwrap_or(0);
        let command_line = fs::read(self.root.join(format!("{pid}/cmdline")))
            .map(|bytes| normalize_cmdline(&bytes))
            .unwrap_or_default();

        Some(RawProcess {
            pid,
            uid,
            short_name: stat.name,
            command_line,
            state: stat.state,
            priority: stat.priority,
            niceness: stat.niceness,
            threads: stat.threads,
            start_time: stat.start_time,
            virtual_kb: stat.virtual_kb,
            resident_kb: stat.resident_kb,
            cpu_ticks: stat.utime.saturating_add(stat.stime),
        })
    }
}

/// Fields of `/proc/<pid>/stat` the engine uses.
#[derive(Debug, Clone, PartialEq)]
pub struct StatFields {
    pub name: String,
    pub state: char,
    pub utime: u64,
    pub stime: u64,
    pub priority: i64,
    pub niceness: i64,
    pub threads: i64,
    pub start_time: u64,
    pub virtual_kb: u64,
    pub resident_kb: u64,
}

/// Parses one `/proc/<pid>/stat` line. The program name sits between the
/// first `(` and the last `)` and may itself contain spaces and parentheses.
pub fn parse_stat(contents: &str, page_size_kb: u64) -> Option<StatFields> {
    let open = contents.find('(')?;
    let close = contents.rfind(')')?;
    if close <= open {
        return None;
    }
    let name = contents[open + 1..close].to_string();
    let fields: Vec<&str> = contents[close + 1..].split_whitespace().collect();
    // fields[0] is field 3 (state) in proc(5) numbering; rss is field 24.
    if fields.len() < 22 {
        return None;
    }
    let field = |n: usize| fields[n - 3];
    let unsigned = |n: usize| field(n).parse::<u64>().unwrap_or(0);
    let signed = |n: usize| field(n).parse::<i64>().unwrap_or(0);

    Some(StatFields {
        name,
        state: field(3).chars().next()?,
        utime: unsigned(14),
        stime: unsigned(15),
        priority: signed(18),
        niceness: signed(19),
        threads: signed(20),
        start_time: unsigned(22),
        virtual_kb: unsigned(23) / 1024,
        resident_kb: (signed(24).max(0) as u64).saturating_mul(page_size_kb),
    })
}

/// Sum of every tick category on the aggregate `cpu` line of `/proc/stat`.
pub fn parse_cpu_total(contents: &str) -> u64 {
    let Some(line) = contents.lines().find(|l| l.starts_with("cpu ")) else {
        return 0;
    };
    line.split_whitespace()
        .skip(1)
        .filter_map(|tok| tok.parse::<u64>().ok())
        .fold(0u64, u64::saturating_add)
}

pub fn parse_mem_total_kb(contents: &str) -> Option<u64> {
    contents
        .lines()
        .find_map(|line| line.strip_prefix("MemTotal:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
}

pub fn parse_loadavg(contents: &str) -> [f64; 3] {
    let mut loads = [0.0; 3];
    for (slot, tok) in loads.iter_mut().zip(contents.split_whitespace()) {
        *slot = tok.parse().unwrap_or(0.0);
    }
    loads
}

pub fn parse_uptime(contents: &str) -> f64 {
    contents
        .split_whitespace()
        .next()
        .and_then(|tok| tok.parse().ok())
        .unwrap_or(0.0)
}

/// Real uid from the `Uid:` line of `/proc/<pid>/status`.
pub fn parse_status_uid(contents: &str) -> Option<u32> {
    contents
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|uid| uid.parse().ok())
}

/// NUL-separated argv to a single space-separated string.
pub fn normalize_cmdline(bytes: &[u8]) -> String {
    let replaced: Vec<u8> = bytes
        .iter()
        .map(|&b| if b == 0 { b' ' } else { b })
        .collect();
    String::from_utf8_lossy(&replaced).trim().to_string()
}
