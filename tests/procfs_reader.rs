use std::fs;
use std::path::Path;

use sentinel::engine::Sampler;
use sentinel::system::procfs::{ProcFs, SnapshotSource};
use sentinel::system::users::UserDirectory;

struct FakeProc {
    name: &'static str,
    state: char,
    utime: u64,
    stime: u64,
    start_time: u64,
    rss_pages: u64,
    uid: u32,
    cmdline: &'static [u8],
}

impl Default for FakeProc {
    fn default() -> Self {
        FakeProc {
            name: "worker",
            state: 'S',
            utime: 0,
            stime: 0,
            start_time: 500,
            rss_pages: 25,
            uid: 1000,
            cmdline: b"/usr/bin/worker\0--threads\04\0",
        }
    }
}

fn write_system(root: &Path, total_ticks: u64, mem_total_kb: u64) {
    // user nice system idle iowait irq softirq steal
    let user = total_ticks / 2;
    let idle = total_ticks - user;
    fs::write(
        root.join("stat"),
        format!("cpu  {user} 0 0 {idle} 0 0 0 0 0 0\ncpu0 {user} 0 0 {idle} 0 0 0 0 0 0\nintr 0\n"),
    )
    .unwrap();
    fs::write(
        root.join("meminfo"),
        format!("MemTotal:       {mem_total_kb} kB\nMemFree:         1000 kB\n"),
    )
    .unwrap();
    fs::write(root.join("loadavg"), "0.42 0.33 0.21 2/345 6789\n").unwrap();
    fs::write(root.join("uptime"), "3725.50 7000.00\n").unwrap();
}

fn write_proc(root: &Path, pid: u32, p: &FakeProc) {
    let dir = root.join(pid.to_string());
    fs::create_dir_all(&dir).unwrap();
    let stat = format!(
        "{pid} ({name}) {state} 1 {pid} {pid} 0 -1 4194560 500 0 0 0 {utime} {stime} 0 0 20 0 2 0 {start} 41943040 {rss} 18446744073709551615 1 1 0 0 0 0 0 0 0 0 0 0 17 1 0 0",
        name = p.name,
        state = p.state,
        utime = p.utime,
        stime = p.stime,
        start = p.start_time,
        rss = p.rss_pages,
    );
    fs::write(dir.join("stat"), stat).unwrap();
    fs::write(
        dir.join("status"),
        format!("Name:\t{}\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\n", p.name, uid = p.uid),
    )
    .unwrap();
    fs::write(dir.join("cmdline"), p.cmdline).unwrap();
}

fn fixture() -> (tempfile::TempDir, ProcFs) {
    let dir = tempfile::tempdir().unwrap();
    write_system(dir.path(), 1000, 1000);
    fs::create_dir_all(dir.path().join("self")).unwrap();
    fs::create_dir_all(dir.path().join("sys")).unwrap();
    let procfs = ProcFs::with_root(dir.path()).with_page_size_kb(4);
    (dir, procfs)
}

#[test]
fn reads_system_counters() {
    let (_dir, procfs) = fixture();
    let system = procfs.read_system();
    assert_eq!(system.total_cpu_ticks, 1000);
    assert_eq!(system.total_memory_kb, 1000);
    assert_eq!(system.load_average, [0.42, 0.33, 0.21]);
    assert!((system.uptime_seconds - 3725.5).abs() < 1e-9);
}

#[test]
fn missing_system_files_read_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let system = ProcFs::with_root(dir.path()).read_system();
    assert_eq!(system.total_cpu_ticks, 0);
    assert_eq!(system.total_memory_kb, 0);
    assert_eq!(system.load_average, [0.0; 3]);
}

#[test]
fn lists_only_numeric_entries() {
    let (dir, procfs) = fixture();
    write_proc(dir.path(), 7, &FakeProc::default());
    write_proc(dir.path(), 42, &FakeProc::default());
    let mut pids = procfs.list_pids().unwrap();
    pids.sort();
    assert_eq!(pids, vec![7, 42]);
}

#[test]
fn missing_root_is_unreadable_listing() {
    let procfs = ProcFs::with_root("/definitely/not/a/proc/root");
    assert!(procfs.list_pids().is_none());
    assert!(Sampler::new(procfs, UserDirectory::fixed(Vec::<(u32, String)>::new())).is_err());
}

#[test]
fn reads_process_attributes() {
    let (dir, procfs) = fixture();
    write_proc(
        dir.path(),
        7,
        &FakeProc {
            name: "my (odd) name",
            state: 'R',
            utime: 30,
            stime: 12,
            ..FakeProc::default()
        },
    );
    let raw = procfs.read_process(7).unwrap();
    assert_eq!(raw.short_name, "my (odd) name");
    assert_eq!(raw.state, 'R');
    assert_eq!(raw.cpu_ticks, 42);
    assert_eq!(raw.start_time, 500);
    assert_eq!(raw.resident_kb, 100);
    assert_eq!(raw.virtual_kb, 40_960);
    assert_eq!(raw.uid, 1000);
    assert_eq!(raw.command_line, "/usr/bin/worker --threads 4");
}

#[test]
fn kernel_thread_has_empty_command_line() {
    let (dir, procfs) = fixture();
    write_proc(
        dir.path(),
        2,
        &FakeProc {
            name: "kthreadd",
            cmdline: b"",
            ..FakeProc::default()
        },
    );
    let raw = procfs.read_process(2).unwrap();
    assert!(raw.command_line.is_empty());
}

#[test]
fn vanished_process_reads_as_none() {
    let (dir, procfs) = fixture();
    write_proc(dir.path(), 9, &FakeProc::default());
    fs::remove_dir_all(dir.path().join("9")).unwrap();
    assert!(procfs.read_process(9).is_none());
}

#[test]
fn truncated_stat_reads_as_none() {
    let (dir, procfs) = fixture();
    write_proc(dir.path(), 11, &FakeProc::default());
    fs::write(dir.path().join("11/stat"), "11 (short) S 1 2 3").unwrap();
    assert!(procfs.read_process(11).is_none());
}

#[test]
fn two_samples_give_fifty_percent_cpu() {
    let (dir, procfs) = fixture();
    let root = dir.path().to_path_buf();
    write_proc(
        &root,
        100,
        &FakeProc {
            utime: 60,
            stime: 40,
            ..FakeProc::default()
        },
    );

    let users = UserDirectory::fixed([(1000, "alice")]);
    let mut sampler = Sampler::new(procfs, users).unwrap();

    let first = sampler.tick();
    let record = first.records.iter().find(|r| r.pid == 100).unwrap();
    assert_eq!(record.cpu_percent(), 0.0);
    assert_eq!(record.owner_name, "alice");
    assert!((record.mem_percent() - 10.0).abs() < 1e-9);

    write_system(&root, 1200, 1000);
    write_proc(
        &root,
        100,
        &FakeProc {
            utime: 120,
            stime: 80,
            ..FakeProc::default()
        },
    );

    let second = sampler.tick();
    let record = second.records.iter().find(|r| r.pid == 100).unwrap();
    assert!((record.cpu_percent() - 50.0).abs() < 1e-9);
    assert_eq!(record.prev_cpu_ticks, 200);
    assert_eq!(second.total_observed, 1);
}
