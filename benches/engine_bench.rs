use std::cell::Cell;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use sentinel::app::App;
use sentinel::config::Config;
use sentinel::engine::Sampler;
use sentinel::system::procfs::SnapshotSource;
use sentinel::system::record::RawProcess;
use sentinel::system::snapshot::{Frame, SystemSnapshot};
use sentinel::system::sorter::{SortColumn, SortSpec, ranked_view};
use sentinel::system::users::UserDirectory;
use sentinel::ui;

/// Source of `n` processes whose CPU counters advance on every system read.
struct Churn {
    n: u32,
    round: Cell<u64>,
}

impl SnapshotSource for Churn {
    fn read_system(&self) -> SystemSnapshot {
        let round = self.round.get() + 1;
        self.round.set(round);
        SystemSnapshot {
            total_cpu_ticks: round * 10_000,
            total_memory_kb: 16 * 1024 * 1024,
            load_average: [1.0, 1.0, 1.0],
            uptime_seconds: 1000.0,
        }
    }

    fn list_pids(&self) -> Option<Vec<u32>> {
        Some((1..=self.n).collect())
    }

    fn read_process(&self, pid: u32) -> Option<RawProcess> {
        let round = self.round.get();
        Some(RawProcess {
            pid,
            uid: pid % 8,
            short_name: format!("proc_{pid}"),
            command_line: format!("/usr/bin/proc_{pid} --work"),
            state: if pid % 7 == 0 { 'R' } else { 'S' },
            priority: 20,
            niceness: 0,
            threads: 1,
            start_time: 1,
            virtual_kb: u64::from(pid) * 4096,
            resident_kb: u64::from(pid % 97) * 1024,
            cpu_ticks: round * u64::from(pid % 13) + 1,
        })
    }
}

fn sampled_frame(n: u32) -> Frame {
    let source = Churn {
        n,
        round: Cell::new(0),
    };
    let users = UserDirectory::fixed((0..8).map(|uid| (uid, format!("user{uid}"))));
    let mut sampler = Sampler::new(source, users).expect("synthetic source lists pids");
    sampler.tick();
    sampler.tick()
}

fn bench_sampler_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler_tick_500_1000_2000");

    for size in [500u32, 1000, 2000] {
        let source = Churn {
            n: size,
            round: Cell::new(0),
        };
        let users = UserDirectory::fixed((0..8).map(|uid| (uid, format!("user{uid}"))));
        let mut sampler = Sampler::new(source, users).expect("synthetic source lists pids");
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| black_box(sampler.tick()))
        });
    }

    group.finish();
}

fn bench_ranked_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranked_view_500_1000_2000");

    for size in [500u32, 1000, 2000] {
        let frame = sampled_frame(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &frame, |b, frame| {
            b.iter(|| {
                let cpu = ranked_view(black_box(&frame.records), "", SortSpec::default(), 0);
                let user = ranked_view(
                    black_box(&frame.records),
                    "proc_1",
                    SortSpec::new(SortColumn::User),
                    100,
                );
                black_box((cpu, user));
            })
        });
    }

    group.finish();
}

fn bench_table_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_render_500_1000_2000");

    for size in [500u32, 1000, 2000] {
        let mut app = App::new(Config::default(), None, 100);
        app.apply_frame(sampled_frame(size));

        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| {
                let backend = TestBackend::new(160, 50);
                let mut terminal = Terminal::new(backend).expect("bench terminal init failed");
                terminal
                    .draw(|f| ui::draw(f, &mut app))
                    .expect("bench draw failed");
                black_box(terminal.backend());
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sampler_tick,
    bench_ranked_view,
    bench_table_render
);
criterion_main!(benches);
