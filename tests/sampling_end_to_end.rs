mod common;

use std::time::{Duration, Instant};

use common::{Synthetic, proc};
use sentinel::alert::AlertEvaluator;
use sentinel::config::AlertsConfig;
use sentinel::engine::Sampler;
use sentinel::system::users::UserDirectory;

fn sampler(source: &Synthetic) -> Sampler<Synthetic> {
    Sampler::new(source.clone(), UserDirectory::fixed([(0, "root")])).unwrap()
}

#[test]
fn pid_reuse_starts_a_fresh_record() {
    let source = Synthetic::default();
    source.set(1000, vec![proc(5, 100, 10)]);
    let mut sampler = sampler(&source);
    sampler.tick();

    source.set(1100, vec![proc(5, 150, 10)]);
    let busy = sampler.tick();
    assert!((busy.records[0].cpu_percent() - 50.0).abs() < 1e-9);

    // Same pid, different start time: a new process that must not inherit the
    // old counters.
    source.set(1200, vec![proc(5, 20, 99)]);
    let reused = sampler.tick();
    assert_eq!(reused.records.len(), 1);
    assert_eq!(reused.records[0].start_time, 99);
    assert_eq!(reused.records[0].cpu_percent(), 0.0);
    assert!(reused.records[0].alive);
}

#[test]
fn exited_process_is_published_exactly_once() {
    let source = Synthetic::default();
    source.set(1000, vec![proc(1, 10, 1), proc(2, 10, 1)]);
    let mut sampler = sampler(&source);
    sampler.tick();

    source.set(1100, vec![proc(1, 20, 1)]);
    let frame = sampler.tick();
    let gone: Vec<_> = frame.records.iter().filter(|r| !r.alive).collect();
    assert_eq!(gone.len(), 1);
    assert_eq!(gone[0].pid, 2);
    assert_eq!(frame.alive().count(), 1);
    assert_eq!(sampler.table().len(), 1);

    source.set(1200, vec![proc(1, 30, 1)]);
    let next = sampler.tick();
    assert!(next.records.iter().all(|r| r.pid != 2));
}

#[test]
fn counts_and_running_total() {
    let source = Synthetic::default();
    let mut running = proc(3, 0, 1);
    running.state = 'R';
    source.set(500, vec![proc(1, 0, 1), proc(2, 0, 1), running]);
    let frame = sampler(&source).tick();
    assert_eq!(frame.total_observed, 3);
    assert_eq!(frame.total_running, 1);
}

#[test]
fn frame_is_ranked_by_cpu() {
    let source = Synthetic::default();
    source.set(1000, vec![proc(1, 10, 1), proc(2, 10, 1), proc(3, 10, 1)]);
    let mut sampler = sampler(&source);
    sampler.tick();

    source.set(2000, vec![proc(1, 20, 1), proc(2, 510, 1), proc(3, 110, 1)]);
    let frame = sampler.tick();
    let order: Vec<u32> = frame.records.iter().map(|r| r.pid).collect();
    assert_eq!(order, vec![2, 3, 1]);
}

#[test]
fn memory_hog_missing_one_read_is_not_alerted_twice() {
    let source = Synthetic::default();
    let hog = || sentinel::system::record::RawProcess {
        resident_kb: 900_000,
        ..proc(7, 10, 1)
    };
    let mut sampler = sampler(&source);
    let mut evaluator = AlertEvaluator::default();
    let config = AlertsConfig::default();
    let start = Instant::now();

    source.set(1000, vec![hog(), proc(1, 10, 1)]);
    let seen = sampler.tick();
    assert_eq!(evaluator.evaluate(&seen, &config, start).len(), 1);

    // The stat read for pid 7 races with the scan.
    source.set(1100, vec![proc(1, 20, 1)]);
    let missed = sampler.tick();
    assert!(evaluator
        .evaluate(&missed, &config, start + Duration::from_secs(2))
        .is_empty());

    source.set(1200, vec![hog(), proc(1, 30, 1)]);
    let back = sampler.tick();
    assert!(back.alive().any(|r| r.pid == 7));
    assert!(evaluator
        .evaluate(&back, &config, start + Duration::from_secs(4))
        .is_empty());
}

#[test]
fn spawned_sampler_publishes_until_shutdown() {
    let source = Synthetic::default();
    source.set(1000, vec![proc(1, 10, 1)]);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let handle = sampler(&source)
        .spawn(Duration::from_millis(10), tx)
        .unwrap();

    let first = rx.blocking_recv().unwrap();
    assert_eq!(first.records.len(), 1);
    let _second = rx.blocking_recv().unwrap();

    handle.shutdown();
    // The thread is joined, so the sender is gone once buffered frames drain.
    while rx.blocking_recv().is_some() {}
}
