use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use color_eyre::Result;
use color_eyre::eyre::eyre;
use tokio::sync::mpsc::UnboundedSender;

use crate::system::collector::ProcessTable;
use crate::system::metrics::MetricsEngine;
use crate::system::procfs::SnapshotSource;
use crate::system::snapshot::Frame;
use crate::system::sorter::{SortSpec, sort_records};
use crate::system::users::UserDirectory;

/// Runs the scan -> metrics -> compact pipeline once per tick.
pub struct Sampler<S> {
    source: S,
    table: ProcessTable,
    metrics: MetricsEngine,
    users: UserDirectory,
}

impl<S: SnapshotSource> Sampler<S> {
    /// Fails only when the process listing cannot be read at all.
    pub fn new(source: S, users: UserDirectory) -> Result<Self> {
        if source.list_pids().is_none() {
            return Err(eyre!("cannot enumerate processes; is /proc mounted?"));
        }
        let baseline = source.read_system();
        Ok(Self {
            source,
            table: ProcessTable::new(),
            metrics: MetricsEngine::new(&baseline),
            users,
        })
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    /// One complete cycle. The returned frame is built only after compaction,
    /// so it never reflects a half-updated table.
    pub fn tick(&mut self) -> Frame {
        let _span = tracing::debug_span!("sampler.tick").entered();

        let summary = self.table.scan(&self.source, &mut self.users);
        let system = self.source.read_system();
        let sys_delta = self.metrics.update(self.table.records_mut(), &system);
        let exited = self.table.compact();

        let mut records = Vec::with_capacity(self.table.len() + exited.len());
        records.extend_from_slice(self.table.records());
        records.extend(exited);
        sort_records(&mut records, SortSpec::default());

        tracing::debug!(
            observed = summary.total_observed,
            running = summary.total_running,
            sys_delta,
            "sample complete"
        );

        Frame {
            records,
            total_observed: summary.total_observed,
            total_running: summary.total_running,
            system,
            sampled_at: Instant::now(),
        }
    }
}

impl<S: SnapshotSource + Send + 'static> Sampler<S> {
    /// Moves the sampler onto its own thread. Frames are pushed into `tx`
    /// after every tick; the loop ends on shutdown or when the receiver is
    /// dropped.
    pub fn spawn(mut self, period: Duration, tx: UnboundedSender<Frame>) -> Result<SamplerHandle> {
        let (stop_tx, stop_rx) = mpsc::channel();
        let thread = std::thread::Builder::new()
            .name("sampler".to_string())
            .spawn(move || self.run(period, &tx, &stop_rx))?;
        Ok(SamplerHandle {
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }

    fn run(&mut self, period: Duration, tx: &UnboundedSender<Frame>, stop: &mpsc::Receiver<()>) {
        tracing::info!(period_ms = period.as_millis() as u64, "sampler started");
        let mut next = Instant::now();
        loop {
            if tx.send(self.tick()).is_err() {
                tracing::debug!("frame receiver dropped");
                break;
            }
            next += period;
            let now = Instant::now();
            if next < now {
                next = now;
            }
            match stop.recv_timeout(next - now) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::info!("sampler stopped");
    }
}

/// Owner of the sampling thread. Shutdown is observed between ticks.
pub struct SamplerHandle {
    stop: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl SamplerHandle {
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::error!("sampler thread panicked");
        }
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
