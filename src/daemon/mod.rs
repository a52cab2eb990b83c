//! Headless alerting service.
//!
//! `run` drives the same sampler as the dashboard but sends frames to the
//! alert evaluator. The alert settings live behind a `watch` channel holding
//! an immutable snapshot. The file watcher swaps the snapshot in one step, so
//! an evaluation always sees one consistent set of thresholds.

pub mod pidfile;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, watch};

use crate::alert::webhook::WebhookSink;
use crate::alert::{AlertEvaluator, AlertSink, LogSink};
use crate::config::{self, AlertsConfig};
use crate::engine::Sampler;
use crate::system::control::{self, Signal};
use crate::system::platform;
use crate::system::procfs::ProcFs;
use crate::system::users::UserDirectory;

/// Runs in the foreground until SIGINT or SIGTERM.
pub async fn run(config_path: &Path, period: Duration, pid_path: &Path) -> Result<()> {
    let initial = config::load_config_from_path(config_path);
    let (cfg_tx, cfg_rx) = watch::channel(Arc::new(initial.alerts));
    let _watcher = watch_config(config_path, cfg_tx)?;

    let sinks: Vec<Box<dyn AlertSink>> = vec![
        Box::new(LogSink),
        Box::new(WebhookSink::new(cfg_rx.clone())?),
    ];
    let mut evaluator = AlertEvaluator::default();

    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
    let sampler = Sampler::new(ProcFs::new(), UserDirectory::new())?;
    let handle = sampler.spawn(period, frame_tx)?;

    pidfile::write(pid_path, std::process::id())?;
    tracing::info!(
        config = %config_path.display(),
        period_ms = period.as_millis() as u64,
        "daemon running"
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutdown requested");
                break;
            }
            frame = frame_rx.recv() => {
                let Some(frame) = frame else {
                    tracing::error!("sampler stopped unexpectedly");
                    break;
                };
                let alerts = cfg_rx.borrow().clone();
                for event in evaluator.evaluate(&frame, &alerts, frame.sampled_at) {
                    for sink in &sinks {
                        sink.deliver(&event);
                    }
                }
            }
        }
    }

    handle.shutdown();
    pidfile::remove(pid_path);
    tracing::info!("daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!("cannot listen for SIGTERM: {err}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Reloads `[alerts]` whenever the file at `path` changes.
///
/// The parent directory is watched rather than the file, since editors
/// usually replace the file instead of writing in place. An edit that fails
/// to parse leaves the current settings untouched.
pub fn watch_config(path: &Path, tx: watch::Sender<Arc<AlertsConfig>>) -> Result<RecommendedWatcher> {
    let file = path.to_path_buf();
    let file_name = path.file_name().map(|name| name.to_os_string());
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!("config watcher error: {err}");
                return;
            }
        };
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return;
        }
        if !event.paths.iter().any(|p| p.file_name() == file_name.as_deref()) {
            return;
        }
        reload_alerts(&file, &tx);
    })?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .wrap_err_with(|| format!("watching {}", dir.display()))?;
    tracing::info!(path = %path.display(), "watching config");
    Ok(watcher)
}

/// Publishes a new alerts snapshot if `path` parses and differs from the
/// current one. Returns whether anything was published.
pub fn reload_alerts(path: &Path, tx: &watch::Sender<Arc<AlertsConfig>>) -> bool {
    match config::try_load_config(path) {
        Ok(config) => tx.send_if_modified(|current| {
            if **current == config.alerts {
                return false;
            }
            tracing::info!(
                cpu = config.alerts.cpu_threshold,
                mem = config.alerts.mem_threshold,
                webhook = %config.alerts.active_webhook,
                "alert settings reloaded"
            );
            *current = Arc::new(config.alerts);
            true
        }),
        Err(err) => {
            tracing::warn!("keeping previous alert settings: {err:#}");
            false
        }
    }
}

/// Launches `daemon run` as a detached background process.
pub fn start(config_path: &Path, period: Duration, pid_path: &Path, log_args: &[OsString]) -> Result<u32> {
    if let Some(pid) = running_pid(pid_path) {
        return Err(eyre!("daemon already running with PID {pid}"));
    }

    let exe = std::env::current_exe().wrap_err("locating sentinel executable")?;
    let mut command = std::process::Command::new(exe);
    command
        .arg("--config")
        .arg(config_path)
        .arg("--refresh-rate")
        .arg(period.as_millis().to_string())
        .args(log_args)
        .arg("daemon")
        .arg("run")
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null());

    platform::detach_on_spawn(&mut command);

    let child = command.spawn().wrap_err("spawning daemon")?;
    let pid = child.id();
    pidfile::write(pid_path, pid)?;
    Ok(pid)
}

/// Sends SIGTERM to the recorded daemon. `None` means nothing was running;
/// a stale pid file is removed either way.
pub fn stop(pid_path: &Path) -> Result<Option<u32>> {
    let Some(pid) = running_pid(pid_path) else {
        pidfile::remove(pid_path);
        return Ok(None);
    };
    let result = control::send_signal(pid, Signal::Term);
    if !result.is_success() {
        return Err(eyre!(result.message()));
    }
    pidfile::remove(pid_path);
    Ok(Some(pid))
}

/// Pid of the daemon if its pid file names a live process.
pub fn running_pid(pid_path: &Path) -> Option<u32> {
    pidfile::read(pid_path).filter(|&pid| control::process_exists(pid))
}

pub fn status_line(pid_path: &Path) -> String {
    match running_pid(pid_path) {
        Some(pid) => format!("sentinel daemon is running (PID {pid})"),
        None => "sentinel daemon is not running".to_string(),
    }
}

pub fn default_pid_path() -> PathBuf {
    pidfile::default_path()
}
