//! Threshold alerts for the daemon.
//!
//! The evaluator owns the per-pid cooldown map and nothing else; sinks decide
//! how an event is delivered and never report failures back.

pub mod webhook;

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::AlertsConfig;
use crate::system::snapshot::Frame;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertMetric {
    Cpu,
    Memory,
}

impl AlertMetric {
    pub fn label(self) -> &'static str {
        match self {
            AlertMetric::Cpu => "CPU",
            AlertMetric::Memory => "Memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub pid: u32,
    pub metric: AlertMetric,
    pub value: f64,
    pub command: String,
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "⚠ High {}: PID {} ({}) at {:.1}%",
            self.metric.label(),
            self.pid,
            self.command,
            self.value
        )
    }
}

pub trait AlertSink: Send {
    fn deliver(&self, event: &AlertEvent);
}

/// Writes alerts to the log.
pub struct LogSink;

impl AlertSink for LogSink {
    fn deliver(&self, event: &AlertEvent) {
        tracing::warn!(pid = event.pid, metric = event.metric.label(), "{event}");
    }
}

pub struct AlertEvaluator {
    cooldown: Duration,
    last_alert: HashMap<u32, Instant>,
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl AlertEvaluator {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_alert: HashMap::new(),
        }
    }

    /// Number of pids currently inside their cooldown.
    pub fn tracked(&self) -> usize {
        self.last_alert.len()
    }

    /// Checks every alive record against the thresholds in `config`.
    ///
    /// A pid inside its cooldown is skipped entirely. Otherwise each crossed
    /// threshold yields one event and the pid's cooldown restarts once, no
    /// matter how many thresholds fired.
    pub fn evaluate(&mut self, frame: &Frame, config: &AlertsConfig, now: Instant) -> Vec<AlertEvent> {
        // Expire by age only; a pid missing from one frame keeps its cooldown.
        let cooldown = self.cooldown;
        self.last_alert
            .retain(|_, last| now.saturating_duration_since(*last) < cooldown);

        let mut events = Vec::new();
        for record in frame.alive() {
            if self.last_alert.contains_key(&record.pid) {
                continue;
            }

            let mut fired = false;
            if record.cpu_percent() >= config.cpu_threshold {
                events.push(AlertEvent {
                    pid: record.pid,
                    metric: AlertMetric::Cpu,
                    value: record.cpu_percent(),
                    command: record.display_command(),
                });
                fired = true;
            }
            if record.mem_percent() >= config.mem_threshold {
                events.push(AlertEvent {
                    pid: record.pid,
                    metric: AlertMetric::Memory,
                    value: record.mem_percent(),
                    command: record.display_command(),
                });
                fired = true;
            }
            if fired {
                self.last_alert.insert(record.pid, now);
            }
        }
        events
    }
}
