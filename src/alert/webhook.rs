use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use serde_json::json;
use tokio::runtime::Handle;
use tokio::sync::watch;

use super::{AlertEvent, AlertSink};
use crate::config::AlertsConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts alerts as `{"content": "..."}` to the active webhook, which is the
/// format Discord and most chat webhooks accept.
///
/// Delivery runs on the runtime in the background. Failures are logged and
/// otherwise ignored.
pub struct WebhookSink {
    client: reqwest::Client,
    config: watch::Receiver<Arc<AlertsConfig>>,
    runtime: Handle,
}

impl WebhookSink {
    /// Must be called from inside a tokio runtime.
    pub fn new(config: watch::Receiver<Arc<AlertsConfig>>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            config,
            runtime: Handle::try_current()?,
        })
    }
}

pub fn payload(event: &AlertEvent) -> serde_json::Value {
    json!({ "content": event.to_string() })
}

impl AlertSink for WebhookSink {
    fn deliver(&self, event: &AlertEvent) {
        let Some(url) = self.config.borrow().active_webhook_url().map(str::to_string) else {
            tracing::debug!(pid = event.pid, "no active webhook, alert not posted");
            return;
        };
        let request = self.client.post(url).json(&payload(event));
        let pid = event.pid;
        self.runtime.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(pid, "alert delivered");
                }
                Ok(response) => {
                    tracing::warn!(pid, status = %response.status(), "webhook rejected alert");
                }
                Err(err) => {
                    tracing::warn!(pid, "webhook delivery failed: {err}");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertMetric;

    #[test]
    fn payload_wraps_message_in_content() {
        let event = AlertEvent {
            pid: 7,
            metric: AlertMetric::Cpu,
            value: 88.0,
            command: "say \"hi\"".into(),
        };
        let body = payload(&event);
        assert_eq!(
            body["content"].as_str(),
            Some("⚠ High CPU: PID 7 (say \"hi\") at 88.0%")
        );
    }

    #[tokio::test]
    async fn missing_webhook_is_a_no_op() {
        let (_tx, rx) = watch::channel(Arc::new(AlertsConfig::default()));
        let sink = WebhookSink::new(rx).unwrap();
        sink.deliver(&AlertEvent {
            pid: 1,
            metric: AlertMetric::Memory,
            value: 99.0,
            command: "x".into(),
        });
    }
}
