use crate::error::TelemetryError;
use crate::recorder::TracingRecorder;
use jiff::Timestamp;
use serde::Serialize;
use snip_core::{EventRecorder, Level, LogEvent, Package, Stack};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Where and how to ship events to the remote log collector.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub token: Option<String>,
    /// Events buffered before new ones are dropped.
    pub queue_capacity: usize,
    pub request_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            queue_capacity: 1024,
            request_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }
}

/// Body posted to the collector.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RemoteLog {
    stack: Stack,
    level: Level,
    package: Package,
    message: String,
    timestamp: Timestamp,
}

impl From<LogEvent> for RemoteLog {
    fn from(event: LogEvent) -> Self {
        Self {
            stack: event.stack,
            level: event.level,
            package: event.package,
            message: event.message,
            timestamp: Timestamp::now(),
        }
    }
}

/// Logs locally, then queues the event for delivery to a remote collector.
///
/// `record` never waits: a full queue drops the event, and delivery
/// failures in the background worker only produce a local warning.
#[derive(Debug, Clone)]
pub struct RemoteRecorder {
    queue: mpsc::Sender<RemoteLog>,
}

impl RemoteRecorder {
    /// Starts the delivery worker on the current tokio runtime.
    ///
    /// The worker exits once every clone of the recorder is dropped and the
    /// queue is drained.
    pub fn spawn(config: RemoteConfig) -> Result<(Self, JoinHandle<()>), TelemetryError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));

        let worker = tokio::spawn(deliver(client, config, rx));
        Ok((Self { queue: tx }, worker))
    }
}

impl EventRecorder for RemoteRecorder {
    fn record(&self, event: LogEvent) {
        if !TracingRecorder::accept(&event) {
            return;
        }
        TracingRecorder::emit(&event);

        match self.queue.try_send(event.into()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(target: "snip::events", "remote log queue full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                debug!(target: "snip::events", "remote log worker stopped, dropping event");
            }
        }
    }
}

async fn deliver(client: reqwest::Client, config: RemoteConfig, mut rx: mpsc::Receiver<RemoteLog>) {
    while let Some(log) = rx.recv().await {
        let mut request = client.post(&config.endpoint).json(&log);
        if let Some(token) = &config.token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                debug!(target: "snip::events", "delivered log event");
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!(
                    target: "snip::events",
                    %status,
                    body = %body,
                    "remote logging rejected event"
                );
            }
            Err(e) => {
                warn!(
                    target: "snip::events",
                    error = %e,
                    "remote logging unavailable, continuing"
                );
            }
        }
    }
}
