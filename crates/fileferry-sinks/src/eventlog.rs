//! JSON-lines system event log sink
//!
//! Appends operational events to a structured log file, one JSON object per
//! line, tagged with the configured source and log name.

use async_trait::async_trait;
use fileferry_types::{Error, InfoEvent, Result, SystemLogSink};
use serde_json::json;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Append-only JSON-lines event log
#[derive(Debug, Clone)]
pub struct JsonlEventLog {
    path: PathBuf,
    source: String,
    log_name: String,
}

impl JsonlEventLog {
    /// Create an event log writing to the given file
    pub fn new(path: PathBuf, source: String, log_name: String) -> Self {
        Self {
            path,
            source,
            log_name,
        }
    }

    fn render(&self, event: &InfoEvent) -> Result<String> {
        let record = json!({
            "timestamp": event.timestamp,
            "source": self.source,
            "log": self.log_name,
            "severity": event.severity,
            "code": event.code,
            "message": event.message,
        });
        serde_json::to_string(&record)
            .map_err(|e| Error::event_log(format!("Failed to render event: {e}")))
    }
}

#[async_trait]
impl SystemLogSink for JsonlEventLog {
    async fn write_events(&self, events: &[InfoEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    Error::event_log(format!(
                        "Failed to create event log directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let mut lines = String::new();
        for event in events {
            lines.push_str(&self.render(event)?);
            lines.push('\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                Error::event_log(format!(
                    "Failed to open event log '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;
        file.write_all(lines.as_bytes()).await.map_err(|e| {
            Error::event_log(format!(
                "Failed to append to event log '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(
            "Appended {} event(s) to '{}'",
            events.len(),
            self.path.display()
        );
        Ok(())
    }
}
