//! Run pipeline: orchestration, reporting, retention, and notification
//!
//! The pipeline is the single entry point for a transfer run. It executes the
//! configured tasks, decides and writes log artifacts, applies log retention,
//! forwards operational events to the system log, and dispatches the run
//! notification. A sink failure at any stage is recorded as one run-level
//! system error and never stops the remaining stages; there is no second-order
//! failure handling beyond that one record.

use crate::notify::{build_envelope, should_notify};
use crate::orchestrator::Orchestrator;
use crate::report::{decide_artifacts, select_expired_logs};
use fileferry_config::Config;
use fileferry_fs::LocalFileTransfer;
use fileferry_types::{
    event_code, ArtifactWriter, FileTransfer, InfoEvent, NotificationTransport, RunReport,
    SystemLogSink,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, error, info};

/// The complete transfer run pipeline
pub struct Pipeline {
    config: Config,
    transfer: Arc<dyn FileTransfer>,
    artifact_writer: Option<Arc<dyn ArtifactWriter>>,
    event_log: Option<Arc<dyn SystemLogSink>>,
    notifier: Option<Arc<dyn NotificationTransport>>,
}

impl Pipeline {
    /// Create a builder for a pipeline over the given configuration
    pub fn builder(config: Config) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    /// Execute the whole run and return its report
    ///
    /// The returned report's system error collection is the run's externally
    /// observable status: non-empty means failure.
    pub async fn run(&self) -> RunReport {
        let orchestrator =
            Orchestrator::new(Arc::clone(&self.transfer), self.config.execution.retry);
        let mut report = orchestrator
            .run_all(&self.config.tasks, self.config.execution.max_concurrency)
            .await;

        report.push_event(InfoEvent::info(
            event_code::RUN_COMPLETED,
            format!(
                "Run completed: {} action(s), {} action error(s), {} system error(s)",
                report.total_actions(),
                report.action_errors(),
                report.system_error_count()
            ),
        ));

        let attachments = self.write_artifacts(&mut report).await;
        self.apply_retention(&mut report).await;
        self.write_event_log(&mut report).await;
        self.send_notification(&mut report, &attachments).await;

        report
    }

    async fn write_artifacts(&self, report: &mut RunReport) -> Vec<PathBuf> {
        let artifacts = decide_artifacts(report, &self.config.logging);
        if artifacts.is_empty() {
            debug!("No log artifacts requested for this run");
            return Vec::new();
        }

        let Some(writer) = &self.artifact_writer else {
            debug!("No artifact writer configured, skipping log persistence");
            return Vec::new();
        };

        let mut written = Vec::new();
        for artifact in &artifacts {
            match writer.write_artifact(artifact).await {
                Ok(paths) => {
                    info!(
                        "Wrote {} record(s) to {} file(s) for '{}'",
                        artifact.records.len(),
                        paths.len(),
                        artifact.file_stem
                    );
                    written.extend(paths);
                }
                Err(e) => {
                    error!("Failed to write '{}' artifact: {}", artifact.file_stem, e);
                    report.push_system_error(format!(
                        "Failed to write '{}' artifact: {}",
                        artifact.file_stem, e
                    ));
                }
            }
        }
        written
    }

    async fn apply_retention(&self, report: &mut RunReport) {
        let retention_days = self.config.logging.retention_days;
        if retention_days == 0 {
            return;
        }
        let Some(writer) = &self.artifact_writer else {
            return;
        };

        let existing = match writer.existing_artifacts().await {
            Ok(existing) => existing,
            Err(e) => {
                error!("Failed to list existing log files: {}", e);
                report.push_system_error(format!("Failed to list existing log files: {e}"));
                return;
            }
        };

        let expired = select_expired_logs(&existing, SystemTime::now(), retention_days);
        if expired.is_empty() {
            return;
        }

        info!("Deleting {} expired log file(s)", expired.len());
        if let Err(e) = writer.remove_artifacts(&expired).await {
            error!("Failed to delete expired log files: {}", e);
            report.push_system_error(format!("Failed to delete expired log files: {e}"));
        }
    }

    async fn write_event_log(&self, report: &mut RunReport) {
        if !self.config.event_log.enabled {
            return;
        }
        let Some(sink) = &self.event_log else {
            debug!("No event log sink configured, skipping");
            return;
        };

        if let Err(e) = sink.write_events(&report.events).await {
            error!("Failed to write the event log: {}", e);
            report.push_system_error(format!("Failed to write the event log: {e}"));
        }
    }

    async fn send_notification(&self, report: &mut RunReport, attachments: &[PathBuf]) {
        let summary = report.summary();
        if !should_notify(self.config.notification.trigger, &summary) {
            debug!(
                "Notification trigger {:?} did not fire",
                self.config.notification.trigger
            );
            return;
        }

        let Some(notifier) = &self.notifier else {
            report.push_system_error(
                "Notification was triggered but no transport is configured".to_string(),
            );
            return;
        };

        let envelope = build_envelope(&self.config.notification, report, attachments);
        match notifier.send(&envelope).await {
            Ok(()) => info!("Notification sent: {}", envelope.subject),
            Err(e) => {
                error!("Failed to send notification: {}", e);
                report.push_system_error(format!("Failed to send notification: {e}"));
            }
        }
    }
}

/// Builder for assembling a pipeline with its collaborators
pub struct PipelineBuilder {
    config: Config,
    transfer: Option<Arc<dyn FileTransfer>>,
    artifact_writer: Option<Arc<dyn ArtifactWriter>>,
    event_log: Option<Arc<dyn SystemLogSink>>,
    notifier: Option<Arc<dyn NotificationTransport>>,
}

impl PipelineBuilder {
    /// Create a new builder
    pub fn new(config: Config) -> Self {
        Self {
            config,
            transfer: None,
            artifact_writer: None,
            event_log: None,
            notifier: None,
        }
    }

    /// Override the file transfer primitive
    pub fn with_transfer(mut self, transfer: Arc<dyn FileTransfer>) -> Self {
        self.transfer = Some(transfer);
        self
    }

    /// Set the artifact writer
    pub fn with_artifact_writer(mut self, writer: Arc<dyn ArtifactWriter>) -> Self {
        self.artifact_writer = Some(writer);
        self
    }

    /// Set the system event log sink
    pub fn with_event_log(mut self, sink: Arc<dyn SystemLogSink>) -> Self {
        self.event_log = Some(sink);
        self
    }

    /// Set the notification transport
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationTransport>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
            transfer: self
                .transfer
                .unwrap_or_else(|| Arc::new(LocalFileTransfer::new())),
            artifact_writer: self.artifact_writer,
            event_log: self.event_log,
            notifier: self.notifier,
        }
    }
}
