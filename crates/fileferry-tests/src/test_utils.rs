//! Shared helpers for the integration tests

use async_trait::async_trait;
use fileferry_config::TaskSpec;
use fileferry_types::{
    NotificationEnvelope, NotificationTransport, Result, TransferAction,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Create a file with the given content, creating parent folders as needed
pub fn create_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

/// Build a copy task over freshly created source and destination folders
pub fn copy_task(base: &Path, name: &str) -> TaskSpec {
    let source = base.join(format!("{name}-in"));
    let dest = base.join(format!("{name}-out"));
    std::fs::create_dir_all(&source).expect("create source folder");
    std::fs::create_dir_all(&dest).expect("create destination folder");

    TaskSpec {
        action: TransferAction::Copy,
        source_folder: source,
        match_pattern: ".*".to_string(),
        recurse: false,
        max_age_days: 0,
        dest_folder: dest,
        overwrite: false,
    }
}

/// Notification transport double that records every envelope it is handed
#[derive(Default)]
pub struct CapturingNotifier {
    envelopes: Mutex<Vec<NotificationEnvelope>>,
}

impl CapturingNotifier {
    /// Create an empty capturing notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// The envelopes captured so far
    pub fn captured(&self) -> Vec<NotificationEnvelope> {
        self.envelopes.lock().expect("notifier lock").clone()
    }

    /// Subjects of the captured envelopes
    pub fn subjects(&self) -> Vec<String> {
        self.captured().into_iter().map(|e| e.subject).collect()
    }

    /// Attachment paths of the first captured envelope
    pub fn first_attachments(&self) -> Vec<PathBuf> {
        self.captured()
            .first()
            .map(|e| e.attachments.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationTransport for CapturingNotifier {
    async fn send(&self, envelope: &NotificationEnvelope) -> Result<()> {
        self.envelopes
            .lock()
            .expect("notifier lock")
            .push(envelope.clone());
        Ok(())
    }
}
