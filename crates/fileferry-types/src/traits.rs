//! Collaborator traits for fileferry
//!
//! This module defines the seams between the orchestration core and its
//! external collaborators: the filesystem transfer primitive, the log artifact
//! writer, the system event log sink, the notification transport, and secret
//! resolution. The core consumes these as trait objects and never implements
//! their internals.

use crate::{Artifact, ArtifactFile, InfoEvent, NotificationEnvelope, Result, TransferAction};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Filesystem primitive that copies or moves a single file
#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// Apply the action to one file
    ///
    /// When `overwrite` is false and the destination already exists, the
    /// transfer must fail rather than replace or rename.
    async fn transfer(
        &self,
        action: TransferAction,
        source: &Path,
        destination: &Path,
        overwrite: bool,
    ) -> Result<()>;
}

/// Renderer and store for log artifacts
#[async_trait]
pub trait ArtifactWriter: Send + Sync {
    /// Persist an artifact, returning the paths of every file written
    async fn write_artifact(&self, artifact: &Artifact) -> Result<Vec<PathBuf>>;

    /// List the artifact files currently present in the log directory
    async fn existing_artifacts(&self) -> Result<Vec<ArtifactFile>>;

    /// Delete the given artifact files
    async fn remove_artifacts(&self, paths: &[PathBuf]) -> Result<()>;
}

/// Structured sink for operational events
#[async_trait]
pub trait SystemLogSink: Send + Sync {
    /// Append the given events to the system log
    async fn write_events(&self, events: &[InfoEvent]) -> Result<()>;
}

/// Transport that delivers a run notification
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Send the notification described by the envelope
    async fn send(&self, envelope: &NotificationEnvelope) -> Result<()>;
}

/// Resolver for configuration values that reference externally provided secrets
pub trait SecretResolver: Send + Sync {
    /// Resolve a secret reference to its value
    fn resolve(&self, reference: &str) -> Result<String>;
}
