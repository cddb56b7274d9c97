//! Local filesystem transfer primitive

use async_trait::async_trait;
use fileferry_types::{Error, FileTransfer, Result, TransferAction};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// File transfer primitive backed by the local filesystem
///
/// Copies stream through `tokio::fs::copy`; moves first attempt an atomic
/// rename and fall back to copy-and-delete when the destination is on a
/// different filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileTransfer;

impl LocalFileTransfer {
    /// Create a new local transfer primitive
    pub fn new() -> Self {
        Self
    }

    async fn ensure_destination_free(destination: &Path, overwrite: bool) -> Result<()> {
        if !overwrite && fs::try_exists(destination).await? {
            return Err(Error::DestinationExists {
                path: destination.to_path_buf(),
            });
        }
        Ok(())
    }

    async fn copy_file(source: &Path, destination: &Path) -> Result<()> {
        let bytes = fs::copy(source, destination).await.map_err(|e| {
            Error::io(format!(
                "Failed to copy '{}' to '{}': {}",
                source.display(),
                destination.display(),
                e
            ))
        })?;
        debug!(
            "Copied {} bytes: {} -> {}",
            bytes,
            source.display(),
            destination.display()
        );
        Ok(())
    }

    async fn move_file(source: &Path, destination: &Path) -> Result<()> {
        match fs::rename(source, destination).await {
            Ok(()) => {
                debug!("Moved {} -> {}", source.display(), destination.display());
                Ok(())
            }
            Err(rename_error) => {
                // Rename cannot cross filesystems; fall back to copy + delete
                warn!(
                    "Rename failed ({}), falling back to copy and delete: {} -> {}",
                    rename_error,
                    source.display(),
                    destination.display()
                );
                Self::copy_file(source, destination).await?;
                fs::remove_file(source).await.map_err(|e| {
                    Error::io(format!(
                        "Copied '{}' but failed to remove the source: {}",
                        source.display(),
                        e
                    ))
                })
            }
        }
    }
}

#[async_trait]
impl FileTransfer for LocalFileTransfer {
    async fn transfer(
        &self,
        action: TransferAction,
        source: &Path,
        destination: &Path,
        overwrite: bool,
    ) -> Result<()> {
        Self::ensure_destination_free(destination, overwrite).await?;

        match action {
            TransferAction::Copy => Self::copy_file(source, destination).await,
            TransferAction::Move => Self::move_file(source, destination).await,
        }
    }
}
