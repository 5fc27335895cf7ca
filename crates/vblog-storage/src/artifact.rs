//! Scoped storage for uploaded video files.
//!
//! Each upload is written under a collision-free name
//! (`{basename}-{uuid}{.ext}`) in a dedicated directory. The returned
//! [`UploadedArtifact`] owns the file: [`ArtifactStore::release`] deletes it,
//! and an artifact dropped without being released deletes its file
//! synchronously, so cancelled requests and panics do not leak files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Default directory for transient uploads.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Longest basename kept from the client-supplied filename.
const MAX_BASENAME_LEN: usize = 100;

/// Longest extension kept from the client-supplied filename.
const MAX_EXTENSION_LEN: usize = 10;

/// A video file persisted for the duration of one request.
#[derive(Debug)]
pub struct UploadedArtifact {
    path: PathBuf,
    stored_name: String,
    original_name: String,
    size_bytes: u64,
    mime_type: String,
    released: bool,
}

impl UploadedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the file on disk.
    pub fn stored_name(&self) -> &str {
        &self.stored_name
    }

    /// Filename as supplied by the client.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

impl Drop for UploadedArtifact {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // Request was cancelled or panicked before release() ran.
        match std::fs::remove_file(&self.path) {
            Ok(()) => warn!(
                file = %self.stored_name,
                "Artifact dropped without release, removed file"
            ),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                file = %self.stored_name,
                error = %e,
                "Artifact dropped without release and could not be removed"
            ),
        }
    }
}

/// Local directory store for uploaded artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist an uploaded payload under a unique name.
    pub async fn save(
        &self,
        bytes: &[u8],
        original_name: &str,
        mime_type: &str,
    ) -> StorageResult<UploadedArtifact> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.dir.display().to_string(),
                source,
            })?;

        let stored_name = unique_file_name(original_name);
        let path = self.dir.join(&stored_name);

        // Constructed before writing so a failed or cancelled write is cleaned up.
        let artifact = UploadedArtifact {
            path,
            stored_name,
            original_name: original_name.to_string(),
            size_bytes: bytes.len() as u64,
            mime_type: mime_type.to_string(),
            released: false,
        };

        tokio::fs::write(&artifact.path, bytes).await.map_err(|e| {
            StorageError::upload_failed(format!("{}: {}", artifact.stored_name, e))
        })?;

        info!(
            file = %artifact.stored_name,
            size_bytes = artifact.size_bytes,
            "Artifact saved ({:.2} MB)",
            artifact.size_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(artifact)
    }

    /// Delete an artifact's file. Returns `false` if the file could not be
    /// removed.
    ///
    /// Never fails: a file that is already gone is logged at debug, any other
    /// failure is logged at warn. If the delete failed for another reason,
    /// the artifact's drop makes one more attempt.
    pub async fn release(&self, mut artifact: UploadedArtifact) -> bool {
        match remove(&artifact.path).await {
            Ok(true) => {
                info!(file = %artifact.stored_name, "Cleaned up artifact");
                artifact.released = true;
            }
            Ok(false) => {
                debug!(file = %artifact.stored_name, "Artifact already removed");
                artifact.released = true;
            }
            Err(e) => {
                warn!(
                    file = %artifact.stored_name,
                    error = %e,
                    "Could not delete uploaded file"
                );
            }
        }
        artifact.released
    }
}

/// Remove a file. Returns `Ok(false)` when it did not exist.
async fn remove(path: &Path) -> StorageResult<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StorageError::delete_failed(format!("{}: {}", path.display(), e))),
    }
}

/// Build `{basename}-{uuid}{.ext}` from a client-supplied filename.
///
/// Directory components are stripped and characters outside
/// `[A-Za-z0-9._-]` are replaced, so the result is always a plain file name.
pub fn unique_file_name(original_name: &str) -> String {
    let file_name = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let (stem, extension) = match file_name.rfind('.') {
        Some(idx) => (&file_name[..idx], Some(&file_name[idx + 1..])),
        _ => (file_name, None),
    };

    let mut basename: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .take(MAX_BASENAME_LEN)
        .collect();
    if basename.trim_matches('_').is_empty() {
        basename = "upload".to_string();
    }

    let extension: Option<String> = extension
        .map(|ext| {
            ext.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .take(MAX_EXTENSION_LEN)
                .collect::<String>()
        })
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => format!("{}-{}.{}", basename, Uuid::new_v4(), ext),
        None => format!("{}-{}", basename, Uuid::new_v4()),
    }
}
