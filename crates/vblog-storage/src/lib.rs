//! Transient artifact storage.
//!
//! This crate provides:
//! - Collision-free on-disk names for uploaded videos
//! - Scoped ownership of one file per upload, deleted after use
//! - Drop-based cleanup for requests that never reach release

pub mod artifact;
pub mod error;

pub use artifact::{unique_file_name, ArtifactStore, UploadedArtifact, DEFAULT_UPLOAD_DIR};
pub use error::{StorageError, StorageResult};
