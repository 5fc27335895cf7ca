//! Business logic services.

pub mod submission;

pub use submission::{FileUpload, SubmissionService, ALLOWED_VIDEO_TYPES};
