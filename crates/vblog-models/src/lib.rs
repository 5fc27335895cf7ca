//! Shared data models for the VBlog backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job identity (ephemeral, one per submission)
//! - Generated blog content, SEO metadata, and image prompts
//! - The client-facing submission response
//! - YouTube URL validation
//!
//! It also hosts the response normalizer, a pure transform from the loosely
//! shaped AI-service output to the guaranteed response contract.

pub mod blog;
pub mod job;
pub mod normalize;
pub mod submission;
pub mod youtube;

// Re-export common types
pub use blog::{
    BlogContent, BlogResult, BlogSection, ImageSuggestion, Readability, SeoMetadata,
    SocialSnippets,
};
pub use job::{JobId, JobSource, JobStatus};
pub use normalize::{normalize, NormalizeError, NormalizeResult};
pub use submission::{SubmissionResponse, MOCK_DATA_WARNING};
pub use youtube::{extract_youtube_id, is_valid_youtube_url, YoutubeUrl, YoutubeUrlError, YoutubeUrlResult};
