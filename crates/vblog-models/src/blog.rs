//! Generated content types: blog article, SEO metadata, image prompts.
//!
//! These are the fully-populated shapes produced by [`crate::normalize`].
//! Field names serialize in camelCase to match the browser client.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One heading/body pair of a blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BlogSection {
    pub heading: String,
    pub content: String,
}

impl BlogSection {
    pub fn new(heading: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            content: content.into(),
        }
    }
}

/// The generated article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BlogContent {
    /// Never empty after normalization
    pub title: String,
    /// At least one section after normalization
    pub sections: Vec<BlogSection>,
}

/// Readability reported by the AI service: either a label ("Good") or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Readability {
    Score(f64),
    Label(String),
}

impl Default for Readability {
    fn default() -> Self {
        Readability::Label("Good".to_string())
    }
}

/// SEO metadata for the article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    pub title: String,
    pub meta_description: String,
    /// De-duplicated, in original order
    pub keywords: Vec<String>,
    /// 0-100
    pub seo_score: f64,
    pub readability_score: Readability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_keyword: Option<String>,
}

/// An image prompt tied to a blog section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageSuggestion {
    pub section: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Platform name to platform-specific payload.
///
/// Twitter payloads nest `{singleTweet, thread[]}`; other platforms are
/// passed through as returned by the AI service.
pub type SocialSnippets = Map<String, Value>;

/// Normalized result of AI processing.
///
/// Every field is populated; this is the contract the client can rely on
/// regardless of what the AI service actually returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogResult {
    pub transcript: String,
    pub blog: BlogContent,
    pub seo: SeoMetadata,
    pub image_suggestions: Vec<ImageSuggestion>,
    pub social_snippets: SocialSnippets,
    pub warnings: Vec<String>,
    pub available_exports: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_readability_untagged() {
        let label: Readability = serde_json::from_value(json!("Excellent")).unwrap();
        assert_eq!(label, Readability::Label("Excellent".to_string()));

        let score: Readability = serde_json::from_value(json!(62.5)).unwrap();
        assert_eq!(score, Readability::Score(62.5));
        assert_eq!(serde_json::to_value(&score).unwrap(), json!(62.5));
    }

    #[test]
    fn test_seo_camel_case() {
        let seo = SeoMetadata {
            title: "T".to_string(),
            meta_description: "D".to_string(),
            keywords: vec![],
            seo_score: 75.0,
            readability_score: Readability::default(),
            focus_keyword: None,
        };
        let value = serde_json::to_value(&seo).unwrap();
        assert_eq!(value["metaDescription"], "D");
        assert_eq!(value["readabilityScore"], "Good");
        assert!(value.get("focusKeyword").is_none());
    }
}
