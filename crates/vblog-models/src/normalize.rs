//! Response normalization.
//!
//! Converts the loosely-shaped JSON returned by the AI service (or the
//! degraded placeholder) into a fully-populated [`BlogResult`].
//!
//! Fields are resolved in a fixed order so later defaults can reference
//! earlier-resolved values:
//! 1. top-level object and `blog` object (fatal if absent)
//! 2. `blog.title`
//! 3. `blog.sections` (fatal if present but not an array)
//! 4. `seo.*` (`seo.title` falls back to the resolved blog title)
//! 5. `imageSuggestions`
//! 6. `socialSnippets`, `warnings`, `availableExports`, `transcript`
//!
//! Normalization is idempotent: normalizing the serialized output of a
//! previous normalization yields an identical result.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::blog::{
    BlogContent, BlogResult, BlogSection, ImageSuggestion, Readability, SeoMetadata,
    SocialSnippets,
};

pub const DEFAULT_BLOG_TITLE: &str = "Blog Post";
pub const DEFAULT_SECTION_HEADING: &str = "Content";
pub const DEFAULT_SECTION_CONTENT: &str = "Blog content appears here.";
pub const DEFAULT_META_DESCRIPTION: &str = "Blog post generated from video";
pub const DEFAULT_SEO_SCORE: f64 = 75.0;
pub const DEFAULT_READABILITY: &str = "Good";

const MIN_SEO_SCORE: f64 = 0.0;
const MAX_SEO_SCORE: f64 = 100.0;

/// Structural errors that cannot be repaired by defaulting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Invalid response format - expected object, got {0}")]
    NotAnObject(&'static str),

    #[error("Missing blog data")]
    MissingBlog,

    #[error("blog must be an object, got {0}")]
    InvalidBlog(&'static str),

    #[error("blog.sections must be an array, got {0}")]
    SectionsNotArray(&'static str),

    #[error("blog.sections[{index}] must be an object, got {kind}")]
    InvalidSection { index: usize, kind: &'static str },
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Normalize a raw AI-service result into the full response contract.
pub fn normalize(raw: &Value) -> NormalizeResult<BlogResult> {
    let root = raw
        .as_object()
        .ok_or_else(|| NormalizeError::NotAnObject(kind_of(raw)))?;

    let blog_obj = match root.get("blog") {
        None | Some(Value::Null) => return Err(NormalizeError::MissingBlog),
        Some(Value::Object(obj)) => obj,
        Some(other) => return Err(NormalizeError::InvalidBlog(kind_of(other))),
    };

    let title = non_blank_str(blog_obj.get("title")).unwrap_or_else(|| {
        debug!("Blog title missing, using default");
        DEFAULT_BLOG_TITLE.to_string()
    });

    let sections = normalize_sections(blog_obj.get("sections"))?;

    let seo = normalize_seo(root.get("seo"), &title);

    let image_suggestions = normalize_image_suggestions(root.get("imageSuggestions"));

    let social_snippets = normalize_social_snippets(root.get("socialSnippets"));

    Ok(BlogResult {
        transcript: root
            .get("transcript")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        blog: BlogContent { title, sections },
        seo,
        image_suggestions,
        social_snippets,
        warnings: string_array(root.get("warnings")),
        available_exports: string_array(root.get("availableExports")),
    })
}

fn normalize_sections(value: Option<&Value>) -> NormalizeResult<Vec<BlogSection>> {
    let items: &[Value] = match value {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => return Err(NormalizeError::SectionsNotArray(kind_of(other))),
    };

    let mut sections = items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(obj) => Ok(BlogSection {
                heading: str_or_empty(obj.get("heading")),
                content: str_or_empty(obj.get("content")),
            }),
            other => Err(NormalizeError::InvalidSection {
                index,
                kind: kind_of(other),
            }),
        })
        .collect::<NormalizeResult<Vec<_>>>()?;

    if sections.is_empty() {
        warn!("No blog sections found, inserting default section");
        sections.push(BlogSection::new(DEFAULT_SECTION_HEADING, DEFAULT_SECTION_CONTENT));
    }

    Ok(sections)
}

fn normalize_seo(value: Option<&Value>, blog_title: &str) -> SeoMetadata {
    let empty = Map::new();
    let seo = match value {
        Some(Value::Object(obj)) => obj,
        _ => {
            debug!("Missing seo object, creating default");
            &empty
        }
    };

    let mut keywords: Vec<String> = Vec::new();
    for keyword in string_array(seo.get("keywords")) {
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    SeoMetadata {
        title: non_blank_str(seo.get("title")).unwrap_or_else(|| blog_title.to_string()),
        meta_description: non_blank_str(seo.get("metaDescription"))
            .unwrap_or_else(|| DEFAULT_META_DESCRIPTION.to_string()),
        keywords,
        seo_score: seo_score(seo.get("seoScore")),
        readability_score: readability(seo.get("readabilityScore")),
        focus_keyword: non_blank_str(seo.get("focusKeyword")),
    }
}

fn seo_score(value: Option<&Value>) -> f64 {
    let score = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match score {
        Some(s) if s.is_finite() => s.clamp(MIN_SEO_SCORE, MAX_SEO_SCORE),
        _ => DEFAULT_SEO_SCORE,
    }
}

fn readability(value: Option<&Value>) -> Readability {
    match value {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(score) if score.is_finite() => Readability::Score(score),
            _ => Readability::Label(DEFAULT_READABILITY.to_string()),
        },
        Some(Value::String(s)) if !s.trim().is_empty() => Readability::Label(s.clone()),
        _ => Readability::Label(DEFAULT_READABILITY.to_string()),
    }
}

fn normalize_image_suggestions(value: Option<&Value>) -> Vec<ImageSuggestion> {
    let Some(Value::Array(items)) = value else {
        if value.is_some_and(|v| !v.is_null()) {
            warn!("imageSuggestions is not an array, setting to empty");
        }
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| ImageSuggestion {
            section: str_or_empty(obj.get("section")),
            prompt: str_or_empty(obj.get("prompt")),
            image_url: non_blank_str(obj.get("imageUrl")),
        })
        .collect()
}

fn normalize_social_snippets(value: Option<&Value>) -> SocialSnippets {
    let Some(Value::Object(obj)) = value else {
        return SocialSnippets::new();
    };

    let mut snippets = obj.clone();
    if let Some(Value::Object(twitter)) = snippets.get_mut("twitter") {
        if !twitter.get("singleTweet").is_some_and(Value::is_string) {
            twitter.insert("singleTweet".to_string(), Value::String(String::new()));
        }
        let thread = string_array(twitter.get("thread"));
        twitter.insert(
            "thread".to_string(),
            Value::Array(thread.into_iter().map(Value::String).collect()),
        );
    }
    snippets
}

fn non_blank_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn str_or_empty(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
