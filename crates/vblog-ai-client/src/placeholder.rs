//! Placeholder content used when the AI service cannot process a file.
//!
//! The payload is deterministic and already satisfies the full response
//! contract, so it passes through normalization unchanged.

use serde_json::{json, Value};

/// Synthetic AI-service payload standing in for a real result.
pub fn placeholder_payload() -> Value {
    json!({
        "transcript": "Sample transcript from video processing",
        "blog": {
            "title": "Video Content Summary",
            "sections": [
                {
                    "heading": "Introduction",
                    "content": "This is a sample blog post generated from your video."
                },
                {
                    "heading": "Main Points",
                    "content": "Key insights and takeaways from the video content."
                },
                {
                    "heading": "Conclusion",
                    "content": "Summary and final thoughts."
                }
            ]
        },
        "seo": {
            "title": "Video Content Summary - Blog Post",
            "metaDescription": "Professional blog post generated from video content with SEO optimization",
            "keywords": ["video", "blog", "content", "summary"],
            "seoScore": 85,
            "readabilityScore": "Excellent"
        },
        "imageSuggestions": [
            { "section": "Introduction", "prompt": "Professional introduction header image" },
            { "section": "Main Points", "prompt": "Infographic showing key points" }
        ]
    })
}
