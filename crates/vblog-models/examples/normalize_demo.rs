//! Demo: YouTube URL validation and response normalization
//!
//! Run with: cargo run -p vblog-models --example normalize_demo

use serde_json::json;
use vblog_models::{normalize, YoutubeUrl};

fn main() {
    let test_urls = [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ?t=30",
        "https://www.youtube.com/shorts/abc123def45",
        "https://vimeo.com/123456789",
        "not-a-video-link",
    ];

    for url in test_urls {
        match YoutubeUrl::parse(url) {
            Ok(parsed) => println!("{:<50} -> {}", url, parsed.canonical()),
            Err(e) => println!("{:<50} -> rejected: {}", url, e),
        }
    }

    // A sparse AI-service payload, as it might arrive over the wire.
    let sparse = json!({
        "blog": { "title": "T", "sections": [{ "heading": "H", "content": "C" }] },
        "seo": { "keywords": ["rust", "rust", "video"], "seoScore": "140" }
    });

    println!("\n{}", "=".repeat(60));
    match normalize(&sparse) {
        Ok(result) => println!(
            "{}",
            serde_json::to_string_pretty(&result).unwrap_or_else(|e| e.to_string())
        ),
        Err(e) => println!("rejected: {}", e),
    }
}
