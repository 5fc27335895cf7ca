//! API configuration.

use std::path::PathBuf;
use std::str::FromStr;

use vblog_storage::DEFAULT_UPLOAD_DIR;

const MIB: usize = 1024 * 1024;

/// Multipart framing allowance on top of the upload limit.
const MULTIPART_OVERHEAD: usize = MIB;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second, per client IP
    pub rate_limit_rps: u32,
    /// Max size of an uploaded video in bytes
    pub max_upload_size: usize,
    /// Directory for transient uploads
    pub upload_dir: PathBuf,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: default_cors_origins(),
            rate_limit_rps: 10,
            max_upload_size: 200 * MIB,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: env_parse("RATE_LIMIT_RPS").unwrap_or(defaults.rate_limit_rps),
            max_upload_size: env_parse("MAX_UPLOAD_SIZE").unwrap_or(defaults.max_upload_size),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Max request body size: the upload limit plus multipart framing.
    pub fn max_body_size(&self) -> usize {
        self.max_upload_size.saturating_add(MULTIPART_OVERHEAD)
    }

    /// Upload limit in whole megabytes, for error messages.
    pub fn max_upload_mb(&self) -> usize {
        self.max_upload_size / MIB
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
