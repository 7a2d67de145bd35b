use std::path::{Path, PathBuf};
use std::time::Duration;

use guide_core::model::{RerankConfig, DEFAULT_RERANK_MODEL};
use guide_core::rerank::RERANK_TIMEOUT;

use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding the guide snapshot (an array of guides).
    pub guides_path: String,
    /// Rerank settings handed to every search call.
    pub rerank: RerankConfig,
    /// Deadline for one rerank call, never above 10 seconds.
    pub rerank_timeout: Duration,
}

impl Config {
    /// Required:
    /// - `GUIDES_PATH`: path to the guide snapshot JSON file
    ///
    /// Optional:
    /// - `RERANK_ENABLED`: `true`/`1`/`yes`/`on` enables LLM reranking (default off)
    /// - `RERANK_ENDPOINT`: chat completions URL
    /// - `RERANK_API_KEY`: bearer token for the endpoint
    /// - `RERANK_MODEL` (default: "gpt-3.5-turbo")
    /// - `RERANK_TIMEOUT_SECS` (default and maximum: 10)
    pub fn from_env() -> Result<Self, AppError> {
        let guides_path = std::env::var("GUIDES_PATH").map_err(|_| {
            AppError::Config("GUIDES_PATH environment variable is required".to_string())
        })?;

        if !Path::new(&guides_path).exists() {
            return Err(AppError::Config(format!(
                "guide snapshot not found: {guides_path}"
            )));
        }

        let rerank = RerankConfig {
            enabled: std::env::var("RERANK_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            endpoint: std::env::var("RERANK_ENDPOINT").unwrap_or_default(),
            api_key: std::env::var("RERANK_API_KEY").unwrap_or_default(),
            model: std::env::var("RERANK_MODEL")
                .unwrap_or_else(|_| DEFAULT_RERANK_MODEL.to_string()),
        };

        let rerank_timeout = parse_timeout(std::env::var("RERANK_TIMEOUT_SECS").ok().as_deref());

        Ok(Self {
            guides_path,
            rerank,
            rerank_timeout,
        })
    }

    pub fn guides_path(&self) -> PathBuf {
        PathBuf::from(&self.guides_path)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn parse_timeout(value: Option<&str>) -> Duration {
    value
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(RERANK_TIMEOUT)
        .min(RERANK_TIMEOUT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        for on in ["true", "TRUE", "1", " yes ", "On"] {
            assert!(parse_flag(on), "{on}");
        }
        for off in ["", "false", "0", "no", "enabled"] {
            assert!(!parse_flag(off), "{off}");
        }
    }

    #[test]
    fn timeout_defaults_and_clamps() {
        assert_eq!(parse_timeout(None), Duration::from_secs(10));
        assert_eq!(parse_timeout(Some("3")), Duration::from_secs(3));
        assert_eq!(parse_timeout(Some("45")), Duration::from_secs(10));
        assert_eq!(parse_timeout(Some("0")), Duration::from_secs(10));
        assert_eq!(parse_timeout(Some("soon")), Duration::from_secs(10));
    }
}
