//! Configuration module - API endpoints, credential, and timeouts

use std::sync::Arc;

use anyhow::{anyhow, Result};

/// Environment variable holding the Stability API key
pub const ENV_API_KEY: &str = "STABILITY_API_KEY";

/// Environment variable overriding the local enhancer completion endpoint
pub const ENV_ENHANCER_URL: &str = "MINDPALETTE_ENHANCER_URL";

/// Default Stability API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.stability.ai";

/// Default generation engine
pub const DEFAULT_ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

/// Default base URL for the local text-generation server used by the enhancer
pub const DEFAULT_ENHANCER_URL: &str = "http://127.0.0.1:8080";

/// Optional configuration parameters for Config::new()
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub api_key: Option<String>,
    pub engine: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub enhancer_base_url: Option<String>,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// Credential for the remote synthesis API. Absence is not a
    /// construction error; `generate` fails with `MissingCredential`.
    pub api_key: Option<String>,
    pub engine: String,
    pub request_timeout_secs: u64,
    pub enhancer_base_url: String,
}

impl Config {
    /// Create a new Config with a base URL plus optional settings.
    /// The API key falls back to the `STABILITY_API_KEY` environment variable.
    pub fn new(api_base_url: String, options: ConfigOptions) -> Result<Arc<Self>> {
        let api_base_url = normalize_base_url(&api_base_url)?;

        let api_key = options
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| {
                std::env::var(ENV_API_KEY)
                    .ok()
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
            });

        let enhancer_base_url = options
            .enhancer_base_url
            .or_else(|| std::env::var(ENV_ENHANCER_URL).ok())
            .unwrap_or_else(|| DEFAULT_ENHANCER_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Arc::new(Self {
            api_base_url,
            api_key,
            engine: options
                .engine
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
            request_timeout_secs: options.request_timeout_secs.unwrap_or(60),
            enhancer_base_url,
        }))
    }

    /// Config with all defaults, for tests and quick starts.
    pub fn with_defaults() -> Result<Arc<Self>> {
        Self::new(DEFAULT_API_BASE_URL.to_string(), ConfigOptions::default())
    }
}

/// Ensure the base URL carries a scheme and no trailing slash.
/// Bare hosts are upgraded to https.
fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim();
    if base_url.is_empty() {
        return Err(anyhow!("api_base_url cannot be empty"));
    }

    let base_url = if base_url.starts_with("http://") || base_url.starts_with("https://") {
        base_url.to_string()
    } else {
        format!("https://{}", base_url)
    };

    Ok(base_url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.stability.ai/").unwrap(),
            "https://api.stability.ai"
        );
        assert_eq!(
            normalize_base_url("api.stability.ai").unwrap(),
            "https://api.stability.ai"
        );
        assert_eq!(
            normalize_base_url("http://localhost:9000").unwrap(),
            "http://localhost:9000"
        );
        assert!(normalize_base_url("  ").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::new(
            DEFAULT_API_BASE_URL.to_string(),
            ConfigOptions {
                api_key: Some("sk-test".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.engine, DEFAULT_ENGINE);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_engine_override() {
        let config = Config::new(
            "api.stability.ai".to_string(),
            ConfigOptions {
                api_key: Some("sk-test".to_string()),
                engine: Some("stable-diffusion-v1-6".to_string()),
                request_timeout_secs: Some(30),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.engine, "stable-diffusion-v1-6");
        assert_eq!(config.request_timeout_secs, 30);
    }
}
