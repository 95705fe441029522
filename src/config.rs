// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Resolved once at startup; every route reads the backend location from
//! here instead of carrying its own fallback URL.

use reqwest::Url;
use std::env;
use std::time::Duration;

const DEFAULT_BACKEND_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend REST API (no trailing slash)
    pub backend_api_url: String,
    /// Origin of the backend, used for browser redirects into its OAuth2 flow
    pub backend_origin: String,
    /// Public URL of the web frontend (CORS origin, cookie `Secure` flag)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Upper bound on a single backend call
    pub backend_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            backend_api_url: DEFAULT_BACKEND_API_URL.to_string(),
            backend_origin: "http://localhost:8080".to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            port: DEFAULT_PORT,
            backend_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let backend_api_url = parse_url(
            "BACKEND_API_URL",
            &env::var("BACKEND_API_URL").unwrap_or_else(|_| DEFAULT_BACKEND_API_URL.to_string()),
        )?;

        let backend_origin = match env::var("BACKEND_ORIGIN") {
            Ok(raw) => parse_url("BACKEND_ORIGIN", &raw)?,
            Err(_) => origin_of(&backend_api_url)?,
        };

        let frontend_url = parse_url(
            "FRONTEND_URL",
            &env::var("FRONTEND_URL").unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
        )?;

        Ok(Self {
            backend_api_url,
            backend_origin,
            frontend_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            backend_timeout: Duration::from_secs(
                env::var("BACKEND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BACKEND_TIMEOUT_SECS),
            ),
        })
    }

    /// Test config pointing at a specific backend (e.g. an in-process mock).
    pub fn with_backend(backend_api_url: &str) -> Self {
        let backend_api_url = backend_api_url.trim_end_matches('/').to_string();
        let backend_origin = origin_of(&backend_api_url).unwrap_or_else(|_| backend_api_url.clone());
        Self {
            backend_api_url,
            backend_origin,
            ..Self::default()
        }
    }

    /// Whether session cookies must carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl(name, e.to_string()))?;
    Ok(trimmed.to_string())
}

/// Scheme + authority of a URL, e.g. `http://localhost:8080`.
fn origin_of(url: &str) -> Result<String, ConfigError> {
    let parsed =
        Url::parse(url).map_err(|e| ConfigError::InvalidUrl("BACKEND_API_URL", e.to_string()))?;
    Ok(parsed.origin().ascii_serialization())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid URL in {0}: {1}")]
    InvalidUrl(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("BACKEND_API_URL", "http://backend.internal:9090/api/");
        env::remove_var("BACKEND_ORIGIN");
        env::set_var("FRONTEND_URL", "https://folioflow.example.com");
        env::set_var("PORT", "not-a-port");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.backend_api_url, "http://backend.internal:9090/api");
        assert_eq!(config.backend_origin, "http://backend.internal:9090");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.secure_cookies());

        env::set_var("BACKEND_API_URL", "not a url");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidUrl("BACKEND_API_URL", _))
        ));

        env::remove_var("BACKEND_API_URL");
        env::remove_var("FRONTEND_URL");
        env::remove_var("PORT");
    }

    #[test]
    fn test_with_backend_derives_origin() {
        let config = Config::with_backend("http://127.0.0.1:4567/api/");
        assert_eq!(config.backend_api_url, "http://127.0.0.1:4567/api");
        assert_eq!(config.backend_origin, "http://127.0.0.1:4567");
        assert!(!config.secure_cookies());
    }
}
