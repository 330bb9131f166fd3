use std::time::Duration;
use url::Url;
use whispr_errors::AppError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FEED_PAGE_SIZE: u32 = 20;
const MAX_FEED_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct WhisprConfig {
    /// Root of the backend REST API, always ending in `/`.
    pub api_url: Url,
    pub request_timeout: Duration,
    pub feed_page_size: u32,
}

impl WhisprConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("WHISPR_API_URL").ok_or(ConfigError::Missing("WHISPR_API_URL"))?;
        let api_url = parse_api_url(&raw_url)?;

        let timeout_secs = match lookup("WHISPR_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "WHISPR_REQUEST_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            None => {
                tracing::info!("WHISPR_REQUEST_TIMEOUT_SECS not set, using default: {DEFAULT_TIMEOUT_SECS}");
                DEFAULT_TIMEOUT_SECS
            }
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "WHISPR_REQUEST_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let feed_page_size = match lookup("WHISPR_FEED_PAGE_SIZE") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                key: "WHISPR_FEED_PAGE_SIZE",
                reason: e.to_string(),
            })?,
            None => DEFAULT_FEED_PAGE_SIZE,
        };

        Ok(Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            feed_page_size: feed_page_size.clamp(1, MAX_FEED_PAGE_SIZE),
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "WHISPR_API_URL",
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    // Relative joins only keep the last path segment when it ends in '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            WhisprConfig::from_lookup(lookup(&[("WHISPR_API_URL", "https://api.whispr.example/api")]))
                .unwrap();
        assert_eq!(config.api_url.as_str(), "https://api.whispr.example/api/");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.feed_page_size, 20);
    }

    #[test]
    fn test_missing_url() {
        assert_eq!(
            WhisprConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("WHISPR_API_URL")
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(WhisprConfig::from_lookup(lookup(&[("WHISPR_API_URL", "ftp://x.example")])).is_err());
        assert!(WhisprConfig::from_lookup(lookup(&[("WHISPR_API_URL", "not a url")])).is_err());
        assert!(WhisprConfig::from_lookup(lookup(&[
            ("WHISPR_API_URL", "http://localhost:8000"),
            ("WHISPR_REQUEST_TIMEOUT_SECS", "0"),
        ]))
        .is_err());
    }

    #[test]
    fn test_page_size_is_clamped() {
        let config = WhisprConfig::from_lookup(lookup(&[
            ("WHISPR_API_URL", "http://localhost:8000/"),
            ("WHISPR_FEED_PAGE_SIZE", "5000"),
        ]))
        .unwrap();
        assert_eq!(config.feed_page_size, 100);
    }
}
