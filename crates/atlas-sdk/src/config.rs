//! Client configuration.

use std::time::Duration;

use atlas_core::{AtlasError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/atlas";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, without a trailing slash (default: `http://localhost:8080/atlas`).
    pub base_url: String,
    /// Per-request timeout (default: 10 seconds).
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load configuration from the environment (and a `.env` file, if any).
    ///
    /// | Env Var                      | Default                        |
    /// |------------------------------|--------------------------------|
    /// | `ATLAS_API_URL`              | `http://localhost:8080/atlas`  |
    /// | `ATLAS_REQUEST_TIMEOUT_SECS` | `10`                           |
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("ATLAS_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout = match lookup("ATLAS_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AtlasError::Validation(format!(
                        "ATLAS_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self::new(base_url).with_timeout(request_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ATLAS_API_URL", "https://factory.example.edu/atlas/"),
            ("ATLAS_REQUEST_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://factory.example.edu/atlas");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_bad_timeout() {
        let result = ClientConfig::from_lookup(lookup(&[("ATLAS_REQUEST_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(AtlasError::Validation(_))));
    }
}
