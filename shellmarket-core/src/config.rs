//! Centralized configuration for Shellmarket.
//!
//! All tunable parameters are defined here so the feed and CLI crates never
//! carry hard-coded endpoints or page sizes.

use std::time::Duration;

use url::Url;

use crate::{Result, ShellmarketError};

/// Central configuration for all Shellmarket components.
///
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct ShellmarketConfig {
    pub api: ApiConfig,
    pub feed: FeedConfig,
}

/// Listing API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Root of the auction service, optionally with a path prefix
    pub base_url: String,
    /// Path of the auction listing endpoint, resolved below `base_url`
    pub listing_path: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
    /// Bearer token sent as `Authorization` header when present
    pub access_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            listing_path: "/api/auction".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: "shellmarket/0.1.0",
            access_token: None,
        }
    }
}

impl ApiConfig {
    /// Full URL of the listing endpoint.
    ///
    /// `listing_path` always lands below the base path, so a gateway prefix
    /// such as `https://gw.example.com/auction-svc` is kept.
    ///
    /// # Errors
    ///
    /// - `ShellmarketError::Configuration` - If the base URL or path does not form a valid URL
    pub fn listing_url(&self) -> Result<Url> {
        let mut base = Url::parse(&self.base_url).map_err(|e| ShellmarketError::Configuration {
            reason: format!("invalid base URL '{}': {e}", self.base_url),
        })?;

        if !base.path().ends_with('/') {
            let directory = format!("{}/", base.path());
            base.set_path(&directory);
        }

        base.join(self.listing_path.trim_start_matches('/'))
            .map_err(|e| ShellmarketError::Configuration {
                reason: format!("invalid listing path '{}': {e}", self.listing_path),
            })
    }
}

/// Feed pagination settings.
///
/// The backend serves fixed-size pages starting at page 1.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Number of auctions the backend returns per full page
    pub page_size: usize,
    /// Page number a fresh search starts from
    pub first_page: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            first_page: 1,
        }
    }
}

impl ShellmarketConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup.
    ///
    /// Same rules as [`ShellmarketConfig::from_env`], but the source of values
    /// is supplied by the caller.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("SHELLMARKET_API_BASE_URL") {
            config.api.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(path) = lookup("SHELLMARKET_LISTING_PATH") {
            config.api.listing_path = path;
        }

        if let Some(timeout) = lookup("SHELLMARKET_API_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.api.timeout = Duration::from_secs(seconds);
            }
        }

        if let Some(token) = lookup("SHELLMARKET_API_TOKEN") {
            if !token.is_empty() {
                config.api.access_token = Some(token);
            }
        }

        if let Some(page_size) = lookup("SHELLMARKET_PAGE_SIZE") {
            if let Ok(size) = page_size.parse::<usize>() {
                config.feed.page_size = size;
            }
        }

        if let Some(first_page) = lookup("SHELLMARKET_FIRST_PAGE") {
            if let Ok(page) = first_page.parse::<u32>() {
                config.feed.first_page = page;
            }
        }

        config
    }

    /// Checks that the configuration can drive a feed.
    ///
    /// # Errors
    ///
    /// - `ShellmarketError::Configuration` - Empty or malformed base URL, or zero page size
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(ShellmarketError::Configuration {
                reason: "API base URL is empty".to_string(),
            });
        }

        self.api.listing_url()?;

        if self.feed.page_size == 0 {
            return Err(ShellmarketError::Configuration {
                reason: "page size must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Creates a configuration pointing at a local test backend.
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                timeout: Duration::from_secs(2),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_values() {
        let config = ShellmarketConfig::default();

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.listing_path, "/api/auction");
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert!(config.api.access_token.is_none());
        assert_eq!(config.feed.page_size, 10);
        assert_eq!(config.feed.first_page, 1);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = ShellmarketConfig::from_lookup(lookup_from(&[
            ("SHELLMARKET_API_BASE_URL", "https://turtle.example.com/"),
            ("SHELLMARKET_API_TIMEOUT", "3"),
            ("SHELLMARKET_API_TOKEN", "secret"),
            ("SHELLMARKET_PAGE_SIZE", "20"),
            ("SHELLMARKET_FIRST_PAGE", "0"),
        ]));

        assert_eq!(config.api.base_url, "https://turtle.example.com");
        assert_eq!(config.api.timeout, Duration::from_secs(3));
        assert_eq!(config.api.access_token.as_deref(), Some("secret"));
        assert_eq!(config.feed.page_size, 20);
        assert_eq!(config.feed.first_page, 0);
    }

    #[test]
    fn test_invalid_overrides_keep_defaults() {
        let config = ShellmarketConfig::from_lookup(lookup_from(&[
            ("SHELLMARKET_API_TIMEOUT", "soon"),
            ("SHELLMARKET_PAGE_SIZE", "-4"),
            ("SHELLMARKET_API_TOKEN", ""),
        ]));

        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.feed.page_size, 10);
        assert!(config.api.access_token.is_none());
    }

    #[test]
    fn test_listing_url_joins_path() {
        let config = ShellmarketConfig::default();
        let url = config.api.listing_url().unwrap();

        assert_eq!(url.as_str(), "http://localhost:8080/api/auction");
    }

    #[test]
    fn test_listing_url_keeps_base_path_prefix() {
        let config = ShellmarketConfig::from_lookup(lookup_from(&[(
            "SHELLMARKET_API_BASE_URL",
            "https://gw.example.com/auction-svc/",
        )]));

        assert_eq!(config.api.base_url, "https://gw.example.com/auction-svc");
        assert_eq!(
            config.api.listing_url().unwrap().as_str(),
            "https://gw.example.com/auction-svc/api/auction"
        );

        let mut api = ApiConfig {
            base_url: "https://gw.example.com/v2/".to_string(),
            ..Default::default()
        };
        api.listing_path = "auctions".to_string();
        assert_eq!(
            api.listing_url().unwrap().as_str(),
            "https://gw.example.com/v2/auctions"
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ShellmarketConfig::default();
        config.feed.page_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ShellmarketError::Configuration { .. })
        ));

        let config = ShellmarketConfig::for_testing("not a url");
        assert!(config.validate().is_err());

        let config = ShellmarketConfig::for_testing("");
        assert!(config.validate().is_err());

        assert!(ShellmarketConfig::default().validate().is_ok());
    }
}
