//! HTTP listing provider for the real auction service.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use shellmarket_core::ApiConfig;
use tracing::{debug, warn};

use super::AuctionListingProvider;
use crate::errors::FeedError;
use crate::types::{AuctionItem, AuctionQuery, ListingEnvelope};

/// Listing provider backed by the auction service's HTTP API.
///
/// Issues `GET <listing url>?page=N&<filters>` and unwraps the nested
/// listing envelope. Only a 200 response is treated as success.
#[derive(Debug, Clone)]
pub struct HttpListingProvider {
    client: reqwest::Client,
    listing_url: reqwest::Url,
}

impl HttpListingProvider {
    /// Create provider from API configuration.
    ///
    /// # Errors
    ///
    /// - `FeedError::InvalidConfig` - If the listing URL is malformed, the token is not a valid
    ///   header value, or the HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self, FeedError> {
        let listing_url = config.listing_url()?;

        let mut headers = HeaderMap::new();
        if let Some(ref token) = config.access_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                FeedError::InvalidConfig {
                    reason: format!("access token is not a valid header value: {e}"),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| FeedError::InvalidConfig {
                reason: format!("HTTP client build failed: {e}"),
            })?;

        Ok(Self {
            client,
            listing_url,
        })
    }

    pub fn listing_url(&self) -> &reqwest::Url {
        &self.listing_url
    }
}

#[async_trait]
impl AuctionListingProvider for HttpListingProvider {
    async fn fetch_page(&self, query: &AuctionQuery) -> Result<Vec<AuctionItem>, FeedError> {
        let params = query.to_query_pairs();
        debug!(url = %self.listing_url, page = query.page, "Requesting auction page");

        let response = self
            .client
            .get(self.listing_url.clone())
            .query(&params)
            .send()
            .await
            .map_err(|e| FeedError::Network {
                reason: format!("listing request failed: {e}"),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), page = query.page, "Listing request rejected");
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ListingEnvelope = response.json().await.map_err(|e| FeedError::Decode {
            reason: format!("listing envelope parsing failed: {e}"),
        })?;

        Ok(envelope.into_auctions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_uses_configured_url() {
        let config = ApiConfig {
            base_url: "http://auction.internal:9000".to_string(),
            listing_path: "/api/auction/list".to_string(),
            ..Default::default()
        };

        let provider = HttpListingProvider::new(&config).unwrap();

        assert_eq!(
            provider.listing_url().as_str(),
            "http://auction.internal:9000/api/auction/list"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = ApiConfig {
            base_url: "::nope::".to_string(),
            ..Default::default()
        };

        let result = HttpListingProvider::new(&config);
        assert!(matches!(result, Err(FeedError::InvalidConfig { .. })));
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let config = ApiConfig {
            access_token: Some("abc\ndef".to_string()),
            ..Default::default()
        };

        let result = HttpListingProvider::new(&config);
        assert!(matches!(result, Err(FeedError::InvalidConfig { .. })));
    }
}
