//! Provider implementations for the auction listing endpoint.

use async_trait::async_trait;

use crate::errors::FeedError;
use crate::types::{AuctionItem, AuctionQuery};

pub mod demo;
pub mod http;
#[cfg(test)]
pub mod mock;

pub use demo::DemoProvider;
pub use http::HttpListingProvider;
#[cfg(test)]
pub use mock::ScriptedProvider;

/// Trait for auction listing providers.
///
/// Implementations fetch one page of auctions through different backends
/// (the real HTTP API, demo data, scripted providers for testing).
#[async_trait]
pub trait AuctionListingProvider: Send + Sync + std::fmt::Debug {
    /// Fetch one page of auctions matching the query.
    ///
    /// # Errors
    /// - `FeedError::Status` - Backend answered with a non-OK status
    /// - `FeedError::Network` - Network connectivity issues
    /// - `FeedError::Decode` - Body did not match the listing envelope
    async fn fetch_page(&self, query: &AuctionQuery) -> Result<Vec<AuctionItem>, FeedError>;
}
