//! Auction feed controller
//!
//! Owns the two materialized auction lists behind the listing view: every
//! fetched auction, and the subset whose bidding is open. A fresh search
//! replaces both lists, a continuation appends to both. The view flag only
//! chooses which list is displayed and never triggers a fetch.
//!
//! Every fetch takes a request token when issued. A response is dropped as
//! superseded when a search was issued after it, so a slow search can never
//! overwrite the results of a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use shellmarket_core::{FeedConfig, ShellmarketConfig};
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use crate::errors::FeedError;
use crate::providers::{AuctionListingProvider, HttpListingProvider};
use crate::types::{AuctionFilters, AuctionItem, AuctionQuery};

/// Result of a fetch that reached the provider or was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response was merged into the feed.
    Applied {
        page: u32,
        /// Items in this response
        received: usize,
        /// Items in this response with bidding open
        in_progress_received: usize,
        /// Whether the lists were replaced rather than appended to
        replaced: bool,
    },
    /// A newer search was issued while this request was in flight.
    Superseded { page: u32, token: u64 },
    /// A short page was already seen; no request was sent.
    Exhausted,
}

/// Materialized feed lists and view flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    all: Vec<AuctionItem>,
    in_progress_only: Vec<AuctionItem>,
    show_in_progress_only: bool,
    last_page: Option<u32>,
    exhausted: bool,
}

impl FeedState {
    pub fn all(&self) -> &[AuctionItem] {
        &self.all
    }

    pub fn in_progress_only(&self) -> &[AuctionItem] {
        &self.in_progress_only
    }

    pub fn show_in_progress_only(&self) -> bool {
        self.show_in_progress_only
    }

    /// Most recently applied page, if any.
    pub fn last_page(&self) -> Option<u32> {
        self.last_page
    }

    /// Whether the last applied page was shorter than a full page.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The list the presentation layer should render.
    pub fn visible(&self) -> &[AuctionItem] {
        if self.show_in_progress_only {
            &self.in_progress_only
        } else {
            &self.all
        }
    }

    /// Flips the view flag and returns the new value.
    pub fn toggle_progress_filter(&mut self) -> bool {
        self.show_in_progress_only = !self.show_in_progress_only;
        self.show_in_progress_only
    }

    /// Merges one page of results into the lists.
    pub fn apply_page(
        &mut self,
        page: u32,
        items: Vec<AuctionItem>,
        is_search: bool,
        page_size: usize,
    ) -> FetchOutcome {
        let received = items.len();
        let (all, in_progress) = partition_in_progress(items);
        let in_progress_received = in_progress.len();

        if is_search {
            self.all = all;
            self.in_progress_only = in_progress;
            self.last_page = Some(page);
        } else {
            self.all.extend(all);
            self.in_progress_only.extend(in_progress);
            self.last_page = Some(self.last_page.map_or(page, |last| last.max(page)));
        }
        self.exhausted = received < page_size;

        FetchOutcome::Applied {
            page,
            received,
            in_progress_received,
            replaced: is_search,
        }
    }
}

/// Splits a page into the full list and its in-progress subset.
///
/// Single pass; both outputs keep the input order.
pub fn partition_in_progress(items: Vec<AuctionItem>) -> (Vec<AuctionItem>, Vec<AuctionItem>) {
    let in_progress = items
        .iter()
        .filter(|item| item.is_in_progress())
        .cloned()
        .collect();
    (items, in_progress)
}

/// Controller for the paginated, filtered auction feed.
///
/// Shared by reference with the presentation layer. State is only mutated
/// after a successful response; the lock is never held across a request.
#[derive(Debug)]
pub struct FeedController {
    provider: Arc<dyn AuctionListingProvider>,
    config: FeedConfig,
    state: RwLock<FeedState>,
    request_counter: AtomicU64,
    latest_search: AtomicU64,
}

impl FeedController {
    /// Creates a controller with an empty feed showing all auctions.
    pub fn new(provider: Arc<dyn AuctionListingProvider>, config: FeedConfig) -> Self {
        Self {
            provider,
            config,
            state: RwLock::new(FeedState::default()),
            request_counter: AtomicU64::new(0),
            latest_search: AtomicU64::new(0),
        }
    }

    /// Creates a controller talking to the configured HTTP listing endpoint.
    ///
    /// # Errors
    ///
    /// - `FeedError::InvalidConfig` - If the configuration cannot produce an HTTP provider
    pub fn from_config(config: &ShellmarketConfig) -> Result<Self, FeedError> {
        config.validate()?;
        let provider = HttpListingProvider::new(&config.api)?;
        Ok(Self::new(Arc::new(provider), config.feed.clone()))
    }

    /// Fetches one page and merges it into the feed.
    ///
    /// With `is_search` both lists are replaced by this page, otherwise the
    /// page is appended. On any error the feed is left untouched.
    ///
    /// # Errors
    ///
    /// - `FeedError::Status` - Backend answered with a non-OK status
    /// - `FeedError::Network` - Request did not complete
    /// - `FeedError::Decode` - Body did not match the listing envelope
    pub async fn fetch(
        &self,
        page: u32,
        filters: &AuctionFilters,
        is_search: bool,
    ) -> Result<FetchOutcome, FeedError> {
        let token = self.request_counter.fetch_add(1, Ordering::SeqCst) + 1;
        if is_search {
            self.latest_search.fetch_max(token, Ordering::SeqCst);
        }

        debug!(page, token, is_search, "Fetching auction page");
        let query = AuctionQuery::new(page, filters.clone());

        let items = match self.provider.fetch_page(&query).await {
            Ok(items) => items,
            Err(e) => {
                warn!(page, token, "Auction page fetch failed: {}", e);
                return Err(e);
            }
        };

        let mut state = self.state.write().await;

        if token < self.latest_search.load(Ordering::SeqCst) {
            warn!(page, token, "Discarding auction page superseded by a newer search");
            return Ok(FetchOutcome::Superseded { page, token });
        }

        let outcome = state.apply_page(page, items, is_search, self.config.page_size);
        info!(
            page,
            token,
            total = state.all.len(),
            in_progress = state.in_progress_only.len(),
            "Applied auction page: {:?}",
            outcome
        );

        Ok(outcome)
    }

    /// Starts a fresh search from the first page.
    ///
    /// # Errors
    ///
    /// Same as [`FeedController::fetch`].
    pub async fn search(&self, filters: &AuctionFilters) -> Result<FetchOutcome, FeedError> {
        self.fetch(self.config.first_page, filters, true).await
    }

    /// Appends the page after the last applied one.
    ///
    /// Returns [`FetchOutcome::Exhausted`] without a request once a short page
    /// has been seen.
    ///
    /// # Errors
    ///
    /// Same as [`FeedController::fetch`].
    pub async fn load_more(&self, filters: &AuctionFilters) -> Result<FetchOutcome, FeedError> {
        let next_page = {
            let state = self.state.read().await;
            if state.exhausted {
                debug!("Auction feed exhausted, skipping load more");
                return Ok(FetchOutcome::Exhausted);
            }
            state
                .last_page
                .map_or(self.config.first_page, |last| last.saturating_add(1))
        };

        self.fetch(next_page, filters, false).await
    }

    /// Flips between all auctions and in-progress auctions.
    ///
    /// Returns the new flag value. Never fetches.
    pub async fn toggle_progress_filter(&self) -> bool {
        self.state.write().await.toggle_progress_filter()
    }

    pub async fn set_progress_filter(&self, show_in_progress_only: bool) {
        self.state.write().await.show_in_progress_only = show_in_progress_only;
    }

    pub async fn show_in_progress_only(&self) -> bool {
        self.state.read().await.show_in_progress_only
    }

    /// The list currently selected by the view flag.
    pub async fn visible(&self) -> RwLockReadGuard<'_, [AuctionItem]> {
        RwLockReadGuard::map(self.state.read().await, FeedState::visible)
    }

    pub async fn all(&self) -> RwLockReadGuard<'_, [AuctionItem]> {
        RwLockReadGuard::map(self.state.read().await, FeedState::all)
    }

    pub async fn in_progress_only(&self) -> RwLockReadGuard<'_, [AuctionItem]> {
        RwLockReadGuard::map(self.state.read().await, FeedState::in_progress_only)
    }

    /// Copy of the full feed state.
    pub async fn snapshot(&self) -> FeedState {
        self.state.read().await.clone()
    }
}
