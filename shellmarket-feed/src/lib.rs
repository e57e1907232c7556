//! Shellmarket Feed - Auction listing client and feed state
//!
//! Fetches pages of turtle auctions from the listing API and keeps the
//! accumulated feed the listing view renders: every auction, plus the subset
//! still open for bidding.

#![deny(clippy::missing_errors_doc)]

pub mod carousel;
pub mod controller;
pub mod errors;
pub mod providers;
pub mod types;

pub use carousel::ImageCarousel;
pub use controller::{FeedController, FeedState, FetchOutcome, partition_in_progress};
pub use errors::FeedError;
pub use providers::{AuctionListingProvider, DemoProvider, HttpListingProvider};
pub use types::{AuctionFilters, AuctionItem, AuctionProgress, AuctionQuery, ListingEnvelope};
