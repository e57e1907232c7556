//! Integration tests for Shellmarket
//!
//! Drive the real reqwest listing provider and the feed controller against an
//! in-process fake of the auction service.

#[path = "integration/listing_api.rs"]
mod listing_api;

#[path = "integration/feed_flow.rs"]
mod feed_flow;
