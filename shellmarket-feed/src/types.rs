//! Data types for the auction listing API.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state of an auction as reported by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionProgress {
    BeforeAuction,
    DuringAuction,
    SuccessfulBid,
    NoBid,
    /// Any status this client does not know yet
    #[serde(other)]
    Unknown,
}

impl AuctionProgress {
    /// Wire representation, as used in the `progress` query filter.
    pub fn as_str(self) -> &'static str {
        match self {
            AuctionProgress::BeforeAuction => "BEFORE_AUCTION",
            AuctionProgress::DuringAuction => "DURING_AUCTION",
            AuctionProgress::SuccessfulBid => "SUCCESSFUL_BID",
            AuctionProgress::NoBid => "NO_BID",
            AuctionProgress::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for AuctionProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single auction as listed by the backend.
///
/// Only `id` and `progress` are required; everything else is display payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionItem {
    pub id: i64,
    pub progress: AuctionProgress,
    pub title: Option<String>,
    pub min_bid: Option<f64>,
    pub winning_bid: Option<f64>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub content: Option<String>,
    pub turtle_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_addresses: Vec<String>,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Missing and `null` lists both decode as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl AuctionItem {
    /// Creates an item with no display payload.
    pub fn new(id: i64, progress: AuctionProgress) -> Self {
        Self {
            id,
            progress,
            title: None,
            min_bid: None,
            winning_bid: None,
            start_time: None,
            end_time: None,
            content: None,
            turtle_id: None,
            tags: Vec::new(),
            image_addresses: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Whether bidding is currently open.
    pub fn is_in_progress(&self) -> bool {
        self.progress == AuctionProgress::DuringAuction
    }

    /// Highest known price: the winning bid when present, else the minimum bid.
    pub fn current_price(&self) -> Option<f64> {
        self.winning_bid.or(self.min_bid)
    }
}

/// Opaque filter criteria forwarded verbatim as query parameters.
///
/// `page` is reserved for the pagination cursor and is never stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuctionFilters {
    params: BTreeMap<String, String>,
}

impl AuctionFilters {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a filter. A `page` key is ignored.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a filter in place. Returns false for the reserved `page` key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> bool {
        let key = key.into();
        if key == "page" {
            return false;
        }
        self.params.insert(key, value.to_string());
        true
    }

    pub fn gender(self, gender: &str) -> Self {
        self.with("gender", gender)
    }

    pub fn min_size(self, size: f64) -> Self {
        self.with("minSize", size)
    }

    pub fn max_size(self, size: f64) -> Self {
        self.with("maxSize", size)
    }

    pub fn min_price(self, price: f64) -> Self {
        self.with("minPrice", price)
    }

    pub fn max_price(self, price: f64) -> Self {
        self.with("maxPrice", price)
    }

    pub fn progress(self, progress: AuctionProgress) -> Self {
        self.with("progress", progress.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// One page request against the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionQuery {
    pub page: u32,
    pub filters: AuctionFilters,
}

impl AuctionQuery {
    pub fn new(page: u32, filters: AuctionFilters) -> Self {
        Self { page, filters }
    }

    /// Query parameters in wire order: `page` first, then every filter.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.params.len() + 1);
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.extend(
            self.filters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        pairs
    }
}

/// Response body of the listing endpoint.
///
/// The auctions sit two `data` levels deep. This looks like an accidental
/// double wrap on the backend, but existing servers depend on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingEnvelope {
    pub data: ListingData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingData {
    pub data: ListingPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPage {
    pub auctions: Vec<AuctionItem>,
}

impl ListingEnvelope {
    /// Wraps items in the wire envelope.
    pub fn wrap(auctions: Vec<AuctionItem>) -> Self {
        Self {
            data: ListingData {
                data: ListingPage { auctions },
            },
        }
    }

    pub fn into_auctions(self) -> Vec<AuctionItem> {
        self.data.data.auctions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_decodes_nested_auctions() {
        let body = r#"{
            "status": 200,
            "message": "ok",
            "data": {"data": {"auctions": [
                {"id": 7, "progress": "DURING_AUCTION", "title": "Red-eared slider",
                 "minBid": 12000.0, "startTime": "2024-08-10T09:30:00",
                 "tags": ["female", "baby"], "sellerName": "kkobuk-mom"},
                {"id": 8, "progress": "SUCCESSFUL_BID"}
            ]}}
        }"#;

        let envelope: ListingEnvelope = serde_json::from_str(body).unwrap();
        let auctions = envelope.into_auctions();

        assert_eq!(auctions.len(), 2);
        assert_eq!(auctions[0].id, 7);
        assert!(auctions[0].is_in_progress());
        assert_eq!(auctions[0].title.as_deref(), Some("Red-eared slider"));
        assert_eq!(auctions[0].tags, vec!["female", "baby"]);
        assert_eq!(
            auctions[0].extra.get("sellerName").and_then(|v| v.as_str()),
            Some("kkobuk-mom")
        );
        assert!(auctions[0].start_time.is_some());
        assert_eq!(auctions[1].progress, AuctionProgress::SuccessfulBid);
        assert!(auctions[1].image_addresses.is_empty());
    }

    #[test]
    fn test_unknown_progress_does_not_fail_decode() {
        let item: AuctionItem =
            serde_json::from_str(r#"{"id": 1, "progress": "ENDED"}"#).unwrap();

        assert_eq!(item.progress, AuctionProgress::Unknown);
        assert!(!item.is_in_progress());
    }

    #[test]
    fn test_null_lists_decode_as_empty() {
        let body = r#"{"data": {"data": {"auctions": [
            {"id": 1, "progress": "DURING_AUCTION", "tags": null, "imageAddresses": null},
            {"id": 2, "progress": "ENDED"}
        ]}}}"#;

        let auctions = serde_json::from_str::<ListingEnvelope>(body)
            .unwrap()
            .into_auctions();

        assert_eq!(auctions.len(), 2);
        assert!(auctions[0].tags.is_empty());
        assert!(auctions[0].image_addresses.is_empty());
        assert_eq!(auctions[1].progress, AuctionProgress::Unknown);
    }

    #[test]
    fn test_missing_progress_is_decode_error() {
        let result = serde_json::from_str::<AuctionItem>(r#"{"id": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_filters_reserve_page_key() {
        let mut filters = AuctionFilters::new().gender("FEMALE").min_price(5000.0);

        assert!(!filters.insert("page", 9));
        assert_eq!(filters.get("page"), None);
        assert_eq!(filters.get("gender"), Some("FEMALE"));
        assert_eq!(filters.get("minPrice"), Some("5000"));
    }

    #[test]
    fn test_query_pairs_put_page_first() {
        let query = AuctionQuery::new(
            3,
            AuctionFilters::new()
                .progress(AuctionProgress::DuringAuction)
                .max_size(30.5),
        );

        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("page".to_string(), "3".to_string()),
                ("maxSize".to_string(), "30.5".to_string()),
                ("progress".to_string(), "DURING_AUCTION".to_string()),
            ]
        );
    }

    #[test]
    fn test_current_price_prefers_winning_bid() {
        let mut item = AuctionItem::new(1, AuctionProgress::DuringAuction);
        assert_eq!(item.current_price(), None);

        item.min_bid = Some(10000.0);
        assert_eq!(item.current_price(), Some(10000.0));

        item.winning_bid = Some(12000.0);
        assert_eq!(item.current_price(), Some(12000.0));
    }
}
