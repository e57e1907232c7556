//! Demo provider implementation for development without a backend.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use super::AuctionListingProvider;
use crate::errors::FeedError;
use crate::types::{AuctionItem, AuctionProgress, AuctionQuery};

const SPECIES: [&str; 5] = [
    "Red-eared slider",
    "Russian tortoise",
    "Hermann's tortoise",
    "Yellow-bellied slider",
    "Leopard tortoise",
];

/// Demo provider serving a fixed in-memory catalogue.
///
/// Pages are 1-based like the real backend. The `progress`, `minPrice` and
/// `maxPrice` filters are honoured; other filters are accepted and ignored.
#[derive(Debug)]
pub struct DemoProvider {
    catalogue: Vec<AuctionItem>,
    page_size: usize,
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new(23, 10)
    }
}

impl DemoProvider {
    /// Creates a demo catalogue with `count` auctions served `page_size` at a time.
    pub fn new(count: usize, page_size: usize) -> Self {
        let base = NaiveDate::from_ymd_opt(2024, 8, 10)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap_or_default();

        let catalogue = (0..count)
            .map(|i| {
                let progress = match i % 4 {
                    0 | 1 => AuctionProgress::DuringAuction,
                    2 => AuctionProgress::BeforeAuction,
                    _ => AuctionProgress::SuccessfulBid,
                };
                let start = base + Duration::hours(i as i64 * 6);

                let mut item = AuctionItem::new(i as i64 + 1, progress);
                item.title = Some(SPECIES[i % SPECIES.len()].to_string());
                item.min_bid = Some(5000.0 + (i as f64) * 2500.0);
                item.start_time = Some(start);
                item.end_time = Some(start + Duration::hours(2));
                item.turtle_id = Some(100 + i as i64);
                item.tags = vec![if i % 2 == 0 { "female" } else { "male" }.to_string()];
                item.image_addresses = vec![format!("/static/turtles/{}.jpg", i + 1)];
                item
            })
            .collect();

        Self {
            catalogue,
            page_size: page_size.max(1),
        }
    }

    fn matches(item: &AuctionItem, query: &AuctionQuery) -> bool {
        if let Some(progress) = query.filters.get("progress") {
            if item.progress.as_str() != progress {
                return false;
            }
        }

        let price = item.min_bid.unwrap_or_default();
        if let Some(min) = query.filters.get("minPrice").and_then(|v| v.parse::<f64>().ok()) {
            if price < min {
                return false;
            }
        }
        if let Some(max) = query.filters.get("maxPrice").and_then(|v| v.parse::<f64>().ok()) {
            if price > max {
                return false;
            }
        }

        true
    }
}

#[async_trait]
impl AuctionListingProvider for DemoProvider {
    async fn fetch_page(&self, query: &AuctionQuery) -> Result<Vec<AuctionItem>, FeedError> {
        let skip = (query.page.max(1) as usize - 1) * self.page_size;

        Ok(self
            .catalogue
            .iter()
            .filter(|item| Self::matches(item, query))
            .skip(skip)
            .take(self.page_size)
            .cloned()
            .collect())
    }
}
