//! Feed controller end to end over HTTP

use std::sync::Arc;

use futures::future::join_all;
use shellmarket_feed::{AuctionFilters, AuctionProgress, FeedController, FetchOutcome};
use shellmarket_tests::{FakeListingBackend, Reply, auction, ids, init_test_tracing};

fn controller_for(backend: &FakeListingBackend) -> FeedController {
    FeedController::from_config(&backend.config()).unwrap()
}

#[tokio::test]
async fn test_search_then_continuation_over_http() {
    init_test_tracing();
    let backend = FakeListingBackend::start().await.unwrap();
    backend.push(Reply::Page(vec![
        auction(1, AuctionProgress::DuringAuction),
        auction(2, AuctionProgress::SuccessfulBid),
    ]));
    backend.push(Reply::Page(vec![auction(3, AuctionProgress::DuringAuction)]));
    let controller = controller_for(&backend);
    let filters = AuctionFilters::new().gender("MALE");

    controller.fetch(1, &filters, true).await.unwrap();
    assert_eq!(ids(&controller.all().await), vec![1, 2]);
    assert_eq!(ids(&controller.in_progress_only().await), vec![1]);

    controller.fetch(2, &filters, false).await.unwrap();
    assert_eq!(ids(&controller.all().await), vec![1, 2, 3]);
    assert_eq!(ids(&controller.in_progress_only().await), vec![1, 3]);

    let pages: Vec<String> = backend
        .requests()
        .iter()
        .filter_map(|r| r.params.get("page").cloned())
        .collect();
    assert_eq!(pages, vec!["1", "2"]);
    assert!(
        backend
            .requests()
            .iter()
            .all(|r| r.params.get("gender").map(String::as_str) == Some("MALE"))
    );
}

#[tokio::test]
async fn test_unlisted_progress_value_is_kept_out_of_in_progress() {
    let backend = FakeListingBackend::start().await.unwrap();
    backend.push(Reply::Raw(
        r#"{"data": {"data": {"auctions": [
            {"id": 1, "progress": "DURING_AUCTION", "tags": null},
            {"id": 2, "progress": "ENDED"}
        ]}}}"#
            .to_string(),
    ));
    backend.push(Reply::Raw(
        r#"{"data": {"data": {"auctions": [
            {"id": 3, "progress": "ENDED"},
            {"id": 4, "progress": "DURING_AUCTION"}
        ]}}}"#
            .to_string(),
    ));
    let controller = controller_for(&backend);
    let filters = AuctionFilters::new();

    controller.fetch(1, &filters, true).await.unwrap();
    assert_eq!(ids(&controller.all().await), vec![1, 2]);
    assert_eq!(ids(&controller.in_progress_only().await), vec![1]);
    assert_eq!(controller.all().await[1].progress, AuctionProgress::Unknown);

    controller.fetch(2, &filters, false).await.unwrap();
    assert_eq!(ids(&controller.all().await), vec![1, 2, 3, 4]);
    assert_eq!(ids(&controller.in_progress_only().await), vec![1, 4]);

    assert!(controller.toggle_progress_filter().await);
    assert_eq!(ids(&controller.visible().await), vec![1, 4]);
}

#[tokio::test]
async fn test_server_error_leaves_feed_unchanged() {
    let backend = FakeListingBackend::start().await.unwrap();
    backend.push(Reply::Page(vec![auction(1, AuctionProgress::DuringAuction)]));
    backend.push(Reply::Status(500, "internal".to_string()));
    backend.push(Reply::Status(500, "internal".to_string()));
    let controller = controller_for(&backend);
    let filters = AuctionFilters::new();

    controller.search(&filters).await.unwrap();
    let before = controller.snapshot().await;

    assert!(controller.fetch(2, &filters, false).await.is_err());
    assert!(controller.search(&filters).await.is_err());

    assert_eq!(controller.snapshot().await, before);
}

#[tokio::test]
async fn test_toggle_does_not_hit_backend() {
    let backend = FakeListingBackend::start().await.unwrap();
    backend.push(Reply::Page(vec![
        auction(1, AuctionProgress::BeforeAuction),
        auction(2, AuctionProgress::DuringAuction),
    ]));
    let controller = controller_for(&backend);

    controller.search(&AuctionFilters::new()).await.unwrap();
    assert_eq!(backend.request_count(), 1);

    controller.toggle_progress_filter().await;
    assert_eq!(ids(&controller.visible().await), vec![2]);
    controller.toggle_progress_filter().await;
    assert_eq!(ids(&controller.visible().await), vec![1, 2]);

    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn test_load_more_stops_after_short_page() {
    let backend = FakeListingBackend::start().await.unwrap();
    let full: Vec<_> = (1..=10)
        .map(|id| auction(id, AuctionProgress::DuringAuction))
        .collect();
    backend.push(Reply::Page(full));
    backend.push(Reply::Page(vec![auction(11, AuctionProgress::BeforeAuction)]));
    let controller = controller_for(&backend);
    let filters = AuctionFilters::new();

    controller.search(&filters).await.unwrap();
    controller.load_more(&filters).await.unwrap();
    let outcome = controller.load_more(&filters).await.unwrap();

    assert_eq!(outcome, FetchOutcome::Exhausted);
    assert_eq!(backend.request_count(), 2);
    assert_eq!(controller.all().await.len(), 11);
    assert_eq!(controller.in_progress_only().await.len(), 10);
}

#[tokio::test]
async fn test_concurrent_continuations_keep_subset_invariant() {
    let backend = FakeListingBackend::start().await.unwrap();
    backend.push(Reply::Page(Vec::new()));
    for page in 0..4i64 {
        backend.push(Reply::Page(vec![
            auction(page * 2 + 1, AuctionProgress::DuringAuction),
            auction(page * 2 + 2, AuctionProgress::NoBid),
        ]));
    }
    let controller = Arc::new(controller_for(&backend));
    let filters = AuctionFilters::new();

    controller.fetch(1, &filters, true).await.unwrap();

    let outcomes = join_all((2..=5).map(|page| {
        let controller = controller.clone();
        let filters = filters.clone();
        async move { controller.fetch(page, &filters, false).await }
    }))
    .await;

    assert!(
        outcomes
            .iter()
            .all(|o| matches!(o, Ok(FetchOutcome::Applied { .. })))
    );

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.all().len(), 8);
    let expected: Vec<i64> = snapshot
        .all()
        .iter()
        .filter(|item| item.is_in_progress())
        .map(|item| item.id)
        .collect();
    assert_eq!(ids(snapshot.in_progress_only()), expected);
    assert_eq!(snapshot.last_page(), Some(5));
}
