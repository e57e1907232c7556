//! HTTP listing provider against the fake backend

use shellmarket_feed::{
    AuctionFilters, AuctionListingProvider, AuctionProgress, AuctionQuery, FeedError,
    HttpListingProvider,
};
use shellmarket_tests::{FakeListingBackend, Reply, auction, ids, init_test_tracing};

#[tokio::test]
async fn test_page_and_filters_sent_as_query_parameters() {
    init_test_tracing();
    let backend = FakeListingBackend::start().await.unwrap();
    let provider = HttpListingProvider::new(&backend.config().api).unwrap();

    let filters = AuctionFilters::new()
        .gender("FEMALE")
        .min_price(10000.0)
        .progress(AuctionProgress::DuringAuction)
        .with("species", "red eared slider");
    provider
        .fetch_page(&AuctionQuery::new(2, filters))
        .await
        .unwrap();

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let params = &requests[0].params;
    assert_eq!(params.get("page").map(String::as_str), Some("2"));
    assert_eq!(params.get("gender").map(String::as_str), Some("FEMALE"));
    assert_eq!(params.get("minPrice").map(String::as_str), Some("10000"));
    assert_eq!(params.get("progress").map(String::as_str), Some("DURING_AUCTION"));
    assert_eq!(
        params.get("species").map(String::as_str),
        Some("red eared slider")
    );
    assert!(requests[0].authorization.is_none());
}

#[tokio::test]
async fn test_nested_envelope_is_unwrapped() {
    let backend = FakeListingBackend::start().await.unwrap();
    let provider = HttpListingProvider::new(&backend.config().api).unwrap();

    let mut first = auction(1, AuctionProgress::DuringAuction);
    first.title = Some("Russian tortoise".to_string());
    first.image_addresses = vec!["/img/1.jpg".to_string(), "/img/2.jpg".to_string()];
    backend.push(Reply::Page(vec![first, auction(2, AuctionProgress::NoBid)]));

    let items = provider
        .fetch_page(&AuctionQuery::new(1, AuctionFilters::new()))
        .await
        .unwrap();

    assert_eq!(ids(&items), vec![1, 2]);
    assert_eq!(items[0].title.as_deref(), Some("Russian tortoise"));
    assert_eq!(items[0].image_addresses.len(), 2);
    assert_eq!(items[1].progress, AuctionProgress::NoBid);
}

#[tokio::test]
async fn test_non_ok_status_keeps_raw_body() {
    let backend = FakeListingBackend::start().await.unwrap();
    let provider = HttpListingProvider::new(&backend.config().api).unwrap();
    backend.push(Reply::Status(503, r#"{"message":"maintenance"}"#.to_string()));

    let err = provider
        .fetch_page(&AuctionQuery::new(1, AuctionFilters::new()))
        .await
        .unwrap_err();

    match err {
        FeedError::Status { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("maintenance"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_success_other_than_200_is_not_ok() {
    let backend = FakeListingBackend::start().await.unwrap();
    let provider = HttpListingProvider::new(&backend.config().api).unwrap();
    backend.push(Reply::Status(204, String::new()));

    let err = provider
        .fetch_page(&AuctionQuery::new(1, AuctionFilters::new()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(204));
}

#[tokio::test]
async fn test_flat_body_is_decode_error() {
    let backend = FakeListingBackend::start().await.unwrap();
    let provider = HttpListingProvider::new(&backend.config().api).unwrap();
    backend.push(Reply::Raw(
        r#"{"data": {"auctions": [{"id": 1, "progress": "DURING_AUCTION"}]}}"#.to_string(),
    ));

    let err = provider
        .fetch_page(&AuctionQuery::new(1, AuctionFilters::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::Decode { .. }));
}

#[tokio::test]
async fn test_bearer_token_is_forwarded() {
    let backend = FakeListingBackend::start().await.unwrap();
    let mut config = backend.config();
    config.api.access_token = Some("turtle-token".to_string());
    let provider = HttpListingProvider::new(&config.api).unwrap();

    provider
        .fetch_page(&AuctionQuery::new(1, AuctionFilters::new()))
        .await
        .unwrap();

    let requests = backend.requests();
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer turtle-token")
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let backend = FakeListingBackend::start().await.unwrap();
    let config = backend.config();
    drop(backend);

    // Give the aborted server task a moment to release the port
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let provider = HttpListingProvider::new(&config.api).unwrap();
    let err = provider
        .fetch_page(&AuctionQuery::new(1, AuctionFilters::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::Network { .. }));
}
