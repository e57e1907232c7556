//! Test support for Shellmarket integration tests
//!
//! Provides an in-process listing backend that speaks the same wire format as
//! the auction service, so the real HTTP provider can be exercised end to end.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use shellmarket_core::ShellmarketConfig;
use shellmarket_feed::{AuctionItem, AuctionProgress, ListingEnvelope};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Path the fake backend serves listings on; matches the default config.
pub const LISTING_PATH: &str = "/api/auction";

/// One scripted answer of the fake backend.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with the auctions wrapped in the listing envelope
    Page(Vec<AuctionItem>),
    /// Given status with a raw body
    Status(u16, String),
    /// 200 with a raw, possibly malformed body
    Raw(String),
}

/// Request as seen by the fake backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub params: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct BackendState {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process listing backend bound to an ephemeral local port.
///
/// Replies are served in request order; once the script runs out every
/// request gets an empty page.
pub struct FakeListingBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    server: JoinHandle<()>,
}

impl FakeListingBackend {
    /// Binds to `127.0.0.1:0` and starts serving.
    ///
    /// # Errors
    ///
    /// - `std::io::Error` - If the listener cannot be bound
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route(LISTING_PATH, get(listing))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Fake listing backend stopped: {}", e);
            }
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Configuration pointing at this backend.
    pub fn config(&self) -> ShellmarketConfig {
        ShellmarketConfig::for_testing(self.base_url())
    }

    pub fn push(&self, reply: Reply) {
        if let Ok(mut replies) = self.state.replies.lock() {
            replies.push_back(reply);
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

impl Drop for FakeListingBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn listing(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if let Ok(mut requests) = state.requests.lock() {
        requests.push(RecordedRequest {
            params,
            authorization,
        });
    }

    let reply = state
        .replies
        .lock()
        .ok()
        .and_then(|mut replies| replies.pop_front())
        .unwrap_or(Reply::Page(Vec::new()));

    match reply {
        Reply::Page(items) => match serde_json::to_string(&ListingEnvelope::wrap(items)) {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        },
        Reply::Status(code, body) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            json_response(status, body)
        }
        Reply::Raw(body) => json_response(StatusCode::OK, body),
    }
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}

/// Shorthand for an auction with only id and progress.
pub fn auction(id: i64, progress: AuctionProgress) -> AuctionItem {
    AuctionItem::new(id, progress)
}

/// Ids of a list of auctions, in order.
pub fn ids(items: &[AuctionItem]) -> Vec<i64> {
    items.iter().map(|item| item.id).collect()
}

/// Routes test logs through the test harness; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
