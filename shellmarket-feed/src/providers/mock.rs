//! Scripted provider for controller tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::AuctionListingProvider;
use crate::errors::FeedError;
use crate::types::{AuctionItem, AuctionQuery};

struct ScriptedResponse {
    result: Result<Vec<AuctionItem>, FeedError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Provider replaying queued responses in call order.
///
/// Gated responses hold the caller until the test releases them, which lets
/// tests decide the completion order of concurrent fetches.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    queries: Mutex<Vec<AuctionQuery>>,
}

impl std::fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("calls", &self.calls())
            .finish()
    }
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response returned immediately.
    pub fn push(&self, result: Result<Vec<AuctionItem>, FeedError>) {
        self.responses.lock().unwrap().push_back(ScriptedResponse { result, gate: None });
    }

    /// Queues a response held until the returned sender fires.
    pub fn push_gated(&self, result: Result<Vec<AuctionItem>, FeedError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.responses.lock().unwrap().push_back(ScriptedResponse {
            result,
            gate: Some(rx),
        });
        tx
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<AuctionQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuctionListingProvider for ScriptedProvider {
    async fn fetch_page(&self, query: &AuctionQuery) -> Result<Vec<AuctionItem>, FeedError> {
        self.queries.lock().unwrap().push(query.clone());
        let next = self.responses.lock().unwrap().pop_front();

        let Some(response) = next else {
            return Err(FeedError::Network {
                reason: "no scripted response left".to_string(),
            });
        };

        if let Some(gate) = response.gate {
            let _ = gate.await;
        }

        response.result
    }
}
