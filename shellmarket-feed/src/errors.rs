//! Error types for auction feed operations.

use thiserror::Error;

/// Errors that can occur while fetching auction listings.
///
/// None of these are retried; they surface to whoever issued the fetch.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Listing endpoint answered with a status other than 200.
    #[error("Listing request returned HTTP {status}")]
    Status {
        /// HTTP status code returned by the backend
        status: u16,
        /// Raw response body, kept for the caller's own handling
        body: String,
    },

    /// Network communication failed before a response arrived.
    #[error("Network error: {reason}")]
    Network {
        /// The reason for the network error
        reason: String,
    },

    /// Response body did not match the listing envelope.
    #[error("Decode error: {reason}")]
    Decode {
        /// The reason the body could not be decoded
        reason: String,
    },

    /// Provider could not be built from the supplied configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// The reason the configuration was rejected
        reason: String,
    },
}

impl FeedError {
    /// HTTP status of the failed response, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<shellmarket_core::ShellmarketError> for FeedError {
    fn from(error: shellmarket_core::ShellmarketError) -> Self {
        FeedError::InvalidConfig {
            reason: error.to_string(),
        }
    }
}
