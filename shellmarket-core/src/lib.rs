//! Shellmarket Core - Shared plumbing for the auction client
//!
//! Holds the configuration model, tracing setup and the error type that the
//! feed and CLI crates build on.

pub mod config;
pub mod tracing_setup;

pub use config::{ApiConfig, FeedConfig, ShellmarketConfig};

/// Errors raised by core plumbing.
#[derive(Debug, thiserror::Error)]
pub enum ShellmarketError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellmarketError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            ShellmarketError::Configuration { reason } => format!("Invalid configuration: {reason}"),
            ShellmarketError::Io(_) => "File system error occurred".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShellmarketError>;
