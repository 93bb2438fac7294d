use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Fetch failures. The `Display` text is what the dashboard shows the user.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Too many requests, backend is rate limiting")]
    RateLimited,
    #[error("Backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("{0}")]
    Backend(String),
    #[error("Unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Where signal records come from. Results may be unsorted, duplicated or
/// malformed; the store validates them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignalSource: Send + Sync {
    async fn fetch_recent_signals(&self, limit: usize) -> Result<Vec<Value>, SourceError>;
}
