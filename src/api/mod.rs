//! REST API client module for the bookshelf service.
//!
//! This module provides the `BooksClient` for the book-management endpoints
//! and the shared error type used by every network operation. Authenticated
//! requests carry a bearer token injected by the session manager.

pub mod books;
pub mod error;

pub use books::BooksClient;
pub use error::ClientError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build the shared HTTP client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
}
