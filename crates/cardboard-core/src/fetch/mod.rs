//! The fetch capability consumed by the poller.
//!
//! [`Fetcher`] is the seam between the poll state machine and the network.
//! [`HttpFetcher`] is the production implementation; tests substitute
//! [`crate::test_support::ScriptedFetcher`].

pub mod errors;
pub mod http;

use std::future::Future;

pub use errors::FetchError;
pub use http::HttpFetcher;

/// A completed HTTP exchange: status code plus the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a GET against a URL.
///
/// Any non-2xx status must come back as `Ok` with that status; `Err` is
/// reserved for requests that could not complete.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}
