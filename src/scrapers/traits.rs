use crate::error::FetchError;
use async_trait::async_trait;

/// Fetches the raw markup of a search page.
/// The run pipeline only talks to the network through this, so tests can hand it canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the response body of a successful response
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
