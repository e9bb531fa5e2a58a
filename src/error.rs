//! Error kinds for a scrape run.
//!
//! Fetch, extract and fragment errors are recovered inside the run. Storage
//! and feed errors end the process.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Fetching a search page failed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} timed out after {}s", .timeout.as_secs())]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// One listing fragment could not be turned into a listing.
#[derive(Error, Debug)]
pub enum FragmentError {
    #[error("link element has no href")]
    MissingHref,

    #[error("cannot resolve link {href:?}: {source}")]
    InvalidLink {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// A site profile could not be applied at all.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("invalid search URL {url}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ExtractError {
    pub fn selector(selector: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }
}

/// Site-level failure recorded in the run statistics.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Reading or writing the boat store failed.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("cannot read store {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode store: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("cannot write store {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rendering or writing the RSS feed failed.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("cannot render feed: {0}")]
    Render(String),

    #[error("cannot write feed {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FeedError {
    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::Render(err.to_string())
    }
}
