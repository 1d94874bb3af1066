// src/error.rs
// =============================================================================
// Error types for the crawl engine and the output writers.
//
// How errors flow:
// - InvalidUrl: one bad href/src value. The extractor skips it and moves on.
// - Network:    the request could not be built or sent. Fatal to one branch.
// - Parse:      the page body could not be read/tokenized. Fatal to one branch.
// - Output:     the result file could not be written.
//
// A failing sub-crawl is swallowed by its parent; a failing root crawl
// bubbles all the way up to main.rs, which reports it and exits.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for crawl operations.
pub type Result<T> = std::result::Result<T, CrawlError>;

#[derive(Error, Debug)]
pub enum CrawlError {
    /// A base or candidate URL could not be parsed
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Request construction or transport failure
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTML token stream could not be read
    #[error("failed to parse {url}: {message}")]
    Parse { url: String, message: String },

    /// Writing the result file failed
    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the JSON result failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrawlError {
    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    pub fn parse(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}
