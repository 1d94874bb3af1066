// src/crawl/fetch.rs
// =============================================================================
// Fetches a single page and hands back its body as a stream of byte chunks.
//
// Why a stream instead of `response.text()`?
// - The extractor tokenizes incrementally, so the whole document never has
//   to sit in memory
// - The stream owns the response: when it is dropped (fully read, or early
//   because of an error) the connection is released
//
// Why a trait?
// - The orchestrator only needs "give me the body of this URL"
// - Tests plug in an in-memory fetcher and count requests
// =============================================================================

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::{AUTHORIZATION, COOKIE};
use reqwest::Client;
use url::Url;

use crate::error::{CrawlError, Result};

/// Body of a fetched page, chunk by chunk.
pub type PageBody = BoxStream<'static, Result<Vec<u8>>>;

/// Optional headers forwarded on every request of a crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub cookie: Option<String>,
    pub authorization: Option<String>,
}

impl Credentials {
    /// Cookie value, if one was supplied and it is not empty
    pub fn cookie(&self) -> Option<&str> {
        non_empty(self.cookie.as_deref())
    }

    /// Authorization value, if one was supplied and it is not empty
    pub fn authorization(&self) -> Option<&str> {
        non_empty(self.authorization.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issues one GET for `url` and returns the response body.
    async fn fetch(&self, url: &Url, credentials: &Credentials) -> Result<PageBody>;
}

/// `Fetcher` backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        // No timeout and no redirect override: the client defaults apply
        let client = Client::builder()
            .user_agent(concat!("cruwler/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CrawlError::network("<client>", e))?;
        Ok(Self { client })
    }

    /// Wraps an existing client (handy when the caller wants a proxy, a
    /// timeout, ...)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, credentials: &Credentials) -> Result<PageBody> {
        let mut request = self.client.get(url.clone());

        if let Some(cookie) = credentials.cookie() {
            request = request.header(COOKIE, cookie);
        }
        if let Some(authorization) = credentials.authorization() {
            request = request.header(AUTHORIZATION, authorization);
        }

        // Status codes are not errors here: a 404 page still has links
        let response = request
            .send()
            .await
            .map_err(|e| CrawlError::network(url.as_str(), e))?;

        log::debug!("GET {} -> {}", url, response.status());

        let page_url = url.to_string();
        let body = stream::unfold(Some(response), move |state| {
            let page_url = page_url.clone();
            async move {
                let mut response = state?;
                match response.chunk().await {
                    Ok(Some(chunk)) => Some((Ok(chunk.to_vec()), Some(response))),
                    Ok(None) => None,
                    // Yield the error once, then end the stream
                    Err(e) => Some((Err(CrawlError::parse(page_url, e)), None)),
                }
            }
        });

        Ok(body.boxed())
    }
}
