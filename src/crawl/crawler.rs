// src/crawl/crawler.rs
// =============================================================================
// The crawl orchestrator.
//
// How it works:
// 1. Fetch the target page
// 2. Extract every href/src URL from it
// 3. Keep only the URLs the shared VisitedSet has not seen yet
// 4. If recursion is on, crawl every kept URL that lives on the seed's host,
//    concurrently, and append what those pages yield
//
// Recursion is exactly one level deep: sub-pages are fetched once, and the
// links they contain are reported but not followed.
//
// A sub-page that fails (connection error, broken body) is logged and
// dropped; its siblings and the parent still succeed. Only a failure on the
// root page fails the crawl.
// =============================================================================

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use url::Url;

use super::extract::extract_links;
use super::fetch::{Credentials, Fetcher};
use super::visited::VisitedSet;
use crate::error::{CrawlError, Result};

/// How many sub-pages may be in flight at once during fan-out
pub const DEFAULT_CONCURRENCY: usize = 32;

/// One unit of crawl work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub target: Url,
    pub credentials: Credentials,
    pub recursive: bool,
}

impl CrawlRequest {
    /// Parses `seed` and builds the top-level request.
    pub fn new(seed: &str, credentials: Credentials, recursive: bool) -> Result<Self> {
        let target = Url::parse(seed).map_err(|e| CrawlError::invalid_url(seed, e))?;
        Ok(Self {
            target,
            credentials,
            recursive,
        })
    }

    /// The request for a sub-page: same credentials, never recursive.
    pub fn branch(&self, target: Url) -> Self {
        Self {
            target,
            credentials: self.credentials.clone(),
            recursive: false,
        }
    }
}

/// Deduplicated URLs found by one top-level crawl.
///
/// Serializes as `{"urls": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub urls: Vec<String>,
}

impl CrawlResult {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls: dedup_urls(urls),
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

pub struct Crawler<F> {
    fetcher: F,
    concurrency: usize,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Caps the number of concurrent sub-page fetches (at least 1).
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawls `request.target` and returns the URLs it discovered that
    /// `visited` had not seen before.
    ///
    /// Fetch and extraction errors on this page are returned as-is. Errors on
    /// sub-pages are logged and swallowed.
    pub async fn crawl(&self, request: &CrawlRequest, visited: &VisitedSet) -> Result<Vec<String>> {
        let mut found = self.visit(request, visited).await?;

        if !request.recursive {
            return Ok(found);
        }

        // Off-host URLs stay in `found` but are never fetched
        let branches: Vec<CrawlRequest> = found
            .iter()
            .filter_map(|u| Url::parse(u).ok())
            .filter(|u| is_same_host(&request.target, u))
            .map(|u| request.branch(u))
            .collect();

        log::debug!(
            "{}: following {} same-host link(s)",
            request.target,
            branches.len()
        );

        // Every branch runs to completion; there is no early exit on error.
        // Results are collected by this task alone, so no lock is needed for
        // the merge.
        let results: Vec<Vec<String>> = stream::iter(branches)
            .map(move |branch| async move {
                match self.visit(&branch, visited).await {
                    Ok(urls) => urls,
                    Err(e) => {
                        log::warn!("Skipping {}: {}", branch.target, e);
                        Vec::new()
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for urls in results {
            found.extend(urls);
        }

        Ok(found)
    }

    // Fetch, extract, filter. Never recurses.
    async fn visit(&self, request: &CrawlRequest, visited: &VisitedSet) -> Result<Vec<String>> {
        log::debug!("Crawling {}", request.target);

        // The body stream owns the response; it is released when dropped,
        // whichever way extract_links returns
        let body = self
            .fetcher
            .fetch(&request.target, &request.credentials)
            .await?;
        let candidates = extract_links(body, &request.target).await?;
        let total = candidates.len();

        let fresh: Vec<String> = candidates
            .into_iter()
            .filter(|u| visited.check_and_mark(u))
            .collect();

        log::debug!(
            "{}: {} link(s), {} new",
            request.target,
            total,
            fresh.len()
        );

        Ok(fresh)
    }
}

/// Runs a whole top-level crawl: fresh VisitedSet seeded with the target,
/// the crawl itself, then a final dedup pass over the merged branches.
pub async fn crawl_seed<F: Fetcher>(crawler: &Crawler<F>, request: &CrawlRequest) -> Result<CrawlResult> {
    let visited = VisitedSet::seeded([request.target.as_str()]);
    let urls = crawler.crawl(request, &visited).await?;
    Ok(CrawlResult::new(urls))
}

/// Same host component; scheme and port are not compared.
pub fn is_same_host(seed: &Url, candidate: &Url) -> bool {
    match (seed.host_str(), candidate.host_str()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Removes duplicates, keeping the first occurrence of each URL.
pub fn dedup_urls(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(urls.len());
    urls.into_iter()
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why buffer_unordered instead of one tokio::spawn per link?
//    - A page with thousands of links would otherwise open thousands of
//      connections at once; the stream caps in-flight fetches
//    - The branches borrow `self` and `visited`, no Arc juggling needed
//
// 2. Why does `visit` exist next to `crawl`?
//    - Sub-pages are never recursive, and calling `crawl` from `crawl`
//      would need a boxed future; `visit` is the non-recursive part
//
// 3. Why both the VisitedSet and dedup_urls?
//    - VisitedSet decides what gets fetched (at most once per URL)
//    - dedup_urls cleans the merged list, whose order depends on which
//      branch finished first
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::fetch::PageBody;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const SEED: &str = "https://site.test/";

    // In-memory site. Pages mapped to None fail with a network error, as do
    // URLs that are not in the map at all.
    struct FakeFetcher {
        pages: HashMap<String, Option<&'static str>>,
        requests: Mutex<Vec<(String, Credentials)>>,
    }

    impl FakeFetcher {
        fn new(pages: &[(&str, Option<&'static str>)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), *html))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn fetched(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    fn network_error(url: &Url) -> CrawlError {
        let source = reqwest::Client::new()
            .get("http://[::1")
            .build()
            .unwrap_err();
        CrawlError::network(url.as_str(), source)
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, url: &Url, credentials: &Credentials) -> Result<PageBody> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), credentials.clone()));

            // Let other branches run so they interleave
            tokio::task::yield_now().await;

            match self.pages.get(url.as_str()) {
                Some(Some(html)) => {
                    let chunk: Result<Vec<u8>> = Ok(html.as_bytes().to_vec());
                    Ok(stream::iter(vec![chunk]).boxed())
                }
                _ => Err(network_error(url)),
            }
        }
    }

    fn site() -> FakeFetcher {
        FakeFetcher::new(&[
            (
                SEED,
                Some(
                    r#"<a href="/a">a</a>
                       <a href="/b">b</a>
                       <a href="/c">c</a>
                       <a href="https://other.test/x">other</a>
                       <a href="/a">a again</a>
                       <link rel="stylesheet" href="/shared.css">"#,
                ),
            ),
            (
                "https://site.test/a",
                Some(r#"<a href="/a1">a1</a><link href="/shared.css"><img src="https://other.test/y.png">"#),
            ),
            ("https://site.test/b", None),
            (
                "https://site.test/c",
                Some(r#"<a href="/c1">c1</a><a href="/a1">a1 again</a><a href="/">home</a>"#),
            ),
            ("https://site.test/shared.css", Some("body { color: red }")),
        ])
    }

    fn request(recursive: bool) -> CrawlRequest {
        let credentials = Credentials {
            cookie: Some("session=1".to_string()),
            authorization: None,
        };
        CrawlRequest::new(SEED, credentials, recursive).unwrap()
    }

    fn assert_unique(urls: &[String]) {
        let set: HashSet<_> = urls.iter().collect();
        assert_eq!(set.len(), urls.len(), "duplicates in {:?}", urls);
    }

    #[tokio::test]
    async fn test_non_recursive_fetches_once() {
        let crawler = Crawler::new(site());
        let result = crawl_seed(&crawler, &request(false)).await.unwrap();

        assert_eq!(crawler.fetcher().fetched(), vec![SEED]);
        assert_eq!(
            result.urls,
            vec![
                "https://site.test/a",
                "https://site.test/b",
                "https://site.test/c",
                "https://other.test/x",
                "https://site.test/shared.css",
            ]
        );
    }

    #[tokio::test]
    async fn test_recursive_follows_same_host_one_level() {
        let crawler = Crawler::new(site());
        let result = crawl_seed(&crawler, &request(true)).await.unwrap();

        let mut fetched = crawler.fetcher().fetched();
        assert_unique(&fetched);
        fetched.sort();
        assert_eq!(
            fetched,
            vec![
                "https://site.test/",
                "https://site.test/a",
                "https://site.test/b",
                "https://site.test/c",
                "https://site.test/shared.css",
            ]
        );

        // Links found on sub-pages are reported but not followed
        assert!(result.urls.contains(&"https://site.test/a1".to_string()));
        assert!(result.urls.contains(&"https://site.test/c1".to_string()));
        assert!(!fetched.contains(&"https://site.test/a1".to_string()));
    }

    #[tokio::test]
    async fn test_off_host_urls_reported_but_never_fetched() {
        let crawler = Crawler::new(site());
        let result = crawl_seed(&crawler, &request(true)).await.unwrap();

        for url in crawler.fetcher().fetched() {
            assert_eq!(Url::parse(&url).unwrap().host_str(), Some("site.test"));
        }
        assert!(result.urls.contains(&"https://other.test/x".to_string()));
        assert!(result.urls.contains(&"https://other.test/y.png".to_string()));
    }

    #[tokio::test]
    async fn test_results_are_deduplicated() {
        let crawler = Crawler::new(site());
        let result = crawl_seed(&crawler, &request(true)).await.unwrap();

        assert_unique(&result.urls);
        // Seed is pre-marked, so the "home" link on /c never shows up
        assert!(!result.urls.contains(&SEED.to_string()));
        assert_eq!(
            result.urls.iter().filter(|u| u.ends_with("/a1")).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_failed_sub_page_does_not_fail_the_crawl() {
        let crawler = Crawler::new(site()).with_concurrency(2);
        let result = crawl_seed(&crawler, &request(true)).await.unwrap();

        // /b failed, everything from the seed, /a and /c is still there
        for url in [
            "https://site.test/b",
            "https://site.test/a1",
            "https://other.test/y.png",
            "https://site.test/c1",
        ] {
            assert!(result.urls.contains(&url.to_string()), "missing {}", url);
        }
    }

    #[tokio::test]
    async fn test_root_failure_is_returned() {
        let crawler = Crawler::new(FakeFetcher::new(&[]));
        let err = crawl_seed(&crawler, &request(true)).await.unwrap_err();
        assert!(matches!(err, CrawlError::Network { .. }));
        assert_eq!(crawler.fetcher().fetched(), vec![SEED]);
    }

    #[tokio::test]
    async fn test_credentials_reach_every_branch() {
        let crawler = Crawler::new(site());
        crawl_seed(&crawler, &request(true)).await.unwrap();

        let requests = crawler.fetcher().requests.lock().unwrap();
        assert!(requests.len() > 1);
        for (_, credentials) in requests.iter() {
            assert_eq!(credentials.cookie(), Some("session=1"));
        }
    }

    #[tokio::test]
    async fn test_shared_tracker_across_crawls_skips_seen_urls() {
        let crawler = Crawler::new(site());
        let visited = VisitedSet::seeded([SEED, "https://site.test/a"]);
        let urls = crawler.crawl(&request(false), &visited).await.unwrap();

        assert!(!urls.contains(&"https://site.test/a".to_string()));
        assert!(visited.contains("https://site.test/b"));
    }

    #[test]
    fn test_same_host_ignores_scheme_and_port() {
        let seed = Url::parse("https://site.test/").unwrap();
        assert!(is_same_host(&seed, &Url::parse("http://site.test:8080/x").unwrap()));
        assert!(!is_same_host(&seed, &Url::parse("https://www.site.test/").unwrap()));
        assert!(!is_same_host(&seed, &Url::parse("mailto:me@site.test").unwrap()));
    }

    #[test]
    fn test_branch_is_never_recursive() {
        let parent = request(true);
        let child = parent.branch(Url::parse("https://site.test/a").unwrap());
        assert!(!child.recursive);
        assert_eq!(child.credentials, parent.credentials);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let urls = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_urls(urls), vec!["b", "a"]);
    }

    #[test]
    fn test_result_serializes_as_urls_object() {
        let result = CrawlResult::new(vec!["https://a.com/".to_string()]);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"urls":["https://a.com/"]}"#);
    }
}
