// src/crawl/mod.rs
// =============================================================================
// The crawl engine.
//
// Submodules, leaves first:
// - resolve: relative -> absolute URL resolution
// - fetch:   one HTTP GET, body as a byte stream
// - extract: streaming HTML tokenizer that pulls href/src URLs out of a page
// - visited: concurrency-safe "seen" set shared by all branches of a crawl
// - crawler: the orchestrator tying them together
//
// Callers (main.rs) only need `Crawler`, `CrawlRequest` and `crawl_seed`.
// =============================================================================

mod crawler;
mod extract;
mod fetch;
mod resolve;
mod visited;

pub use crawler::{
    crawl_seed, dedup_urls, is_same_host, CrawlRequest, CrawlResult, Crawler, DEFAULT_CONCURRENCY,
};
pub use extract::{extract_from_str, extract_links, LinkExtractor};
pub use fetch::{Credentials, Fetcher, HttpFetcher, PageBody};
pub use resolve::{resolve, resolve_against};
pub use visited::VisitedSet;
