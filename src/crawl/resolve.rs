// src/crawl/resolve.rs
// =============================================================================
// Resolves possibly-relative URLs against the page they were found on.
//
// The `url` crate implements the WHATWG/RFC 3986 reference resolution
// algorithm through `Url::join`, so this module is a thin, typed wrapper:
// - absolute candidates come back re-serialized but otherwise unchanged
// - "../z", "/p?q=1", "//cdn.example/x.js", "?page=2", "#top" are merged
//   against the base's scheme/authority/path
// =============================================================================

use url::Url;

use crate::error::{CrawlError, Result};

/// Resolves `candidate` against `base`, both given as strings.
///
/// Examples:
///   resolve("https://a.com/x/y", "../z")            -> "https://a.com/z"
///   resolve("https://a.com", "/p?q=1")              -> "https://a.com/p?q=1"
///   resolve("https://a.com", "https://b.com/p")     -> "https://b.com/p"
pub fn resolve(base: &str, candidate: &str) -> Result<String> {
    let base = Url::parse(base).map_err(|e| CrawlError::invalid_url(base, e))?;
    resolve_against(&base, candidate)
}

/// Same as [`resolve`] with an already parsed base, so the extractor does not
/// re-parse the page URL for every attribute.
pub fn resolve_against(base: &Url, candidate: &str) -> Result<String> {
    base.join(candidate)
        .map(String::from)
        .map_err(|e| CrawlError::invalid_url(candidate, e))
}
