// src/crawl/visited.rs
// =============================================================================
// The set of URLs already seen during one top-level crawl.
//
// Every branch of the crawl holds a reference to the same VisitedSet. The only
// operation that matters is `check_and_mark`: test and insert happen under one
// lock acquisition, so two branches racing on the same URL can never both be
// told "new". A separate contains()-then-insert() would double-fetch.
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set that already contains `urls` (the seed, typically).
    pub fn seeded<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: Mutex::new(urls.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns `true` if `url` was not in the set and has now been added,
    /// `false` if it was already there (the set is left untouched).
    pub fn check_and_mark(&self, url: &str) -> bool {
        let mut urls = self.lock();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_owned())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // A panic while holding the lock cannot leave a HashSet half-inserted
        // in a way that matters to us, so keep going with the inner value.
        self.urls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
