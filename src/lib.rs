// src/lib.rs
// =============================================================================
// cruwler: crawl a page, list every resource URL it links to.
//
// The binary (src/main.rs) is a thin shell over these modules:
// - crawl:  the concurrent crawl engine
// - cli:    command-line flags
// - input:  URL lists from a file or from piped stdin
// - output: text / JSON writers and terminal coloring
// - banner: startup banner
// - error:  error types shared by all of the above
// =============================================================================

pub mod banner;
pub mod cli;
pub mod crawl;
pub mod error;
pub mod input;
pub mod output;

pub use error::{CrawlError, Result};
