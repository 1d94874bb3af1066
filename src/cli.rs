// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Examples:
//   cruwler --url https://example.com
//   cruwler --url https://example.com --recursive --output urls.json
//   cruwler --url https://example.com --cookie "session=abc" -a "Bearer xyz"
//   cruwler --url urls.txt                  (a file: its lines are printed)
//   cat urls.txt | cruwler                  (stdin: lines are printed)
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates all the parsing code
// - Doc comments (///) on fields become the --help text
// - Option<T>: a flag that may be absent (no cookie, no output file, ...)
// =============================================================================

use std::path::PathBuf;

// TypedValueParser provides .map() on value parsers (used by --concurrency)
use clap::builder::TypedValueParser;
use clap::Parser;

use crate::crawl::{CrawlRequest, Credentials, DEFAULT_CONCURRENCY};
use crate::error::Result;

// The whole CLI is one flat struct: no subcommands, just flags
//
// #[command(version)] reads the version from Cargo.toml
#[derive(Parser, Debug)]
#[command(
    name = "cruwler",
    version,
    about = "Crawl a web page and list every URL it links to",
    long_about = "cruwler fetches a page, pulls the URLs out of its <a>, <link>, <script> and <img> \
                  tags, and prints them. With --recursive it also fetches every same-host page \
                  it found (one level deep) and reports the URLs found there."
)]
pub struct Cli {
    /// Target URL to crawl, or path to a file with one URL per line
    ///
    /// Optional because piped stdin can replace it
    #[arg(short, long)]
    pub url: Option<String>,

    /// Cookie header value sent with every request
    #[arg(short, long)]
    pub cookie: Option<String>,

    /// Authorization header value sent with every request
    #[arg(short, long)]
    pub authorization: Option<String>,

    /// Save results to this file (a .json extension selects JSON output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also crawl the same-host pages found on the target (one level deep)
    #[arg(short, long)]
    pub recursive: bool,

    /// Maximum number of pages fetched at the same time while recursing
    ///
    /// Parsed as a u16 in 1.. (so 0 is rejected by clap) and widened to usize
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub concurrency: usize,

    /// Do not print the startup banner
    #[arg(long)]
    pub no_banner: bool,

    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long)]
    pub verbose: bool,
}

// The parsed flags double as the options bundle of a run: these helpers turn
// them into the types the crawl engine takes
impl Cli {
    /// Cookie and Authorization values to send with every request
    pub fn credentials(&self) -> Credentials {
        Credentials {
            cookie: self.cookie.clone(),
            authorization: self.authorization.clone(),
        }
    }

    /// Builds the top-level crawl request for `seed`.
    pub fn request(&self, seed: &str) -> Result<CrawlRequest> {
        CrawlRequest::new(seed, self.credentials(), self.recursive)
    }
}
