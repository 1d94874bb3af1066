// src/output.rs
// =============================================================================
// Writes crawl results.
//
// Destinations:
// - no --output:        one URL per line on stdout, colored
// - --output *.json:    {"urls": [...]} pretty-printed
// - --output other:     one URL per line, plain
//
// Coloring is presentation only: URLs that point at a file (something with an
// extension, like .js or .png) are green, everything else is blue.
// =============================================================================

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use console::style;
use url::Url;

use crate::crawl::CrawlResult;
use crate::error::{CrawlError, Result};

/// Extensions that are really top-level domains, not files
const DOMAIN_SUFFIXES: [&str; 3] = ["com", "org", "net"];

/// Writes `result` to `output`, or to stdout when there is no output path.
pub fn write_output(result: &CrawlResult, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) if is_json_path(path) => write_json(result, path),
        Some(path) => write_text(result, path),
        None => print_urls(&result.urls),
    }
}

pub fn write_json(result: &CrawlResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json).map_err(|e| CrawlError::output(path, e))
}

pub fn write_text(result: &CrawlResult, path: &Path) -> Result<()> {
    let mut text = String::new();
    for url in &result.urls {
        text.push_str(url);
        text.push('\n');
    }
    fs::write(path, text).map_err(|e| CrawlError::output(path, e))
}

/// Prints colored URLs, one per line, to stdout.
pub fn print_urls(urls: &[String]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for url in urls {
        writeln!(out, "{}", format_url(url)).map_err(|e| CrawlError::output("<stdout>", e))?;
    }
    out.flush().map_err(|e| CrawlError::output("<stdout>", e))
}

/// Green for file-like URLs, blue for the rest. `console` drops the colors
/// on its own when stdout is not a terminal.
pub fn format_url(url: &str) -> String {
    if has_file_extension(url) {
        style(url).green().to_string()
    } else {
        style(url).blue().to_string()
    }
}

/// True when the last path segment has an extension that is not .com, .org
/// or .net.
///
///   https://a.com/app.js        -> true
///   https://a.com/docs/         -> false
///   https://a.com               -> false
///   https://a.com/go/mirror.org -> false
pub fn has_file_extension(url: &str) -> bool {
    // Unparseable input is treated as a bare path
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };

    let last_segment = path.rsplit('/').next().unwrap_or("");
    match last_segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => !DOMAIN_SUFFIXES.contains(&ext),
        _ => false,
    }
}

fn is_json_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
