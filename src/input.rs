// src/input.rs
// =============================================================================
// Decides where the URLs of a run come from.
//
// In order of precedence:
// 1. Lines piped on stdin: echoed, colored, nothing is fetched
// 2. `--url` points at an existing file: its lines are the result
// 3. `--url` is a URL: crawl it
// 4. No `--url` at all: usage error
//
// "Piped" means stdin is not a terminal AND it actually delivered at least one
// non-blank line. Running under cron/CI/nohup usually leaves stdin attached to
// /dev/null, which is not a terminal but carries no data; that must still
// crawl.
//
// Every line is trimmed and blank lines are dropped.
// =============================================================================

use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};

/// What this invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// URLs read from stdin, printed as-is
    Piped(Vec<String>),
    /// `--url` named a local file of URLs
    File(PathBuf),
    /// `--url` is the seed of a crawl
    Crawl(String),
    /// Nothing to do: no stdin data and no `--url`
    Missing,
}

/// Picks the input source.
///
/// `stdin` is `None` when stdin is an interactive terminal (we must not block
/// waiting for the user to type). Otherwise it is read to the end.
pub fn select_source<R: BufRead>(stdin: Option<R>, target: Option<&str>) -> io::Result<InputSource> {
    if let Some(reader) = stdin {
        let urls = read_lines(reader)?;
        // An empty non-terminal stdin (/dev/null) is not piped input
        if !urls.is_empty() {
            return Ok(InputSource::Piped(urls));
        }
    }

    Ok(match target {
        Some(target) if is_local_file(target) => InputSource::File(PathBuf::from(target)),
        Some(target) => InputSource::Crawl(target.to_string()),
        None => InputSource::Missing,
    })
}

/// Same as [`select_source`], wired to the process's real stdin.
pub fn select_from_stdin(target: Option<&str>) -> io::Result<InputSource> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        select_source(None::<io::StdinLock<'static>>, target)
    } else {
        select_source(Some(stdin.lock()), target)
    }
}

/// True when `target` names a file on disk rather than a URL.
pub fn is_local_file(target: &str) -> bool {
    Path::new(target).is_file()
}

/// Reads the non-blank, trimmed lines of a URL list file.
pub fn read_url_file(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_lines(&content))
}

pub fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            urls.push(line.to_string());
        }
    }
    Ok(urls)
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
