// src/main.rs
// =============================================================================
// Entry point of the cruwler CLI.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Print the banner
// 3. Decide where the URLs come from (input::select_source):
//    - lines piped on stdin: echo them and stop
//    - --url is a local file: output its lines and stop
//    - --url is a URL: crawl it and write the results
// 4. Print a summary (URL count, elapsed time)
//
// Exit codes: 0 = success, 1 = crawl or output failure, 2 = usage error
//
// Rust concepts used:
// - async/await: the crawl fetches pages concurrently
// - anyhow::Result + .context(): errors from any module, with a message that
//   says which step failed
// - ExitCode: returning an exit status from main without process::exit()
// =============================================================================

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser}; // Parser gives us Cli::parse(), CommandFactory gives Cli::command()

use cruwler::banner;
use cruwler::cli::Cli;
use cruwler::crawl::{crawl_seed, CrawlResult, Crawler, HttpFetcher};
use cruwler::input::{self, InputSource};
use cruwler::output;

// #[tokio::main] builds a multi-threaded runtime and runs the async main in it
#[tokio::main]
async fn main() -> ExitCode {
    // Start the clock first so the summary covers the whole run
    let started = Instant::now();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli, started).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain: "Error crawling: request to ... failed: ..."
            log::error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

// Logs go to stderr; RUST_LOG, when set, wins over --verbose
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

// The application logic. Returns the exit code on any expected outcome and
// Err only for failures that should be reported as errors (exit code 1).
async fn run(cli: &Cli, started: Instant) -> Result<ExitCode> {
    if !cli.no_banner {
        banner::show_banner();
    }

    let source = input::select_from_stdin(cli.url.as_deref()).context("Error reading stdin")?;

    match source {
        // Piped input replaces the whole crawl
        InputSource::Piped(urls) => {
            output::print_urls(&urls)?;
            Ok(ExitCode::SUCCESS)
        }

        // A file of known URLs: no fetching, straight to the output writers
        InputSource::File(path) => {
            let urls = read_file(&path)?;
            output::write_output(&CrawlResult::new(urls), cli.output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }

        InputSource::Crawl(target) => crawl(cli, &target, started).await,

        InputSource::Missing => {
            log::error!("URL is required. Use the --url flag.");
            eprintln!();
            Cli::command().print_help().ok();
            Ok(ExitCode::from(2))
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<String>> {
    input::read_url_file(path).with_context(|| format!("Error processing file {}", path.display()))
}

// Crawls `target`, writes the result and prints the summary
async fn crawl(cli: &Cli, target: &str, started: Instant) -> Result<ExitCode> {
    // An unparseable seed fails here, before any request is made
    let request = cli.request(target)?;

    // One client for the whole run, shared by every branch of the crawl
    let fetcher = HttpFetcher::new()?;
    let crawler = Crawler::new(fetcher).with_concurrency(cli.concurrency);

    log::info!(
        "Crawling {}{}",
        request.target,
        if request.recursive { " (recursive)" } else { "" }
    );

    // A failure on the seed page aborts the run with no partial output;
    // failures on sub-pages were already swallowed inside the crawler
    let result = crawl_seed(&crawler, &request)
        .await
        .context("Error crawling")?;

    if let Err(e) = output::write_output(&result, cli.output.as_deref()) {
        log::error!("Error writing output: {}", e);
        // Do not lose the crawl: show it on the terminal instead
        if cli.output.is_some() {
            output::print_urls(&result.urls)?;
        }
        return Ok(ExitCode::from(1));
    }

    // Blank line between the URL list and the summary
    eprintln!();
    log::info!("Total URLs found: {}", result.len());
    log::info!("Execution Time: {:.2} sec", started.elapsed().as_secs_f64());

    Ok(ExitCode::SUCCESS)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the input decision in input.rs and not here?
//    - select_source takes any BufRead, so tests can hand it an empty
//      Cursor (what </dev/null looks like) or a few lines (a real pipe)
//      and check which branch the run takes
//
// 2. Why print the banner before looking at stdin?
//    - The banner goes to stderr, so it never mixes with piped results on
//      stdout; --no-banner turns it off for scripts
//
// 3. Why does an output failure still print the URLs?
//    - The crawl itself succeeded; only the file could not be written
// -----------------------------------------------------------------------------
