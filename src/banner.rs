// src/banner.rs
// Startup banner, printed to stderr so stdout stays clean for results.

use console::style;

const BANNER: &str = r"
                               __
  ______________  ___      __/ /__  _____
 / ___/ ___/ / / / | /| / / / / _ \/ ___/
/ /__/ /  / /_/ /| |/ |/ / / /  __/ /
\___/_/   \__,_/ |__/|__/_/_/\___/_/
";

pub fn show_banner() {
    eprintln!("{}", style(BANNER).cyan().bold());
    eprintln!("  {} v{}\n", style("cruwler").bold(), env!("CARGO_PKG_VERSION"));
    eprintln!("[{}] Use with caution. You are responsible for your actions.", style("INF").blue());
    eprintln!(
        "[{}] Developers assume no liability and are not responsible for any misuse or damage.\n",
        style("INF").blue()
    );
}
