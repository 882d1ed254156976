//! CLI entry point for geomarkup.

use geomarkup::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // WARN by default so lenient omissions are visible, respecting RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
