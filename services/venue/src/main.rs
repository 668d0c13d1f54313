use std::io;

use anyhow::Result;
use clap::Parser;
use matching_engine::{Engine, EngineConfig};
use tracing_subscriber::EnvFilter;

use venue::dispatch;

/// Matching venue for one (venue, symbol) pair.
///
/// Commands arrive one per line on stdin and are answered on stdout; the
/// execution/ticker event feed goes to stderr. The front-end serializes
/// requests per venue instance — there is no parallelism in here.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Venue identifier, e.g. TESTEX
    venue: String,
    /// Stock symbol, e.g. FOOBAR
    symbol: String,
}

fn main() -> Result<()> {
    // Logging is opt-in via RUST_LOG: stderr carries the event feed.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    tracing::info!(venue = %args.venue, symbol = %args.symbol, "venue starting");

    let config = EngineConfig::new(&args.venue, &args.symbol);
    let mut engine = Engine::with_event_sink(config, Box::new(io::stderr()));

    let stdin = io::stdin();
    let stdout = io::stdout();
    dispatch::serve(&mut engine, stdin.lock(), stdout.lock())
}
