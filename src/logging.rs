//! Diagnostic logging to stderr.

use tracing::Level;
use tracing_subscriber::fmt;

/// Maximum level for a `-v` count: warnings by default, then info, debug, trace.
pub fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbose: u8) {
    let _ = fmt()
        .with_max_level(level_for(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
}
