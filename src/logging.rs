//! Logging initialization.
//!
//! Log output goes to stderr so that `kb` stdout stays clean for HTML and
//! JSON.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Pick the log level from the global verbosity flags. Long-running
/// commands default to `INFO`, one-shot commands to `WARN`.
pub fn level_for(verbose: bool, quiet: bool, long_running: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else if long_running {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
