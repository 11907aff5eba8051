use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter, e.g. `chairchat=debug`.
pub const LOG_ENV_VAR: &str = "CHAIRCHAT_LOG";
const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Diagnostics go to stderr so they do not
/// interleave with the conversation on stdout, or are appended to `log_file`.
pub fn init_tracing(log_file: Option<&Path>) -> io::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    // A second init (tests, repeated calls) keeps the first subscriber.
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
        None => {
            let _ = builder.with_writer(io::stderr).with_target(false).try_init();
        }
    }
    Ok(())
}
