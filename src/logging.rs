//! Log file setup
//!
//! The TUI owns the terminal, so diagnostics can only go to a file. Nothing is
//! installed unless the user asks for a log file; the `tracing` macros in the
//! library are then no-ops.

use std::fs::File;
use std::sync::{Mutex, Once};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "METASTEP_LOG";

const DEFAULT_FILTER: &str = "metastep=info";

static INIT_ONCE: Once = Once::new();

/// Send `tracing` output to `file`.
///
/// Only the first call has any effect.
pub fn init(file: File) {
    INIT_ONCE.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        // Another subscriber may already be installed (e.g. by a test harness)
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        let path = std::env::temp_dir().join(format!("metastep-log-{}.log", std::process::id()));
        let first = File::create(&path).unwrap();
        let second = first.try_clone().unwrap();

        // Multiple calls should not panic
        init(first);
        init(second);

        tracing::info!("written once the subscriber is installed");
        let _ = std::fs::remove_file(&path);
    }
}
