//! File-backed tracing so log lines never land on the terminal UI.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_FILE;

/// Install the global subscriber writing to `<dir>/learn-web.log`.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the background writer. An unparsable filter falls back
/// to `info`. A second call leaves the first subscriber in place.
pub fn init(dir: &Path, filter: &str) -> io::Result<WorkerGuard> {
    fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);
    let filter_layer = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state");

        let guard = init(&nested, "not a [valid filter").unwrap();
        tracing::info!("logging initialised");
        drop(guard);

        assert!(nested.is_dir());
    }
}
