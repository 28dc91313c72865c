// re-export for convenience
pub use slog::{debug, error, info, trace, warn};
use slog::{o, Drain, Level, Logger};

use crate::configuration::LoggingConfig;

/// Build the logger a [`Simulator`](crate::Simulator) reports through.
///
/// Term output on stderr behind an async drain; `Error`-only when quiet,
/// everything down to `Trace` when debug logging is on.
pub fn initialize(config: LoggingConfig) -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build();
    let filter_level = if config.debug_logging {
        Level::Trace
    } else if config.quiet {
        Level::Error
    } else {
        Level::Info
    };
    let drain = drain.filter_level(filter_level).fuse();

    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}
