use bon::Builder;

/// Configuration struct containing options affecting how the simulation
/// reports what it is doing.
#[derive(Debug, Default, Clone, Copy, Builder)]
pub struct RuntimeConfig {
    /// suppresses non-error log output
    pub quiet: bool,
    /// enables debug logging
    pub debug_logging: bool,
}

impl RuntimeConfig {
    pub fn get_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            quiet: self.quiet,
            debug_logging: self.debug_logging,
        }
    }
}

/// Configuration struct describing what settings a logger should be
/// created with.
pub struct LoggingConfig {
    /// Whether or not to silence non-error messages. Will be overridden
    /// by `debug_logging` if set to true.
    pub quiet: bool,
    /// Whether or not to enable debug logging. If set to true, will
    /// override `quiet`.
    pub debug_logging: bool,
}
