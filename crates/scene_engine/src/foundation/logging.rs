//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}

/// Initialize logging, falling back to `default_filter` when `RUST_LOG` is unset
///
/// Returns an error instead of panicking when a logger is already installed,
/// which happens when several tests or tools initialise logging in one process.
pub fn init_with_default_filter(default_filter: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
}
