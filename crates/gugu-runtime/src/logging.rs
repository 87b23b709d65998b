#![forbid(unsafe_code)]

//! Logging bootstrap.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the embedding application. [`try_init`] is a convenience that installs
//! a `tracing-subscriber` fmt layer filtered by `GUGU_LOG` (same syntax as
//! `RUST_LOG`), defaulting to `warn`. With the `tracing-json` feature the
//! output is JSON lines.

use core::fmt;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const ENV_LOG: &str = "GUGU_LOG";

/// Filter used when `GUGU_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Failure to install the global subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingError(String);

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to install tracing subscriber: {}", self.0)
    }
}

impl std::error::Error for LoggingError {}

/// Build the filter from `GUGU_LOG`, falling back to [`DEFAULT_DIRECTIVE`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global fmt subscriber using [`env_filter`].
///
/// Returns an error if a global subscriber is already set.
pub fn try_init() -> Result<(), LoggingError> {
    try_init_with(env_filter())
}

/// Install the global fmt subscriber with an explicit filter.
pub fn try_init_with(filter: EnvFilter) -> Result<(), LoggingError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    #[cfg(feature = "tracing-json")]
    let result = builder.json().try_init();
    #[cfg(not(feature = "tracing-json"))]
    let result = builder.try_init();

    result.map_err(|err| LoggingError(err.to_string()))
}
