//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the configured level is used,
//! raised one step per `-v` and forced to `error` by `-q`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Effective level name for `base` raised by `verbosity` steps
pub fn effective_level(base: &str, verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }

    let start = LEVELS.iter().position(|level| *level == base).unwrap_or(2);
    let index = (start + verbosity as usize).min(LEVELS.len() - 1);
    LEVELS[index]
}

/// Install the global subscriber; later calls are ignored
pub fn init_logging(base: &str, verbosity: u8, quiet: bool) {
    let level = effective_level(base, verbosity, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("safeinteract={}", level)));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level() {
        assert_eq!(effective_level("info", 0, false), "info");
        assert_eq!(effective_level("info", 1, false), "debug");
        assert_eq!(effective_level("info", 9, false), "trace");
        assert_eq!(effective_level("warn", 0, true), "error");
        assert_eq!(effective_level("bogus", 0, false), "info");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging("info", 0, false);
        init_logging("debug", 1, false);
    }
}
