//! Logging setup for dupescan.
//!
//! Uses the `log` facade with an `env_logger` backend. The level comes from
//! `RUST_LOG` when that variable is set, otherwise from the CLI flags:
//! `-q` shows errors only, the default is info, `-v` is debug and `-vv`
//! is trace.
//!
//! Debug builds prefix every line with a timestamp (and the module path
//! when verbose); release builds print only level and message.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupescan::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible with -v");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// Calling this more than once is harmless: later calls leave the first
/// logger in place.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = env::var("RUST_LOG").is_ok();
    let mut builder = Builder::new();

    let level = determine_level(verbose, quiet);
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(level);
    }
    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        log::trace!("Logger already initialized");
        return;
    }

    if from_env {
        log::debug!("Logging configured from RUST_LOG");
    } else {
        log::debug!("Logging initialized at level: {:?}", level);
    }
}

/// Map CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let timestamp = buf.timestamp_seconds();
        let level = record.level();
        let style = buf.default_level_style(level);

        if verbose > 0 {
            writeln!(
                buf,
                "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
        }
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
    });
}

/// Name of the currently active maximum log level.
#[must_use]
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_level_from_flags() {
        assert_eq!(determine_level(0, false), LevelFilter::Info);
        assert_eq!(determine_level(1, false), LevelFilter::Debug);
        assert_eq!(determine_level(2, false), LevelFilter::Trace);
        assert_eq!(determine_level(5, false), LevelFilter::Trace);
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        assert_eq!(determine_level(0, true), LevelFilter::Error);
        assert_eq!(determine_level(2, true), LevelFilter::Error);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logging(0, true);
        init_logging(2, false);
    }

    #[test]
    fn test_current_level_name_is_known() {
        let name = current_level_name();
        assert!(["off", "error", "warn", "info", "debug", "trace"].contains(&name));
    }
}
