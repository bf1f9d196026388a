//! Diagnostic logging setup
//!
//! Separate from the session log: this is `log`/`env_logger` output on
//! stderr for debugging the tool itself.

use std::io::Write;

use colored::Colorize;
use log::LevelFilter;

use crate::error::{Result, ScanError};

/// Install the stderr logger.
///
/// `RUST_LOG` is honoured; without it only warnings are shown. `verbose`
/// forces debug output for this crate either way.
pub fn init_logger(verbose: bool) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    builder.parse_env("RUST_LOG");
    builder.filter_module("rustls", LevelFilter::Warn);
    if verbose {
        builder.filter_module("schemascope", LevelFilter::Debug);
    }

    builder.format(|buf, record| {
        let level = record.level();
        let colored_level = match level {
            log::Level::Error => level.to_string().red(),
            log::Level::Warn => level.to_string().yellow(),
            log::Level::Info => level.to_string().green(),
            log::Level::Debug => level.to_string().blue(),
            log::Level::Trace => level.to_string().purple(),
        };
        writeln!(
            buf,
            "{} [{}] {}",
            record.target().cyan(),
            colored_level,
            record.args()
        )
    });

    builder
        .try_init()
        .map_err(|e| ScanError::ConfigError(format!("Failed to initialize logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        let _ = init_logger(false);
        assert!(init_logger(true).is_err());
    }
}
