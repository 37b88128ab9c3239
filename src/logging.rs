//! A small `log` backend writing to stderr.

use std::io::Write;
use std::sync::OnceLock;

use colored::Colorize;
use log::{Level, Log, Metadata, Record, SetLoggerError};

use crate::config::Config;

pub struct StaticLogger {
    colored: bool,
}

impl StaticLogger {
    fn mark(&self, level: Level) -> String {
        let text = format!("{{{level}}}");
        if !self.colored {
            return text;
        }
        match level {
            Level::Debug | Level::Trace => text.as_str().bright_black(),
            Level::Info => text.as_str().cyan(),
            Level::Warn => text.as_str().yellow(),
            Level::Error => text.as_str().red(),
        }
        .bold()
        .to_string()
    }
}

impl Log for StaticLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let file = record.file().unwrap_or("");
        let line = record.line().unwrap_or(0);
        // a closed stderr is not worth failing a statement over
        let _ = writeln!(
            std::io::stderr().lock(),
            "{:<8}{file}:{line:<4} {}",
            self.mark(record.level()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Installs [StaticLogger] as the global logger and sets the max level from
/// `config`. Only the first call installs the logger; later calls just update
/// the level.
pub fn init(config: &Config) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<StaticLogger> = OnceLock::new();

    let mut installed = Ok(());
    let mut first = false;
    let logger = LOGGER.get_or_init(|| {
        first = true;
        StaticLogger {
            colored: config.colored_logs,
        }
    });
    if first {
        installed = log::set_logger(logger);
    }
    log::set_max_level(config.log_level);
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_without_color() {
        let logger = StaticLogger { colored: false };
        assert_eq!(logger.mark(Level::Warn), "{WARN}");
        assert_eq!(logger.mark(Level::Debug), "{DEBUG}");
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = Config::default().with_colored_logs(false);
        // another test binary may already own the global logger
        let _ = init(&config);
        assert!(init(&config).is_ok());
        log::info!("logger installed");
    }
}
