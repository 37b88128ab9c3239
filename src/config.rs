use log::LevelFilter;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Largest `n` accepted in a `VARCHAR(n)` column declaration.
    pub max_varchar_size: usize,
    /// Maximum level printed by [crate::logging::StaticLogger].
    pub log_level: LevelFilter,
    /// Whether level marks in log lines are colored.
    pub colored_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_varchar_size: 65_535,
            log_level: LevelFilter::Info,
            colored_logs: true,
        }
    }
}

impl Config {
    pub fn with_max_varchar_size(mut self, size: usize) -> Self {
        self.max_varchar_size = size;
        self
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_colored_logs(mut self, colored: bool) -> Self {
        self.colored_logs = colored;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_max_varchar_size(255)
            .with_log_level(LevelFilter::Debug)
            .with_colored_logs(false);

        assert_eq!(config.max_varchar_size, 255);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert!(!config.colored_logs);
        assert_eq!(Config::default().max_varchar_size, 65_535);
    }
}
