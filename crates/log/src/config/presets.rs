//! Named configurations for hosts of the validation runtime

use super::{Config, DisplayConfig, Format};

impl Config {
    /// Read `BDO_LOG` (falling back to `RUST_LOG`) and `BDO_LOG_FORMAT`
    ///
    /// Unset variables keep the defaults: `info` level, compact output.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let level = std::env::var("BDO_LOG").or_else(|_| std::env::var("RUST_LOG"));
        if let Ok(level) = level {
            config.level = level;
        }
        if let Ok(format) = std::env::var("BDO_LOG_FORMAT") {
            config.format = Format::parse_lossy(&format);
        }

        config.display.parse_env();
        config
    }

    /// Local work on schemas: rule failures and evaluator details at `debug`
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
        }
    }

    /// Deployed runtime writing JSON lines for a collector
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                ..DisplayConfig::default()
            },
        }
    }

    /// Test runs keep every record but drop colors and timestamps
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: "trace".to_string(),
            format: Format::Compact,
            display: DisplayConfig {
                colors: false,
                time: false,
                source: false,
                target: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_in_format() {
        assert_eq!(Config::development().format, Format::Pretty);
        assert_eq!(Config::production().format, Format::Json);
        assert!(!Config::production().display.colors);
        assert!(!Config::test().display.time);
    }

    #[test]
    fn test_preset_keeps_targets() {
        let config = Config::test();
        assert_eq!(config.level, "trace");
        assert!(config.display.target);
    }
}
