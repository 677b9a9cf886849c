//! Logger builder

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{Config, DisplayConfig, Format};
use crate::error::{LogError, LogResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Logger builder
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    config: Config,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Override the level filter
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    /// Override the output format
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.config.format = format;
        self
    }

    /// Parse the level directive without installing anything
    pub fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level).map_err(|e| LogError::Filter {
            filter: self.config.level.clone(),
            reason: e.to_string(),
        })
    }

    /// Build and install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Filter string cannot be parsed
    /// - A global subscriber has already been set
    pub fn build(self) -> LogResult<()> {
        let filter = self.filter()?;
        let fmt_layer = fmt_layer(self.config.format, &self.config.display);

        Registry::default()
            .with(fmt_layer)
            .with(filter)
            .try_init()
            .map_err(|e| LogError::Init(e.to_string()))
    }
}

fn fmt_layer(format: Format, display: &DisplayConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(display.colors)
        .with_target(display.target)
        .with_file(display.source)
        .with_line_number(display.source);

    match (format, display.time) {
        (Format::Pretty, true) => layer.pretty().boxed(),
        (Format::Pretty, false) => layer.pretty().without_time().boxed(),
        (Format::Compact, true) => layer.compact().boxed(),
        (Format::Compact, false) => layer.compact().without_time().boxed(),
        (Format::Json, true) => layer.json().boxed(),
        (Format::Json, false) => layer.json().without_time().boxed(),
    }
}
