//! # bdo-log
//!
//! Logging setup for hosts of the BDO runtime plus the observability hook
//! system the runtime uses to surface diagnostics.
//!
//! ```rust,no_run
//! use bdo_log::{Config, LoggerBuilder};
//!
//! LoggerBuilder::from_config(Config::from_env()).build()?;
//! tracing::info!("ready");
//! # Ok::<(), bdo_log::LogError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
mod error;
pub mod observability;

pub use builder::LoggerBuilder;
pub use config::{Config, DisplayConfig, Format};
pub use error::{LogError, LogResult};

/// Install the global subscriber from environment variables
///
/// Equivalent to `LoggerBuilder::from_config(Config::from_env()).build()`.
pub fn init() -> LogResult<()> {
    LoggerBuilder::from_config(Config::from_env()).build()
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::observability::{
        HookRegistry, LoggingHook, ObservabilityEvent, ObservabilityHook,
    };
    pub use crate::{Config, Format, LogResult, LoggerBuilder};
}
