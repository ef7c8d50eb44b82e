//! # courier-log
//!
//! Logging bootstrap for courier processes: one call installs a
//! `tracing-subscriber` registry with an [`EnvFilter`](tracing_subscriber::EnvFilter)
//! and a text or JSON formatter.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! fn main() -> Result<(), courier_log::LogError> {
//!     let _guard = courier_log::auto_init()?;
//!
//!     tracing::info!(actions = 5, "registry ready");
//!     Ok(())
//! }
//! ```
//!
//! `auto_init` honours `COURIER_LOG` / `RUST_LOG` when set and otherwise
//! picks [`Config::development`] for debug builds and
//! [`Config::production`] for release builds.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
mod error;
mod writer;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, Level, WriterConfig};
pub use error::{LogError, LogResult};

/// Auto-detect and initialize the best logging configuration
pub fn auto_init() -> LogResult<LoggerGuard> {
    if Config::env_has_filter() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with default configuration
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Like [`init_with`], but an already-installed global subscriber is not an
/// error: the returned guard is then a no-op.
///
/// A malformed filter is still reported.
pub fn try_init(config: Config) -> LogResult<LoggerGuard> {
    let builder = LoggerBuilder::from_config(config);
    builder.filter()?;
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggerGuard::noop());
    }
    match builder.build() {
        Err(LogError::Init(_)) => Ok(LoggerGuard::noop()),
        other => other,
    }
}
