//! Logger builder

#[macro_use]
mod format;

use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};
use crate::writer;

type FmtLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync + 'static>;

/// Logger builder
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    config: Config,
}

/// Handle returned once the global subscriber is in place.
///
/// A guard from [`try_init`](crate::try_init) may be a no-op when another
/// subscriber had already been installed.
#[derive(Debug)]
#[must_use = "dropping the guard discards whether this call installed the subscriber"]
pub struct LoggerGuard {
    installed: bool,
}

impl LoggerGuard {
    pub(crate) const fn noop() -> Self {
        Self { installed: false }
    }

    /// `true` if this call installed the global subscriber.
    pub const fn is_installed(&self) -> bool {
        self.installed
    }
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Replace the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    /// Replace the output format.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.config.format = format;
        self
    }

    /// The configuration this builder will install.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse the filter directive without installing anything.
    pub fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level).map_err(|e| LogError::Filter {
            filter: self.config.level.clone(),
            reason: e.to_string(),
        })
    }

    /// Build and install the global subscriber.
    ///
    /// # Errors
    ///
    /// - the filter directive does not parse
    /// - a global subscriber is already set
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = self.filter()?;
        let layer = self.fmt_layer();

        Registry::default()
            .with(filter)
            .with(layer)
            .try_init()
            .map_err(|e| LogError::Init(e.to_string()))?;

        tracing::debug!(
            level = %self.config.level,
            format = ?self.config.format,
            "logger initialized"
        );
        Ok(LoggerGuard { installed: true })
    }

    fn fmt_layer(&self) -> FmtLayer {
        let display = &self.config.display;
        let writer = writer::make_writer(self.config.writer);
        match self.config.format {
            Format::Pretty => create_fmt_layer!(pretty, display, writer),
            Format::Compact => create_fmt_layer!(compact, display, writer),
            Format::Json => create_json_layer!(display, writer),
        }
    }
}
