//! Layered configuration: defaults → TOML file → `COURIER_*` env → flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use courier_action::DispatchConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "courier.toml";

/// Variables owned by courier-log's own env handling.
const LOG_ENV_KEYS: &[&str] = &[
    "log",
    "log_format",
    "log_colors",
    "log_time",
    "log_source",
];

/// Everything the binary can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logger settings
    pub log: courier_log::Config,
    /// Dispatcher settings
    pub dispatch: DispatchConfig,
}

/// Values given on the command line; `None` leaves lower layers alone.
#[derive(Debug, Default)]
pub struct Overrides {
    pub log_level: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl AppConfig {
    /// Resolve the configuration.
    ///
    /// An explicit `path` must exist; otherwise [`DEFAULT_CONFIG_FILE`] is
    /// read from the working directory when present.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let defaults = Self {
            log: courier_log::Config::from_env(),
            dispatch: DispatchConfig::default(),
        };
        let mut figment = Figment::from(Serialized::defaults(defaults));

        if let Some(file) = config_file(path)? {
            tracing::debug!(path = %file.display(), "loading config file");
            figment = figment.merge(Toml::file(file));
        }

        figment = figment.merge(Env::prefixed("COURIER_").split("__").ignore(LOG_ENV_KEYS));

        if let Some(level) = &overrides.log_level {
            figment = figment.merge(Serialized::default("log.level", level));
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            figment = figment.merge(Serialized::default("dispatch.timeout_ms", timeout_ms));
        }

        figment.extract().context("invalid configuration")
    }
}

fn config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => bail!("config file {} not found", path.display()),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            Ok(fallback.is_file().then_some(fallback))
        }
    }
}
