//! Writer and display configuration

use serde::{Deserialize, Serialize};

/// Where formatted events go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum WriterConfig {
    /// Write to stderr
    #[default]
    Stderr,
    /// Write to stdout
    Stdout,
}

impl WriterConfig {
    pub(crate) fn is_terminal(self) -> bool {
        use std::io::IsTerminal;
        match self {
            Self::Stderr => std::io::stderr().is_terminal(),
            Self::Stdout => std::io::stdout().is_terminal(),
        }
    }
}

/// Display toggles
///
/// Independent switches that map one-to-one onto config keys and
/// `COURIER_LOG_*` variables.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show timestamps
    pub time: bool,
    /// Show source location (`file:line`)
    pub source: bool,
    /// Show target module
    pub target: bool,
    /// Show thread IDs
    pub thread_ids: bool,
    /// Use ANSI colors
    pub colors: bool,
    /// Include the span list in JSON output
    pub span_list: bool,
    /// Flatten event fields into the top-level JSON object
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time: true,
            source: cfg!(debug_assertions),
            target: true,
            thread_ids: false,
            colors: cfg!(feature = "ansi") && WriterConfig::Stderr.is_terminal(),
            span_list: true,
            flatten: true,
        }
    }
}

impl DisplayConfig {
    /// Apply `COURIER_LOG_TIME`, `COURIER_LOG_SOURCE` and `COURIER_LOG_COLORS`
    /// as looked up through `var`.
    pub(super) fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("COURIER_LOG_TIME") {
            self.time = flag(&v);
        }
        if let Some(v) = var("COURIER_LOG_SOURCE") {
            self.source = flag(&v);
        }
        if let Some(v) = var("COURIER_LOG_COLORS") {
            self.colors = flag(&v);
        }
    }
}

fn flag(value: &str) -> bool {
    value != "0" && !value.eq_ignore_ascii_case("false")
}
