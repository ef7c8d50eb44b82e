//! Configuration types and presets
//!
//! - `base`: the top-level [`Config`] plus [`Format`] and [`Level`]
//! - `writer`: output destination and display toggles
//! - `presets`: development / production / environment-driven setups

mod base;
mod presets;
mod writer;

pub use base::{Config, Format, Level};
pub use writer::{DisplayConfig, WriterConfig};
