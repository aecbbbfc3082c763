//! Editor settings, persisted as TOML.
//!
//! - `[conventions]`: identity, selection, status and timestamp column names
//!   and the enabled/disabled status values
//! - `[source]`: simulated latency of the built-in catalog
//! - `[display]`: date format, colours and how disabled rows combine with
//!   insert/update highlighting

mod persistence;

pub use persistence::{load_settings, read_settings, save_settings, settings_path};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use pipedict_model::{Conventions, DISPLAY_DATETIME_FORMAT};
use pipedict_view::DisabledPrecedence;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub conventions: Conventions,
    pub source: SourceSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Delay added to every table fetch, in milliseconds.
    pub latency_ms: u64,
}

impl SourceSettings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// `chrono` format string for date-time cells.
    pub datetime_format: String,
    /// Colour rows and cells by their highlight.
    pub color: bool,
    pub precedence: DisabledPrecedence,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            datetime_format: DISPLAY_DATETIME_FORMAT.to_string(),
            color: true,
            precedence: DisabledPrecedence::default(),
        }
    }
}
