//! Settings file location and IO.
//!
//! Without an explicit `--config` path the file lives in the platform
//! config folder:
//! - Linux: ~/.config/pipedict/
//! - macOS: ~/Library/Application Support/dev.pipedict.pipedict/
//! - Windows: %APPDATA%/pipedict/pipedict/config/

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::{info, warn};

use super::Settings;

const APP_QUALIFIER: &str = "dev";
const APP_ORG: &str = "pipedict";
const APP_NAME: &str = "pipedict";
const CONFIG_FILENAME: &str = "settings.toml";

/// Default settings file path, if the platform has a config folder.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Read settings from `path`. A missing file yields `None`.
pub fn read_settings(path: &Path) -> Result<Option<Settings>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let settings = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(settings))
}

/// Load settings from `explicit` or the default location.
///
/// Falls back to defaults when no file exists or it cannot be parsed.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(settings_path) else {
        warn!("could not determine settings path, using defaults");
        return Settings::default();
    };

    match read_settings(&path) {
        Ok(Some(settings)) => {
            info!(path = %path.display(), "loaded settings");
            settings
        }
        Ok(None) => {
            info!(path = %path.display(), "no settings file, using defaults");
            Settings::default()
        }
        Err(error) => {
            warn!("{error:#}, using defaults");
            Settings::default()
        }
    }
}

/// Write settings to `path`, creating parent folders.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(settings).context("failed to serialize settings")?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
