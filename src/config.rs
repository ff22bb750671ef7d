//! User settings, stored as `settings.toml` under the platform config dir.
//!
//! Every field has a default, so a partial or missing file is fine. A file
//! that does not parse is logged and replaced by the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::image_ops::ResampleFilter;
use crate::scale::Viewport;
use crate::selection::MoveModifier;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "crop-select";

pub const DEFAULT_VIEWPORT_FRACTION: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Share of the monitor the preview may cover.
    pub viewport_fraction: f64,
    pub move_modifier: MoveModifier,
    pub preview_filter: ResampleFilter,
    /// Screen size assumed when the monitor size cannot be queried.
    pub fallback_width: u32,
    pub fallback_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport_fraction: DEFAULT_VIEWPORT_FRACTION,
            move_modifier: MoveModifier::Shift,
            preview_filter: ResampleFilter::Lanczos3,
            fallback_width: 1280,
            fallback_height: 720,
        }
    }
}

impl Config {
    /// Viewport for a monitor of the given size, or for the fallback screen.
    pub fn viewport(&self, screen: Option<(u32, u32)>) -> Viewport {
        let (w, h) = screen.unwrap_or((self.fallback_width, self.fallback_height));
        Viewport::fraction_of(w, h, self.viewport_fraction)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable settings");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    fs::write(path, content)?;
    Ok(())
}
