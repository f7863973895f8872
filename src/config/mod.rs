use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::scene::{SceneOptions, Size, TextFont};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
}

const APP_DIR: &str = "layoutdesk";
const APP_CONFIG_FILE: &str = "config.json";

/// Application-level settings from `config.json`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub snap_threshold: f64,
    pub grid_size: f64,
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub default_font_family: String,
    pub default_font_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 5.0,
            grid_size: 20.0,
            show_grid: true,
            snap_to_grid: false,
            canvas_width: 1920.0,
            canvas_height: 1080.0,
            default_font_family: "Sans".to_string(),
            default_font_size: 14,
        }
    }
}

impl AppConfig {
    /// Scene size, falling back to the default for non-positive or non-finite values.
    pub fn canvas_size(&self) -> Size {
        let defaults = Self::default();
        let pick = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };
        Size::new(
            pick(self.canvas_width, defaults.canvas_width),
            pick(self.canvas_height, defaults.canvas_height),
        )
    }

    pub fn scene_options(&self) -> SceneOptions {
        let defaults = SceneOptions::default();
        SceneOptions {
            show_grid: self.show_grid,
            snap_to_grid: self.snap_to_grid,
            grid_size: if self.grid_size.is_finite() && self.grid_size >= 1.0 {
                self.grid_size
            } else {
                defaults.grid_size
            },
            snap_threshold: if self.snap_threshold.is_finite() && self.snap_threshold >= 0.0 {
                self.snap_threshold
            } else {
                defaults.snap_threshold
            },
        }
    }

    pub fn text_defaults(&self) -> TextFont {
        TextFont::new(
            self.default_font_family.clone(),
            self.default_font_size,
            false,
        )
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(%err, "no config directory; using defaults");
            return AppConfig::default();
        }
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
