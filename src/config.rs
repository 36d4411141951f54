//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/clubtree/clubtree.toml`
//! 3. Local config: file passed explicitly (e.g. `--config`)
//! 4. Environment variables: `CLUBTREE_*` prefix, `__` as section separator

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{LayoutConfig, Size, ViewportConfig};

/// Unified configuration for clubtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Member data file (JSON array of member records)
    pub data_file: Option<PathBuf>,
    /// Footprints and spacing
    pub layout: LayoutConfig,
    /// Fit padding, zoom extent and transition timing
    pub viewport: ViewportConfig,
}

/// Raw footprint; either dimension may be given on its own.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(default)]
pub struct RawSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl RawSize {
    fn merge_onto(overlay: Option<RawSize>, base: Size) -> Size {
        let Some(overlay) = overlay else {
            return base;
        };
        Size::new(
            overlay.width.unwrap_or(base.width),
            overlay.height.unwrap_or(base.height),
        )
    }
}

/// Raw layout section; `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutConfig {
    pub regular: Option<RawSize>,
    pub veteran: Option<RawSize>,
    pub lord: Option<RawSize>,
    pub veteran_years: Option<usize>,
    pub sibling_gutter: Option<f64>,
    pub level_gap: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawViewportConfig {
    pub padding: Option<f64>,
    pub max_fit_scale: Option<f64>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub zoom_in_factor: Option<f64>,
    pub zoom_out_factor: Option<f64>,
    pub fit_immediately: Option<bool>,
    pub transition_ms: Option<u64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub layout: RawLayoutConfig,
    pub viewport: RawViewportConfig,
}

impl LayoutConfig {
    fn merge(&self, overlay: &RawLayoutConfig) -> Self {
        Self {
            regular: RawSize::merge_onto(overlay.regular, self.regular),
            veteran: RawSize::merge_onto(overlay.veteran, self.veteran),
            lord: RawSize::merge_onto(overlay.lord, self.lord),
            veteran_years: overlay.veteran_years.unwrap_or(self.veteran_years),
            sibling_gutter: overlay.sibling_gutter.unwrap_or(self.sibling_gutter),
            level_gap: overlay.level_gap.unwrap_or(self.level_gap),
        }
    }
}

impl ViewportConfig {
    fn merge(&self, overlay: &RawViewportConfig) -> Self {
        Self {
            padding: overlay.padding.unwrap_or(self.padding),
            max_fit_scale: overlay.max_fit_scale.unwrap_or(self.max_fit_scale),
            min_zoom: overlay.min_zoom.unwrap_or(self.min_zoom),
            max_zoom: overlay.max_zoom.unwrap_or(self.max_zoom),
            zoom_in_factor: overlay.zoom_in_factor.unwrap_or(self.zoom_in_factor),
            zoom_out_factor: overlay.zoom_out_factor.unwrap_or(self.zoom_out_factor),
            fit_immediately: overlay.fit_immediately.unwrap_or(self.fit_immediately),
            transition_ms: overlay.transition_ms.unwrap_or(self.transition_ms),
        }
    }
}

/// Get the XDG config directory for clubtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "clubtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("clubtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand shell variables and tilde in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Merge overlay config onto self (base); overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .or_else(|| self.data_file.clone()),
            layout: self.layout.merge(&overlay.layout),
            viewport: self.viewport.merge(&overlay.viewport),
        }
    }

    fn expand_paths(&mut self) {
        if let Some(data_file) = &self.data_file {
            let expanded = expand_env_vars(data_file.to_string_lossy().as_ref());
            self.data_file = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional explicit config file; a missing file is an error
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, only if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit local config
        if let Some(local_path) = local {
            debug!(path = %local_path.display(), "local config");
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current, Environment::with_prefix("CLUBTREE"))?;

        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Apply `CLUBTREE_*` variables from `env` as explicit overrides.
    ///
    /// Every key of the schema is reachable, nested sections via `__`
    /// (e.g. `CLUBTREE_LAYOUT__LORD__WIDTH`).
    fn apply_env_overrides(settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()
            .map_err(config_err)?;
        let overlay: RawSettings = config.try_deserialize().map_err(config_err)?;

        Ok(settings.merge_with(&overlay))
    }

    /// Reject footprints, spacing, scales and zoom extents the engine cannot use.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let invalid = |message: String| Err(ApplicationError::Config { message });

        let layout = &self.layout;
        let vp = &self.viewport;
        // NaN slips past every ordered comparison below
        for (name, value) in [
            ("layout.regular.width", layout.regular.width),
            ("layout.regular.height", layout.regular.height),
            ("layout.veteran.width", layout.veteran.width),
            ("layout.veteran.height", layout.veteran.height),
            ("layout.lord.width", layout.lord.width),
            ("layout.lord.height", layout.lord.height),
            ("layout.sibling_gutter", layout.sibling_gutter),
            ("layout.level_gap", layout.level_gap),
            ("viewport.padding", vp.padding),
            ("viewport.max_fit_scale", vp.max_fit_scale),
            ("viewport.min_zoom", vp.min_zoom),
            ("viewport.max_zoom", vp.max_zoom),
            ("viewport.zoom_in_factor", vp.zoom_in_factor),
            ("viewport.zoom_out_factor", vp.zoom_out_factor),
        ] {
            if !value.is_finite() {
                return invalid(format!("{name} must be a finite number, got {value}"));
            }
        }

        for (name, size) in [
            ("regular", layout.regular),
            ("veteran", layout.veteran),
            ("lord", layout.lord),
        ] {
            if size.width <= 0.0 || size.height <= 0.0 {
                return invalid(format!("layout.{name} footprint must be positive"));
            }
        }
        if layout.sibling_gutter < 0.0 || layout.level_gap < 0.0 {
            return invalid("layout spacing must not be negative".into());
        }
        if vp.min_zoom <= 0.0 || vp.max_fit_scale <= 0.0 {
            return invalid("viewport scales must be positive".into());
        }
        if vp.zoom_in_factor <= 0.0 || vp.zoom_out_factor <= 0.0 {
            return invalid("viewport zoom factors must be positive".into());
        }
        if vp.min_zoom > vp.max_zoom {
            return invalid(format!(
                "viewport.min_zoom ({}) exceeds viewport.max_zoom ({})",
                vp.min_zoom, vp.max_zoom
            ));
        }
        if vp.padding < 0.0 {
            return invalid("viewport.padding must not be negative".into());
        }
        Ok(())
    }

    /// Effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
