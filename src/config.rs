//! Project configuration.
//!
//! Loaded from `postpress.toml` at the project root. Every key is optional;
//! the file is merged on top of the stock defaults and unknown keys are
//! rejected to catch typos early.
//!
//! ```toml
//! site_title = "Ile-Segal"       # Shown in <title> and the copyright line
//!
//! [images]
//! quality = 90                   # WebP quality (1-100)
//!
//! [session]
//! after_end = "finish"           # "finish" | "keep_open"
//! clean_preview_on_export = true
//! ```
//!
//! ## `after_end`
//!
//! Decides what the builder does with the session once the closing shell has
//! been written:
//!
//! - `finish`: the session is over. Further appends, or a second close, fail
//!   with an invalid-state error. Starting or resuming a post is allowed.
//! - `keep_open`: the session stays open and appends keep landing after the
//!   footer. Matches the behaviour of earlier releases.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the configuration file inside the project root.
pub const CONFIG_FILENAME: &str = "postpress.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `postpress.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site name used in `<title>` and the footer.
    pub site_title: String,
    /// Derivative encoding settings.
    pub images: ImagesConfig,
    /// Post session lifecycle settings.
    pub session: SessionConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "Ile-Segal".to_string(),
            images: ImagesConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site_title must not be empty".into(),
            ));
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// Derivative encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Lossy WebP quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

/// What happens to the session after the closing shell is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterEnd {
    #[default]
    Finish,
    KeepOpen,
}

/// Post session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub after_end: AfterEnd,
    /// Empty `temp/` once the export has been written.
    pub clean_preview_on_export: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            after_end: AfterEnd::Finish,
            clean_preview_on_export: true,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `postpress.toml` from `root` as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the project config: stock defaults, user file on top, validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    tracing::debug!(site_title = %config.site_title, "loaded config");
    Ok(config)
}

/// Returns a fully-commented stock `postpress.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# postpress configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Place this file at the project root, next to temp/ and exp/.
# Unknown keys will cause an error.

# Site name, used in the page <title> and the footer copyright line.
site_title = "Ile-Segal"

# ---------------------------------------------------------------------------
# Derivative images
# ---------------------------------------------------------------------------
[images]
# Lossy WebP quality (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Post session
# ---------------------------------------------------------------------------
[session]
# What happens once the post has been exported:
#   "finish"    -> the post is closed; adding content requires a new post
#   "keep_open" -> content can still be appended (after the footer)
after_end = "finish"

# Empty temp/ after a successful export.
clean_preview_on_export = true
"##
}
