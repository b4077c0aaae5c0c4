//! Configuration file loading with precedence handling.

use crate::model::{Margins, UiPreferences};
use crate::view::NoticeTimings;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "EREADER_VIEW_CONFIG";

/// Environment variable overriding the page margins.
pub const MARGINS_ENV_VAR: &str = "EREADER_VIEW_MARGINS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/ereader-view/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Top and bottom margin as a fraction of the viewport, in `[0, 0.5)`.
    #[serde(default)]
    pub margins: Option<f64>,

    /// Quiet period after the last resize before pages are recomputed.
    #[serde(default)]
    pub resize_debounce_ms: Option<u64>,

    /// Idle time after pointer movement before auto-shown buttons hide.
    #[serde(default)]
    pub auto_hide_ms: Option<u64>,

    /// Display time of "First page"/"Last page" notices.
    #[serde(default)]
    pub page_notice_ms: Option<u64>,

    /// Display time of status notices.
    #[serde(default)]
    pub status_notice_ms: Option<u64>,

    /// Fade-out time before a notice is removed.
    #[serde(default)]
    pub notice_fade_ms: Option<u64>,

    /// Width of the focused column in CSS pixels.
    #[serde(default)]
    pub focused_column_width: Option<u32>,

    /// Minimum trimmed text length (exclusive) for a content candidate.
    #[serde(default)]
    pub min_text_length: Option<usize>,

    /// Start in full-width mode.
    #[serde(default)]
    pub full_width: Option<bool>,

    /// Start with navigation buttons visible.
    #[serde(default)]
    pub buttons_visible: Option<bool>,

    /// Start with arrow-key page turning enabled.
    #[serde(default)]
    pub keyboard_enabled: Option<bool>,

    /// Start with the buttons stacked on the right edge.
    #[serde(default)]
    pub buttons_on_right: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args. The
/// preference flags seed every fresh initialization; nothing is written back.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Page margins fraction.
    pub margins: f64,
    /// Resize debounce in milliseconds.
    pub resize_debounce_ms: u64,
    /// Auto-hide delay in milliseconds.
    pub auto_hide_ms: u64,
    /// Page notice display time in milliseconds.
    pub page_notice_ms: u64,
    /// Status notice display time in milliseconds.
    pub status_notice_ms: u64,
    /// Notice fade-out in milliseconds.
    pub notice_fade_ms: u64,
    /// Focused column width in CSS pixels.
    pub focused_column_width: u32,
    /// Content locator threshold.
    pub min_text_length: usize,
    /// Initial layout mode.
    pub full_width: bool,
    /// Initial button visibility.
    pub buttons_visible: bool,
    /// Initial keyboard control.
    pub keyboard_enabled: bool,
    /// Initial button placement.
    pub buttons_on_right: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let prefs = UiPreferences::default();
        let timings = NoticeTimings::default();
        Self {
            margins: Margins::DEFAULT.get(),
            resize_debounce_ms: 250,
            auto_hide_ms: 2000,
            page_notice_ms: timings.page.as_millis() as u64,
            status_notice_ms: timings.status.as_millis() as u64,
            notice_fade_ms: timings.fade.as_millis() as u64,
            focused_column_width: crate::view::constants::FOCUSED_COLUMN_WIDTH,
            min_text_length: crate::content::locator::DEFAULT_MIN_TEXT_LENGTH,
            full_width: prefs.full_width,
            buttons_visible: prefs.buttons_visible,
            keyboard_enabled: prefs.keyboard_enabled,
            buttons_on_right: prefs.buttons_on_right,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Initial preferences for a fresh session.
    pub fn preferences(&self) -> UiPreferences {
        UiPreferences {
            buttons_visible: self.buttons_visible,
            keyboard_enabled: self.keyboard_enabled,
            buttons_on_right: self.buttons_on_right,
            full_width: self.full_width,
        }
    }

    /// Notice display durations.
    pub fn notice_timings(&self) -> NoticeTimings {
        NoticeTimings {
            page: Duration::from_millis(self.page_notice_ms),
            status: Duration::from_millis(self.status_notice_ms),
            fade: Duration::from_millis(self.notice_fade_ms),
        }
    }

    /// Resize debounce as a duration.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Auto-hide delay as a duration.
    pub fn auto_hide(&self) -> Duration {
        Duration::from_millis(self.auto_hide_ms)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/ereader-view/ereader-view.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("ereader-view").join("ereader-view.log")
    } else {
        PathBuf::from("ereader-view.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/ereader-view/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ereader-view").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `EREADER_VIEW_CONFIG` environment variable
/// 3. Default path `~/.config/ereader-view/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for `EREADER_VIEW_MARGINS`. A value that does not parse as a number
/// is logged and ignored; range checking happens in [`validate`].
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(MARGINS_ENV_VAR) {
        match raw.trim().parse::<f64>() {
            Ok(margins) => config.margins = margins,
            Err(e) => warn!(value = %raw, error = %e, "Ignoring {}", MARGINS_ENV_VAR),
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        margins: config.margins.unwrap_or(defaults.margins),
        resize_debounce_ms: config
            .resize_debounce_ms
            .unwrap_or(defaults.resize_debounce_ms),
        auto_hide_ms: config.auto_hide_ms.unwrap_or(defaults.auto_hide_ms),
        page_notice_ms: config.page_notice_ms.unwrap_or(defaults.page_notice_ms),
        status_notice_ms: config.status_notice_ms.unwrap_or(defaults.status_notice_ms),
        notice_fade_ms: config.notice_fade_ms.unwrap_or(defaults.notice_fade_ms),
        focused_column_width: config
            .focused_column_width
            .unwrap_or(defaults.focused_column_width),
        min_text_length: config.min_text_length.unwrap_or(defaults.min_text_length),
        full_width: config.full_width.unwrap_or(defaults.full_width),
        buttons_visible: config.buttons_visible.unwrap_or(defaults.buttons_visible),
        keyboard_enabled: config.keyboard_enabled.unwrap_or(defaults.keyboard_enabled),
        buttons_on_right: config.buttons_on_right.unwrap_or(defaults.buttons_on_right),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    margins_override: Option<f64>,
    full_width_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(margins) = margins_override {
        config.margins = margins;
    }

    if let Some(full_width) = full_width_override {
        config.full_width = full_width;
    }

    config
}

/// Check ranges that the types cannot express.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for margins outside `[0, 0.5)` or a
/// zero-width focused column.
pub fn validate(config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    Margins::new(config.margins).map_err(|e| ConfigError::InvalidValue {
        field: "margins",
        reason: e.to_string(),
    })?;

    if config.focused_column_width == 0 {
        return Err(ConfigError::InvalidValue {
            field: "focused_column_width",
            reason: "must be > 0".to_string(),
        });
    }

    Ok(config)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

#[cfg(test)]
mod log_path_tests {
    use super::*;

    #[test]
    fn default_log_path_ends_with_ereader_view_log() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().ends_with("ereader-view.log"),
            "Default log path should end with 'ereader-view.log', got: {:?}",
            path
        );
    }

    #[test]
    fn resolved_config_default_includes_log_path() {
        let config = ResolvedConfig::default();
        assert!(
            !config.log_file_path.as_os_str().is_empty(),
            "Default config should have non-empty log_file_path"
        );
    }

    #[test]
    fn config_file_log_path_overrides_default() {
        let custom_path = PathBuf::from("/custom/path/to/app.log");
        let config_file = ConfigFile {
            log_file_path: Some(custom_path.clone()),
            ..ConfigFile::default()
        };

        let resolved = merge_config(Some(config_file));
        assert_eq!(
            resolved.log_file_path, custom_path,
            "Config file log_file_path should override default"
        );
    }
}
