//! Configuration module.
//!
//! Defaults, an optional TOML file, environment and CLI overrides resolve into
//! one [`ResolvedConfig`] that seeds each fresh reader session.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config, validate,
    ConfigError, ConfigFile, ResolvedConfig,
};

/// Resolve configuration from every source in precedence order.
///
/// Defaults → config file → environment → CLI flags, then range validation.
///
/// # Errors
///
/// Returns an error if a config file exists but is unreadable or malformed, or
/// if the resolved values are out of range.
pub fn resolve(
    config_path: Option<std::path::PathBuf>,
    margins_override: Option<f64>,
    full_width_override: Option<bool>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file));
    validate(apply_cli_overrides(config, margins_override, full_width_override))
}
