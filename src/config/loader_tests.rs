//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

#[test]
fn default_config_path_contains_ereader_view_config_toml() {
    let Some(path) = default_config_path() else {
        return;
    };
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("ereader-view") && path_str.ends_with("config.toml"),
        "Path should contain 'ereader-view' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = env::temp_dir().join("ereader_view_test_config.toml");

    let toml_content = r#"
margins = 0.05
resize_debounce_ms = 100
auto_hide_ms = 1000
focused_column_width = 700
full_width = false
buttons_on_right = true
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.margins, Some(0.05));
    assert_eq!(config.resize_debounce_ms, Some(100));
    assert_eq!(config.auto_hide_ms, Some(1000));
    assert_eq!(config.focused_column_width, Some(700));
    assert_eq!(config.full_width, Some(false));
    assert_eq!(config.buttons_on_right, Some(true));
    assert_eq!(config.keyboard_enabled, None);

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("ereader_view_test_invalid.toml");
    fs::write(&config_path, "this is not valid TOML ][}{")
        .expect("Failed to write invalid test config");

    let result = load_config_file(&config_path);

    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        _ => panic!("Expected ParseError, got {:?}", result),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"dark\"\n");
    assert!(
        result.is_err(),
        "Unknown keys should be rejected so typos surface"
    );
}

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_overrides_only_present_fields() {
    let defaults = ResolvedConfig::default();
    let file = ConfigFile {
        margins: Some(0.2),
        keyboard_enabled: Some(false),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file));

    assert_eq!(resolved.margins, 0.2);
    assert!(!resolved.keyboard_enabled);
    assert_eq!(resolved.auto_hide_ms, defaults.auto_hide_ms);
    assert_eq!(resolved.full_width, defaults.full_width);
}

#[test]
fn resolved_config_default_has_expected_values() {
    let config = ResolvedConfig::default();

    assert_eq!(config.margins, 0.1);
    assert_eq!(config.resize_debounce_ms, 250);
    assert_eq!(config.auto_hide_ms, 2000);
    assert_eq!(config.page_notice_ms, 1500);
    assert_eq!(config.status_notice_ms, 3000);
    assert_eq!(config.notice_fade_ms, 300);
    assert_eq!(config.focused_column_width, 800);
    assert_eq!(config.min_text_length, 100);
    assert_eq!(config.preferences(), UiPreferences::default());
}

#[test]
fn validate_rejects_margins_of_one_half() {
    let config = ResolvedConfig {
        margins: 0.5,
        ..ResolvedConfig::default()
    };

    match validate(config) {
        Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "margins"),
        other => panic!("Expected InvalidValue, got {:?}", other),
    }
}

#[test]
fn validate_rejects_zero_column_width() {
    let config = ResolvedConfig {
        focused_column_width: 0,
        ..ResolvedConfig::default()
    };
    assert!(validate(config).is_err());
}

#[test]
fn validate_accepts_defaults() {
    assert!(validate(ResolvedConfig::default()).is_ok());
}

/// RAII guard to ensure environment variable cleanup even under test parallelism.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(ereader_view_margins)]
fn apply_env_overrides_reads_margins() {
    let _guard = EnvGuard::new(MARGINS_ENV_VAR);
    env::set_var(MARGINS_ENV_VAR, "0.15");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(result.margins, 0.15);
}

#[test]
#[serial(ereader_view_margins)]
fn apply_env_overrides_ignores_unparsable_margins() {
    let _guard = EnvGuard::new(MARGINS_ENV_VAR);
    env::set_var(MARGINS_ENV_VAR, "wide");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(result, ResolvedConfig::default());
}

#[test]
#[serial(ereader_view_margins)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _guard = EnvGuard::new(MARGINS_ENV_VAR);
    assert_eq!(
        apply_env_overrides(ResolvedConfig::default()),
        ResolvedConfig::default()
    );
}

#[test]
#[serial(ereader_view_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);
    let temp_dir = env::temp_dir();
    let explicit = temp_dir.join("ereader_view_explicit.toml");
    let from_env = temp_dir.join("ereader_view_from_env.toml");
    fs::write(&explicit, "margins = 0.05\n").expect("write explicit config");
    fs::write(&from_env, "margins = 0.3\n").expect("write env config");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let config = load_config_with_precedence(Some(explicit.clone()))
        .unwrap()
        .unwrap();

    assert_eq!(config.margins, Some(0.05), "--config beats the env var");

    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
}

#[test]
#[serial(ereader_view_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);
    let env_path = env::temp_dir().join("ereader_view_env_only.toml");
    fs::write(&env_path, "buttons_visible = false\n").expect("write env config");
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let config = load_config_with_precedence(None).unwrap().unwrap();

    assert_eq!(config.buttons_visible, Some(false));

    fs::remove_file(env_path).ok();
}

#[test]
fn apply_cli_overrides_wins_over_file() {
    let file = ConfigFile {
        margins: Some(0.2),
        full_width: Some(true),
        ..ConfigFile::default()
    };
    let resolved = apply_cli_overrides(merge_config(Some(file)), Some(0.05), Some(false));

    assert_eq!(resolved.margins, 0.05);
    assert!(!resolved.full_width);
}

#[test]
fn apply_cli_overrides_no_overrides() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), None, None), base);
}

#[test]
fn notice_timings_follow_config() {
    let config = ResolvedConfig {
        page_notice_ms: 10,
        status_notice_ms: 20,
        notice_fade_ms: 5,
        ..ResolvedConfig::default()
    };
    let timings = config.notice_timings();
    assert_eq!(timings.page, Duration::from_millis(10));
    assert_eq!(timings.status, Duration::from_millis(20));
    assert_eq!(timings.fade, Duration::from_millis(5));
}
