#![forbid(unsafe_code)]

//! Loading [`MenuConfig`] from TOML and JSON.
//!
//! Run:
//!   cargo test -p stackmenu-widgets --features config --test config_loading

use std::io::Write;

use stackmenu_widgets::config::{ConfigError, MenuConfig};
use stackmenu_widgets::transition::{Easing, EntranceKind, ExitKind};
use web_time::Duration;

#[test]
fn empty_toml_is_default() {
    let config = MenuConfig::from_toml_str("").unwrap();
    assert_eq!(config, MenuConfig::default());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let config = MenuConfig::from_toml_str(
        r#"
        [transition]
        entrance = "fade_in"
        exit = "none"
        entrance_ms = 120
        entrance_easing = "ease_in_out"
        reduced_motion = true

        [search]
        cutoff = 80
        "#,
    )
    .unwrap();

    assert_eq!(config.transition.entrance, EntranceKind::FadeIn);
    assert_eq!(config.transition.exit, ExitKind::None);
    assert_eq!(config.transition.entrance_ms, 120);
    assert_eq!(config.transition.exit_ms, 150);
    assert_eq!(config.transition.entrance_easing, Easing::EaseInOut);
    assert!(config.transition.reduced_motion);
    assert_eq!(config.search.cutoff, 80);
    assert!(config.search.collapse_aliases);
    assert_eq!(config.navigation.viewport_rows, 10);

    let transition = config.to_transition_config();
    assert_eq!(transition.entrance_duration, Duration::from_millis(120));
}

#[test]
fn json_round_trips_through_serde() {
    let mut config = MenuConfig::default();
    config.navigation.viewport_rows = 4;
    config.search.collapse_aliases = false;
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(MenuConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn files_load_from_disk() {
    let mut toml_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(toml_file, "[navigation]\nviewport_rows = 12").unwrap();
    let config = MenuConfig::from_toml_file(toml_file.path()).unwrap();
    assert_eq!(config.navigation.viewport_rows, 12);

    let mut json_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(json_file, r#"{{"search": {{"cutoff": 60}}}}"#).unwrap();
    let config = MenuConfig::from_json_file(json_file.path()).unwrap();
    assert_eq!(config.search.cutoff, 60);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MenuConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn malformed_input_reports_format() {
    let err = MenuConfig::from_toml_str("[search]\ncutoff = \"high\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(err.to_string().starts_with("TOML parse error"));

    let err = MenuConfig::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn out_of_range_values_fail_validation() {
    let config = MenuConfig::from_toml_str(
        r#"
        [search]
        cutoff = 101

        [navigation]
        viewport_rows = 0
        "#,
    )
    .unwrap();
    match config.validated() {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation errors, got {other:?}"),
    }
}
