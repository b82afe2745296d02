use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.anchor_window, DEFAULT_ANCHOR_WINDOW);
    assert!(!cfg.strict_matching);
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let cfg = Config::from_toml_str("anchor_window = 3\nstrict_matching = true\n").unwrap();
    assert_eq!(cfg.anchor_window, 3);
    assert!(cfg.strict_matching);
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn test_invalid_toml() {
    let err = Config::from_toml_str("anchor_window = \"wide\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "log_level = \"debug\"").unwrap();

    let cfg = Config::load_from(file.path()).unwrap();
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.anchor_window, DEFAULT_ANCHOR_WINDOW);
}

#[test]
fn test_load_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from(dir.path().join(CONFIG_FILE)).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
