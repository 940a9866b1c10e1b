// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use gitexec::config::{load_and_validate, load_or_default};
use gitexec::errors::GitexecError;
use tempfile::NamedTempFile;

#[test]
fn full_file_is_loaded_into_typed_settings() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[exec]
heartbeat_interval_ms = 20
plain_terminal_env = ["TERM=dumb", "GIT_TERMINAL_PROMPT=0"]
shell = "bash"

[git]
override_gpg = true

[keybinding]
extras_menu = "x"

[gui.spinner]
frames = [".", "o", "O"]
rate_ms = 80
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.exec.heartbeat_interval, Duration::from_millis(20));
    assert_eq!(
        cfg.exec.env_overlay,
        vec![
            ("TERM".to_string(), "dumb".to_string()),
            ("GIT_TERMINAL_PROMPT".to_string(), "0".to_string()),
        ]
    );
    assert_eq!(cfg.exec.shell.as_deref(), Some("bash"));
    assert_eq!(cfg.exec.extras_key, "x");
    assert!(cfg.override_gpg);
    assert_eq!(cfg.spinner.frames, vec![".", "o", "O"]);
    assert_eq!(cfg.spinner.rate, Duration::from_millis(80));
}

#[test]
fn empty_file_yields_defaults() {
    let file = NamedTempFile::new().unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.exec.heartbeat_interval, Duration::from_millis(50));
    assert_eq!(cfg.exec.extras_key, "@");
    assert!(cfg.exec.shell.is_none());
    assert!(!cfg.override_gpg);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let cfg = load_or_default(dir.path().join("gitexec.toml")).unwrap();

    assert_eq!(
        cfg.exec.env_overlay,
        vec![("TERM".to_string(), "dumb".to_string())]
    );
}

#[test]
fn missing_file_is_an_io_error_when_required() {
    let dir = tempfile::tempdir().unwrap();

    let result = load_and_validate(dir.path().join("gitexec.toml"));

    assert!(matches!(result, Err(GitexecError::IoError(_))));
}

#[test]
fn malformed_toml_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[exec\nheartbeat_interval_ms = ").unwrap();

    let result = load_or_default(file.path());

    assert!(matches!(result, Err(GitexecError::TomlError(_))));
}

#[test]
fn invalid_values_are_config_errors() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[keybinding]
extras_menu = "  "
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(GitexecError::ConfigError(msg)) => assert!(msg.contains("extras_menu")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}
