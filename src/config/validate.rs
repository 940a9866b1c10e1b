// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, ExecSettings, RawConfigFile, SpinnerSettings};
use crate::errors::{GitexecError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::GitexecError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;

        let env_overlay = raw
            .exec
            .plain_terminal_env
            .iter()
            .map(|entry| parse_env_entry(entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigFile {
            exec: ExecSettings {
                heartbeat_interval: Duration::from_millis(raw.exec.heartbeat_interval_ms),
                env_overlay,
                shell: raw.exec.shell,
                extras_key: raw.keybinding.extras_menu,
            },
            override_gpg: raw.git.override_gpg,
            spinner: SpinnerSettings {
                frames: raw.gui.spinner.frames,
                rate: Duration::from_millis(raw.gui.spinner.rate_ms),
            },
        })
    }
}

/// Check semantic constraints that `serde` cannot express.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_exec(cfg)?;
    validate_keybindings(cfg)?;
    validate_spinner(cfg)?;
    Ok(())
}

fn validate_exec(cfg: &RawConfigFile) -> Result<()> {
    if cfg.exec.heartbeat_interval_ms == 0 {
        return Err(GitexecError::ConfigError(
            "[exec].heartbeat_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    for entry in cfg.exec.plain_terminal_env.iter() {
        parse_env_entry(entry)?;
    }

    if let Some(shell) = cfg.exec.shell.as_deref() {
        if shell.trim().is_empty() {
            return Err(GitexecError::ConfigError(
                "[exec].shell must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_keybindings(cfg: &RawConfigFile) -> Result<()> {
    if cfg.keybinding.extras_menu.trim().is_empty() {
        return Err(GitexecError::ConfigError(
            "[keybinding].extras_menu must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_spinner(cfg: &RawConfigFile) -> Result<()> {
    let spinner = &cfg.gui.spinner;
    if spinner.frames.is_empty() {
        return Err(GitexecError::ConfigError(
            "[gui.spinner].frames must contain at least one frame".to_string(),
        ));
    }
    if spinner.rate_ms == 0 {
        return Err(GitexecError::ConfigError(
            "[gui.spinner].rate_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn parse_env_entry(entry: &str) -> Result<(String, String)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(GitexecError::ConfigError(format!(
            "[exec].plain_terminal_env entry '{entry}' must look like KEY=VALUE"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg.exec.heartbeat_interval, Duration::from_millis(50));
        assert_eq!(
            cfg.exec.env_overlay,
            vec![("TERM".to_string(), "dumb".to_string())]
        );
        assert_eq!(cfg.exec.extras_key, "@");
        assert_eq!(cfg.spinner.frames.len(), 4);
        assert!(!cfg.override_gpg);
    }

    #[test]
    fn zero_heartbeat_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.exec.heartbeat_interval_ms = 0;

        match ConfigFile::try_from(raw) {
            Err(GitexecError::ConfigError(msg)) => assert!(msg.contains("heartbeat_interval_ms")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn env_entry_without_equals_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.exec.plain_terminal_env = vec!["TERM".to_string()];

        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(GitexecError::ConfigError(_))
        ));
    }

    #[test]
    fn env_value_may_contain_equals() {
        assert_eq!(
            parse_env_entry("GIT_CONFIG_PARAMETERS='a=b'").unwrap(),
            ("GIT_CONFIG_PARAMETERS".to_string(), "'a=b'".to_string())
        );
        assert!(parse_env_entry("=dumb").is_err());
    }

    #[test]
    fn empty_spinner_frames_are_rejected() {
        let mut raw = RawConfigFile::default();
        raw.gui.spinner.frames.clear();

        assert!(ConfigFile::try_from(raw).is_err());
    }
}
