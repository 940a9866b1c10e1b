// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [exec]
/// heartbeat_interval_ms = 50
/// plain_terminal_env = ["TERM=dumb"]
///
/// [git]
/// override_gpg = false
///
/// [keybinding]
/// extras_menu = "@"
///
/// [gui.spinner]
/// frames = ["|", "/", "-", "\\"]
/// rate_ms = 50
/// ```
///
/// All sections are optional and have defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub exec: ExecSection,

    #[serde(default)]
    pub git: GitSection,

    #[serde(default)]
    pub keybinding: KeybindingSection,

    #[serde(default)]
    pub gui: GuiSection,
}

/// `[exec]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecSection {
    /// How often the heartbeat asks the UI to repaint while a streamed
    /// command is running.
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    /// `KEY=VALUE` entries appended to the inherited environment of streamed
    /// commands, so they never prompt or emit control sequences.
    #[serde(default = "default_plain_terminal_env")]
    pub plain_terminal_env: Vec<String>,

    /// Shell used to interpret command strings. Defaults to `sh` (`cmd` on
    /// Windows).
    #[serde(default)]
    pub shell: Option<String>,
}

fn default_heartbeat_interval_ms() -> u64 {
    50
}

fn default_plain_terminal_env() -> Vec<String> {
    vec!["TERM=dumb".to_string()]
}

impl Default for ExecSection {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            plain_terminal_env: default_plain_terminal_env(),
            shell: None,
        }
    }
}

/// `[git]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GitSection {
    /// Never hand the terminal over for GPG signing, even when
    /// `commit.gpgSign` is enabled.
    #[serde(default)]
    pub override_gpg: bool,
}

/// `[keybinding]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct KeybindingSection {
    /// Key that opens the command log; named in command-failure messages.
    #[serde(default = "default_extras_menu")]
    pub extras_menu: String,
}

fn default_extras_menu() -> String {
    "@".to_string()
}

impl Default for KeybindingSection {
    fn default() -> Self {
        Self {
            extras_menu: default_extras_menu(),
        }
    }
}

/// `[gui]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GuiSection {
    #[serde(default)]
    pub spinner: SpinnerSection,
}

/// `[gui.spinner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SpinnerSection {
    #[serde(default = "default_spinner_frames")]
    pub frames: Vec<String>,

    #[serde(default = "default_spinner_rate_ms")]
    pub rate_ms: u64,
}

fn default_spinner_frames() -> Vec<String> {
    ["|", "/", "-", "\\"].iter().map(|s| s.to_string()).collect()
}

fn default_spinner_rate_ms() -> u64 {
    50
}

impl Default for SpinnerSection {
    fn default() -> Self {
        Self {
            frames: default_spinner_frames(),
            rate_ms: default_spinner_rate_ms(),
        }
    }
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::default`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub exec: ExecSettings,
    pub override_gpg: bool,
    pub spinner: SpinnerSettings,
}

/// Settings consumed by the executors.
#[derive(Debug, Clone)]
pub struct ExecSettings {
    pub heartbeat_interval: Duration,
    /// Parsed `plain_terminal_env` entries.
    pub env_overlay: Vec<(String, String)>,
    pub shell: Option<String>,
    /// Key that opens the command log.
    pub extras_key: String,
}

impl Default for ExecSettings {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_millis(default_heartbeat_interval_ms()),
            env_overlay: vec![("TERM".to_string(), "dumb".to_string())],
            shell: None,
            extras_key: default_extras_menu(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpinnerSettings {
    pub frames: Vec<String>,
    pub rate: Duration,
}

impl Default for SpinnerSettings {
    fn default() -> Self {
        Self {
            frames: default_spinner_frames(),
            rate: Duration::from_millis(default_spinner_rate_ms()),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            exec: ExecSettings::default(),
            override_gpg: false,
            spinner: SpinnerSettings::default(),
        }
    }
}
