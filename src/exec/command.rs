// src/exec/command.rs

//! Building child processes from command strings.

use tokio::process::Command;

/// Build a shell command appropriate for the platform.
///
/// `shell` overrides the interpreter; the default is `sh -c` on unix and
/// `cmd /C` on Windows.
pub fn shell_command(command_line: &str, shell: Option<&str>) -> Command {
    let (program, flag) = match shell {
        Some(sh) => (sh, shell_flag(sh)),
        None if cfg!(windows) => ("cmd", "/C"),
        None => ("sh", "-c"),
    };

    let mut cmd = Command::new(program);
    cmd.arg(flag).arg(command_line);
    cmd
}

fn shell_flag(shell: &str) -> &'static str {
    let name = shell
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(shell)
        .to_ascii_lowercase();
    if name == "cmd" || name == "cmd.exe" {
        "/C"
    } else {
        "-c"
    }
}

/// Append `overlay` to the environment the child inherits.
///
/// The inherited environment is kept; only the listed keys are overridden.
pub fn apply_env_overlay(cmd: &mut Command, overlay: &[(String, String)]) {
    for (key, value) in overlay {
        cmd.env(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_follows_shell_name() {
        assert_eq!(shell_flag("bash"), "-c");
        assert_eq!(shell_flag("/usr/bin/zsh"), "-c");
        assert_eq!(shell_flag("cmd.exe"), "/C");
        assert_eq!(shell_flag(r"C:\Windows\System32\CMD.EXE"), "/C");
    }

    #[test]
    fn builds_shell_invocation() {
        let cmd = shell_command("git status", Some("bash"));
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "bash");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, vec!["-c", "git status"]);
    }

    #[test]
    fn overlay_is_added_to_env() {
        let mut cmd = shell_command("true", None);
        apply_env_overlay(&mut cmd, &[("TERM".to_string(), "dumb".to_string())]);

        let envs: Vec<_> = cmd.as_std().get_envs().collect();
        assert!(envs.contains(&(
            std::ffi::OsStr::new("TERM"),
            Some(std::ffi::OsStr::new("dumb"))
        )));
    }
}
