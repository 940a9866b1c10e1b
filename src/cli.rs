// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `gitexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gitexec",
    version,
    about = "Run a git command with streamed output, a waiting status and GPG-aware terminal handoff.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `gitexec.toml` in the current working directory. A missing
    /// file means built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GITEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Label shown in the waiting status while the command runs.
    #[arg(long, value_name = "LABEL", default_value = "Running")]
    pub status: String,

    /// Give the command the terminal even if commit signing is off.
    #[arg(long)]
    pub interactive: bool,

    /// Do not echo command output to stdout while it streams.
    #[arg(long)]
    pub quiet: bool,

    /// Print the captured command log after the command finishes.
    #[arg(long)]
    pub print_log: bool,

    /// The command to run, e.g. `git fetch --all`. Words are passed to the
    /// child as-is; use `sh -c '...'` for shell syntax.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl CliArgs {
    /// The command words re-quoted into one shell command line.
    ///
    /// Each word reaches the child as a single argument, so
    /// `gitexec git commit -m "fix a | b"` commits with that message.
    pub fn command_line(&self) -> String {
        shell_words::join(&self.command)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_command_keeps_flags() {
        let args = CliArgs::parse_from(["gitexec", "--status", "Pushing", "git", "push", "--force"]);
        assert_eq!(args.status, "Pushing");
        assert_eq!(args.command_line(), "git push --force");
        assert!(!args.interactive);
    }

    #[test]
    fn words_with_spaces_and_pipes_stay_single_arguments() {
        let args = CliArgs::parse_from(["gitexec", "git", "commit", "-m", "fix a | b"]);
        let line = args.command_line();

        assert_ne!(line, "git commit -m fix a | b");
        assert_eq!(
            shell_words::split(&line).unwrap(),
            vec!["git", "commit", "-m", "fix a | b"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn quoted_line_runs_as_typed() {
        let args = CliArgs::parse_from(["gitexec", "printf", "%s|", "two words"]);

        let output = crate::exec::command::shell_command(&args.command_line(), None)
            .output()
            .await
            .unwrap();

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "two words|");
    }
}
