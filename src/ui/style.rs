// src/ui/style.rs

//! Styled lines written into the command log.

use console::Style;

/// Title printed above each command's output.
pub const COMMAND_OUTPUT_TITLE: &str = "Command output:";

/// Header appended before a streamed command starts.
///
/// Two leading newlines separate it from the previous command's output.
pub fn header_line() -> String {
    let magenta = Style::new().magenta().force_styling(true);
    format!("\n\n{}\n", magenta.apply_to(COMMAND_OUTPUT_TITLE))
}

/// Red error line appended after a failed streamed command.
pub fn error_line(text: &str) -> String {
    let red = Style::new().red().force_styling(true);
    format!("{}\n", red.apply_to(text))
}
