//! The view layer of the command line: text widths and styled prefixes.

use std::error::Error;

use console::{StyledObject, style};
use terminal_size::{Width, terminal_size};

pub const MAX_WIDTH: usize = 100;

/// Usable width of the terminal, if there is one.
pub fn text_width() -> Option<usize> {
    // Leave some room at the edge of the terminal
    terminal_size().map(|(Width(width), _)| usize::from(width).saturating_sub(5).min(MAX_WIDTH))
}

pub fn error_prefix() -> StyledObject<&'static str> {
    style("error:").red().bold()
}

pub fn warning_prefix() -> StyledObject<&'static str> {
    style("warning:").yellow().bold()
}

pub fn format_error_cause(inner: &dyn Error) -> String {
    format!("{} {inner}", style("Error cause:").underlined().bold())
}
