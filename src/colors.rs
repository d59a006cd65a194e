use std::borrow::Cow;
use std::io::{self, IsTerminal};

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// ANSI styling for diagnostics printed to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Colors {
    enabled: bool,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// `text` in red, or unchanged when colors are off.
    pub fn error<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.enabled {
            Cow::Owned(format!("{RED}{text}{RESET}"))
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// Diagnostics go to stderr, so that is the stream checked for a terminal.
pub fn should_use_colors(no_color: bool) -> bool {
    // --no-color > NO_COLOR > TTY detection
    if no_color || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stderr().is_terminal()
}
