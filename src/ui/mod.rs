//! Terminal output for the command-line front end.
//!
//! The citation itself always goes to stdout, uncolored, so it can be piped.
//! Status lines go to stderr and are colored only when stderr is a terminal.

use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::resolver::Resolution;
use crate::sources::SourceRegistry;
use crate::SourceKind;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Check if stderr is a terminal.
pub fn stderr_is_terminal() -> bool {
    std::io::stderr().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Info,
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Info => "ℹ",
    }
}

/// Print a status line to stderr
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    if !stderr_is_terminal() {
        eprintln!("{} {}", icon, msg);
        return;
    }
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg.red()),
        Status::Info => eprintln!("{} {}", icon.cyan().bold(), msg.dimmed()),
    }
}

/// Print the outcome of a search.
///
/// A found citation is printed to stdout; the not-found message to stderr.
pub fn print_resolution(resolution: &Resolution, quiet: bool) {
    match resolution {
        Resolution::Found {
            display, copied, ..
        } => {
            println!("{}", display);
            if *copied && !quiet {
                print_status(Status::Success, "Copied to clipboard");
            }
        }
        Resolution::NotFound { message } => print_status(Status::Error, message),
    }
}

/// Print the supported sources, marking those compiled into this build
pub fn print_sources(registry: &SourceRegistry) {
    let colored = is_terminal();

    for kind in SourceKind::ALL {
        let available = registry.has(kind);
        let marker = if available { "●" } else { "○" };
        let note = if available { "" } else { "  (disabled at build time)" };

        if colored {
            let marker = if available {
                marker.green().to_string()
            } else {
                marker.dimmed().to_string()
            };
            println!("{} {:<16} {}{}", marker, kind.id().bold(), kind.name(), note.dimmed());
        } else {
            println!("{} {:<16} {}{}", marker, kind.id(), kind.name(), note);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_icons_distinct() {
        let icons = [Status::Success, Status::Error, Status::Info].map(status_icon);
        assert_ne!(icons[0], icons[1]);
        assert_ne!(icons[1], icons[2]);
    }
}
