//! ANSI colour helpers for terminal output.

use crate::models::CheckInStatus;
use ansi_term::Colour;

/// Status label coloured green when checked in, grey otherwise.
pub fn colorize_status(status: CheckInStatus) -> String {
    match status {
        CheckInStatus::CheckedIn => Colour::Green.bold().paint(status.label()).to_string(),
        CheckInStatus::NotCheckedIn => Colour::Fixed(245).paint(status.label()).to_string(),
    }
}

/// Grey out placeholders such as `--:--` or `-`.
pub fn colorize_optional(value: &str) -> String {
    match value.trim() {
        "" | "--:--" | "-" => Colour::Fixed(245).paint(value).to_string(),
        _ => value.to_string(),
    }
}
