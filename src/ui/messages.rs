use crate::core::session::Outcome;
use crate::errors::{AttendanceError, Recovery};
use ansi_term::Colour::{Blue, Green, Red, Yellow};
use ansi_term::Style;
use std::fmt;

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", Blue.bold().paint(ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", Green.bold().paint(ICON_OK), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", Yellow.bold().paint(ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", Red.bold().paint(ICON_ERR), msg);
}

pub fn header<T: fmt::Display>(msg: T) {
    println!("{}", Style::new().bold().paint(format!("== {} ==", msg)));
}

/// Report a finished check-in/check-out.
pub fn outcome(who: &str, done: &Outcome) {
    match done {
        Outcome::Completed(_) => success(format!("{} {}", who, done.notice())),
        Outcome::Synchronized { .. } | Outcome::Healed(_) => warning(format!("{}: {}", who, done.notice())),
    }
}

/// Report an absorbed failure. Surfaced ones travel back as `AppError`.
pub fn absorbed(err: &AttendanceError) {
    info(err.user_message());
}

pub fn recovery_hint(recovery: Recovery) -> &'static str {
    match recovery {
        Recovery::Retry => "Run the same command again.",
        Recovery::ReloadRoster => "Reload the roster with `vattend roster` and try again.",
    }
}
