//! Formatting utilities used for CLI outputs.

use crate::core::duration::format_duration;
use unicode_width::UnicodeWidthStr;

/// Pad to a display width; CJK names take two columns per glyph.
pub fn pad_right(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Minutes rendered as `2h 5m`, or `-` for zero.
pub fn minutes_or_dash(mins: i64) -> String {
    if mins <= 0 {
        "-".to_string()
    } else {
        format_duration(mins)
    }
}
