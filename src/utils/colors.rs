//! ANSI colour helpers for terminal output.

use crate::models::attendance::AttendanceState;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// CHECKED_IN → yellow (still open), CHECKED_OUT → green,
/// VALIDATED → blue.
pub fn color_for_state(state: AttendanceState) -> &'static str {
    match state {
        AttendanceState::None => GREY,
        AttendanceState::CheckedIn => YELLOW,
        AttendanceState::CheckedOut => GREEN,
        AttendanceState::Validated => BLUE,
    }
}

/// Grey out empty cells ("", "--", "--:--").
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--" || v == "--:--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

pub fn paint(value: &str, color: &str) -> String {
    format!("{color}{value}{RESET}")
}
