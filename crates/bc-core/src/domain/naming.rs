//! Exercise folder naming convention.
//!
//! Every folder inside `exercises/` must be named with a two-digit position,
//! an optional one- or two-digit sub-position, and a slug made of words
//! separated by hyphens or underscores:
//!
//! ```text
//! 01-hello-world
//! 02.1-for_loops
//! 12.10-Arrays
//! ```
//!
//! The position prefix keeps exercises in teaching order when the folder is
//! listed alphabetically, which is the order the index builder uses.

use std::sync::OnceLock;

use regex::Regex;

/// Pattern every exercise folder name must match.
pub const EXERCISE_NAME_PATTERN: &str = r"^\d{2}(\.\d{1,2})?-[A-Za-z][A-Za-z_-]*$";

/// Help text shown when a folder name is rejected.
pub const EXERCISE_NAME_HINT: &str = "it has to start with two digits followed by words \
     separated by underscores or hyphens (no white spaces), e.g: 01.12-hello-world";

fn exercise_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // The pattern is a compile-time constant covered by the tests below.
    REGEX.get_or_init(|| Regex::new(EXERCISE_NAME_PATTERN).expect("exercise name pattern is valid"))
}

/// Returns `true` if `name` follows the exercise folder naming convention.
///
/// # Example
///
/// ```rust
/// use bc_core::validate_exercise_directory_name;
///
/// assert!(validate_exercise_directory_name("01-hello-world"));
/// assert!(!validate_exercise_directory_name("hello world"));
/// ```
pub fn validate_exercise_directory_name(name: &str) -> bool {
    exercise_name_regex().is_match(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
