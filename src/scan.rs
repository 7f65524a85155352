//! Scanning for error-code assignment statements.
//!
//! The pattern is lexical, not structural: an identifier, `=`, a decimal
//! integer, a trailing comma. That is exactly the shape of an error-enum
//! discriminant line (`DuplicateListing = 2134,`), and matching it with a
//! compiled regex keeps span acquisition cheap and predictable.

use regex::Regex;
use std::sync::OnceLock;

/// A located assignment match.
///
/// The byte span covers exactly the captured integer digits, so a rewrite
/// replaces the number and nothing else on the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMatch {
    /// Identifier on the left-hand side of the assignment
    pub name: String,
    /// Parsed value of the assigned integer
    pub value: u32,
    /// Starting byte offset of the integer (inclusive)
    pub byte_start: usize,
    /// Ending byte offset of the integer (exclusive)
    pub byte_end: usize,
}

/// Compiled assignment pattern, shared process-wide.
///
/// Leading whitespace is deliberately not required: an assignment at the
/// very start of the file qualifies like any other. Matches are
/// non-overlapping and discovered left-to-right; the pattern is not
/// line-anchored, so several assignments on one line are all found.
fn assignment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\w+)\s*=\s*(\d+),").expect("assignment pattern is valid")
    })
}

/// Find all error-code assignments in `content`, in order of appearance.
///
/// An integer that does not fit below `u32::MAX` is not a code and the
/// candidate is skipped entirely, leaving that text untouched downstream.
/// The top of the code space stays reserved so the renumbering counter can
/// never wrap past it.
pub fn find_code_assignments(content: &str) -> Vec<CodeMatch> {
    assignment_pattern()
        .captures_iter(content)
        .filter_map(|caps| {
            let number = caps.get(2).expect("pattern has a number group");
            let value = number
                .as_str()
                .parse::<u32>()
                .ok()
                .filter(|v| *v < u32::MAX)?;
            Some(CodeMatch {
                name: caps[1].to_string(),
                value,
                byte_start: number.start(),
                byte_end: number.end(),
            })
        })
        .collect()
}
