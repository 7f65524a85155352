//! The fundamental rewrite primitive: verified byte-span replacement plus
//! atomic file replacement.
//!
//! The deduplication pass compiles down to a list of [`Splice`] values;
//! intelligence lives in planning the spans, not in applying them. A splice
//! carries the text it expects to find at its span, so a stale plan fails
//! loudly instead of corrupting the file.

use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// A single planned replacement of `[byte_start, byte_end)` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a Splice does nothing until applied"]
pub struct Splice {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// Replacement text
    pub new_text: String,
    /// Exact text expected at the span before applying
    pub expected_before: String,
}

impl Splice {
    pub fn new(
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: impl Into<String>,
    ) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: expected_before.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("before-text mismatch at bytes [{byte_start}, {byte_end}): expected {expected:?}, found {found:?}")]
    BeforeTextMismatch {
        byte_start: usize,
        byte_end: usize,
        expected: String,
        found: String,
    },

    #[error("invalid byte range: [{byte_start}, {byte_end}) in text of length {text_len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        text_len: usize,
    },

    #[error("overlapping splices: [{first_start}, {first_end}) and [{second_start}, {second_end})")]
    OverlappingSplices {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Apply splices to `content` in a single left-to-right pass.
///
/// Splices must be sorted ascending by `byte_start` and non-overlapping;
/// the planner emits them in textual order, so this is validated rather
/// than repaired. All spans are resolved against the original content, so
/// earlier replacements never shift later ones.
pub fn apply_all(content: &str, splices: &[Splice]) -> Result<String, RewriteError> {
    for splice in splices {
        validate_span(content, splice)?;
    }

    for window in splices.windows(2) {
        let (first, second) = (&window[0], &window[1]);
        if second.byte_start < first.byte_end {
            return Err(RewriteError::OverlappingSplices {
                first_start: first.byte_start,
                first_end: first.byte_end,
                second_start: second.byte_start,
                second_end: second.byte_end,
            });
        }
    }

    let grown: usize = splices.iter().map(|s| s.new_text.len()).sum();
    let mut output = String::with_capacity(content.len() + grown);
    let mut cursor = 0;

    for splice in splices {
        output.push_str(&content[cursor..splice.byte_start]);
        output.push_str(&splice.new_text);
        cursor = splice.byte_end;
    }
    output.push_str(&content[cursor..]);

    Ok(output)
}

fn validate_span(content: &str, splice: &Splice) -> Result<(), RewriteError> {
    if splice.byte_start > splice.byte_end || splice.byte_end > content.len() {
        return Err(RewriteError::InvalidByteRange {
            byte_start: splice.byte_start,
            byte_end: splice.byte_end,
            text_len: content.len(),
        });
    }

    let found = &content[splice.byte_start..splice.byte_end];
    if found != splice.expected_before {
        return Err(RewriteError::BeforeTextMismatch {
            byte_start: splice.byte_start,
            byte_end: splice.byte_end,
            expected: splice.expected_before.clone(),
            found: found.to_string(),
        });
    }

    Ok(())
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the original file is untouched; a
/// crash mid-write can never leave a truncated target behind.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), RewriteError> {
    // Tempfile must live in the same directory so the rename stays on one
    // filesystem.
    let parent = path.parent().ok_or_else(|| {
        RewriteError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        ))
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    // Bump mtime so incremental builds re-read the edited source file
    let now = filetime::FileTime::now();
    filetime::set_file_mtime(path, now)?;

    Ok(())
}
