//! Duplicate error-code renumbering.
//!
//! Walks the assignment matches in order of appearance, keeps a set of
//! codes already seen and a "next available code" counter, and plans a
//! splice for every qualifying duplicate. Planning and application are
//! separate: the pass produces [`Splice`] values against the original text,
//! and [`rewrite::apply_all`] turns them into the new file content.

use crate::rewrite::{self, RewriteError, Splice};
use crate::scan::find_code_assignments;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Minimum code value subject to deduplication.
pub const DEFAULT_THRESHOLD: u32 = 2134;

/// First candidate value handed out when a replacement is needed.
pub const DEFAULT_START_CODE: u32 = 2135;

/// How replacement values are checked for collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionMode {
    /// Single forward pass: a replacement only avoids codes seen so far.
    ///
    /// A handed-out value can still collide with the first occurrence of a
    /// qualifying code later in the file; that occurrence is kept as-is,
    /// leaving a duplicate in the output. This matches the original tool
    /// and is the default.
    #[default]
    ForwardOnly,
    /// Collect every qualifying code up front; replacements avoid all of
    /// them, so the output is globally duplicate-free.
    FullScan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupConfig {
    pub threshold: u32,
    pub start_code: u32,
    pub mode: CollisionMode,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            start_code: DEFAULT_START_CODE,
            mode: CollisionMode::ForwardOnly,
        }
    }
}

/// One renumbered assignment, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub name: String,
    pub old_code: u32,
    pub new_code: u32,
}

/// Result of deduplicating a block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "DedupOutcome carries the rewritten text"]
pub struct DedupOutcome {
    /// The (possibly unchanged) rewritten text
    pub text: String,
    /// Replacements in order of appearance
    pub replacements: Vec<Replacement>,
    /// Final value of the next-available-code counter
    pub next_code: u32,
}

/// Result of deduplicating a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub replacements: Vec<Replacement>,
    pub next_code: u32,
    /// False when the file was left byte-identical (no write performed)
    pub changed: bool,
}

#[derive(Error, Debug)]
pub enum DedupError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to rewrite {path}: {source}")]
    Write { path: PathBuf, source: RewriteError },

    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

/// Plan the splices for `content` without applying them.
fn plan(content: &str, config: &DedupConfig) -> (Vec<Splice>, Vec<Replacement>, u32) {
    let matches = find_code_assignments(content);

    // Full-scan mode knows every qualifying code before handing any out
    let all_codes: HashSet<u32> = match config.mode {
        CollisionMode::ForwardOnly => HashSet::new(),
        CollisionMode::FullScan => matches
            .iter()
            .filter(|m| m.value >= config.threshold)
            .map(|m| m.value)
            .collect(),
    };

    let mut seen: HashSet<u32> = HashSet::new();
    let mut handed_out: HashSet<u32> = HashSet::new();
    let mut next_code = config.start_code;
    let mut splices = Vec::new();
    let mut replacements = Vec::new();

    for m in &matches {
        if m.value < config.threshold {
            continue;
        }

        if seen.contains(&m.value) {
            if config.mode == CollisionMode::FullScan {
                while next_code < u32::MAX
                    && (all_codes.contains(&next_code) || handed_out.contains(&next_code))
                {
                    next_code += 1;
                }
                handed_out.insert(next_code);
            }
            splices.push(Splice::new(
                m.byte_start,
                m.byte_end,
                next_code.to_string(),
                &content[m.byte_start..m.byte_end],
            ));
            replacements.push(Replacement {
                name: m.name.clone(),
                old_code: m.value,
                new_code: next_code,
            });
            // The counter pins at u32::MAX, a value scan never treats as
            // a code, so qualifying codes stay unique either way
            next_code = next_code.saturating_add(1);
        } else {
            seen.insert(m.value);
            if m.value >= next_code {
                // Scan never yields u32::MAX, so this cannot wrap
                next_code = m.value + 1;
            }
        }
    }

    (splices, replacements, next_code)
}

/// Deduplicate qualifying codes in `content`.
///
/// The text is returned unchanged when there is nothing to renumber;
/// `next_code` is still reported so callers can announce the next unused
/// value either way.
pub fn dedup_text(content: &str, config: &DedupConfig) -> Result<DedupOutcome, RewriteError> {
    let (splices, replacements, next_code) = plan(content, config);
    let text = apply_plan(content, &splices)?;
    Ok(DedupOutcome {
        text,
        replacements,
        next_code,
    })
}

fn apply_plan(content: &str, splices: &[Splice]) -> Result<String, RewriteError> {
    if splices.is_empty() {
        return Ok(content.to_string());
    }
    rewrite::apply_all(content, splices)
}

/// Deduplicate the file at `path` in place.
///
/// The write goes through [`rewrite::atomic_write`], so a failure leaves
/// the original file intact. A file with nothing to renumber is not
/// rewritten at all.
pub fn dedup_file(path: &Path, config: &DedupConfig) -> Result<FileReport, DedupError> {
    let content = fs::read_to_string(path).map_err(|source| DedupError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let outcome = dedup_text(&content, config)?;
    let changed = !outcome.replacements.is_empty();

    if changed {
        rewrite::atomic_write(path, outcome.text.as_bytes()).map_err(|source| {
            DedupError::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;
    }

    Ok(FileReport {
        replacements: outcome.replacements,
        next_code: outcome.next_code,
        changed,
    })
}

/// Qualifying codes that appear more than once, with their occurrence
/// counts, in order of first appearance. Read-only companion to
/// [`dedup_text`] for status reporting.
pub fn find_duplicates(content: &str, threshold: u32) -> Vec<(u32, usize)> {
    let mut order = Vec::new();
    let mut counts: std::collections::HashMap<u32, usize> = std::collections::HashMap::new();

    for m in find_code_assignments(content) {
        if m.value < threshold {
            continue;
        }
        let count = counts.entry(m.value).or_insert(0);
        if *count == 0 {
            order.push(m.value);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|code| {
            let count = counts[&code];
            (count > 1).then_some((code, count))
        })
        .collect()
}
