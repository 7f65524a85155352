//! Errcode Dedup: duplicate error-code renumbering for source files
//!
//! Scans a source file for assignment statements of the form
//! `<identifier> = <integer>,` and renumbers duplicate codes at or above a
//! threshold so that every qualifying code is unique.
//!
//! # Architecture
//!
//! Everything compiles down to a single primitive: [`Splice`], a verified
//! byte-span replacement. Intelligence lives in span acquisition (the regex
//! scan and the seen-set bookkeeping in [`dedup`]), not in the application
//! logic.
//!
//! # Safety
//!
//! - Every splice verifies its expected before-text before applying
//! - Atomic file writes (tempfile + fsync + rename)
//! - A file with nothing to renumber is never rewritten
//!
//! # Example
//!
//! ```no_run
//! use errcode_dedup::{dedup_file, DedupConfig};
//! use std::path::Path;
//!
//! let report = dedup_file(Path::new("src/lib.rs"), &DedupConfig::default())?;
//! println!(
//!     "{} codes renumbered, next available: {}",
//!     report.replacements.len(),
//!     report.next_code
//! );
//! # Ok::<(), errcode_dedup::DedupError>(())
//! ```

pub mod dedup;
pub mod rewrite;
pub mod scan;

// Re-exports
pub use dedup::{
    dedup_file, dedup_text, find_duplicates, CollisionMode, DedupConfig, DedupError,
    DedupOutcome, FileReport, Replacement, DEFAULT_START_CODE, DEFAULT_THRESHOLD,
};
pub use rewrite::{apply_all, atomic_write, RewriteError, Splice};
pub use scan::{find_code_assignments, CodeMatch};
