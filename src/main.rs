use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use errcode_dedup::{
    atomic_write, dedup_file, dedup_text, find_duplicates, CollisionMode, DedupConfig,
    FileReport, Replacement, DEFAULT_START_CODE, DEFAULT_THRESHOLD,
};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "errcode-dedup")]
#[command(about = "Renumber duplicate error-code assignments in a source file", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deduplicate qualifying codes, rewriting the file in place
    Fix {
        /// Target source file
        file: PathBuf,

        /// Minimum code value subject to deduplication
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u32,

        /// First candidate value handed out when a replacement is needed
        #[arg(short, long, default_value_t = DEFAULT_START_CODE)]
        start_code: u32,

        /// Resolve collisions against every code in the file, not only
        /// those already scanned (see `CollisionMode` docs)
        #[arg(long)]
        full_scan: bool,

        /// Dry run - show what would be changed without modifying the file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Report duplicate qualifying codes without modifying the file
    Check {
        /// Target source file
        file: PathBuf,

        /// Minimum code value subject to deduplication
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u32,

        /// First candidate value a fix would hand out
        #[arg(short, long, default_value_t = DEFAULT_START_CODE)]
        start_code: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fix {
            file,
            threshold,
            start_code,
            full_scan,
            dry_run,
            diff,
        } => cmd_fix(&file, threshold, start_code, full_scan, dry_run, diff),

        Commands::Check {
            file,
            threshold,
            start_code,
        } => cmd_check(&file, threshold, start_code),
    }
}

fn collision_mode(full_scan: bool) -> CollisionMode {
    if full_scan {
        CollisionMode::FullScan
    } else {
        CollisionMode::ForwardOnly
    }
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (fixed)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
    println!();
}

fn report_replacements(replacements: &[Replacement]) {
    for r in replacements {
        println!(
            "{} {}: {} {} {}",
            "✓".green(),
            r.name,
            r.old_code,
            "->".dimmed(),
            r.new_code
        );
    }
}

fn cmd_fix(
    file: &Path,
    threshold: u32,
    start_code: u32,
    full_scan: bool,
    dry_run: bool,
    show_diff: bool,
) -> Result<()> {
    let config = DedupConfig {
        threshold,
        start_code,
        mode: collision_mode(full_scan),
    };

    println!("File: {}", file.display());
    println!("Threshold: {} (start code {})", threshold, start_code);
    println!();

    if dry_run {
        println!("{}", "[DRY RUN - no changes will be written]".cyan());

        let content = fs::read_to_string(file)?;
        let outcome = dedup_text(&content, &config)?;

        report_replacements(&outcome.replacements);
        if show_diff && !outcome.replacements.is_empty() {
            display_diff(file, &content, &outcome.text);
        }

        println!();
        println!("{}", "Summary:".bold());
        println!(
            "  {} would be renumbered",
            format!("{}", outcome.replacements.len()).green()
        );
        println!("  Next available code: {}", outcome.next_code);
        return Ok(());
    }

    let report = if show_diff {
        // Plan against captured contents and write exactly that text, so
        // the diff shown is the diff applied
        let before = fs::read_to_string(file)?;
        let outcome = dedup_text(&before, &config)?;
        let changed = !outcome.replacements.is_empty();
        if changed {
            atomic_write(file, outcome.text.as_bytes())?;
        }
        report_replacements(&outcome.replacements);
        if changed {
            display_diff(file, &before, &outcome.text);
        }
        FileReport {
            replacements: outcome.replacements,
            next_code: outcome.next_code,
            changed,
        }
    } else {
        let report = dedup_file(file, &config)?;
        report_replacements(&report.replacements);
        report
    };

    if report.changed {
        println!(
            "{} Fixed error codes in {}",
            "✓".green(),
            file.display()
        );
    } else {
        println!(
            "{} {}: codes already unique, file left untouched",
            "⊙".yellow(),
            file.display()
        );
    }

    println!();
    println!("{}", "Summary:".bold());
    println!(
        "  {} renumbered",
        format!("{}", report.replacements.len()).green()
    );
    println!("  Next available code: {}", report.next_code);

    Ok(())
}

fn cmd_check(file: &Path, threshold: u32, start_code: u32) -> Result<()> {
    let content = fs::read_to_string(file)?;
    let duplicates = find_duplicates(&content, threshold);

    println!("File: {}", file.display());
    println!("Threshold: {}", threshold);
    println!();

    if duplicates.is_empty() {
        println!(
            "{} {}",
            "✓".green(),
            format!("No duplicate codes at or above {}", threshold).green()
        );
        return Ok(());
    }

    println!(
        "{} {} ({} codes)",
        "✗".red(),
        "DUPLICATES".red().bold(),
        duplicates.len()
    );
    for (code, count) in &duplicates {
        println!("  - {} ({} occurrences)", code, count);
    }

    // Plan only, never writes; shows what a fix would do
    let config = DedupConfig {
        threshold,
        start_code,
        mode: CollisionMode::ForwardOnly,
    };
    let outcome = dedup_text(&content, &config)?;
    println!();
    println!(
        "A fix would renumber {} assignments (next available code: {})",
        outcome.replacements.len(),
        outcome.next_code
    );

    std::process::exit(1);
}
