//! # Output Module
//!
//! This module centralizes all user-facing output of the hooks. It provides
//! consistent formatting, colors, and symbols for terminal output.
//!
//! pre-commit shows a hook's stdout when the hook fails, so every message that
//! explains a failure goes to stdout. Errors about the invocation itself go to
//! stderr.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::processor::{FileAction, ProcessReport, normalize_relative_path};

/// Symbols used in output
pub mod symbols {
  /// Success
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Skipped
  pub const IGNORED: &str = "-";
  /// Updated
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Print the message for a file whose header was inserted or updated.
pub fn print_header_changed(path: &Path, repo_root: &Path) {
  if is_quiet() {
    return;
  }

  println!(
    "{} Successfully changed header of {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    make_relative_path(path, Some(repo_root))
  );
}

/// Print the message for a LICENSE file whose year span was updated.
pub fn print_license_year_updated(path: &Path) {
  if is_quiet() {
    return;
  }

  println!(
    "{} Successfully updated year in {}",
    symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()),
    path.display()
  );
}

/// Print a per-file processing error.
pub fn print_file_error(path: &Path, error: &anyhow::Error) {
  eprintln!(
    "{} Error processing {}: {:#}",
    symbols::FAILURE.if_supports_color(Stream::Stderr, |s| s.red()),
    path.display(),
    error
  );
}

/// Print an error that aborts the run.
pub fn print_error(message: &str) {
  eprintln!("{} {}", "ERROR:".if_supports_color(Stream::Stderr, |s| s.red()), message);
}

/// Print the summary of a header run.
///
/// Format: "Summary: X inserted, Y updated, Z unchanged, W skipped"
/// In verbose mode, every skipped file is listed with its reason.
pub fn print_summary(report: &ProcessReport, repo_root: &Path) {
  if is_quiet() {
    return;
  }

  if is_verbose() {
    for outcome in &report.outcomes {
      if let FileAction::Skipped(reason) = &outcome.action {
        println!(
          "  {} {} (skipped: {})",
          symbols::IGNORED.if_supports_color(Stream::Stdout, |s| s.dimmed()),
          make_relative_path(&outcome.path, Some(repo_root)).if_supports_color(Stream::Stdout, |s| s.dimmed()),
          reason
        );
      }
    }
  }

  let inserted = report.count(&FileAction::Inserted);
  let updated = report.count(&FileAction::Updated);
  let unchanged = report.count(&FileAction::Unchanged);
  let skipped = report.count(&FileAction::Skipped(String::new()));

  let mut summary_line = format!(
    "Summary: {} inserted, {} updated, {} unchanged, {} skipped",
    inserted.if_supports_color(Stream::Stdout, |s| s.cyan()),
    updated.if_supports_color(Stream::Stdout, |s| s.cyan()),
    unchanged.if_supports_color(Stream::Stdout, |s| s.cyan()),
    skipped.if_supports_color(Stream::Stdout, |s| s.dimmed())
  );

  if !report.failures.is_empty() {
    summary_line.push_str(&format!(
      ", {} failed",
      report.failures.len().if_supports_color(Stream::Stdout, |s| s.red())
    ));
  }

  println!("{}", summary_line);
}

/// Print a failed tech-review check. Shown even in quiet mode.
pub fn print_check_failure(message: &str) {
  if is_quiet() {
    println!("{}", message);
    return;
  }

  println!(
    "{} {}",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    message
  );
}

/// Print the success message when every tech-review check passed.
pub fn print_review_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All technical review checks passed.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Make a path relative to the repository root for display.
pub fn make_relative_path(path: &Path, repo_root: Option<&Path>) -> String {
  match repo_root {
    Some(root) if path.starts_with(root) => normalize_relative_path(path, root).to_string_lossy().to_string(),
    _ => path.to_string_lossy().to_string(),
  }
}
