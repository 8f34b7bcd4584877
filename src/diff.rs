//! # Diff Module
//!
//! This module renders diffs between a file's content before and after its
//! header was changed. It backs the `--show-diff` flag.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Manages diff rendering for license header changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffManager {
  /// Whether to print diffs
  pub show_diff: bool,
}

impl DiffManager {
  pub const fn new(show_diff: bool) -> Self {
    Self { show_diff }
  }

  /// Renders the line diff between `original` and `new` as text.
  pub fn render(path: &Path, original: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(original, new);
    let mut diff_content = format!("Diff for {}:\n", path.display());

    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      diff_content.push_str(sign);
      diff_content.push_str(&change.to_string());
      if change.missing_newline() {
        diff_content.push('\n');
      }
    }

    diff_content
  }

  /// Prints the diff to stderr when diffs are enabled.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) {
    if !self.show_diff {
      return;
    }

    for line in Self::render(path, original, new).lines() {
      if line.starts_with('+') {
        eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.green()));
      } else if line.starts_with('-') {
        eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.red()));
      } else {
        eprintln!("{}", line);
      }
    }
    eprintln!();
  }
}
