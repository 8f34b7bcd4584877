//! # Content Transformer Module
//!
//! This module extracts the special leading lines (shebangs, XML declarations,
//! encoding cookies, etc.) that must stay above a license header.

/// Lowercased line starts that must remain at the top of a file.
const PRESERVED_PREFIXES: [&str; 10] = [
  "#!",                       // shebang
  "<?xml",                    // XML declaration
  "<!doctype",                // HTML doctype
  "# encoding:",              // Ruby encoding
  "# frozen_string_literal:", // Ruby interpreter instruction
  "# -*- coding",             // Python encoding cookie
  "# vim: set fileencoding",  // Python encoding cookie, vim flavour
  "<?php",                    // PHP opening tag
  "# escape",                 // Dockerfile directive
  "# syntax",                 // Dockerfile directive
];

/// Returns the terminator of the first line of `content`, or `None` when it
/// holds a single unterminated line.
pub fn line_ending(content: &str) -> Option<&'static str> {
  let end = content.find('\n')?;
  Some(if content[..end].ends_with('\r') { "\r\n" } else { "\n" })
}

/// Content transformation utilities for header processing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentTransformer;

impl ContentTransformer {
  pub const fn new() -> Self {
    Self
  }

  /// Splits `content` into the lines that must stay above the header and the
  /// rest.
  ///
  /// Consecutive special lines are kept together, along with any blank lines
  /// directly after them, so re-running on an annotated file finds the same
  /// prefix again.
  ///
  /// # Returns
  ///
  /// A tuple containing:
  /// - The extracted prefix, ending with a newline when non-empty
  /// - The remaining content as a string slice
  pub fn extract_prefix<'a>(&self, content: &'a str) -> (String, &'a str) {
    let mut offset = 0;
    let mut found = false;

    while offset < content.len() {
      let rest = &content[offset..];
      let line_end = rest.find('\n').map_or(rest.len(), |i| i + 1);
      let line = &rest[..line_end];
      let lowered = line.trim_end().to_lowercase();

      if PRESERVED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        found = true;
        offset += line_end;
      } else if found && line.trim().is_empty() {
        offset += line_end;
      } else {
        break;
      }
    }

    if !found {
      return (String::new(), content);
    }

    let mut prefix = content[..offset].to_string();
    if !prefix.ends_with('\n') {
      prefix.push('\n');
    }
    (prefix, &content[offset..])
  }
}
