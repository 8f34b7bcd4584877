//! # Reuse Detection Module
//!
//! This module contains the interfaces and implementations for detecting
//! REUSE information (copyright notices and SPDX license identifiers) in
//! file content. It allows for easily replacing the detection algorithm
//! without modifying the processor.

use std::sync::LazyLock;

use regex::Regex;

use crate::years::{YearSpan, extract_year_span};

/// Trailing comment terminators stripped from the end of a detected line.
const COMMENT_END: &str = r"(?:\*/|-->|#\}|\*\)|\]\s*::)?";

static COPYRIGHT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(&format!(
    r"(?P<prefix>SPDX-(?:File|Snippet)CopyrightText:|Copyright(?:\s?\([cC]\))?|©)\s+(?:(?P<years>\d{{4}}(?:\s*-\s*\d{{4}})?)\s*,?\s+)?(?P<statement>.*?)\s*{COMMENT_END}\s*$"
  ))
  .expect("copyright regex must compile")
});

static LICENSE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(&format!(
    r"SPDX-License-Identifier:\s*(?P<expression>.*?)\s*{COMMENT_END}\s*$"
  ))
  .expect("license identifier regex must compile")
});

/// A copyright notice found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyrightNotice {
  /// The notice as it appears in the file, from its prefix to the end of the
  /// statement, without comment markers.
  pub text: String,
  /// The years covered by the notice, if it names any.
  pub years: Option<YearSpan>,
  /// The copyright holder statement following the years.
  pub statement: String,
}

/// REUSE information extracted from a file or a header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReuseInfo {
  /// Copyright notices in the order they appear.
  pub copyrights: Vec<CopyrightNotice>,
  /// SPDX license expressions in the order they appear, without duplicates.
  pub license_ids: Vec<String>,
}

impl ReuseInfo {
  pub fn has_copyright(&self) -> bool {
    !self.copyrights.is_empty()
  }

  pub fn has_license(&self) -> bool {
    !self.license_ids.is_empty()
  }

  pub fn is_empty(&self) -> bool {
    self.copyrights.is_empty() && self.license_ids.is_empty()
  }
}

/// Trait for REUSE information detectors.
///
/// Implementations decide which lines count as header metadata and extract
/// the notices and license identifiers from content.
pub trait ReuseDetector: Send + Sync {
  /// Checks whether a single line carries REUSE information.
  fn contains_reuse_info(&self, line: &str) -> bool;

  /// Extracts all REUSE information from `content`.
  fn extract(&self, content: &str) -> ReuseInfo;
}

/// Default detector based on the SPDX and REUSE conventions.
///
/// A line carries REUSE information if it has an `SPDX-License-Identifier:`
/// tag or a copyright notice introduced by `SPDX-FileCopyrightText:`,
/// `SPDX-SnippetCopyrightText:`, `Copyright`, `Copyright (C)` or `©`. The
/// check is case-sensitive, so license prose such as "copyright notice" or
/// "COPYRIGHT HOLDERS" is not mistaken for a notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpdxDetector;

impl SpdxDetector {
  pub const fn new() -> Self {
    Self
  }

  fn parse_copyright(line: &str) -> Option<CopyrightNotice> {
    let caps = COPYRIGHT_REGEX.captures(line)?;
    let prefix = caps.name("prefix")?;
    let statement = caps.name("statement").map(|m| m.as_str()).unwrap_or("").trim();
    let years = caps.name("years").and_then(|m| extract_year_span(m.as_str()));

    let text_end = caps.name("statement").map(|m| m.end()).unwrap_or(prefix.end());
    let text = line[prefix.start()..text_end].trim_end().to_string();

    Some(CopyrightNotice {
      text,
      years,
      statement: statement.to_string(),
    })
  }

  fn parse_license(line: &str) -> Option<String> {
    let caps = LICENSE_REGEX.captures(line)?;
    let expression = caps.name("expression")?.as_str().trim();
    if expression.is_empty() {
      None
    } else {
      Some(expression.to_string())
    }
  }
}

impl ReuseDetector for SpdxDetector {
  fn contains_reuse_info(&self, line: &str) -> bool {
    LICENSE_REGEX.is_match(line) || COPYRIGHT_REGEX.is_match(line)
  }

  fn extract(&self, content: &str) -> ReuseInfo {
    let mut info = ReuseInfo::default();

    for line in content.lines() {
      if let Some(expression) = Self::parse_license(line) {
        if !info.license_ids.contains(&expression) {
          info.license_ids.push(expression);
        }
      } else if let Some(notice) = Self::parse_copyright(line) {
        info.copyrights.push(notice);
      }
    }

    info
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_contains_reuse_info() {
    let detector = SpdxDetector::new();

    assert!(detector.contains_reuse_info("# Copyright (C) 2023 - 2025 ANSYS, Inc. and/or its affiliates."));
    assert!(detector.contains_reuse_info("# SPDX-License-Identifier: MIT"));
    assert!(detector.contains_reuse_info("// SPDX-FileCopyrightText: 2024 Jane Doe"));
    assert!(detector.contains_reuse_info(" * © 2021 Example Corp"));
    assert!(detector.contains_reuse_info("/* Copyright (c) 2020 Foo */"));

    assert!(!detector.contains_reuse_info("# The above copyright notice and this permission notice"));
    assert!(!detector.contains_reuse_info("# AUTHORS OR COPYRIGHT HOLDERS BE LIABLE"));
    assert!(!detector.contains_reuse_info("#"));
    assert!(!detector.contains_reuse_info("def main():"));
  }

  #[test]
  fn test_extract_copyright_parts() {
    let detector = SpdxDetector::new();
    let info = detector.extract("# Copyright (C) 2023 - 2025 ANSYS, Inc. and/or its affiliates.\n");

    assert_eq!(info.copyrights.len(), 1);
    let notice = &info.copyrights[0];
    assert_eq!(notice.years, Some(YearSpan::new(2023, 2025)));
    assert_eq!(notice.statement, "ANSYS, Inc. and/or its affiliates.");
    assert_eq!(notice.text, "Copyright (C) 2023 - 2025 ANSYS, Inc. and/or its affiliates.");
  }

  #[test]
  fn test_extract_strips_block_comment_end() {
    let detector = SpdxDetector::new();
    let info = detector.extract("/* Copyright (c) 2020 Foo */\n/* SPDX-License-Identifier: Apache-2.0 */\n");

    assert_eq!(info.copyrights[0].statement, "Foo");
    assert_eq!(info.license_ids, vec!["Apache-2.0".to_string()]);
  }

  #[test]
  fn test_extract_deduplicates_license_ids() {
    let detector = SpdxDetector::new();
    let info = detector.extract("# SPDX-License-Identifier: MIT\n# SPDX-License-Identifier: MIT\n");

    assert_eq!(info.license_ids, vec!["MIT".to_string()]);
  }

  #[test]
  fn test_extract_notice_without_year() {
    let detector = SpdxDetector::new();
    let info = detector.extract("// SPDX-FileCopyrightText: Jane Doe\n");

    assert_eq!(info.copyrights[0].years, None);
    assert_eq!(info.copyrights[0].statement, "Jane Doe");
    assert!(!info.has_license());
  }

  #[test]
  fn test_extract_plain_code() {
    let detector = SpdxDetector::new();
    let info = detector.extract("fn main() {\n    println!(\"copyright\");\n}\n");

    assert!(info.is_empty());
  }
}
