//! # REUSE Module
//!
//! A small REUSE engine: it scans files for copyright notices and SPDX
//! license identifiers, decides how a header is commented for each file type,
//! and inserts or updates license headers.
//!
//! - [`ReuseScanner`] builds a [`FileRecord`] per file
//! - [`Annotator`] writes or refreshes the header block

mod annotate;
mod comment;
mod detection;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
pub use annotate::{Annotator, HeaderRequest};
pub use comment::{BuiltinResolver, CommentStyle, CommentStyleResolver, ConfigurableResolver, create_resolver};
pub use detection::{CopyrightNotice, ReuseDetector, ReuseInfo, SpdxDetector};

use crate::config::Config;
use crate::processor::FileIO;

/// Whether a file carries the metadata the hooks require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceVerdict {
  Compliant,
  MissingCopyright,
  MissingLicense,
}

impl ComplianceVerdict {
  pub const fn is_compliant(self) -> bool {
    matches!(self, Self::Compliant)
  }
}

/// What a scan found in one file.
#[derive(Debug, Clone)]
pub struct FileRecord {
  pub path: PathBuf,
  /// Size of the content in bytes.
  pub size: u64,
  pub info: ReuseInfo,
  /// `None` when the file type is not recognised.
  pub comment_style: Option<CommentStyle>,
}

impl FileRecord {
  pub fn has_copyright(&self) -> bool {
    self.info.has_copyright()
  }

  pub fn has_license(&self) -> bool {
    self.info.has_license()
  }

  pub const fn is_empty(&self) -> bool {
    self.size == 0
  }

  /// A file is compliant when it has a copyright notice and, unless the
  /// license check is disabled, a license identifier.
  pub fn verdict(&self, ignore_license_check: bool) -> ComplianceVerdict {
    if !self.has_copyright() {
      ComplianceVerdict::MissingCopyright
    } else if !ignore_license_check && !self.has_license() {
      ComplianceVerdict::MissingLicense
    } else {
      ComplianceVerdict::Compliant
    }
  }
}

/// Scans files for REUSE information.
pub struct ReuseScanner {
  detector: Box<dyn ReuseDetector>,
  resolver: Box<dyn CommentStyleResolver>,
}

impl ReuseScanner {
  pub fn new(detector: Box<dyn ReuseDetector>, resolver: Box<dyn CommentStyleResolver>) -> Self {
    Self { detector, resolver }
  }

  /// Creates a scanner with the SPDX detector and the comment styles from
  /// `config`, if any.
  pub fn from_config(config: Option<&Config>) -> Self {
    Self::new(Box::new(SpdxDetector::new()), create_resolver(config))
  }

  pub fn contains_reuse_info(&self, line: &str) -> bool {
    self.detector.contains_reuse_info(line)
  }

  pub fn extract(&self, content: &str) -> ReuseInfo {
    self.detector.extract(content)
  }

  pub fn comment_style(&self, path: &Path) -> Option<CommentStyle> {
    self.resolver.resolve(path)
  }

  /// Builds a record from content that has already been read.
  pub fn scan_content(&self, path: &Path, content: &str) -> FileRecord {
    FileRecord {
      path: path.to_path_buf(),
      size: content.len() as u64,
      info: self.extract(content),
      comment_style: self.comment_style(path),
    }
  }

  /// Reads and scans a file. Returns `None` for files that are not valid
  /// UTF-8.
  pub fn scan(&self, path: &Path) -> Result<Option<FileRecord>> {
    let content = FileIO::read_text(path).with_context(|| format!("Failed to scan {}", path.display()))?;
    Ok(content.map(|content| self.scan_content(path, &content)))
  }
}

impl Default for ReuseScanner {
  fn default() -> Self {
    Self::from_config(None)
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_verdict() {
    let scanner = ReuseScanner::default();
    let path = Path::new("main.py");

    let both = scanner.scan_content(path, "# Copyright (C) 2024 Foo\n# SPDX-License-Identifier: MIT\n");
    assert_eq!(both.verdict(false), ComplianceVerdict::Compliant);

    let copyright_only = scanner.scan_content(path, "# Copyright (C) 2024 Foo\n");
    assert_eq!(copyright_only.verdict(false), ComplianceVerdict::MissingLicense);
    assert!(copyright_only.verdict(true).is_compliant());

    let license_only = scanner.scan_content(path, "# SPDX-License-Identifier: MIT\n");
    assert_eq!(license_only.verdict(true), ComplianceVerdict::MissingCopyright);
  }

  #[test]
  fn test_scan_reads_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lib.rs");
    fs::write(&path, "// SPDX-License-Identifier: Apache-2.0\nfn main() {}\n").unwrap();

    let record = ReuseScanner::default().scan(&path).unwrap().unwrap();

    assert!(record.has_license());
    assert!(!record.has_copyright());
    assert!(!record.is_empty());
    assert_eq!(record.comment_style, Some(CommentStyle::line("// ")));
  }

  #[test]
  fn test_scan_empty_and_unknown_files() {
    let dir = tempdir().unwrap();
    let empty = dir.path().join("empty.py");
    let unknown = dir.path().join("data.bin");
    fs::write(&empty, "").unwrap();
    fs::write(&unknown, [0xffu8, 0x00]).unwrap();

    let scanner = ReuseScanner::default();
    let record = scanner.scan(&empty).unwrap().unwrap();

    assert!(record.is_empty());
    assert_eq!(record.verdict(false), ComplianceVerdict::MissingCopyright);
    assert!(scanner.scan(&unknown).unwrap().is_none());
  }
}
