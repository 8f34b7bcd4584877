//! # Processor Module
//!
//! This module walks the files handed to the `add-license-headers` hook and
//! inserts or updates their license headers.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and writing operations
//! - [`content_transformer`] - Extraction of lines that stay above the header
//! - [`file_collector`] - Directory expansion, path normalization and skip rules
//!
//! The [`Processor`] struct is the main entry point, orchestrating the
//! submodules, the REUSE engine and the header reconciler. Every file yields a
//! [`FileOutcome`]; the run's result is the OR of their `changed()` flags.

mod content_transformer;
mod file_collector;
mod file_io;

use std::path::{Path, PathBuf};

use anyhow::Result;
pub use content_transformer::{ContentTransformer, line_ending};
pub use file_collector::{FileCollector, absolutize_path, normalize_relative_path};
pub use file_io::FileIO;
use tracing::{debug, trace};

use crate::config::HookConfig;
use crate::diff::DiffManager;
use crate::output;
use crate::reconcile::reconcile;
use crate::reuse::{Annotator, HeaderRequest, ReuseScanner};
use crate::templates::Template;

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
  /// A header was added to a file that had none (or an incomplete one).
  Inserted,
  /// An existing header was refreshed.
  Updated,
  /// The header was already up to date.
  Unchanged,
  /// The file was not considered, for the given reason.
  Skipped(String),
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
  pub path: PathBuf,
  pub action: FileAction,
}

impl FileOutcome {
  fn new(path: &Path, action: FileAction) -> Self {
    Self {
      path: path.to_path_buf(),
      action,
    }
  }

  /// True when the file was modified.
  pub const fn changed(&self) -> bool {
    matches!(self.action, FileAction::Inserted | FileAction::Updated)
  }
}

/// A file that could not be processed.
#[derive(Debug, Clone)]
pub struct FileFailure {
  pub path: PathBuf,
  pub error: String,
}

/// Outcomes of one run over a set of files.
#[derive(Debug, Default)]
pub struct ProcessReport {
  pub outcomes: Vec<FileOutcome>,
  pub failures: Vec<FileFailure>,
}

impl ProcessReport {
  /// True when any file changed or failed.
  pub fn changed(&self) -> bool {
    !self.failures.is_empty() || self.outcomes.iter().any(FileOutcome::changed)
  }

  pub fn count(&self, action: &FileAction) -> usize {
    self
      .outcomes
      .iter()
      .filter(|o| std::mem::discriminant(&o.action) == std::mem::discriminant(action))
      .count()
  }
}

/// Processor for inserting and updating license headers.
///
/// The `Processor` is responsible for:
/// - Expanding and filtering the candidate files
/// - Deciding per file whether a header is inserted or updated
/// - Restoring file bodies after an update
/// - Showing diffs when requested
pub struct Processor {
  config: HookConfig,
  scanner: ReuseScanner,
  /// Header template; `None` writes bare copyright and SPDX lines.
  template: Option<Template>,
  diff_manager: DiffManager,
  file_collector: FileCollector,
}

impl Processor {
  pub fn new(config: HookConfig, scanner: ReuseScanner, template: Option<Template>) -> Self {
    let diff_manager = DiffManager::new(config.show_diff);
    let file_collector = FileCollector::new(config.repo_root.clone());

    Self {
      config,
      scanner,
      template,
      diff_manager,
      file_collector,
    }
  }

  /// Processes `paths` and returns whether any file was changed or failed.
  pub fn process_files(&self, paths: &[PathBuf]) -> Result<bool> {
    Ok(self.run(paths)?.changed())
  }

  /// Processes `paths` and returns every per-file outcome.
  ///
  /// A failure on one file is reported and recorded without stopping the
  /// others.
  pub fn run(&self, paths: &[PathBuf]) -> Result<ProcessReport> {
    let files = self.file_collector.collect(paths)?;
    debug!("Processing {} files", files.len());

    let mut report = ProcessReport::default();
    for path in files {
      match self.process_file(&path) {
        Ok(outcome) => {
          if outcome.changed() {
            output::print_header_changed(&outcome.path, &self.config.repo_root);
          }
          report.outcomes.push(outcome);
        }
        Err(e) => {
          output::print_file_error(&path, &e);
          report.failures.push(FileFailure {
            path,
            error: format!("{:#}", e),
          });
        }
      }
    }

    Ok(report)
  }

  /// Processes a single file.
  pub fn process_file(&self, path: &Path) -> Result<FileOutcome> {
    if let Some(reason) = self.file_collector.skip_reason(path) {
      trace!("Skipping: {} ({})", path.display(), reason);
      return Ok(FileOutcome::new(path, FileAction::Skipped(reason)));
    }

    let Some(content) = FileIO::read_text(path)? else {
      trace!("Skipping: {} (not valid UTF-8)", path.display());
      return Ok(FileOutcome::new(path, FileAction::Skipped("not valid UTF-8".to_string())));
    };

    let record = self.scanner.scan_content(path, &content);
    if record.comment_style.is_none() {
      trace!("Skipping: {} (no comment style defined for file type)", path.display());
      return Ok(FileOutcome::new(
        path,
        FileAction::Skipped("no comment style defined for file type".to_string()),
      ));
    }

    let annotator = Annotator::new(&self.scanner);
    let compliant = record.verdict(self.config.ignore_license_check).is_compliant();

    if record.is_empty() || !compliant {
      // Never request a license id the file already declares.
      let license_ids = if self.config.ignore_license_check || record.has_license() {
        Vec::new()
      } else {
        vec![self.config.license.clone()]
      };

      let request = self.request(&license_ids);
      let Some(annotated) = annotator.annotate_content(path, &content, &request)? else {
        return Ok(FileOutcome::new(path, FileAction::Skipped("no comment style".to_string())));
      };

      self.write(path, &content, &annotated)?;
      return Ok(FileOutcome::new(path, FileAction::Inserted));
    }

    let request = self.request(&[]);
    let Some(annotated) = annotator.annotate_content(path, &content, &request)? else {
      return Ok(FileOutcome::new(path, FileAction::Skipped("no comment style".to_string())));
    };

    let merged = if annotated == content {
      annotated
    } else {
      reconcile(&content, &annotated, |line| self.scanner.contains_reuse_info(line))
    };

    if merged == content {
      trace!("Header of {} is up to date", path.display());
      return Ok(FileOutcome::new(path, FileAction::Unchanged));
    }

    self.write(path, &content, &merged)?;
    Ok(FileOutcome::new(path, FileAction::Updated))
  }

  fn request<'a>(&'a self, license_ids: &'a [String]) -> HeaderRequest<'a> {
    HeaderRequest {
      copyright: &self.config.copyright,
      years: self.config.years,
      license_ids,
      template: self.template.as_ref(),
    }
  }

  fn write(&self, path: &Path, original: &str, new: &str) -> Result<()> {
    self.diff_manager.display_diff(path, original, new);
    FileIO::write_file(path, new)
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::{TempDir, tempdir};

  use super::*;
  use crate::config::{DEFAULT_COPYRIGHT, HeaderOverrides};
  use crate::years::YearSpan;

  fn processor(root: &Path, years: YearSpan, ignore_license_check: bool) -> Processor {
    let config = HookConfig {
      years,
      ignore_license_check,
      ..HookConfig::resolve(root.to_path_buf(), HeaderOverrides::default(), None, years.end()).unwrap()
    };
    Processor::new(config, ReuseScanner::default(), None)
  }

  fn setup() -> TempDir {
    tempdir().unwrap()
  }

  #[test]
  fn test_inserts_header_and_reports_change() {
    let dir = setup();
    let path = dir.path().join("a.py");
    fs::write(&path, "import os\n").unwrap();

    let processor = processor(dir.path(), YearSpan::new(2023, 2025), false);
    let report = processor.run(std::slice::from_ref(&path)).unwrap();

    assert!(report.changed());
    assert_eq!(report.outcomes[0].action, FileAction::Inserted);
    assert_eq!(
      fs::read_to_string(&path).unwrap(),
      format!("# Copyright (C) 2023 - 2025 {DEFAULT_COPYRIGHT}\n# SPDX-License-Identifier: MIT\n\nimport os\n")
    );

    let rerun = processor.run(&[path]).unwrap();
    assert!(!rerun.changed());
    assert_eq!(rerun.outcomes[0].action, FileAction::Unchanged);
  }

  #[test]
  fn test_updates_years_and_restores_body() {
    let dir = setup();
    let path = dir.path().join("a.py");
    let body = "\n\nimport os   \n\n\n# trailing comment\n";
    fs::write(
      &path,
      format!("# Copyright (C) 2021 {DEFAULT_COPYRIGHT}\n# SPDX-License-Identifier: MIT\n{body}"),
    )
    .unwrap();

    let processor = processor(dir.path(), YearSpan::single(2025), false);
    let outcome = processor.process_file(&path).unwrap();

    assert_eq!(outcome.action, FileAction::Updated);
    assert_eq!(
      fs::read_to_string(&path).unwrap(),
      format!("# Copyright (C) 2021 - 2025 {DEFAULT_COPYRIGHT}\n# SPDX-License-Identifier: MIT\n{body}")
    );
  }

  #[test]
  fn test_does_not_duplicate_existing_license() {
    let dir = setup();
    let path = dir.path().join("a.py");
    fs::write(&path, "# SPDX-License-Identifier: MIT\n\nx = 1\n").unwrap();

    let processor = processor(dir.path(), YearSpan::single(2025), false);
    assert_eq!(processor.process_file(&path).unwrap().action, FileAction::Inserted);

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("SPDX-License-Identifier: MIT").count(), 1);
    assert!(content.contains("Copyright (C) 2025"));
  }

  #[test]
  fn test_ignore_license_check_adds_copyright_only() {
    let dir = setup();
    let path = dir.path().join("a.rs");
    fs::write(&path, "fn main() {}\n").unwrap();

    let processor = processor(dir.path(), YearSpan::single(2025), true);
    processor.process_file(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("// Copyright (C) 2025"));
    assert!(!content.contains("SPDX-License-Identifier"));
  }

  #[test]
  fn test_skips() {
    let dir = setup();
    let unknown = dir.path().join("data.json");
    let binary = dir.path().join("blob.py");
    let license = dir.path().join("LICENSE");
    fs::write(&unknown, "{}").unwrap();
    fs::write(&binary, [0xffu8, 0xfe, 0x00]).unwrap();
    fs::write(&license, "MIT License\n").unwrap();

    let processor = processor(dir.path(), YearSpan::single(2025), false);
    let report = processor
      .run(&[unknown.clone(), binary.clone(), license.clone(), dir.path().join("gone.py")])
      .unwrap();

    assert!(!report.changed());
    assert_eq!(report.count(&FileAction::Skipped(String::new())), 4);
    assert_eq!(fs::read_to_string(&unknown).unwrap(), "{}");
    assert_eq!(fs::read_to_string(&license).unwrap(), "MIT License\n");
  }

  #[test]
  fn test_documentation_files_are_annotated() {
    let dir = setup();
    let markdown = dir.path().join("README.md");
    let rst = dir.path().join("index.rst");
    fs::write(&markdown, "Title\n").unwrap();
    fs::write(&rst, "Title\n=====\n").unwrap();

    let processor = processor(dir.path(), YearSpan::single(2025), false);
    for path in [&markdown, &rst] {
      assert_eq!(processor.process_file(path).unwrap().action, FileAction::Inserted, "{}", path.display());
    }

    assert_eq!(
      fs::read_to_string(&markdown).unwrap(),
      format!("<!--\nCopyright (C) 2025 {DEFAULT_COPYRIGHT}\nSPDX-License-Identifier: MIT\n-->\n\nTitle\n")
    );
    assert_eq!(
      fs::read_to_string(&rst).unwrap(),
      format!(".. Copyright (C) 2025 {DEFAULT_COPYRIGHT}\n.. SPDX-License-Identifier: MIT\n\nTitle\n=====\n")
    );

    let rerun = processor.run(&[markdown, rst]).unwrap();
    assert!(!rerun.changed());
    assert_eq!(rerun.count(&FileAction::Unchanged), 2);
  }

  #[test]
  fn test_crlf_file_gets_uniform_line_endings() {
    let dir = setup();
    let new_file = dir.path().join("new.py");
    let dated = dir.path().join("dated.py");
    fs::write(&new_file, "x = 1\r\ny = 2\r\n").unwrap();
    fs::write(
      &dated,
      format!("# Copyright (C) 2021 {DEFAULT_COPYRIGHT}\r\n# SPDX-License-Identifier: MIT\r\n\r\nx = 1\r\n"),
    )
    .unwrap();

    let processor = processor(dir.path(), YearSpan::single(2025), false);
    assert_eq!(processor.process_file(&new_file).unwrap().action, FileAction::Inserted);
    assert_eq!(processor.process_file(&dated).unwrap().action, FileAction::Updated);

    assert_eq!(
      fs::read_to_string(&new_file).unwrap(),
      format!("# Copyright (C) 2025 {DEFAULT_COPYRIGHT}\r\n# SPDX-License-Identifier: MIT\r\n\r\nx = 1\r\ny = 2\r\n")
    );
    assert_eq!(
      fs::read_to_string(&dated).unwrap(),
      format!("# Copyright (C) 2021 - 2025 {DEFAULT_COPYRIGHT}\r\n# SPDX-License-Identifier: MIT\r\n\r\nx = 1\r\n")
    );

    let rerun = processor.run(&[new_file, dated]).unwrap();
    assert!(!rerun.changed());
  }

  #[test]
  fn test_empty_file_gets_header() {
    let dir = setup();
    let path = dir.path().join("__init__.py");
    fs::write(&path, "").unwrap();

    let processor = processor(dir.path(), YearSpan::single(2025), false);
    assert!(processor.process_files(&[path.clone()]).unwrap());

    assert_eq!(
      fs::read_to_string(&path).unwrap(),
      format!("# Copyright (C) 2025 {DEFAULT_COPYRIGHT}\n# SPDX-License-Identifier: MIT\n")
    );
  }
}
