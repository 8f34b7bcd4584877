//! Header insertion and update.

use std::path::Path;

use anyhow::{Result, anyhow};

use super::ReuseScanner;
use super::detection::{CopyrightNotice, ReuseInfo};
use crate::processor::{ContentTransformer, FileIO, line_ending};
use crate::templates::{Context, Template};
use crate::verbose_log;
use crate::years::YearSpan;

/// What the header of a file should contain after annotation.
#[derive(Debug, Clone, Copy)]
pub struct HeaderRequest<'a> {
  /// Copyright holder statement, e.g. "ANSYS, Inc. and/or its affiliates."
  pub copyright: &'a str,
  pub years: YearSpan,
  /// License ids to add. Ids already in the header are always kept.
  pub license_ids: &'a [String],
  /// Header template; the bare copyright and SPDX lines are written when
  /// `None`.
  pub template: Option<&'a Template>,
}

/// Inserts or refreshes the license header of a file.
pub struct Annotator<'a> {
  scanner: &'a ReuseScanner,
  transformer: ContentTransformer,
}

impl<'a> Annotator<'a> {
  pub const fn new(scanner: &'a ReuseScanner) -> Self {
    Self {
      scanner,
      transformer: ContentTransformer::new(),
    }
  }

  /// Annotates the file at `path` in place. Returns whether it was written.
  pub fn annotate(&self, path: &Path, request: &HeaderRequest<'_>) -> Result<bool> {
    let content = FileIO::read_full_content(path)?;
    let annotated = self
      .annotate_content(path, &content, request)?
      .ok_or_else(|| anyhow!("No comment style known for {}", path.display()))?;

    if annotated == content {
      return Ok(false);
    }

    FileIO::write_file(path, &annotated)?;
    Ok(true)
  }

  /// Returns `content` with its header inserted or refreshed, or `None` when
  /// the file type has no known comment style.
  ///
  /// Special first lines (shebangs, encoding cookies, ...) stay on top. If
  /// the leading comment block already carries REUSE information it is
  /// replaced; otherwise a new header is prepended. The header takes the
  /// line terminator of the file's first line.
  pub fn annotate_content(&self, path: &Path, content: &str, request: &HeaderRequest<'_>) -> Result<Option<String>> {
    let Some(style) = self.scanner.comment_style(path) else {
      return Ok(None);
    };

    let (prefix, rest) = self.transformer.extract_prefix(content);

    let (existing, body) = match style.leading_block_len(rest) {
      Some(len) => {
        let info = self.scanner.extract(&rest[..len]);
        if info.is_empty() {
          (ReuseInfo::default(), rest)
        } else {
          (info, &rest[len..])
        }
      }
      None => (ReuseInfo::default(), rest),
    };

    let copyright_lines = merge_copyrights(&existing.copyrights, request.copyright, request.years);
    let license_ids = merge_license_ids(&existing.license_ids, request.license_ids);

    let text = match request.template {
      Some(template) => {
        let context = Context::new()
          .insert_list("copyright_lines", copyright_lines)
          .insert_list("spdx_expressions", license_ids);
        template.render(&context)?
      }
      None => bare_header(&copyright_lines, &license_ids),
    };

    let newline = line_ending(content).unwrap_or("\n");
    let mut header = style.comment(text.trim_end_matches(['\n', '\r', ' ']));
    if newline != "\n" {
      header = header.replace('\n', newline);
    }
    let body = body.trim_start_matches(['\n', '\r']);

    verbose_log!("Annotating {}", path.display());

    let mut output = String::with_capacity(prefix.len() + header.len() + body.len() + 1);
    output.push_str(&prefix);
    output.push_str(&header);
    if !body.is_empty() {
      output.push_str(newline);
      output.push_str(body);
    }

    Ok(Some(output))
  }
}

/// Folds every notice held by `statement` into a single line covering all of
/// their years plus `years`. Other notices are kept verbatim.
fn merge_copyrights(existing: &[CopyrightNotice], statement: &str, years: YearSpan) -> Vec<String> {
  let mut lines: Vec<String> = Vec::with_capacity(existing.len() + 1);
  let mut own_index = None;
  let mut span = years;

  for notice in existing {
    if notice.statement == statement {
      if let Some(found) = notice.years {
        span = span.union(found);
      }
      if own_index.is_none() {
        own_index = Some(lines.len());
        lines.push(String::new());
      }
    } else if !lines.contains(&notice.text) {
      lines.push(notice.text.clone());
    }
  }

  let own_line = format!("Copyright (C) {span} {statement}");
  match own_index {
    Some(index) => lines[index] = own_line,
    None => lines.insert(0, own_line),
  }

  lines
}

fn merge_license_ids(existing: &[String], requested: &[String]) -> Vec<String> {
  let mut ids = existing.to_vec();
  for id in requested {
    if !ids.contains(id) {
      ids.push(id.clone());
    }
  }
  ids
}

fn bare_header(copyright_lines: &[String], license_ids: &[String]) -> String {
  let mut text = String::new();
  for line in copyright_lines {
    text.push_str(line);
    text.push('\n');
  }
  for id in license_ids {
    text.push_str("SPDX-License-Identifier: ");
    text.push_str(id);
    text.push('\n');
  }
  text
}
