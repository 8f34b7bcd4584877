//! # Years Module
//!
//! This module handles copyright year spans: parsing a year or year range out
//! of arbitrary text, widening a span to cover new years, and rewriting the
//! first span found in a file.
//!
//! A span only ever grows. Different contributors may run the hooks with
//! different `--start_year` values over time, and the recorded span must be
//! the union of every year ever asserted.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use regex::Regex;

use crate::processor::FileIO;
use crate::verbose_log;

/// Earliest start year accepted from the command line.
pub const MIN_START_YEAR: i32 = 1942;

static YEAR_SPAN_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\b(\d{4})(?:\s*-\s*(\d{4}))?\b").expect("year span regex must compile"));

/// An inclusive range of copyright years.
///
/// The constructor orders its arguments, so `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearSpan {
  start: i32,
  end: i32,
}

impl YearSpan {
  /// Creates a span covering both years, whichever order they are given in.
  pub const fn new(a: i32, b: i32) -> Self {
    if a <= b {
      Self { start: a, end: b }
    } else {
      Self { start: b, end: a }
    }
  }

  /// A span covering a single year.
  pub const fn single(year: i32) -> Self {
    Self { start: year, end: year }
  }

  pub const fn start(&self) -> i32 {
    self.start
  }

  pub const fn end(&self) -> i32 {
    self.end
  }

  /// Widens this span so it covers `requested_start` and `current_year`.
  ///
  /// The start never moves later and the end never moves earlier, so applying
  /// any sequence of widenings yields the minimum start and maximum end ever
  /// supplied.
  pub fn widen(self, requested_start: i32, current_year: i32) -> Self {
    Self::new(self.start.min(requested_start), self.end.max(current_year))
  }

  /// Smallest span covering both `self` and `other`.
  pub fn union(self, other: Self) -> Self {
    self.widen(other.start, other.end)
  }
}

impl fmt::Display for YearSpan {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.start == self.end {
      write!(f, "{}", self.start)
    } else {
      write!(f, "{} - {}", self.start, self.end)
    }
  }
}

/// Errors from validating a user-supplied start year.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum YearError {
  #[error("Please ensure the start year is a number.")]
  NotANumber(String),

  #[error("Please provide a start year greater than or equal to {MIN_START_YEAR}.")]
  TooEarly(i32),

  #[error("Please provide a start year less than or equal to the current year.")]
  InFuture(i32),
}

/// Validates a start year given on the command line.
///
/// The value must be exactly four digits, not earlier than
/// [`MIN_START_YEAR`] and not later than `current_year`.
pub fn parse_start_year(raw: &str, current_year: i32) -> Result<i32, YearError> {
  let trimmed = raw.trim();
  if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
    return Err(YearError::NotANumber(raw.to_string()));
  }

  let year = trimmed
    .parse::<i32>()
    .ok()
    .ok_or_else(|| YearError::NotANumber(raw.to_string()))?;

  if year < MIN_START_YEAR {
    return Err(YearError::TooEarly(year));
  }
  if year > current_year {
    return Err(YearError::InFuture(year));
  }

  Ok(year)
}

/// Finds the first year or `YYYY - YYYY` range in `text`.
///
/// Returns `None` when the text contains no four-digit year.
pub fn extract_year_span(text: &str) -> Option<YearSpan> {
  let caps = YEAR_SPAN_REGEX.captures(text)?;
  let start: i32 = caps.get(1)?.as_str().parse().ok()?;
  let end = match caps.get(2) {
    Some(m) => m.as_str().parse().ok()?,
    None => start,
  };
  Some(YearSpan::new(start, end))
}

/// Replaces the first year span in `text` with `span`.
///
/// Returns `None` when the text contains no year.
pub fn replace_first_span(text: &str, span: YearSpan) -> Option<String> {
  let m = YEAR_SPAN_REGEX.find(text)?;
  let mut replaced = String::with_capacity(text.len() + 8);
  replaced.push_str(&text[..m.start()]);
  replaced.push_str(&span.to_string());
  replaced.push_str(&text[m.end()..]);
  Some(replaced)
}

/// Rewrites the first year span in the file at `path` with `span`.
///
/// The file is only written when the rendered span differs from what is
/// already there. Returns whether a write happened.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or if it does not
/// contain a year at all.
pub fn rewrite_first_span(path: &Path, span: YearSpan) -> Result<bool> {
  let content = FileIO::read_full_content(path)?;
  let updated =
    replace_first_span(&content, span).ok_or_else(|| anyhow!("No copyright year found in {}", path.display()))?;

  if updated == content {
    verbose_log!("Year span in {} already reads {}", path.display(), span);
    return Ok(false);
  }

  FileIO::write_atomic(path, &updated)?;
  Ok(true)
}
