//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the processor.
//! It encapsulates synchronous file operations.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File I/O operations for the processor.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Read full file content.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to read
  ///
  /// # Returns
  ///
  /// The complete file content as a String.
  pub fn read_full_content(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Reads a file as text, returning `None` when it is not valid UTF-8.
  ///
  /// Binary files and files in legacy encodings are not annotated, so callers
  /// skip them instead of failing the whole run.
  pub fn read_text(path: &Path) -> Result<Option<String>> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8(bytes).ok())
  }

  /// Write file content.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to write
  /// * `content` - Content to write to the file
  pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }

  /// Writes `content` to a sibling temporary file and renames it over `path`.
  ///
  /// A failure while writing leaves the original file untouched. The
  /// permissions of an existing file carry over to the replacement, so
  /// executable scripts stay executable.
  pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = Self::sibling_tmp_path(path);

    std::fs::write(&tmp_path, content)
      .with_context(|| format!("Failed to write temporary file: {}", tmp_path.display()))?;

    if let Ok(metadata) = std::fs::metadata(path)
      && let Err(e) = std::fs::set_permissions(&tmp_path, metadata.permissions())
    {
      let _ = std::fs::remove_file(&tmp_path);
      return Err(e).with_context(|| format!("Failed to copy permissions of {}", path.display()));
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
      let _ = std::fs::remove_file(&tmp_path);
      return Err(e).with_context(|| format!("Failed to replace file: {}", path.display()));
    }

    Ok(())
  }

  fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
  }
}
