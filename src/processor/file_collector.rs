//! # File Collector Module
//!
//! This module turns the paths passed on the command line into the list of
//! candidate files, and decides which candidates are never annotated.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use tracing::debug;

/// Directories whose content is never annotated.
const RESERVED_DIRS: [&str; 3] = [".git", "LICENSES", ".reuse"];

/// File name prefixes of license texts, which are never annotated.
const LICENSE_FILE_PREFIXES: [&str; 2] = ["LICENSE", "COPYING"];

/// File collector for the header hook.
///
/// The `FileCollector` handles:
/// - Expanding directory arguments into the files they contain
/// - Path normalization and resolution
/// - Deciding which files must be skipped
pub struct FileCollector {
  /// Root of the repository
  repo_root: PathBuf,
}

impl FileCollector {
  pub const fn new(repo_root: PathBuf) -> Self {
    Self { repo_root }
  }

  /// Resolves command line paths into absolute file paths.
  ///
  /// Directories are walked recursively, honouring `.gitignore` files. Other
  /// paths are kept as given, even when they do not exist, so the processor
  /// can report them as skipped. Duplicates are dropped and the input order is
  /// kept.
  pub fn collect(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::with_capacity(paths.len());
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
      let abs_path = absolutize_path(path)?;

      if abs_path.is_dir() && !abs_path.is_symlink() {
        for file in self.traverse_directory(&abs_path)? {
          if seen.insert(file.clone()) {
            files.push(file);
          }
        }
      } else if seen.insert(abs_path.clone()) {
        files.push(abs_path);
      }
    }

    Ok(files)
  }

  /// Traverses a directory recursively and collects all files.
  pub fn traverse_directory(&self, dir: &Path) -> Result<Vec<PathBuf>> {
    debug!("Scanning directory: {}", dir.display());
    let start_time = std::time::Instant::now();

    let mut all_files = Vec::new();
    let walker = WalkBuilder::new(dir)
      .hidden(false)
      .git_ignore(true)
      .require_git(false)
      .filter_entry(|entry| entry.file_name() != ".git")
      .build();

    for entry in walker {
      let entry = entry.with_context(|| format!("Failed to walk directory {}", dir.display()))?;
      if entry.file_type().is_some_and(|ft| ft.is_file()) {
        all_files.push(entry.into_path());
      }
    }

    debug!(
      "Found {} files in {}ms",
      all_files.len(),
      start_time.elapsed().as_millis()
    );

    Ok(all_files)
  }

  /// Returns why `path` must not be annotated, or `None` if it is a
  /// candidate.
  pub fn skip_reason(&self, path: &Path) -> Option<String> {
    let metadata = match std::fs::symlink_metadata(path) {
      Ok(metadata) => metadata,
      Err(_) => return Some("file does not exist".to_string()),
    };

    if metadata.file_type().is_symlink() {
      return Some("symbolic link".to_string());
    }
    if !metadata.is_file() {
      return Some("not a regular file".to_string());
    }

    let relative = normalize_relative_path(path, &self.repo_root);
    let in_reserved_dir = relative.components().any(|component| match component {
      Component::Normal(name) => RESERVED_DIRS.iter().any(|dir| name == *dir),
      _ => false,
    });
    if in_reserved_dir {
      return Some("REUSE metadata directory".to_string());
    }

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if LICENSE_FILE_PREFIXES.iter().any(|prefix| file_name.starts_with(prefix)) {
      return Some("license file".to_string());
    }

    None
  }
}

/// Converts a potentially relative path to an absolute path.
///
/// # Parameters
///
/// * `path` - The path to absolutize
///
/// # Returns
///
/// The absolute path.
pub fn absolutize_path(path: &Path) -> Result<PathBuf> {
  if path.is_absolute() {
    Ok(path.to_path_buf())
  } else {
    let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
    Ok(current_dir.join(path))
  }
}

/// Normalizes a path to be relative to a given directory.
///
/// # Parameters
///
/// * `path` - The path to normalize
/// * `base_dir` - The directory to make the path relative to
///
/// # Returns
///
/// The normalized relative path.
pub fn normalize_relative_path(path: &Path, base_dir: &Path) -> PathBuf {
  if path.is_absolute() {
    if let Ok(stripped) = path.strip_prefix(base_dir) {
      return stripped.to_path_buf();
    }

    if let Some(rel_path) = pathdiff::diff_paths(path, base_dir) {
      return rel_path;
    }
  }

  let mut normalized = PathBuf::new();
  for component in path.components() {
    if matches!(component, Component::CurDir) {
      continue;
    }
    normalized.push(component.as_os_str());
  }

  if normalized.as_os_str().is_empty() {
    PathBuf::from(".")
  } else {
    normalized
  }
}
