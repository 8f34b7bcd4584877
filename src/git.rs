//! # Git Module
//!
//! This module contains the read-only git lookups the hooks need: finding the
//! repository root, the year of the first commit, and whether a path is
//! tracked.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, TimeZone, Utc};
use git2::{ErrorCode, Repository, Sort};

use crate::verbose_log;

/// Finds the root of the git work tree containing `dir`.
///
/// Returns `Ok(None)` when `dir` is not inside a git repository, or when the
/// repository is bare.
pub fn discover_repo_root(dir: &Path) -> Result<Option<PathBuf>> {
  let repo = match Repository::discover(dir) {
    Ok(repo) => repo,
    Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
    Err(e) => return Err(e).with_context(|| format!("Failed to open git repository at {}", dir.display())),
  };

  let root = repo.workdir().map(Path::to_path_buf);
  if let Some(root) = &root {
    verbose_log!("Found git repository root: {}", root.display());
  }
  Ok(root)
}

/// Year of the oldest commit reachable from `HEAD`.
///
/// Returns `None` when the repository cannot be opened or has no commits yet.
pub fn first_commit_year(repo_root: &Path) -> Option<i32> {
  let repo = Repository::open(repo_root).ok()?;
  let mut revwalk = repo.revwalk().ok()?;
  revwalk.push_head().ok()?;
  revwalk.set_sorting(Sort::TIME | Sort::REVERSE).ok()?;

  let oid = revwalk.next()?.ok()?;
  let commit = repo.find_commit(oid).ok()?;
  let seconds = commit.time().seconds();
  let year = Utc.timestamp_opt(seconds, 0).single()?.year();

  verbose_log!("First commit {} is from {}", oid, year);
  Some(year)
}

/// Whether `relative_path` is in the index of the repository at `repo_root`.
///
/// Paths outside a git repository are never tracked.
pub fn is_tracked(repo_root: &Path, relative_path: &Path) -> bool {
  let Ok(repo) = Repository::open(repo_root) else {
    return false;
  };
  let Ok(index) = repo.index() else {
    return false;
  };

  index.get_path(relative_path, 0).is_some()
}
