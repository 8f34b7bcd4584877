//! # Workspace Module
//!
//! This module defines the repository root the hooks operate on.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::git;

/// Workspace root selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workspace {
  /// Workspace rooted at a git repository.
  Git { root: PathBuf },
  /// Workspace rooted at the current directory.
  Directory { root: PathBuf },
}

impl Workspace {
  pub fn root(&self) -> &Path {
    match self {
      Self::Git { root } | Self::Directory { root } => root.as_path(),
    }
  }

  pub const fn is_git(&self) -> bool {
    matches!(self, Self::Git { .. })
  }

  /// Name of the repository directory, used in generated documents.
  pub fn name(&self) -> String {
    self
      .root()
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_default()
  }
}

/// Resolve the workspace for the current directory.
pub fn resolve_workspace() -> Result<Workspace> {
  let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
  resolve_workspace_from(&current_dir)
}

/// Resolve the workspace containing `dir`: the enclosing git work tree, or
/// `dir` itself outside of git.
pub fn resolve_workspace_from(dir: &Path) -> Result<Workspace> {
  if let Some(root) = git::discover_repo_root(dir)? {
    let root = root.canonicalize().unwrap_or(root);
    return Ok(Workspace::Git { root });
  }

  Ok(Workspace::Directory { root: dir.to_path_buf() })
}
