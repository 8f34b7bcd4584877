#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

pub fn is_git_available() -> bool {
  Command::new("git").arg("--version").output().is_ok()
}

/// Runs `git` in `dir`, failing with its stderr.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
  let output = Command::new("git")
    .args(args)
    .current_dir(dir)
    .output()
    .with_context(|| format!("Failed to execute git {:?}", args))?;

  if !output.status.success() {
    bail!("git {:?} failed: {}", args, String::from_utf8_lossy(&output.stderr));
  }
  Ok(())
}

/// Creates a repository on `main` with a local identity and unsigned commits.
pub fn init_git_repo(dir: &Path) -> Result<()> {
  run_git(dir, &["init", "--initial-branch=main"])?;
  for (key, value) in [
    ("user.name", "Compliance Tester"),
    ("user.email", "tester@example.com"),
    ("commit.gpgsign", "false"),
  ] {
    run_git(dir, &["config", key, value])?;
  }
  Ok(())
}

pub fn git_add_and_commit(dir: &Path, file: &str, message: &str) -> Result<()> {
  run_git(dir, &["add", file])?;
  run_git(dir, &["commit", "--quiet", "-m", message])
}

/// Writes each `(relative path, content)` pair below `root`.
pub fn write_files(root: &Path, files: &[(&str, &str)]) -> Result<()> {
  for (relative, content) in files {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  }
  Ok(())
}
