//! # Assets Module
//!
//! Default files bundled into the binary: the `ansys` header template, the
//! MIT license text, and the templates used by the tech review.
//!
//! The header hook needs the template and license text inside the repository
//! while it runs. [`AssetLinkage`] writes them only when the run uses the
//! defaults and the repository does not provide its own copy, and removes them
//! again afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::HookConfig;
use crate::git;
use crate::processor::FileIO;

/// The `ansys` license header template.
pub const HEADER_TEMPLATE: &str = include_str!("../assets/reuse/templates/ansys.jinja2");

/// SPDX text of the MIT license.
pub const MIT_LICENSE_TEXT: &str = include_str!("../assets/reuse/LICENSES/MIT.txt");

/// Template of the top-level `LICENSE` file.
pub const LICENSE_TEMPLATE: &str = include_str!("../assets/review/LICENSE");

/// Templates of the files generated by the tech review.
pub mod review {
  pub const AUTHORS: &str = include_str!("../assets/review/AUTHORS");
  pub const CODE_OF_CONDUCT: &str = include_str!("../assets/review/CODE_OF_CONDUCT.md");
  pub const CONTRIBUTING: &str = include_str!("../assets/review/CONTRIBUTING.md");
  pub const CONTRIBUTORS: &str = include_str!("../assets/review/CONTRIBUTORS.md");
  pub const README: &str = include_str!("../assets/review/README.rst");
  pub const DEPENDABOT: &str = include_str!("../assets/review/dependabot.yml");
}

/// Directories that may have been created for linked assets, deepest first.
const ASSET_DIRS: [&str; 3] = [".reuse/templates", ".reuse", "LICENSES"];

/// A bundled asset the header hook can place in the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
  Template,
  License,
}

impl AssetKind {
  /// Location of the asset, relative to the repository root.
  pub const fn relative_path(self) -> &'static str {
    match self {
      Self::Template => ".reuse/templates/ansys.jinja2",
      Self::License => "LICENSES/MIT.txt",
    }
  }

  pub const fn content(self) -> &'static str {
    match self {
      Self::Template => HEADER_TEMPLATE,
      Self::License => MIT_LICENSE_TEXT,
    }
  }
}

/// Assets the run needs: the template when the default template is used, and
/// the license text when the default license is used and checked.
pub fn default_assets(config: &HookConfig) -> Vec<AssetKind> {
  let mut assets = Vec::with_capacity(2);
  if config.uses_default_template() {
    assets.push(AssetKind::Template);
  }
  if config.uses_default_license() && !config.ignore_license_check {
    assets.push(AssetKind::License);
  }
  assets
}

/// Assets written into the repository for the duration of one run.
#[derive(Debug)]
pub struct AssetLinkage {
  repo_root: PathBuf,
  linked: Vec<(AssetKind, PathBuf)>,
}

impl AssetLinkage {
  /// Writes each of `assets` that the repository does not already provide.
  ///
  /// A leftover copy from an interrupted run (untracked and identical to the
  /// bundled asset) is removed first and then linked again, so it is cleaned
  /// up afterwards. Tracked or modified copies are left alone.
  pub fn link(repo_root: &Path, assets: &[AssetKind]) -> Result<Self> {
    let mut linkage = Self {
      repo_root: repo_root.to_path_buf(),
      linked: Vec::with_capacity(assets.len()),
    };

    for &kind in assets {
      let relative = Path::new(kind.relative_path());
      let path = repo_root.join(relative);

      if path.exists() {
        let stale = !git::is_tracked(repo_root, relative)
          && fs::read_to_string(&path).is_ok_and(|content| content == kind.content());
        if !stale {
          debug!("Using the repository's own {}", relative.display());
          continue;
        }
        debug!("Removing stale {}", relative.display());
        fs::remove_file(&path).with_context(|| format!("Failed to remove stale asset {}", path.display()))?;
      }

      if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
      }
      FileIO::write_file(&path, kind.content())?;
      debug!("Linked {}", relative.display());
      linkage.linked.push((kind, path));
    }

    Ok(linkage)
  }

  pub fn is_linked(&self, kind: AssetKind) -> bool {
    self.linked.iter().any(|(linked, _)| *linked == kind)
  }

  /// Removes every linked asset and the asset directories left empty.
  pub fn cleanup(self) -> Result<()> {
    for (_, path) in &self.linked {
      if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
      }
    }

    for dir in ASSET_DIRS {
      remove_dir_if_empty(&self.repo_root.join(dir))?;
    }

    Ok(())
  }
}

fn remove_dir_if_empty(dir: &Path) -> Result<()> {
  let Ok(mut entries) = fs::read_dir(dir) else {
    return Ok(());
  };

  if entries.next().is_none() {
    fs::remove_dir(dir).with_context(|| format!("Failed to remove directory {}", dir.display()))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;
  use crate::config::HeaderOverrides;

  #[test]
  fn test_default_assets() {
    let config = HookConfig::resolve(PathBuf::from("/repo"), HeaderOverrides::default(), None, 2025).unwrap();
    assert_eq!(default_assets(&config), vec![AssetKind::Template, AssetKind::License]);

    let ignored = HookConfig {
      ignore_license_check: true,
      ..config.clone()
    };
    assert_eq!(default_assets(&ignored), vec![AssetKind::Template]);

    let custom = HookConfig {
      template: "acme".to_string(),
      license: "Apache-2.0".to_string(),
      ..config
    };
    assert!(default_assets(&custom).is_empty());
  }

  #[test]
  fn test_link_and_cleanup() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    let linkage = AssetLinkage::link(root, &[AssetKind::Template, AssetKind::License]).unwrap();
    assert!(linkage.is_linked(AssetKind::Template));
    assert_eq!(
      fs::read_to_string(root.join("LICENSES/MIT.txt")).unwrap(),
      MIT_LICENSE_TEXT
    );

    linkage.cleanup().unwrap();
    assert!(!root.join("LICENSES").exists());
    assert!(!root.join(".reuse").exists());
  }

  #[test]
  fn test_link_keeps_repository_copy() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("LICENSES")).unwrap();
    fs::write(root.join("LICENSES/MIT.txt"), "custom text\n").unwrap();
    fs::write(root.join("LICENSES/Apache-2.0.txt"), "apache\n").unwrap();

    let linkage = AssetLinkage::link(root, &[AssetKind::License]).unwrap();
    assert!(!linkage.is_linked(AssetKind::License));
    linkage.cleanup().unwrap();

    assert_eq!(fs::read_to_string(root.join("LICENSES/MIT.txt")).unwrap(), "custom text\n");
    assert!(root.join("LICENSES/Apache-2.0.txt").exists());
  }

  #[test]
  fn test_stale_copy_is_cleaned_up() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".reuse/templates")).unwrap();
    fs::write(root.join(".reuse/templates/ansys.jinja2"), HEADER_TEMPLATE).unwrap();

    let linkage = AssetLinkage::link(root, &[AssetKind::Template]).unwrap();
    assert!(linkage.is_linked(AssetKind::Template));
    linkage.cleanup().unwrap();

    assert!(!root.join(".reuse").exists());
  }

  #[test]
  fn test_templates_render() {
    use crate::templates::{Context, Template};

    let header = Template::from_source("ansys", HEADER_TEMPLATE)
      .render(
        &Context::new()
          .insert_list("copyright_lines", vec!["Copyright (C) 2025 Acme".to_string()])
          .insert_list("spdx_expressions", vec!["MIT".to_string()]),
      )
      .unwrap();
    assert!(header.starts_with("Copyright (C) 2025 Acme\nSPDX-License-Identifier: MIT\n\n\nPermission"));

    let license = Template::from_source("LICENSE", LICENSE_TEMPLATE)
      .render(&Context::new().insert("year_span", "2024").insert("copyright", "Acme"))
      .unwrap();
    assert!(license.contains("Copyright (c) 2024 Acme\n"));
  }
}
