//! # Add License Headers Command
//!
//! Adds or updates the license header of the files pre-commit passes in, and
//! keeps the year span of the top-level LICENSE file current.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use tracing::debug;

use super::{EXIT_CHANGED, EXIT_OK, EXIT_USAGE, current_year};
use crate::assets::{AssetKind, AssetLinkage, default_assets};
use crate::config::{HeaderOverrides, HookConfig, load_config};
use crate::processor::Processor;
use crate::reuse::ReuseScanner;
use crate::templates::load_header_template;
use crate::workspace::resolve_workspace;
use crate::{info_log, license_file, output, verbose_log};

/// Arguments for the add-license-headers command
#[derive(Args, Debug, Default)]
pub struct AddLicenseHeadersArgs {
  /// Files to check. Directories are walked recursively, honouring .gitignore.
  #[arg(required = false)]
  pub files: Vec<PathBuf>,

  /// Copyright holder written in the headers
  #[arg(long = "custom_copyright", value_name = "STR")]
  pub custom_copyright: Option<String>,

  /// Name of the header template in .reuse/templates
  #[arg(long = "custom_template", value_name = "STR")]
  pub custom_template: Option<String>,

  /// SPDX identifier of the license written in the headers
  #[arg(long = "custom_license", value_name = "STR")]
  pub custom_license: Option<String>,

  /// First year of the copyright span (default: current year)
  #[arg(long = "start_year", value_name = "YYYY")]
  pub start_year: Option<String>,

  /// Only require a copyright line, not an SPDX license identifier
  #[arg(long = "ignore_license_check")]
  pub ignore_license_check: bool,

  /// Print a diff of every header change
  #[arg(long)]
  pub show_diff: bool,

  /// Path to config file (default: .compliance-hooks.toml in the repository root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,
}

impl AddLicenseHeadersArgs {
  fn overrides(&self) -> HeaderOverrides {
    HeaderOverrides {
      copyright: self.custom_copyright.clone(),
      template: self.custom_template.clone(),
      license: self.custom_license.clone(),
      start_year: self.start_year.clone(),
      ignore_license_check: self.ignore_license_check,
      show_diff: self.show_diff,
    }
  }
}

/// Run the add-license-headers command and return the exit code.
pub fn run_add_license_headers(args: AddLicenseHeadersArgs) -> Result<u8> {
  let workspace = resolve_workspace()?;
  let repo_root = workspace.root().to_path_buf();
  let kind = if workspace.is_git() { "git repository" } else { "directory" };
  debug!("Using {} root: {}", kind, repo_root.display());

  let config = match load_config(args.config.as_deref(), &repo_root, args.no_config) {
    Ok(config) => config,
    Err(e) => {
      output::print_error(&format!("{:#}", e));
      return Ok(EXIT_USAGE);
    }
  };

  let hook_config = match HookConfig::resolve(repo_root.clone(), args.overrides(), config.as_ref(), current_year()) {
    Ok(hook_config) => hook_config,
    Err(e) => {
      output::print_error(&e.to_string());
      return Ok(EXIT_USAGE);
    }
  };
  debug!("Resolved configuration: {:?}", hook_config);

  if args.files.is_empty() {
    info_log!("No files to check");
  }

  let scanner = ReuseScanner::from_config(config.as_ref());
  let linkage = AssetLinkage::link(&repo_root, &default_assets(&hook_config))?;
  for asset in [AssetKind::Template, AssetKind::License] {
    if linkage.is_linked(asset) {
      verbose_log!("Using the bundled {} for this run", asset.relative_path());
    }
  }

  let result = run_linked(&hook_config, scanner, &args.files);
  let cleanup = linkage.cleanup();

  let changed = result?;
  cleanup?;

  if changed {
    output::print_hint("Review the header changes and stage them before committing.");
    return Ok(EXIT_CHANGED);
  }
  Ok(EXIT_OK)
}

/// The part of the run that needs the default assets in place.
fn run_linked(config: &HookConfig, scanner: ReuseScanner, files: &[PathBuf]) -> Result<bool> {
  ensure_license_text(config)?;

  let template = load_header_template(&config.repo_root, &config.template)?;

  let license_changed = license_file::sync(
    &config.repo_root,
    config.years.start(),
    config.years.end(),
    &config.license,
    &config.copyright,
  )?;

  let repo_root = config.repo_root.clone();
  let processor = Processor::new(config.clone(), scanner, Some(template));
  let report = processor.run(files)?;
  output::print_summary(&report, &repo_root);

  Ok(license_changed || report.changed())
}

/// Fails before any file is touched when the headers would name a license
/// whose text is not in `LICENSES/`.
fn ensure_license_text(config: &HookConfig) -> Result<()> {
  if config.ignore_license_check {
    return Ok(());
  }

  let path = config.license_text_path();
  if !path.is_file() {
    bail!(
      "License text for {} is missing. Add it as {}",
      config.license,
      output::make_relative_path(&path, Some(&config.repo_root))
    );
  }
  Ok(())
}
