//! # Tech Review Command
//!
//! Runs the technical review checklist in the repository root.

use anyhow::Result;
use clap::Args;
use tracing::debug;

use super::{EXIT_CHANGED, EXIT_OK, EXIT_USAGE, current_year};
use crate::config::{DEFAULT_AUTHOR_MAINT_EMAIL, DEFAULT_AUTHOR_MAINT_NAME, DEFAULT_LICENSE, ReviewConfig};
use crate::output;
use crate::review::{license_names, run_review};
use crate::workspace::resolve_workspace;
use crate::years::parse_start_year;

/// Arguments for the tech-review command
#[derive(Args, Debug)]
pub struct TechReviewArgs {
  /// Expected name of the project authors and maintainers
  #[arg(long = "author_maint_name", value_name = "STR", default_value = DEFAULT_AUTHOR_MAINT_NAME)]
  pub author_maint_name: String,

  /// Expected email of the project authors and maintainers
  #[arg(long = "author_maint_email", value_name = "STR", default_value = DEFAULT_AUTHOR_MAINT_EMAIL)]
  pub author_maint_email: String,

  /// SPDX identifier of the project license
  #[arg(long, value_name = "STR", default_value = DEFAULT_LICENSE)]
  pub license: String,

  /// Product name, required to generate a missing README
  #[arg(long, value_name = "STR")]
  pub product: Option<String>,

  /// Repository URL (default: https://github.com/ansys/<repository name>)
  #[arg(long, value_name = "STR")]
  pub url: Option<String>,

  /// First year of the project (default: year of the first commit)
  #[arg(long = "start_year", value_name = "YYYY")]
  pub start_year: Option<String>,

  /// Skip the project naming convention check
  #[arg(long = "non_compliant_name")]
  pub non_compliant_name: bool,
}

/// Run the tech-review command and return the exit code.
pub fn run_tech_review(args: TechReviewArgs) -> Result<u8> {
  let year = current_year();

  let start_year = match args.start_year.as_deref().map(|raw| parse_start_year(raw, year)).transpose() {
    Ok(start_year) => start_year,
    Err(e) => {
      output::print_error(&e.to_string());
      return Ok(EXIT_USAGE);
    }
  };

  let workspace = resolve_workspace()?;
  let config = ReviewConfig {
    repo_root: workspace.root().to_path_buf(),
    author_maint_name: args.author_maint_name,
    author_maint_email: args.author_maint_email,
    license: args.license,
    product: args.product,
    url: args.url,
    start_year,
    non_compliant_name: args.non_compliant_name,
  };
  debug!("Review configuration: {:?}", config);

  let names = license_names();
  let report = run_review(&config, names.as_ref(), year)?;

  if report.passed() {
    output::print_review_ok();
    return Ok(EXIT_OK);
  }

  for failure in &report.failures {
    output::print_check_failure(failure);
  }
  output::print_hint("Generated files are ready for review; run the hook again once the remaining issues are fixed.");
  Ok(EXIT_CHANGED)
}
