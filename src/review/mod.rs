//! # Review Module
//!
//! The `tech-review` hook: checks that a project carries the required
//! directories, community files, license and packaging metadata, generating
//! what is missing from the bundled templates.

mod checklist;
pub mod licenses;
mod pyproject;

use anyhow::Result;
pub use checklist::{
  ChecklistInput, REQUIRED_DIRECTORIES, REQUIRED_FILES, RequiredFile, Requirement, Validator, check_directories,
};
pub use licenses::{LicenseNames, license_names};
pub use pyproject::{ConfigFileKind, ProjectCheck, ReviewError, check_config_file, is_valid_version};
use tracing::debug;

use crate::config::{DEFAULT_COPYRIGHT, ReviewConfig};
use crate::git;
use crate::templates::Context;
use crate::years::YearSpan;

/// Outcome of one review run.
#[derive(Debug, Default)]
pub struct ReviewReport {
  pub failures: Vec<String>,
}

impl ReviewReport {
  pub fn passed(&self) -> bool {
    self.failures.is_empty()
  }
}

/// First year of the project: the configured start year, else the year of the
/// first commit, else `current_year`.
pub fn project_start_year(config: &ReviewConfig, current_year: i32) -> i32 {
  config
    .start_year
    .or_else(|| git::first_commit_year(&config.repo_root))
    .unwrap_or(current_year)
}

/// Builds the variables available to the review templates.
pub fn template_context(config: &ReviewConfig, project: &ProjectCheck, current_year: i32) -> Context {
  let doc_repo_name = config
    .repo_root
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_default();
  let project_name = project.project_name.clone().unwrap_or_else(|| doc_repo_name.clone());
  let repository_url = config
    .url
    .clone()
    .unwrap_or_else(|| format!("https://github.com/ansys/{doc_repo_name}"));
  let config_file = project.kind.unwrap_or(ConfigFileKind::Pyproject).file_name();
  let years = YearSpan::new(project_start_year(config, current_year), current_year);

  Context::new()
    .insert("doc_repo_name", doc_repo_name)
    .insert("project_name", project_name)
    .insert("year_span", years.to_string())
    .insert("product", config.product.clone().unwrap_or_default())
    .insert("repository_url", repository_url)
    .insert("config_file", config_file)
    .insert("author_maint_name", config.author_maint_name.as_str())
    .insert("author_maint_email", config.author_maint_email.as_str())
    .insert("copyright", DEFAULT_COPYRIGHT)
}

/// Runs every review check in `config.repo_root`.
///
/// Missing directories and files are created as a side effect, so a second
/// run reports only what needs a human.
pub fn run_review(
  config: &ReviewConfig,
  license_names: Option<&LicenseNames>,
  current_year: i32,
) -> Result<ReviewReport> {
  let mut report = ReviewReport::default();

  report.failures.extend(check_directories(&config.repo_root)?);

  let project = check_config_file(config)?;
  debug!("Project metadata: {:?}", project);
  report.failures.extend(project.failures.iter().cloned());

  let context = template_context(config, &project, current_year);
  let input = ChecklistInput {
    repo_root: &config.repo_root,
    context: &context,
    has_config_file: project.kind.is_some(),
    has_product: config.product.is_some(),
    license: &config.license,
    license_names,
  };

  for file in &REQUIRED_FILES {
    if let Some(failure) = file.check(&input)? {
      report.failures.push(failure);
    }
  }

  Ok(report)
}
