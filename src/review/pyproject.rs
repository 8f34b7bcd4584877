//! Checks on the project's Python packaging metadata.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::config::ReviewConfig;
use crate::verbose_log;

static PROJECT_NAME_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^ansys-[a-z]+-[a-z]+$").expect("project name regex must compile"));

static SEMVER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
  )
  .expect("semver regex must compile")
});

static DEV_VERSION_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d+\.\d+(?:\.\d+)?\.dev\d+$").expect("dev version regex must compile"));

/// Error type for reading the project metadata.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
  #[error("Failed to read '{path}': {source}")]
  Read { path: PathBuf, source: std::io::Error },

  #[error("Failed to parse '{path}': {source}")]
  Parse { path: PathBuf, source: toml::de::Error },
}

/// The packaging file a project uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileKind {
  Pyproject,
  Setuptools,
}

impl ConfigFileKind {
  /// Detects the packaging file in `repo_root`, preferring `pyproject.toml`.
  pub fn detect(repo_root: &Path) -> Option<Self> {
    if repo_root.join("pyproject.toml").is_file() {
      Some(Self::Pyproject)
    } else if repo_root.join("setup.py").is_file() {
      Some(Self::Setuptools)
    } else {
      None
    }
  }

  pub const fn file_name(self) -> &'static str {
    match self {
      Self::Pyproject => "pyproject.toml",
      Self::Setuptools => "setup.py",
    }
  }
}

#[derive(Debug, Default, Deserialize)]
struct PyProject {
  project: Option<Project>,
}

#[derive(Debug, Default, Deserialize)]
struct Project {
  name: Option<String>,
  version: Option<String>,
  #[serde(default)]
  dynamic: Vec<String>,
  #[serde(default)]
  authors: Vec<Person>,
  #[serde(default)]
  maintainers: Vec<Person>,
}

#[derive(Debug, Default, Deserialize)]
struct Person {
  name: Option<String>,
  email: Option<String>,
}

/// Result of checking the packaging metadata.
#[derive(Debug, Default)]
pub struct ProjectCheck {
  pub kind: Option<ConfigFileKind>,
  pub project_name: Option<String>,
  pub failures: Vec<String>,
}

/// Checks the project name, version, authors and maintainers.
///
/// Only `pyproject.toml` is inspected; a `setup.py` project is accepted as
/// is.
pub fn check_config_file(config: &ReviewConfig) -> Result<ProjectCheck, ReviewError> {
  let Some(kind) = ConfigFileKind::detect(&config.repo_root) else {
    return Ok(ProjectCheck {
      kind: None,
      project_name: None,
      failures: vec!["The pyproject.toml and setup.py files do not exist".to_string()],
    });
  };

  if kind == ConfigFileKind::Setuptools {
    verbose_log!("Found setup.py, skipping project metadata checks");
    return Ok(ProjectCheck {
      kind: Some(kind),
      ..ProjectCheck::default()
    });
  }

  let path = config.repo_root.join(kind.file_name());
  let content = std::fs::read_to_string(&path).map_err(|source| ReviewError::Read {
    path: path.clone(),
    source,
  })?;
  let pyproject: PyProject = toml::from_str(&content).map_err(|source| ReviewError::Parse { path, source })?;

  let mut check = ProjectCheck {
    kind: Some(kind),
    ..ProjectCheck::default()
  };

  let Some(project) = pyproject.project else {
    check
      .failures
      .push("The [project] table does not exist in the pyproject.toml file".to_string());
    return Ok(check);
  };

  if !config.non_compliant_name {
    let compliant = project.name.as_deref().is_some_and(|name| PROJECT_NAME_REGEX.is_match(name));
    if !compliant {
      check.failures.push("Project name does not follow naming conventions".to_string());
    }
  }

  if project.dynamic.iter().any(|field| field == "version") {
    verbose_log!("Project version is dynamic, skipping version check");
  } else if let Some(version) = &project.version
    && !is_valid_version(version)
  {
    check
      .failures
      .push("Project version does not follow semantic versioning".to_string());
  }

  for (category, people) in [("authors", &project.authors), ("maintainers", &project.maintainers)] {
    let person = people.first();
    let fields = [
      ("name", person.and_then(|p| p.name.as_deref()), config.author_maint_name.as_str()),
      ("email", person.and_then(|p| p.email.as_deref()), config.author_maint_email.as_str()),
    ];

    for (field, value, expected) in fields {
      match value {
        None => check.failures.push(format!(
          "Project {category} {field} does not exist in the pyproject.toml file"
        )),
        Some(value) if value != expected => check
          .failures
          .push(format!("Project {category} {field} is not {expected}")),
        Some(_) => {}
      }
    }
  }

  check.project_name = project.name;
  Ok(check)
}

/// Semantic versions and PEP 440 development releases are accepted.
pub fn is_valid_version(version: &str) -> bool {
  SEMVER_REGEX.is_match(version) || DEV_VERSION_REGEX.is_match(version)
}
