//! The tech-review checklist: required directories and files, how missing
//! files are generated, and how existing ones are validated.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

use super::licenses::LicenseNames;
use crate::assets::{LICENSE_TEMPLATE, review};
use crate::config::DEFAULT_LICENSE;
use crate::processor::FileIO;
use crate::templates::{Context, Template};
use crate::verbose_log;

/// Directories every project must have.
pub const REQUIRED_DIRECTORIES: [&str; 4] = [".github", "src", "tests", "doc"];

/// Precondition for generating a missing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
  None,
  /// A `pyproject.toml` or `setup.py` must exist.
  ConfigFile,
  /// `--product` must be given.
  Product,
  /// The bundled template only covers the default license.
  DefaultLicense,
}

/// Check run against a file that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
  None,
  /// Content must not be the unmodified template.
  DiffersFromTemplate,
  /// Content must mention the full SPDX name of the license.
  MentionsLicenseName,
}

/// One entry of the checklist.
#[derive(Debug, Clone, Copy)]
pub struct RequiredFile {
  pub name: &'static str,
  /// Accepted file names relative to the repository root. The first one is
  /// generated when none exists.
  pub candidates: &'static [&'static str],
  pub template: &'static str,
  pub requirement: Requirement,
  pub validator: Validator,
}

pub const REQUIRED_FILES: [RequiredFile; 7] = [
  RequiredFile {
    name: "AUTHORS",
    candidates: &["AUTHORS"],
    template: review::AUTHORS,
    requirement: Requirement::ConfigFile,
    validator: Validator::None,
  },
  RequiredFile {
    name: "CODE_OF_CONDUCT.md",
    candidates: &["CODE_OF_CONDUCT.md"],
    template: review::CODE_OF_CONDUCT,
    requirement: Requirement::None,
    validator: Validator::None,
  },
  RequiredFile {
    name: "CONTRIBUTING.md",
    candidates: &["CONTRIBUTING.md"],
    template: review::CONTRIBUTING,
    requirement: Requirement::None,
    validator: Validator::None,
  },
  RequiredFile {
    name: "CONTRIBUTORS.md",
    candidates: &["CONTRIBUTORS.md"],
    template: review::CONTRIBUTORS,
    requirement: Requirement::None,
    validator: Validator::DiffersFromTemplate,
  },
  RequiredFile {
    name: "LICENSE",
    candidates: &["LICENSE"],
    template: LICENSE_TEMPLATE,
    requirement: Requirement::DefaultLicense,
    validator: Validator::MentionsLicenseName,
  },
  RequiredFile {
    name: "README",
    candidates: &["README.rst", "README.md"],
    template: review::README,
    requirement: Requirement::Product,
    validator: Validator::None,
  },
  RequiredFile {
    name: "dependabot.yml",
    candidates: &[".github/dependabot.yml"],
    template: review::DEPENDABOT,
    requirement: Requirement::ConfigFile,
    validator: Validator::None,
  },
];

/// What a checklist entry needs to know about the project.
#[derive(Debug)]
pub struct ChecklistInput<'a> {
  pub repo_root: &'a Path,
  pub context: &'a Context,
  pub has_config_file: bool,
  pub has_product: bool,
  pub license: &'a str,
  pub license_names: Option<&'a LicenseNames>,
}

/// Creates each missing required directory and reports it.
pub fn check_directories(repo_root: &Path) -> Result<Vec<String>> {
  let mut failures = Vec::new();

  for dir in REQUIRED_DIRECTORIES {
    let path = repo_root.join(dir);
    if path.is_dir() {
      continue;
    }
    failures.push(format!("The {dir} directory does not exist. Creating directory..."));
    fs::create_dir_all(&path).with_context(|| format!("Failed to create directory {}", path.display()))?;
  }

  Ok(failures)
}

impl RequiredFile {
  fn render(&self, context: &Context) -> Result<String> {
    Ok(Template::from_source(self.name, self.template).render(context)?)
  }

  /// Checks this entry, generating the file when it is missing and allowed.
  /// Returns the failure message, if any.
  pub fn check(&self, input: &ChecklistInput<'_>) -> Result<Option<String>> {
    let existing = self
      .candidates
      .iter()
      .map(|candidate| input.repo_root.join(candidate))
      .find(|path| path.is_file());

    match existing {
      Some(path) => self.validate(&path, input),
      None => self.generate(input).map(Some),
    }
  }

  fn generate(&self, input: &ChecklistInput<'_>) -> Result<String> {
    match self.requirement {
      Requirement::ConfigFile if !input.has_config_file => {
        return Ok(format!(
          "{} does not exist and cannot be generated without a pyproject.toml or setup.py file",
          self.name
        ));
      }
      Requirement::Product if !input.has_product => {
        return Ok(format!(
          "{} does not exist. The --product argument is required to generate the README file.",
          self.name
        ));
      }
      Requirement::DefaultLicense if input.license != DEFAULT_LICENSE => {
        return Ok(format!(
          "{} does not exist. Add the text of the {} license to it.",
          self.name, input.license
        ));
      }
      _ => {}
    }

    let path = input.repo_root.join(self.candidates[0]);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    FileIO::write_file(&path, &self.render(input.context)?)?;
    verbose_log!("Generated {}", path.display());

    Ok(format!("{} does not exist. Creating file from template...", self.name))
  }

  fn validate(&self, path: &Path, input: &ChecklistInput<'_>) -> Result<Option<String>> {
    match self.validator {
      Validator::None => Ok(None),
      Validator::DiffersFromTemplate => {
        let content = FileIO::read_full_content(path)?;
        if content == self.render(input.context)? {
          Ok(Some(format!("Please update your {} file", self.name)))
        } else {
          Ok(None)
        }
      }
      Validator::MentionsLicenseName => {
        let Some(full_name) = input.license_names.and_then(|names| names.full_name(input.license)) else {
          verbose_log!("No full name known for license {}, skipping {} check", input.license, self.name);
          return Ok(None);
        };
        let content = FileIO::read_full_content(path)?;
        if content.lines().any(|line| line.contains(full_name)) {
          Ok(None)
        } else {
          Ok(Some(format!("The {} file content is missing \"{}\"", self.name, full_name)))
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use tempfile::tempdir;

  use super::*;

  fn context() -> Context {
    Context::new()
      .insert("doc_repo_name", "pyansys-example")
      .insert("project_name", "ansys-tools-example")
      .insert("year_span", "2024 - 2025")
      .insert("product", "Example")
      .insert("repository_url", "https://github.com/ansys/pyansys-example")
      .insert("config_file", "pyproject.toml")
      .insert("author_maint_name", "ANSYS, Inc.")
      .insert("author_maint_email", "pyansys.core@ansys.com")
      .insert("copyright", "ANSYS, Inc. and/or its affiliates.")
  }

  fn mit_names() -> LicenseNames {
    let mut map = BTreeMap::new();
    map.insert("MIT".to_string(), "MIT License".to_string());
    LicenseNames::from_map(map)
  }

  fn entry(name: &str) -> RequiredFile {
    REQUIRED_FILES.into_iter().find(|f| f.name == name).unwrap()
  }

  #[test]
  fn test_every_template_renders() {
    let context = context();
    for file in REQUIRED_FILES {
      let rendered = file.render(&context).unwrap();
      assert!(!rendered.contains("{{"), "{} left a placeholder", file.name);
    }
  }

  #[test]
  fn test_directories_are_created() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();

    let failures = check_directories(dir.path()).unwrap();

    assert_eq!(failures.len(), 3);
    assert!(failures[0].contains(".github"));
    for required in REQUIRED_DIRECTORIES {
      assert!(dir.path().join(required).is_dir());
    }
    assert!(check_directories(dir.path()).unwrap().is_empty());
  }

  #[test]
  fn test_missing_file_is_generated_once() {
    let dir = tempdir().unwrap();
    let context = context();
    let input = ChecklistInput {
      repo_root: dir.path(),
      context: &context,
      has_config_file: true,
      has_product: false,
      license: "MIT",
      license_names: None,
    };

    let failure = entry("dependabot.yml").check(&input).unwrap();

    assert_eq!(
      failure.as_deref(),
      Some("dependabot.yml does not exist. Creating file from template...")
    );
    assert!(
      fs::read_to_string(dir.path().join(".github/dependabot.yml"))
        .unwrap()
        .contains("Location of the pyproject.toml file")
    );
    assert_eq!(entry("dependabot.yml").check(&input).unwrap(), None);
  }

  #[test]
  fn test_requirements_block_generation() {
    let dir = tempdir().unwrap();
    let context = context();
    let input = ChecklistInput {
      repo_root: dir.path(),
      context: &context,
      has_config_file: false,
      has_product: false,
      license: "Apache-2.0",
      license_names: None,
    };

    assert!(entry("AUTHORS").check(&input).unwrap().unwrap().contains("cannot be generated"));
    assert!(entry("README").check(&input).unwrap().unwrap().contains("--product"));
    assert!(entry("LICENSE").check(&input).unwrap().unwrap().contains("Apache-2.0"));
    assert!(!dir.path().join("AUTHORS").exists());
    assert!(!dir.path().join("README.rst").exists());
    assert!(!dir.path().join("LICENSE").exists());
  }

  #[test]
  fn test_readme_md_is_accepted() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("README.md"), "# Example\n").unwrap();
    let context = context();
    let input = ChecklistInput {
      repo_root: dir.path(),
      context: &context,
      has_config_file: true,
      has_product: false,
      license: "MIT",
      license_names: None,
    };

    assert_eq!(entry("README").check(&input).unwrap(), None);
  }

  #[test]
  fn test_contributors_must_be_edited() {
    let dir = tempdir().unwrap();
    let context = context();
    let input = ChecklistInput {
      repo_root: dir.path(),
      context: &context,
      has_config_file: true,
      has_product: true,
      license: "MIT",
      license_names: None,
    };
    let contributors = entry("CONTRIBUTORS.md");

    contributors.check(&input).unwrap();
    assert_eq!(
      contributors.check(&input).unwrap().as_deref(),
      Some("Please update your CONTRIBUTORS.md file")
    );

    fs::write(dir.path().join("CONTRIBUTORS.md"), "# Contributors\n\n* Jane Doe\n").unwrap();
    assert_eq!(contributors.check(&input).unwrap(), None);
  }

  #[test]
  fn test_license_must_mention_full_name() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("LICENSE"), "Copyright (c) 2024 Acme\n").unwrap();
    let context = context();
    let names = mit_names();
    let input = ChecklistInput {
      repo_root: dir.path(),
      context: &context,
      has_config_file: true,
      has_product: true,
      license: "MIT",
      license_names: Some(&names),
    };

    assert_eq!(
      entry("LICENSE").check(&input).unwrap().as_deref(),
      Some("The LICENSE file content is missing \"MIT License\"")
    );

    fs::write(dir.path().join("LICENSE"), "MIT License\n\nCopyright (c) 2024 Acme\n").unwrap();
    assert_eq!(entry("LICENSE").check(&input).unwrap(), None);

    let skipped = ChecklistInput {
      license_names: None,
      ..input
    };
    fs::write(dir.path().join("LICENSE"), "anything\n").unwrap();
    assert_eq!(entry("LICENSE").check(&skipped).unwrap(), None);
  }
}
