mod common;

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use chrono::Datelike;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

use crate::common::{git_add_and_commit, init_git_repo, is_git_available, write_files};

const PYPROJECT: &str = r#"[project]
name = "ansys-tools-example"
version = "0.1.0"
authors = [{ name = "ANSYS, Inc.", email = "pyansys.core@ansys.com" }]
maintainers = [{ name = "ANSYS, Inc.", email = "pyansys.core@ansys.com" }]
"#;

/// A cache directory holding the license names, so no download happens.
fn license_cache() -> Result<TempDir, Box<dyn std::error::Error>> {
  let cache = tempdir()?;
  fs::write(
    cache.path().join("licenses.json"),
    r#"{"Apache-2.0": "Apache License 2.0", "MIT": "MIT License"}"#,
  )?;
  Ok(cache)
}

fn review(dir: &Path, cache: &TempDir) -> Result<Command, Box<dyn std::error::Error>> {
  let mut cmd = Command::cargo_bin("compliance-hooks")?;
  cmd
    .current_dir(dir)
    .env("COMPLIANCE_HOOKS_CACHE_DIR", cache.path())
    .arg("--colors=never")
    .arg("tech-review");
  Ok(cmd)
}

#[test]
fn test_empty_project_gets_files_generated() -> Result<(), Box<dyn std::error::Error>> {
  let cache = license_cache()?;
  let temp_dir = tempdir()?;
  let root = temp_dir.path();

  review(root, &cache)?
    .args(["--product", "Example", "--start_year", "2021"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("The pyproject.toml and setup.py files do not exist"))
    .stdout(predicate::str::contains(
      "CODE_OF_CONDUCT.md does not exist. Creating file from template...",
    ))
    .stdout(predicate::str::contains("The src directory does not exist. Creating directory..."))
    .stdout(predicate::str::contains("AUTHORS does not exist and cannot be generated"));

  for dir in [".github", "src", "tests", "doc"] {
    assert!(root.join(dir).is_dir(), "{dir} was not created");
  }
  assert!(root.join("CODE_OF_CONDUCT.md").is_file());
  assert!(root.join("CONTRIBUTING.md").is_file());
  assert!(!root.join("AUTHORS").exists());
  assert!(!root.join(".github/dependabot.yml").exists());

  let year = chrono::Local::now().year();
  let license = fs::read_to_string(root.join("LICENSE"))?;
  assert!(license.starts_with("MIT License\n"));
  assert!(license.contains(&format!("Copyright (c) 2021 - {year} ANSYS, Inc. and/or its affiliates.")));

  let readme = fs::read_to_string(root.join("README.rst"))?;
  assert!(readme.contains("A Python client library for Example."));

  Ok(())
}

#[test]
fn test_compliant_project_passes_after_contributors_update() -> Result<(), Box<dyn std::error::Error>> {
  let cache = license_cache()?;
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  fs::write(root.join("pyproject.toml"), PYPROJECT)?;

  review(root, &cache)?.args(["--product", "Example"]).assert().code(1);
  assert!(root.join("AUTHORS").is_file());
  assert!(
    fs::read_to_string(root.join(".github/dependabot.yml"))?.contains("Location of the pyproject.toml file")
  );

  review(root, &cache)?
    .args(["--product", "Example"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("Please update your CONTRIBUTORS.md file"));

  fs::write(
    root.join("CONTRIBUTORS.md"),
    "# Contributors\n\n## Project Lead\n\n* [Jane Doe](https://github.com/janedoe)\n",
  )?;

  review(root, &cache)?
    .args(["--product", "Example"])
    .assert()
    .code(0)
    .stdout(predicate::str::contains("All technical review checks passed."));

  Ok(())
}

#[test]
fn test_pyproject_metadata_is_checked() -> Result<(), Box<dyn std::error::Error>> {
  let cache = license_cache()?;
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  fs::write(
    root.join("pyproject.toml"),
    PYPROJECT
      .replace("ansys-tools-example", "example_package")
      .replace("0.1.0", "0.1"),
  )?;

  review(root, &cache)?
    .args(["--author_maint_name", "Acme"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("Project name does not follow naming conventions"))
    .stdout(predicate::str::contains("Project version does not follow semantic versioning"))
    .stdout(predicate::str::contains("Project authors name is not Acme"))
    .stdout(predicate::str::contains("Project maintainers name is not Acme"))
    .stdout(predicate::str::contains(
      "README does not exist. The --product argument is required to generate the README file.",
    ));

  review(root, &cache)?
    .args(["--author_maint_name", "Acme", "--non_compliant_name"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("naming conventions").not());

  Ok(())
}

#[test]
fn test_license_must_name_the_license() -> Result<(), Box<dyn std::error::Error>> {
  let cache = license_cache()?;
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  fs::write(root.join("LICENSE"), "Copyright (c) 2024 Acme\n\nAll rights reserved.\n")?;

  review(root, &cache)?
    .assert()
    .code(1)
    .stdout(predicate::str::contains("The LICENSE file content is missing \"MIT License\""));

  review(root, &cache)?
    .args(["--license", "Apache-2.0"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains(
      "The LICENSE file content is missing \"Apache License 2.0\"",
    ));

  Ok(())
}

#[test]
fn test_runs_from_repository_subdirectory() -> Result<(), Box<dyn std::error::Error>> {
  if !is_git_available() {
    return Ok(());
  }

  let cache = license_cache()?;
  let temp_dir = tempdir()?;
  let root = temp_dir.path();
  init_git_repo(root)?;
  write_files(root, &[("pyproject.toml", PYPROJECT), ("src/pkg/__init__.py", "")])?;
  git_add_and_commit(root, "pyproject.toml", "Initial commit")?;
  let nested = root.join("src").join("pkg");

  review(&nested, &cache)?.args(["--product", "Example"]).assert().code(1);

  let year = chrono::Local::now().year();
  assert!(root.join("CODE_OF_CONDUCT.md").is_file());
  assert!(!nested.join("CODE_OF_CONDUCT.md").exists());
  assert!(fs::read_to_string(root.join("LICENSE"))?.contains(&format!("Copyright (c) {year} ANSYS")));

  Ok(())
}

#[test]
fn test_invalid_start_year() -> Result<(), Box<dyn std::error::Error>> {
  let cache = license_cache()?;
  let temp_dir = tempdir()?;

  review(temp_dir.path(), &cache)?
    .args(["--start_year", "1800"])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("ERROR:"));

  assert!(!temp_dir.path().join("src").exists());

  Ok(())
}
