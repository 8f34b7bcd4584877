//! # Configuration Module
//!
//! This module provides configuration support for the compliance hooks. A
//! TOML file can set header defaults and customize comment styles for file
//! extensions or file names.
//!
//! Configuration can be specified in a `.compliance-hooks.toml` file or via the
//! `COMPLIANCE_HOOKS_CONFIG` environment variable. Command line flags always
//! take precedence over the file, and the file over the built-in defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose_log;
use crate::years::{MIN_START_YEAR, YearError, YearSpan, parse_start_year};

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".compliance-hooks.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "COMPLIANCE_HOOKS_CONFIG";

/// Copyright statement used when none is configured.
pub const DEFAULT_COPYRIGHT: &str = "ANSYS, Inc. and/or its affiliates.";

/// Name of the bundled header template.
pub const DEFAULT_TEMPLATE: &str = "ansys";

/// SPDX identifier of the bundled license.
pub const DEFAULT_LICENSE: &str = "MIT";

pub const DEFAULT_AUTHOR_MAINT_NAME: &str = "ANSYS, Inc.";
pub const DEFAULT_AUTHOR_MAINT_EMAIL: &str = "pyansys.core@ansys.com";

/// Comment markers for a file type, as written in `[comment-styles]` or
/// `[filenames]`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CommentStyleConfig {
  /// Block opener such as `/*`; empty for line comments.
  #[serde(default)]
  pub top: String,

  /// Prefix of every header line, e.g. `# ` or ` * `.
  pub middle: String,

  #[serde(default)]
  pub bottom: String,
}

impl CommentStyleConfig {
  pub fn line(prefix: &str) -> Self {
    Self {
      top: String::new(),
      middle: prefix.to_string(),
      bottom: String::new(),
    }
  }

  pub fn block(top: &str, middle: &str, bottom: &str) -> Self {
    Self {
      top: top.to_string(),
      middle: middle.to_string(),
      bottom: bottom.to_string(),
    }
  }
}

/// Header defaults from the `[headers]` section.
///
/// Every field is optional; unset fields fall back to the built-in defaults.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct HeadersConfig {
  #[serde(default)]
  pub copyright: Option<String>,

  /// Header template name, looked up in `.reuse/templates/<name>.jinja2`.
  #[serde(default)]
  pub template: Option<String>,

  #[serde(default)]
  pub license: Option<String>,

  #[serde(default)]
  pub start_year: Option<i32>,

  #[serde(default)]
  pub ignore_license_check: Option<bool>,
}

/// Contents of `.compliance-hooks.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub headers: HeadersConfig,

  /// Keyed by extension without the dot.
  #[serde(default, rename = "comment-styles")]
  pub comment_styles: HashMap<String, CommentStyleConfig>,

  /// Keyed by exact file name or glob pattern.
  #[serde(default)]
  pub filenames: HashMap<String, CommentStyleConfig>,
}

/// Errors from reading and validating the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  #[error("Invalid comment style for '{extension}': {message}")]
  InvalidCommentStyle { extension: String, message: String },

  #[error("Invalid start_year in [headers]: {0}")]
  InvalidStartYear(i32),
}

impl Config {
  /// Reads, validates and normalizes the config file at `path`.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    let config = config.normalize();

    verbose_log!("Loaded {} comment style overrides", config.comment_styles.len());

    Ok(config)
  }

  /// Rejects empty comment prefixes, dotted extension keys and start years
  /// before [`MIN_START_YEAR`]. A start year after the current year is caught
  /// later, when the run configuration is resolved.
  fn validate(&self) -> Result<(), ConfigError> {
    for (ext, style) in &self.comment_styles {
      if style.middle.is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          extension: ext.clone(),
          message: "middle field cannot be empty".to_string(),
        });
      }

      if ext.starts_with('.') {
        return Err(ConfigError::InvalidCommentStyle {
          extension: ext.clone(),
          message: "extension should not include leading dot".to_string(),
        });
      }
    }

    for (filename, style) in &self.filenames {
      if style.middle.is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          extension: filename.clone(),
          message: "middle field cannot be empty".to_string(),
        });
      }
    }

    if let Some(year) = self.headers.start_year
      && year < MIN_START_YEAR
    {
      return Err(ConfigError::InvalidStartYear(year));
    }

    Ok(())
  }

  /// Whether any comment style is overridden.
  pub fn has_overrides(&self) -> bool {
    !self.comment_styles.is_empty() || !self.filenames.is_empty()
  }

  /// Lowercases the keys; lookups compare lowercased names.
  fn normalize(self) -> Self {
    let comment_styles = self
      .comment_styles
      .into_iter()
      .map(|(k, v)| (k.to_lowercase(), v))
      .collect();

    let filenames = self.filenames.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();

    Self {
      headers: self.headers,
      comment_styles,
      filenames,
    }
  }
}

/// Finds the config file: `--config`, then `$COMPLIANCE_HOOKS_CONFIG`, then
/// `.compliance-hooks.toml` in the repository root.
pub fn discover_config_path(explicit_path: Option<&Path>, workspace_root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let workspace_config = workspace_root.join(DEFAULT_CONFIG_FILENAME);
  if workspace_config.exists() {
    verbose_log!("Using workspace config: {}", workspace_config.display());
    return Some(workspace_config);
  }

  verbose_log!("No config file found");
  None
}

/// Loads the config file for this run, if there is one.
///
/// A `--config` path that does not exist is an error; `no_config` skips
/// discovery entirely.
pub fn load_config(explicit_path: Option<&Path>, workspace_root: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  if let Some(path) = explicit_path
    && !path.exists()
  {
    anyhow::bail!("Config file does not exist: {}", path.display());
  }

  match discover_config_path(explicit_path, workspace_root) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}

/// Header options given on the command line.
///
/// `None` means the flag was not passed, so the config file or the built-in
/// default applies.
#[derive(Debug, Default, Clone)]
pub struct HeaderOverrides {
  pub copyright: Option<String>,
  pub template: Option<String>,
  pub license: Option<String>,
  pub start_year: Option<String>,
  pub ignore_license_check: bool,
  pub show_diff: bool,
}

/// Immutable configuration for one `add-license-headers` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
  pub repo_root: PathBuf,
  pub copyright: String,
  pub template: String,
  pub license: String,
  /// From the start year to the current year.
  pub years: YearSpan,
  pub ignore_license_check: bool,
  pub show_diff: bool,
}

impl HookConfig {
  /// Builds the run configuration with CLI > config file > defaults
  /// precedence.
  ///
  /// # Errors
  ///
  /// Returns a [`YearError`] when the start year (from either source) is not
  /// a valid four-digit year between 1942 and `current_year`.
  pub fn resolve(
    repo_root: PathBuf,
    overrides: HeaderOverrides,
    config: Option<&Config>,
    current_year: i32,
  ) -> Result<Self, YearError> {
    let headers = config.map(|c| c.headers.clone()).unwrap_or_default();

    let start_year = match (overrides.start_year, headers.start_year) {
      (Some(raw), _) => parse_start_year(&raw, current_year)?,
      (None, Some(year)) => parse_start_year(&year.to_string(), current_year)?,
      (None, None) => current_year,
    };

    Ok(Self {
      repo_root,
      copyright: overrides
        .copyright
        .or(headers.copyright)
        .unwrap_or_else(|| DEFAULT_COPYRIGHT.to_string()),
      template: overrides
        .template
        .or(headers.template)
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
      license: overrides
        .license
        .or(headers.license)
        .unwrap_or_else(|| DEFAULT_LICENSE.to_string()),
      years: YearSpan::new(start_year, current_year),
      ignore_license_check: overrides.ignore_license_check || headers.ignore_license_check.unwrap_or(false),
      show_diff: overrides.show_diff,
    })
  }

  pub fn uses_default_template(&self) -> bool {
    self.template == DEFAULT_TEMPLATE
  }

  pub fn uses_default_license(&self) -> bool {
    self.license == DEFAULT_LICENSE
  }

  /// Path of the license text the headers refer to.
  pub fn license_text_path(&self) -> PathBuf {
    self.repo_root.join("LICENSES").join(format!("{}.txt", self.license))
  }
}

/// Immutable configuration for one `tech-review` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
  pub repo_root: PathBuf,
  pub author_maint_name: String,
  pub author_maint_email: String,
  pub license: String,
  /// Product name used in the README template.
  pub product: Option<String>,
  /// Repository URL; derived from the repository name when absent.
  pub url: Option<String>,
  /// Validated start year, if one was given.
  pub start_year: Option<i32>,
  /// Skip the project name check.
  pub non_compliant_name: bool,
}
