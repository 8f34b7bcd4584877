//! SPDX license names.
//!
//! The SPDX license list is downloaded once, reduced to an `{id: name}` map and
//! cached on disk. Later runs read the cache only.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::processor::FileIO;

/// Location of the SPDX license list.
pub const LICENSES_URL: &str = "https://raw.githubusercontent.com/spdx/license-list-data/main/json/licenses.json";

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV_VAR: &str = "COMPLIANCE_HOOKS_CACHE_DIR";

const CACHE_FILE_NAME: &str = "licenses.json";
const DOWNLOAD_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Deserialize)]
struct LicenseList {
  licenses: Vec<LicenseEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LicenseEntry {
  license_id: String,
  name: String,
  #[serde(default)]
  is_deprecated_license_id: bool,
}

/// Map from SPDX license id to full license name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseNames {
  names: BTreeMap<String, String>,
}

impl LicenseNames {
  pub fn from_map(names: BTreeMap<String, String>) -> Self {
    Self { names }
  }

  /// Full name of license `id`, e.g. "MIT License" for "MIT".
  pub fn full_name(&self, id: &str) -> Option<&str> {
    self.names.get(id).map(String::as_str)
  }

  /// Loads the cached map, downloading and caching it first if needed.
  pub fn load_or_download() -> Result<Self> {
    let cache = cache_path()?;
    if cache.is_file() {
      debug!("Reading license names from {}", cache.display());
      return Self::read_cache(&cache);
    }

    let body = download(LICENSES_URL)?;
    let names = restructure(&body)?;
    write_cache(&cache, &names)?;
    Ok(names)
  }

  fn read_cache(path: &Path) -> Result<Self> {
    let content = FileIO::read_full_content(path)?;
    let names: BTreeMap<String, String> =
      serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Self { names })
  }
}

/// Directory holding `licenses.json`.
pub fn cache_dir() -> Result<PathBuf> {
  if let Ok(dir) = std::env::var(CACHE_DIR_ENV_VAR)
    && !dir.is_empty()
  {
    return Ok(PathBuf::from(dir));
  }

  dirs::cache_dir()
    .map(|dir| dir.join("compliance-hooks"))
    .ok_or_else(|| anyhow!("Cannot determine the user cache directory"))
}

fn cache_path() -> Result<PathBuf> {
  Ok(cache_dir()?.join(CACHE_FILE_NAME))
}

fn download(url: &str) -> Result<String> {
  debug!("Downloading {}", url);
  let client = reqwest::blocking::Client::builder()
    .timeout(Duration::from_millis(DOWNLOAD_TIMEOUT_MS))
    .build()?;
  let resp = client.get(url).send()?.error_for_status()?;
  Ok(resp.text()?)
}

/// Reduces the SPDX license list to `{id: name}`, dropping deprecated ids.
pub fn restructure(body: &str) -> Result<LicenseNames> {
  let list: LicenseList = serde_json::from_str(body).context("Failed to parse the SPDX license list")?;

  let names = list
    .licenses
    .into_iter()
    .filter(|entry| !entry.is_deprecated_license_id)
    .map(|entry| (entry.license_id, entry.name))
    .collect();

  Ok(LicenseNames { names })
}

fn write_cache(path: &Path, names: &LicenseNames) -> Result<()> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  let json = serde_json::to_string_pretty(&names.names)?;
  FileIO::write_atomic(path, &json)
}

/// Loads the license names, or logs a warning and returns `None` when they
/// cannot be obtained.
pub fn license_names() -> Option<LicenseNames> {
  match LicenseNames::load_or_download() {
    Ok(names) => Some(names),
    Err(e) => {
      warn!("Could not load SPDX license names, skipping LICENSE content check: {:#}", e);
      None
    }
  }
}
