//! # License File Module
//!
//! Keeps the copyright year span of the repository's top-level `LICENSE` file
//! current.

use std::path::Path;

use anyhow::Result;

use crate::assets::LICENSE_TEMPLATE;
use crate::config::DEFAULT_LICENSE;
use crate::output;
use crate::processor::FileIO;
use crate::templates::{Context, Template};
use crate::verbose_log;
use crate::years::{YearSpan, extract_year_span, rewrite_first_span};

/// Brings the year span in `{repo_root}/LICENSE` up to date.
///
/// Only the default license is handled, and only when the file exists. The
/// span already in the file is widened to cover `start_year` and
/// `current_year`; a LICENSE without any year is regenerated from the bundled
/// template. Returns whether the file changed.
pub fn sync(repo_root: &Path, start_year: i32, current_year: i32, license: &str, copyright: &str) -> Result<bool> {
  if license != DEFAULT_LICENSE {
    verbose_log!("Not updating LICENSE for license {}", license);
    return Ok(false);
  }

  let path = repo_root.join("LICENSE");
  if !path.is_file() {
    verbose_log!("No LICENSE file in {}", repo_root.display());
    return Ok(false);
  }

  let snapshot = FileIO::read_full_content(&path)?;

  let changed = match extract_year_span(&snapshot) {
    Some(existing) => rewrite_first_span(&path, existing.widen(start_year, current_year))?,
    None => {
      let span = YearSpan::new(start_year, current_year);
      let regenerated = Template::from_source("LICENSE", LICENSE_TEMPLATE).render(
        &Context::new()
          .insert("year_span", span.to_string())
          .insert("copyright", copyright),
      )?;
      if regenerated != snapshot {
        FileIO::write_atomic(&path, &regenerated)?;
      }
      regenerated != snapshot
    }
  };

  if changed {
    output::print_license_year_updated(&path);
  }
  Ok(changed)
}
