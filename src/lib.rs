//! # compliance-hooks
//!
//! Pre-commit hooks that enforce compliance policy on source repositories.
//!
//! * `add-license-headers` adds or updates SPDX license headers on the files
//!   pre-commit passes in, and keeps the year span of the top-level `LICENSE`
//!   file current.
//! * `tech-review` checks the project for required community files,
//!   directories and packaging metadata, generating what is missing.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use compliance_hooks::config::{HeaderOverrides, HookConfig};
//! use compliance_hooks::processor::Processor;
//! use compliance_hooks::reuse::ReuseScanner;
//! use compliance_hooks::templates::load_header_template;
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = PathBuf::from(".");
//!     let config = HookConfig::resolve(root.clone(), HeaderOverrides::default(), None, 2025)?;
//!     let template = load_header_template(&root, &config.template)?;
//!
//!     let processor = Processor::new(config, ReuseScanner::default(), Some(template));
//!     let changed = processor.process_files(&[PathBuf::from("src/main.py")])?;
//!
//!     if changed {
//!         println!("Some headers were added or updated");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - Walks the candidate files and inserts or updates headers
//! * [`reuse`] - Reuse-info detection, comment styles and header annotation
//! * [`years`] - Copyright year spans
//! * [`review`] - The tech-review checklist

pub mod assets;
pub mod cli;
pub mod config;
pub mod diff;
pub mod git;
pub mod license_file;
pub mod logging;
pub mod output;
pub mod processor;
pub mod reconcile;
pub mod review;
pub mod reuse;
pub mod templates;
pub mod workspace;
pub mod years;
