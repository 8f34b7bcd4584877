//! # Logging Module
//!
//! This module provides logging utilities for the compliance hooks, including:
//! - Verbose logging that can be enabled/disabled
//! - Standard info logging with color support
//! - The `tracing` subscriber used for structured diagnostics
//!
//! Verbose logs go to stderr. Info logs go to stdout, which is what pre-commit
//! prints back to the user when a hook fails.
//!
//! ## Example
//!
//! ```rust
//! use compliance_hooks::logging::{ColorMode, set_verbose};
//! use compliance_hooks::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! verbose_log!("Processing file: {}", "example.py");
//! info_log!("Successfully changed header of {}", "example.py");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Logs a message to stderr if verbose mode is enabled.
///
/// Uses the same format string syntax as [`eprintln!`].
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Logs a message to stdout unless quiet mode is enabled.
///
/// Uses the same format string syntax as [`println!`].
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

/// Prints an info message, colored when the terminal supports it.
///
/// Used by the [`info_log!`](crate::info_log) macro.
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
