//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing; each pre-commit hook is a subcommand.

mod add_license_headers;
mod tech_review;

use std::process::ExitCode;

pub use add_license_headers::{AddLicenseHeadersArgs, run_add_license_headers};
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Args, Parser, Subcommand};
pub use tech_review::{TechReviewArgs, run_tech_review};

use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output;

/// Nothing to do.
pub const EXIT_OK: u8 = 0;
/// Files were changed, a check failed, or a file could not be processed.
pub const EXIT_CHANGED: u8 = 1;
/// Invalid input.
pub const EXIT_USAGE: u8 = 2;

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Add or update license headers on the given files
  compliance-hooks add-license-headers src/main.py tests/test_main.py

  # Use a custom copyright holder and start year
  compliance-hooks add-license-headers --custom_copyright \"Acme Corp.\" --start_year 2021 src/

  # Check the project layout and metadata
  compliance-hooks tech-review --product Example
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,

  #[command(flatten)]
  pub output: OutputArgs,
}

/// Output options shared by every hook.
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Suppress all output except errors and failed checks
  #[arg(short, long, conflicts_with = "verbose", global = true)]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum,
    global = true
  )]
  pub colors: ColorMode,
}

impl OutputArgs {
  /// Installs tracing and the global output mode.
  pub fn apply(&self) {
    init_tracing(self.quiet, self.verbose);

    if self.verbose > 0 {
      set_verbose();
    } else if self.quiet {
      set_quiet();
    }
    self.colors.apply();
  }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Add or update license headers and keep the LICENSE year current
  AddLicenseHeaders(AddLicenseHeadersArgs),
  /// Check the repository for required files, directories and metadata
  TechReview(TechReviewArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

/// Parses the command line, runs the selected hook and maps the result to the
/// process exit code.
pub fn run() -> ExitCode {
  let cli = Cli::parse_args();
  cli.output.apply();

  let result = match cli.command {
    Command::AddLicenseHeaders(args) => run_add_license_headers(args),
    Command::TechReview(args) => run_tech_review(args),
  };

  match result {
    Ok(code) => ExitCode::from(code),
    Err(e) => {
      output::print_error(&format!("{:#}", e));
      ExitCode::from(EXIT_CHANGED)
    }
  }
}

/// Current calendar year in local time.
pub(crate) fn current_year() -> i32 {
  use chrono::Datelike;

  chrono::Local::now().year()
}
