//! # compliance-hooks
//!
//! Pre-commit hooks that keep license headers and project metadata compliant.

use std::process::ExitCode;

fn main() -> ExitCode {
  compliance_hooks::cli::run()
}
