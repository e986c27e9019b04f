//! Sassbuild - Command-line tool for compiling SASS stylesheets into minified CSS

use std::process::ExitCode;

use sassbuild::cli;

fn main() -> ExitCode {
    cli::run()
}
