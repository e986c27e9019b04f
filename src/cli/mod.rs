//! Command-line interface implementation
//!
//! This module provides the CLI entry point. Positional arguments name tasks
//! from the task graph; flags override `sassbuild.toml`.

mod build;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{CliOverrides, OutputStyle};
use crate::tasks::TaskGraph;

pub use build::run_build;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// sassbuild - Compile SASS stylesheets into minified CSS
#[derive(Parser, Debug)]
#[command(name = "sassbuild")]
#[command(about = "Compile SASS stylesheets into minified CSS")]
#[command(version)]
pub struct Cli {
    /// Tasks to run (default: "default", which runs "sass")
    pub tasks: Vec<String>,

    /// Path to sassbuild.toml (default: search upward from the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source glob, relative to the project root (repeatable; replaces [sass].sources)
    #[arg(long = "src", value_name = "GLOB")]
    pub sources: Vec<String>,

    /// Destination directory
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Extra include path searched for imports (repeatable)
    #[arg(short = 'I', long = "include-path", value_name = "DIR")]
    pub include_paths: Vec<PathBuf>,

    /// Compiler output style
    #[arg(long, value_parser = parse_style)]
    pub style: Option<OutputStyle>,

    /// Write compiled CSS without minifying it
    #[arg(long)]
    pub no_minify: bool,

    /// Number of stylesheets compiled in parallel
    #[arg(short, long, value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Exit with an error when any stylesheet fails to compile
    #[arg(long)]
    pub strict: bool,

    /// Show what would be written without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the build report as JSON
    #[arg(long)]
    pub json: bool,

    /// List available tasks and exit
    #[arg(short, long)]
    pub list: bool,

    /// Show debug output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_style(s: &str) -> Result<OutputStyle, String> {
    s.parse()
}

fn parse_jobs(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    /// Config overrides carried by the flags.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            sources: if self.sources.is_empty() { None } else { Some(self.sources.clone()) },
            out: self.out.clone(),
            include_paths: self.include_paths.clone(),
            style: self.style,
            minify: if self.no_minify { Some(false) } else { None },
            jobs: self.jobs,
            strict: if self.strict { Some(true) } else { None },
        }
    }
}

/// Format the task listing printed by `--list`.
pub fn format_task_list(graph: &TaskGraph) -> String {
    let mut lines = vec!["Tasks:".to_string()];
    for task in graph.tasks() {
        if task.dependencies.is_empty() {
            lines.push(format!("  {:<12} {}", task.name, task.kind));
        } else {
            lines.push(format!(
                "  {:<12} {} -> {}",
                task.name,
                task.kind,
                task.dependencies.join(", ")
            ));
        }
    }
    lines.join("\n")
}

/// Main entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);
    run_build(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        let cli = Cli::try_parse_from(["sassbuild"]).unwrap();
        assert!(cli.tasks.is_empty());
        assert!(!cli.strict);
        assert!(cli.jobs.is_none());
    }

    #[test]
    fn test_parse_tasks_and_flags() {
        let cli = Cli::try_parse_from([
            "sassbuild",
            "sass",
            "--src",
            "a/*.scss",
            "--src",
            "b/*.scss",
            "-I",
            "vendor",
            "-o",
            "dist",
            "--style",
            "compressed",
            "--no-minify",
            "-j",
            "4",
            "--strict",
        ])
        .unwrap();

        assert_eq!(cli.tasks, vec!["sass"]);
        assert_eq!(cli.sources, vec!["a/*.scss", "b/*.scss"]);
        assert_eq!(cli.include_paths, vec![PathBuf::from("vendor")]);
        assert_eq!(cli.style, Some(OutputStyle::Compressed));

        let overrides = cli.overrides();
        assert_eq!(overrides.out, Some(PathBuf::from("dist")));
        assert_eq!(overrides.minify, Some(false));
        assert_eq!(overrides.jobs, Some(4));
        assert_eq!(overrides.strict, Some(true));
    }

    #[test]
    fn test_overrides_empty_by_default() {
        let overrides = Cli::try_parse_from(["sassbuild"]).unwrap().overrides();
        assert!(overrides.sources.is_none());
        assert!(overrides.minify.is_none());
        assert!(overrides.strict.is_none());
        assert!(overrides.include_paths.is_empty());
    }

    #[test]
    fn test_parse_rejects_zero_jobs() {
        assert!(Cli::try_parse_from(["sassbuild", "-j", "0"]).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_style() {
        assert!(Cli::try_parse_from(["sassbuild", "--style", "nested"]).is_err());
    }

    #[test]
    fn test_format_task_list() {
        let listing = format_task_list(&TaskGraph::new());
        assert!(listing.contains("sass"));
        assert!(listing.contains("default"));
        assert!(listing.contains("alias -> sass"));
    }
}
