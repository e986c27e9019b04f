//! Configuration schema types for `sassbuild.toml`
//!
//! Defines the structure and validation rules for a stylesheet build project.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::tasks::TaskGraph;

/// Include path used when `[sass].include_paths` is not set. Optional: a
/// project without it still builds.
pub const DEFAULT_INCLUDE_PATH: &str = "node_modules";

/// Output style handed to the SASS compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// One declaration per line, nested blocks indented
    #[default]
    Expanded,
    /// As little whitespace as the compiler can manage
    Compressed,
}

impl std::fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputStyle::Expanded => write!(f, "expanded"),
            OutputStyle::Compressed => write!(f, "compressed"),
        }
    }
}

impl std::str::FromStr for OutputStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "expanded" => Ok(OutputStyle::Expanded),
            "compressed" => Ok(OutputStyle::Compressed),
            other => Err(format!("unknown output style '{}', expected expanded or compressed", other)),
        }
    }
}

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
}

/// Stylesheet compilation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SassConfig {
    /// Glob patterns selecting entry stylesheets, relative to the project root
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    /// Directories searched when resolving `@import`/`@use`
    #[serde(default = "default_include_paths")]
    pub include_paths: Vec<PathBuf>,
    /// Destination directory for compiled CSS
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// Compiler output style (before minification)
    #[serde(default)]
    pub style: OutputStyle,
    /// Silence `@warn` and `@debug` output from stylesheets
    #[serde(default)]
    pub quiet: bool,
}

fn default_sources() -> Vec<String> {
    vec!["static/sass/*.scss".to_string()]
}

fn default_include_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(DEFAULT_INCLUDE_PATH)]
}

fn default_out() -> PathBuf {
    PathBuf::from("static/css")
}

impl Default for SassConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            include_paths: default_include_paths(),
            out: default_out(),
            style: OutputStyle::default(),
            quiet: false,
        }
    }
}

/// Minifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinifyConfig {
    /// Run compiled CSS through the minifier
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Build execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Number of worker threads (1 = sequential)
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    /// Treat compile errors as a failed run
    #[serde(default)]
    pub strict: bool,
}

fn default_jobs() -> usize {
    1
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { jobs: default_jobs(), strict: false }
    }
}

/// Complete sassbuild.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SassBuildConfig {
    /// Project metadata (required)
    pub project: ProjectConfig,
    /// Compilation settings
    #[serde(default)]
    pub sass: SassConfig,
    /// Minifier settings
    #[serde(default)]
    pub minify: MinifyConfig,
    /// Execution settings
    #[serde(default)]
    pub build: BuildConfig,
    /// Task aliases, each naming the tasks it runs
    #[serde(default)]
    pub tasks: BTreeMap<String, Vec<String>>,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "sass.sources")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sassbuild.toml: '{}' {}", self.field, self.message)
    }
}

impl SassBuildConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.name.is_empty() {
            errors.push(ConfigValidationError {
                field: "project.name".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        if self.sass.sources.is_empty() {
            errors.push(ConfigValidationError {
                field: "sass.sources".to_string(),
                message: "must contain at least one glob pattern".to_string(),
            });
        }

        for (i, pattern) in self.sass.sources.iter().enumerate() {
            if pattern.trim().is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("sass.sources[{}]", i),
                    message: "must not be empty".to_string(),
                });
            } else if let Err(e) = glob::Pattern::new(pattern) {
                errors.push(ConfigValidationError {
                    field: format!("sass.sources[{}]", i),
                    message: format!("is not a valid glob pattern: {}", e),
                });
            }
        }

        if self.sass.out.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "sass.out".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        if self.build.jobs == 0 {
            errors.push(ConfigValidationError {
                field: "build.jobs".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if let Err(e) = TaskGraph::with_aliases(&self.tasks) {
            errors.push(ConfigValidationError { field: "tasks".to_string(), message: e.to_string() });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
