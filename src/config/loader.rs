//! Configuration loading and discovery for `sassbuild.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{
    BuildConfig, MinifyConfig, OutputStyle, ProjectConfig, SassBuildConfig, SassConfig,
};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "sassbuild.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse sassbuild.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Replace the source glob patterns
    pub sources: Option<Vec<String>>,
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Include paths appended after the configured ones
    pub include_paths: Vec<PathBuf>,
    /// Override compiler output style
    pub style: Option<OutputStyle>,
    /// Enable or disable minification
    pub minify: Option<bool>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
    /// Treat compile errors as fatal
    pub strict: Option<bool>,
}

/// Find sassbuild.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if a sassbuild.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    find_config_from(cwd)
}

/// Find sassbuild.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a sassbuild.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns a default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("site/sassbuild.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<SassBuildConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<SassBuildConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: SassBuildConfig = toml::from_str(&contents)?;
    check(&config)?;
    Ok(config)
}

/// Run validation and fold the errors into a `ConfigError`.
pub fn check(config: &SassBuildConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Create a default configuration when no sassbuild.toml is found.
///
/// Compiles `static/sass/*.scss` into `static/css`, resolving imports from
/// `node_modules`. The project name is the current directory name.
pub fn default_config() -> SassBuildConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unnamed".to_string());

    SassBuildConfig {
        project: ProjectConfig { name: project_name },
        sass: SassConfig::default(),
        minify: MinifyConfig::default(),
        build: BuildConfig::default(),
        tasks: BTreeMap::new(),
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. Include paths
/// given on the command line are appended, never replacing the configured ones.
pub fn merge_cli_overrides(config: &mut SassBuildConfig, overrides: &CliOverrides) {
    if let Some(ref sources) = overrides.sources {
        if !sources.is_empty() {
            config.sass.sources = sources.clone();
        }
    }

    if let Some(ref out) = overrides.out {
        config.sass.out = out.clone();
    }

    for path in &overrides.include_paths {
        if !config.sass.include_paths.contains(path) {
            config.sass.include_paths.push(path.clone());
        }
    }

    if let Some(style) = overrides.style {
        config.sass.style = style;
    }

    if let Some(minify) = overrides.minify {
        config.minify.enabled = minify;
    }

    if let Some(jobs) = overrides.jobs {
        config.build.jobs = jobs;
    }

    if let Some(strict) = overrides.strict {
        config.build.strict = strict;
    }
}

/// Get the project root directory from a config file path.
///
/// Returns the parent directory of the sassbuild.toml file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}
