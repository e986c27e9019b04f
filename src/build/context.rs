//! Build context containing configuration and state for a build.

use crate::compile::SassCompiler;
use crate::config::SassBuildConfig;
use crate::minify::CssMinifier;
use std::path::{Path, PathBuf};

/// Build context containing configuration and paths for a build operation.
///
/// All relative paths in the configuration resolve against the project root,
/// which is the directory holding `sassbuild.toml` (or the working directory
/// when running on defaults).
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: SassBuildConfig,
    /// Project root directory
    project_root: PathBuf,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(config: SassBuildConfig, project_root: PathBuf) -> Self {
        Self { config, project_root }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SassBuildConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Source glob patterns.
    pub fn source_patterns(&self) -> &[String] {
        &self.config.sass.sources
    }

    /// Destination directory (resolved to absolute path).
    pub fn out_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.sass.out)
    }

    /// Include paths (resolved), in search order.
    pub fn include_paths(&self) -> Vec<PathBuf> {
        self.config.sass.include_paths.iter().map(|p| self.resolve_path(p)).collect()
    }

    /// Number of worker threads.
    pub fn jobs(&self) -> usize {
        self.config.build.jobs.max(1)
    }

    /// Whether strict mode is enabled.
    pub fn is_strict(&self) -> bool {
        self.config.build.strict
    }

    /// Compiler configured from `[sass]`.
    pub fn compiler(&self) -> SassCompiler {
        SassCompiler::new(self.include_paths())
            .with_style(self.config.sass.style)
            .with_quiet(self.config.sass.quiet)
    }

    /// Minifier configured from `[minify]`.
    pub fn minifier(&self) -> CssMinifier {
        CssMinifier::new().with_enabled(self.config.minify.enabled)
    }

    /// Resolve a path relative to the project root.
    ///
    /// If the path is absolute, returns it unchanged.
    /// If relative, joins it with the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}
