//! Source file discovery for the build system.
//!
//! Finds entry stylesheets matching the configured glob patterns and pairs
//! each with its destination artifact.

use crate::build::{BuildContext, BuildPlan, BuildTarget};
use crate::output::{output_path, OutputError};
use glob::glob;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Error during source discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Invalid glob pattern
    #[error("Invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, #[source] glob::PatternError),
    /// Two sources would write the same artifact
    #[error("{} and {} would both write {}", first.display(), second.display(), output.display())]
    DuplicateOutput {
        /// Source discovered first
        first: PathBuf,
        /// Source discovered second
        second: PathBuf,
        /// Shared artifact path
        output: PathBuf,
    },
    /// A source could not be named
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Check if a path is a stylesheet the compiler accepts.
pub fn is_stylesheet(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("scss") | Some("sass"))
}

/// Check if a path is a partial (`_name.scss`), which is import-only.
pub fn is_partial(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with('_'))
}

/// Discover entry stylesheets matching a glob pattern.
///
/// # Arguments
/// - `base_dir` - Base directory to resolve relative patterns from
/// - `pattern` - Glob pattern to match
///
/// # Returns
/// Matching non-partial stylesheet paths, sorted.
pub fn discover_files(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let full_pattern = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let base = glob::Pattern::escape(&base_dir.to_string_lossy());
        format!("{}/{}", base.trim_end_matches('/'), pattern)
    };

    let paths =
        glob(&full_pattern).map_err(|e| DiscoveryError::InvalidPattern(pattern.to_string(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() && is_stylesheet(&path) && !is_partial(&path) {
                    files.push(path);
                }
            }
            Err(e) => {
                warn!(path = %e.path().display(), "skipping unreadable path: {}", e.error());
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Discover all entry stylesheets from the configured patterns.
///
/// Returns a sorted, deduplicated list.
pub fn discover_sources(ctx: &BuildContext) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut all_files = BTreeSet::new();

    for pattern in ctx.source_patterns() {
        let files = discover_files(ctx.project_root(), pattern)?;
        if files.is_empty() {
            debug!(pattern = %pattern, "pattern matched no stylesheets");
        }
        all_files.extend(files);
    }

    Ok(all_files.into_iter().collect())
}

/// Create a build plan from the configuration and discovered sources.
///
/// Fails if two sources share a file stem, since both would write the same
/// artifact.
pub fn create_build_plan(ctx: &BuildContext) -> Result<BuildPlan, DiscoveryError> {
    let out_dir = ctx.out_dir();
    let mut plan = BuildPlan::new();
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

    for source in discover_sources(ctx)? {
        let output = output_path(&out_dir, &source)?;

        if let Some(first) = claimed.get(&output) {
            return Err(DiscoveryError::DuplicateOutput {
                first: first.clone(),
                second: source,
                output,
            });
        }
        claimed.insert(output.clone(), source.clone());

        let name = source.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        plan.add_target(BuildTarget::new(name, source, output));
    }

    Ok(plan)
}
