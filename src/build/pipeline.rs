//! Build pipeline orchestration.
//!
//! The pipeline runs every entry stylesheet through compile, minify and write.
//! A failure in one file is recorded in its [`FileResult`] and never stops the
//! other files.

use crate::build::{
    create_build_plan, BuildContext, BuildPlan, BuildResult, BuildTarget, DiscoveryError,
    FileResult, Stage,
};
use crate::compile::SassCompiler;
use crate::config::DEFAULT_INCLUDE_PATH;
use crate::minify::CssMinifier;
use crate::output::write_artifact;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Error that aborts a whole build run.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Discovery error
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
    /// A configured include path is not a directory
    #[error("Include path {} is not a directory", .0.display())]
    IncludePath(PathBuf),
    /// The destination directory could not be created
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        /// Destination directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The worker pool could not be started
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Build pipeline for executing builds.
pub struct BuildPipeline {
    /// Build context
    context: BuildContext,
    /// Compiler step
    compiler: SassCompiler,
    /// Minifier step
    minifier: CssMinifier,
    /// Whether to do a dry run (don't write anything)
    dry_run: bool,
    /// Number of worker threads
    jobs: usize,
}

impl BuildPipeline {
    /// Create a new build pipeline with stages configured from the context.
    pub fn new(context: BuildContext) -> Self {
        let compiler = context.compiler();
        let minifier = context.minifier();
        let jobs = context.jobs();
        Self { context, compiler, minifier, dry_run: false, jobs }
    }

    /// Set dry-run mode (don't actually write).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the number of worker threads.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Run the build pipeline.
    ///
    /// Discovers sources, creates a build plan, and executes it.
    pub fn run(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let plan = create_build_plan(&self.context)?;
        let result = self.execute_plan(&plan)?;
        Ok(result.with_duration(start.elapsed()))
    }

    fn execute_plan(&self, plan: &BuildPlan) -> Result<BuildResult, BuildError> {
        let mut result = BuildResult::new();
        result.dry_run = self.dry_run;

        if plan.is_empty() {
            info!("no stylesheets matched {:?}", self.context.source_patterns());
            return Ok(result);
        }

        self.check_include_paths()?;
        info!(files = plan.len(), jobs = self.jobs, "compiling stylesheets");

        if !self.dry_run {
            let out_dir = self.context.out_dir();
            fs::create_dir_all(&out_dir)
                .map_err(|source| BuildError::OutputDir { path: out_dir, source })?;
        }

        let files: Vec<FileResult> = if self.jobs > 1 && plan.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build()?;
            pool.install(|| plan.targets().par_iter().map(|t| self.process_file(t)).collect())
        } else {
            plan.targets().iter().map(|t| self.process_file(t)).collect()
        };

        for file in files {
            result.add_result(file);
        }

        Ok(result)
    }

    /// Every configured include path must be a directory, except the stock
    /// `node_modules`, which many projects never install.
    fn check_include_paths(&self) -> Result<(), BuildError> {
        for configured in &self.context.config().sass.include_paths {
            let path = self.context.resolve_path(configured);
            if path.is_dir() {
                continue;
            }
            if configured.as_path() == Path::new(DEFAULT_INCLUDE_PATH) {
                warn!(path = %path.display(), "include path not found, skipping");
                continue;
            }
            return Err(BuildError::IncludePath(path));
        }
        Ok(())
    }

    /// Run one stylesheet through compile, minify and write.
    pub fn process_file(&self, target: &BuildTarget) -> FileResult {
        let start = Instant::now();
        let source = target.source.clone();
        let output = target.output.clone();

        if self.dry_run {
            info!(file = %source.display(), output = %output.display(), "would write");
            return FileResult::skipped(source, output);
        }

        let fail = |stage: Stage, message: String| {
            error!(file = %target.source.display(), %stage, "{}", message);
            FileResult::failed(
                target.source.clone(),
                target.output.clone(),
                stage,
                message,
                start.elapsed(),
            )
        };

        let compiled = match self.compiler.compile(&source) {
            Ok(compiled) => compiled,
            Err(e) => return fail(Stage::Compile, e.to_string()),
        };

        let minified = match self.minifier.minify(compiled) {
            Ok(minified) => minified,
            Err(e) => return fail(Stage::Minify, e.to_string()),
        };

        if let Err(e) = write_artifact(&output, &minified.css) {
            return fail(Stage::Write, e.to_string());
        }

        let bytes = minified.css.len();
        debug!(file = %source.display(), output = %output.display(), bytes, "wrote artifact");
        FileResult::written(source, output, bytes, start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::FileStatus;
    use crate::config::default_config;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("node_modules")).unwrap();
        for (name, content) in files {
            let path = temp.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp
    }

    fn pipeline(temp: &TempDir) -> BuildPipeline {
        BuildPipeline::new(BuildContext::new(default_config(), temp.path().to_path_buf()))
    }

    #[test]
    fn test_pipeline_writes_minified_artifact() {
        let temp = project(&[("static/sass/a.scss", "$c: red;\n.x {\n  color: $c;\n}\n")]);

        let result = pipeline(&temp).run().unwrap();

        assert_eq!(result.written_count(), 1);
        let css = fs::read_to_string(temp.path().join("static/css/a.css")).unwrap();
        assert_eq!(css, ".x{color:red}");
    }

    #[test]
    fn test_pipeline_isolates_compile_failure() {
        let temp = project(&[
            ("static/sass/a.scss", "$c: red; .x { color: $c; }"),
            ("static/sass/b.scss", ".y { color: }"),
        ]);

        let result = pipeline(&temp).run().unwrap();

        assert_eq!(result.written_count(), 1);
        assert_eq!(result.compile_failures(), 1);
        assert!(result.exit_ok(false));
        assert_eq!(result.files[1].status.failed_stage(), Some(Stage::Compile));
        assert!(!temp.path().join("static/css/b.css").exists());
    }

    #[test]
    fn test_pipeline_missing_include_path_is_fatal() {
        let temp = project(&[("static/sass/a.scss", ".x { color: red; }")]);
        let mut config = default_config();
        config.sass.include_paths.push(PathBuf::from("vendor"));

        let ctx = BuildContext::new(config, temp.path().to_path_buf());
        let err = BuildPipeline::new(ctx).run().unwrap_err();
        assert!(matches!(err, BuildError::IncludePath(ref p) if p.ends_with("vendor")));
        assert!(!temp.path().join("static/css").exists());
    }

    #[test]
    fn test_pipeline_missing_node_modules_is_skipped() {
        let temp = project(&[("static/sass/a.scss", ".x { color: red; }")]);
        fs::remove_dir(temp.path().join("node_modules")).unwrap();

        let result = pipeline(&temp).run().unwrap();
        assert_eq!(result.written_count(), 1);
    }

    #[test]
    fn test_pipeline_empty_run_ignores_include_paths() {
        let temp = TempDir::new().unwrap();
        let mut config = default_config();
        config.sass.include_paths.push(PathBuf::from("vendor"));

        let ctx = BuildContext::new(config, temp.path().to_path_buf());
        let result = BuildPipeline::new(ctx).run().unwrap();
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_pipeline_empty_run_creates_nothing() {
        let temp = project(&[]);

        let result = pipeline(&temp).run().unwrap();
        assert!(result.files.is_empty());
        assert!(result.is_success());
        assert!(!temp.path().join("static/css").exists());
    }

    #[test]
    fn test_pipeline_dry_run_writes_nothing() {
        let temp = project(&[("static/sass/a.scss", ".x { color: red; }")]);

        let result = pipeline(&temp).with_dry_run(true).run().unwrap();

        assert!(result.dry_run);
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].status, FileStatus::Skipped);
        assert_eq!(result.files[0].output, temp.path().join("static/css/a.css"));
        assert!(!temp.path().join("static/css").exists());
    }

    #[test]
    fn test_pipeline_output_dir_blocked_by_file() {
        let temp = project(&[("static/sass/a.scss", ".x { color: red; }")]);
        fs::write(temp.path().join("static/css"), "not a directory").unwrap();

        let err = pipeline(&temp).run().unwrap_err();
        assert!(matches!(err, BuildError::OutputDir { .. }));
    }

    #[test]
    fn test_pipeline_parallel_matches_sequential() {
        let files: Vec<(String, String)> = (0..8)
            .map(|i| (format!("static/sass/f{}.scss", i), format!(".c{} {{ width: {}px; }}", i, i)))
            .collect();
        let refs: Vec<(&str, &str)> = files.iter().map(|(n, c)| (n.as_str(), c.as_str())).collect();
        let temp = project(&refs);

        let sequential = pipeline(&temp).run().unwrap();
        let parallel = pipeline(&temp).with_jobs(4).run().unwrap();

        let order = |r: &BuildResult| r.files.iter().map(|f| f.source.clone()).collect::<Vec<_>>();
        assert_eq!(order(&sequential), order(&parallel));
        assert_eq!(parallel.written_count(), 8);
    }
}
