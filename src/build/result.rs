//! Build result types.
//!
//! Contains types for representing the outcome of a build run, one entry per
//! entry stylesheet, plus the run-level summary and JSON report.

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pipeline stage a file failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// SASS compilation
    Compile,
    /// CSS minification
    Minify,
    /// Artifact write
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Compile => write!(f, "compile"),
            Stage::Minify => write!(f, "minify"),
            Stage::Write => write!(f, "write"),
        }
    }
}

/// Terminal state of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    /// Artifact written
    Written,
    /// Nothing written (dry run)
    Skipped,
    /// Failed in the given stage; nothing written
    Failed {
        /// Stage that failed
        stage: Stage,
        /// Diagnostic
        message: String,
    },
}

impl FileStatus {
    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, FileStatus::Failed { .. })
    }

    /// The failed stage, if any.
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            FileStatus::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Written => write!(f, "written"),
            FileStatus::Skipped => write!(f, "skipped"),
            FileStatus::Failed { stage, message } => write!(f, "{} failed: {}", stage, message),
        }
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Result of processing one entry stylesheet.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    /// Entry stylesheet
    pub source: PathBuf,
    /// Destination artifact (planned or written)
    pub output: PathBuf,
    /// Terminal state
    #[serde(flatten)]
    pub status: FileStatus,
    /// Bytes written, when the artifact was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    /// Time spent on this file
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl FileResult {
    /// Create a result for a written artifact.
    pub fn written(source: PathBuf, output: PathBuf, bytes: usize, duration: Duration) -> Self {
        Self { source, output, status: FileStatus::Written, bytes: Some(bytes), duration }
    }

    /// Create a skipped result.
    pub fn skipped(source: PathBuf, output: PathBuf) -> Self {
        Self { source, output, status: FileStatus::Skipped, bytes: None, duration: Duration::ZERO }
    }

    /// Create a failed result.
    pub fn failed(
        source: PathBuf,
        output: PathBuf,
        stage: Stage,
        message: String,
        duration: Duration,
    ) -> Self {
        Self { source, output, status: FileStatus::Failed { stage, message }, bytes: None, duration }
    }

    /// Check if this result is a failure.
    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }
}

/// Result of a complete build run.
#[derive(Debug, Default, Serialize)]
pub struct BuildResult {
    /// Results for each file, in discovery order
    pub files: Vec<FileResult>,
    /// Nothing was written
    pub dry_run: bool,
    /// Total build duration
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub total_duration: Duration,
}

impl BuildResult {
    /// Create a new empty build result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file result.
    pub fn add_result(&mut self, result: FileResult) {
        self.files.push(result);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    /// Number of artifacts written.
    pub fn written_count(&self) -> usize {
        self.files.iter().filter(|r| r.status == FileStatus::Written).count()
    }

    /// Number of files skipped.
    pub fn skipped_count(&self) -> usize {
        self.files.iter().filter(|r| r.status == FileStatus::Skipped).count()
    }

    /// Number of failed files, any stage.
    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|r| r.is_failure()).count()
    }

    /// Number of files that failed to compile.
    pub fn compile_failures(&self) -> usize {
        self.count_stage(Stage::Compile)
    }

    /// Number of files that compiled but could not be minified or written.
    pub fn output_failures(&self) -> usize {
        self.count_stage(Stage::Minify) + self.count_stage(Stage::Write)
    }

    fn count_stage(&self, stage: Stage) -> usize {
        self.files.iter().filter(|r| r.status.failed_stage() == Some(stage)).count()
    }

    /// Check if every file succeeded.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Whether the run should exit successfully.
    ///
    /// Compile errors only count when `strict` is set; minify and write
    /// failures always count.
    pub fn exit_ok(&self, strict: bool) -> bool {
        self.output_failures() == 0 && (!strict || self.compile_failures() == 0)
    }

    /// Get failed file results.
    pub fn failures(&self) -> Vec<&FileResult> {
        self.files.iter().filter(|r| r.is_failure()).collect()
    }

    /// Artifacts written (or planned, for a dry run).
    pub fn outputs(&self) -> Vec<&Path> {
        self.files.iter().filter(|r| !r.is_failure()).map(|r| r.output.as_path()).collect()
    }

    /// Format a summary of the build result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        let total = self.files.len();

        if self.dry_run {
            lines.push(format!("Dry run: {} stylesheet(s) would be written", total));
            for file in &self.files {
                lines.push(format!("  {} -> {}", file.source.display(), file.output.display()));
            }
            return lines.join("\n");
        }

        let written = self.written_count();
        let failed = self.failed_count();

        if failed > 0 {
            lines.push(format!(
                "Build finished with errors: {} written, {} failed ({} total) in {:?}",
                written, failed, total, self.total_duration
            ));
            for file in self.failures() {
                lines.push(format!("  - {}: {}", file.source.display(), file.status));
            }
        } else {
            lines.push(format!(
                "Build succeeded: {} written ({} total) in {:?}",
                written, total, self.total_duration
            ));
        }

        lines.join("\n")
    }

    /// Render the result as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
