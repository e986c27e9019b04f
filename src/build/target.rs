//! Build target definitions.
//!
//! A target pairs one entry stylesheet with the artifact it produces.

use std::path::PathBuf;

/// One stylesheet to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Artifact name without extension (the source file stem)
    pub name: String,
    /// Entry stylesheet
    pub source: PathBuf,
    /// Destination artifact
    pub output: PathBuf,
}

impl BuildTarget {
    /// Create a new target.
    pub fn new(name: impl Into<String>, source: PathBuf, output: PathBuf) -> Self {
        Self { name: name.into(), source, output }
    }
}

/// The targets of one run, in discovery order.
#[derive(Debug, Default, Clone)]
pub struct BuildPlan {
    targets: Vec<BuildTarget>,
}

impl BuildPlan {
    /// Create a new empty build plan.
    pub fn new() -> Self {
        Self { targets: vec![] }
    }

    /// Add a target to the plan.
    pub fn add_target(&mut self, target: BuildTarget) {
        self.targets.push(target);
    }

    /// Get all targets in the plan.
    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }

    /// Get the number of targets in the plan.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
