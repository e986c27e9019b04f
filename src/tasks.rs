//! Named build tasks.
//!
//! A task is either the stylesheet build itself or an alias that runs other
//! tasks. The built-in graph has two entries: `sass`, and `default` which
//! depends on `sass`. Projects can add aliases through the `[tasks]` table.

use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Name of the stylesheet build task
pub const SASS_TASK: &str = "sass";

/// Name of the task run when none is requested
pub const DEFAULT_TASK: &str = "default";

/// What running a task does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Compile, minify and write every source stylesheet
    Sass,
    /// Runs its dependencies and nothing else
    Alias,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::Sass => write!(f, "sass"),
            TaskKind::Alias => write!(f, "alias"),
        }
    }
}

/// A named node in the task graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task name as typed on the command line
    pub name: String,
    /// What the task does when run
    pub kind: TaskKind,
    /// Tasks that must run first
    pub dependencies: Vec<String>,
}

impl Task {
    /// The stylesheet build task.
    pub fn sass() -> Self {
        Self { name: SASS_TASK.to_string(), kind: TaskKind::Sass, dependencies: vec![] }
    }

    /// An alias running `dependencies` in order.
    pub fn alias(name: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self { name: name.into(), kind: TaskKind::Alias, dependencies }
    }
}

/// Error while building or resolving the task graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Requested task does not exist
    #[error("Unknown task '{0}'")]
    Unknown(String),
    /// A task depends on a task that does not exist
    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency {
        /// Task declaring the dependency
        task: String,
        /// Missing dependency
        dependency: String,
    },
    /// A built-in action was redefined as an alias
    #[error("Task '{0}' is built in and cannot be redefined")]
    Reserved(String),
    /// Dependency cycle
    #[error("Circular dependency detected involving task '{0}'")]
    CyclicDependency(String),
}

/// Task graph with dependency ordering.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGraph {
    /// The built-in graph: `sass` and `default -> sass`.
    pub fn new() -> Self {
        Self {
            tasks: vec![Task::sass(), Task::alias(DEFAULT_TASK, vec![SASS_TASK.to_string()])],
        }
    }

    /// Built-in graph extended with project aliases.
    ///
    /// An alias named `default` replaces the built-in default. Every
    /// dependency must name a known task and the result must be acyclic.
    pub fn with_aliases(aliases: &BTreeMap<String, Vec<String>>) -> Result<Self, TaskError> {
        let mut graph = Self::new();

        for (name, deps) in aliases {
            if name == SASS_TASK {
                return Err(TaskError::Reserved(name.clone()));
            }
            let task = Task::alias(name.clone(), deps.clone());
            match graph.tasks.iter_mut().find(|t| &t.name == name) {
                Some(existing) => *existing = task,
                None => graph.tasks.push(task),
            }
        }

        for task in &graph.tasks {
            for dep in &task.dependencies {
                if graph.get(dep).is_none() {
                    return Err(TaskError::UnknownDependency {
                        task: task.name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        let all: Vec<String> = graph.tasks.iter().map(|t| t.name.clone()).collect();
        graph.resolve(&all)?;

        Ok(graph)
    }

    /// Look up a task by name.
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// All tasks, built-ins first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Resolve requested task names into run order.
    ///
    /// Dependencies come before dependents and every task appears at most once,
    /// so requesting `default sass` runs the build a single time. An empty
    /// request resolves the default task.
    pub fn resolve(&self, requested: &[String]) -> Result<Vec<&Task>, TaskError> {
        let default = [DEFAULT_TASK.to_string()];
        let requested = if requested.is_empty() { &default[..] } else { requested };

        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut visiting = HashSet::new();

        for name in requested {
            let task = self.get(name).ok_or_else(|| TaskError::Unknown(name.clone()))?;
            self.visit(task, &mut visited, &mut visiting, &mut result)?;
        }

        Ok(result)
    }

    fn visit<'a>(
        &'a self,
        task: &'a Task,
        visited: &mut HashSet<&'a str>,
        visiting: &mut HashSet<&'a str>,
        result: &mut Vec<&'a Task>,
    ) -> Result<(), TaskError> {
        if visited.contains(task.name.as_str()) {
            return Ok(());
        }

        if !visiting.insert(task.name.as_str()) {
            return Err(TaskError::CyclicDependency(task.name.clone()));
        }

        for dep_name in &task.dependencies {
            let dep = self.get(dep_name).ok_or_else(|| TaskError::UnknownDependency {
                task: task.name.clone(),
                dependency: dep_name.clone(),
            })?;
            self.visit(dep, visited, visiting, result)?;
        }

        visiting.remove(task.name.as_str());
        visited.insert(task.name.as_str());
        result.push(task);

        Ok(())
    }
}
