//! SASS/SCSS compilation.
//!
//! Wraps [`grass`] with the project's include paths and output style. Each
//! call compiles one entry stylesheet into an owned CSS buffer.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::OutputStyle;

/// A stylesheet that failed to compile.
///
/// The message is the compiler's rendered diagnostic, which already points at
/// the offending line and column.
#[derive(Debug, Clone, Error)]
#[error("{}: {message}", file.display())]
pub struct CompileError {
    /// Entry stylesheet that failed
    pub file: PathBuf,
    /// Compiler diagnostic
    pub message: String,
}

impl CompileError {
    /// Create a compile error for `file`.
    pub fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self { file: file.into(), message: message.into() }
    }
}

/// CSS produced by the compiler step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCss {
    /// Entry stylesheet the CSS was compiled from
    pub source: PathBuf,
    /// Compiled CSS text
    pub css: String,
}

/// Stylesheet compiler configured with include paths.
#[derive(Debug, Clone, Default)]
pub struct SassCompiler {
    include_paths: Vec<PathBuf>,
    style: OutputStyle,
    quiet: bool,
}

impl SassCompiler {
    /// Create a compiler that resolves imports from `include_paths`.
    pub fn new(include_paths: Vec<PathBuf>) -> Self {
        Self { include_paths, style: OutputStyle::default(), quiet: false }
    }

    /// Set the output style.
    pub fn with_style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    /// Silence `@warn` and `@debug`.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Configured include paths, in search order.
    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    /// Configured output style.
    pub fn style(&self) -> OutputStyle {
        self.style
    }

    fn options(&self, entry_dir: Option<&Path>) -> grass::Options<'static> {
        let style = match self.style {
            OutputStyle::Expanded => grass::OutputStyle::Expanded,
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
        };

        let mut options = grass::Options::default().style(style).quiet(self.quiet);

        // Imports resolve next to the entry file before the include paths
        if let Some(dir) = entry_dir.filter(|d| !d.as_os_str().is_empty()) {
            options = options.load_path(dir);
        }

        options.load_paths(&self.include_paths)
    }

    /// Compile one entry stylesheet.
    pub fn compile(&self, source: &Path) -> Result<CompiledCss, CompileError> {
        let options = self.options(source.parent());

        match grass::from_path(source, &options) {
            Ok(css) => Ok(CompiledCss { source: source.to_path_buf(), css }),
            Err(e) => Err(CompileError::new(source, e.to_string())),
        }
    }

    /// Compile SCSS text that has no file of its own.
    ///
    /// `name` only labels the error; imports resolve from the include paths.
    pub fn compile_str(&self, name: &str, input: &str) -> Result<String, CompileError> {
        let options = self.options(None);
        grass::from_string(input.to_owned(), &options)
            .map_err(|e| CompileError::new(name, e.to_string()))
    }
}
