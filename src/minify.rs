//! CSS minification using lightningcss.

use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, StyleSheet};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::warn;

use crate::compile::CompiledCss;

/// Error raised while minifying compiled CSS
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinifyError {
    /// Compiled CSS could not be parsed
    #[error("{}: CSS parse error: {message}", file.display())]
    Parse {
        /// Stylesheet the CSS came from
        file: PathBuf,
        /// Parser diagnostic
        message: String,
    },
    /// The minify pass rejected the stylesheet
    #[error("{}: minify error: {message}", file.display())]
    Minify {
        /// Stylesheet the CSS came from
        file: PathBuf,
        /// Minifier diagnostic
        message: String,
    },
    /// Printing the minified stylesheet failed
    #[error("{}: print error: {message}", file.display())]
    Print {
        /// Stylesheet the CSS came from
        file: PathBuf,
        /// Printer diagnostic
        message: String,
    },
}

/// CSS ready to be written to the destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifiedCss {
    /// Entry stylesheet the CSS was compiled from
    pub source: PathBuf,
    /// Final CSS text
    pub css: String,
}

/// Minifier step. When disabled, compiled CSS passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssMinifier {
    enabled: bool,
}

impl Default for CssMinifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CssMinifier {
    /// Create an enabled minifier.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Enable or disable minification.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether minification runs.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Minify a compiled buffer, taking ownership of it.
    pub fn minify(&self, compiled: CompiledCss) -> Result<MinifiedCss, MinifyError> {
        let CompiledCss { source, css } = compiled;

        if !self.enabled {
            return Ok(MinifiedCss { source, css });
        }

        let filename = source.to_string_lossy().into_owned();
        let css = minify_css(&css, &filename).map_err(|kind| kind.into_error(source.clone()))?;
        Ok(MinifiedCss { source, css })
    }
}

/// Which lightningcss phase failed, before the source path is attached.
enum Failure {
    Parse(String),
    Minify(String),
    Print(String),
}

impl Failure {
    fn into_error(self, file: PathBuf) -> MinifyError {
        match self {
            Failure::Parse(message) => MinifyError::Parse { file, message },
            Failure::Minify(message) => MinifyError::Minify { file, message },
            Failure::Print(message) => MinifyError::Print { file, message },
        }
    }
}

/// Declarations the parser cannot understand (legacy browser hacks such as
/// `*zoom: 1`) are dropped with a warning instead of failing the file.
fn minify_css(css: &str, filename: &str) -> Result<String, Failure> {
    let warnings = Arc::new(RwLock::new(Vec::new()));
    let options = ParserOptions {
        filename: filename.to_string(),
        error_recovery: true,
        warnings: Some(Arc::clone(&warnings)),
        ..ParserOptions::default()
    };

    let mut sheet =
        StyleSheet::parse(css, options).map_err(|e| Failure::Parse(e.to_string()))?;

    if let Ok(list) = warnings.read() {
        for warning in list.iter() {
            warn!(file = %filename, "dropped during minify: {}", warning);
        }
    }
    sheet.minify(MinifyOptions::default()).map_err(|e| Failure::Minify(e.to_string()))?;

    let printed = sheet
        .to_css(PrinterOptions { minify: true, ..PrinterOptions::default() })
        .map_err(|e| Failure::Print(e.to_string()))?;

    Ok(printed.code)
}

/// Minify CSS text directly.
pub fn minify_str(css: &str) -> Result<String, MinifyError> {
    minify_css(css, "<input>").map_err(|kind| kind.into_error(PathBuf::from("<input>")))
}
