//! Artifact naming and writing

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension given to every destination artifact
pub const CSS_EXTENSION: &str = "css";

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// Source path has no file stem to name the artifact after
    #[error("Cannot derive an output name from {}", .0.display())]
    InvalidSource(PathBuf),
    /// Writing the artifact failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Generate the destination path for a source stylesheet.
///
/// | Source                     | Output            |
/// |----------------------------|-------------------|
/// | `static/sass/site.scss`    | `{out}/site.css`  |
/// | `themes/dark/theme.sass`   | `{out}/theme.css` |
/// | `static/sass/app.min.scss` | `{out}/app.min.css` |
pub fn output_path(out_dir: &Path, source: &Path) -> Result<PathBuf, OutputError> {
    let stem = source
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| OutputError::InvalidSource(source.to_path_buf()))?;

    let mut name = stem.to_os_string();
    name.push(".");
    name.push(OsStr::new(CSS_EXTENSION));
    Ok(out_dir.join(name))
}

/// Write an artifact, creating or overwriting it.
///
/// The text goes to a sibling temporary file first and is then renamed over
/// the destination, so a failed write never leaves a truncated artifact.
pub fn write_artifact(path: &Path, css: &str) -> Result<(), OutputError> {
    let wrap = |source: io::Error| OutputError::Write { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
    }

    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, css).map_err(wrap)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(wrap(e));
    }
    Ok(())
}
