//! Build pipeline module for sassbuild
//!
//! Turns entry stylesheets into minified CSS artifacts.
//!
//! # Overview
//!
//! The build pipeline consists of:
//! - **Discovery**: Find entry stylesheets using glob patterns from config
//! - **Planning**: Pair each stylesheet with its destination artifact
//! - **Execution**: Compile, minify and write each file independently
//!
//! # Example
//!
//! ```ignore
//! use sassbuild::build::{BuildContext, BuildPipeline};
//! use sassbuild::config::load_config;
//!
//! let config = load_config(None)?;
//! let context = BuildContext::new(config, project_root);
//! let pipeline = BuildPipeline::new(context);
//!
//! let result = pipeline.run()?;
//! println!("Wrote {} stylesheets", result.written_count());
//! ```

pub mod context;
pub mod discovery;
pub mod pipeline;
pub mod result;
pub mod target;

pub use context::*;
pub use discovery::*;
pub use pipeline::*;
pub use result::*;
pub use target::*;
