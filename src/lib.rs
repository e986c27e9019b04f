//! Sassbuild - Library for compiling SASS stylesheets into minified CSS
//!
//! This library provides functionality to:
//! - Discover entry stylesheets with glob patterns, skipping partials
//! - Compile SASS/SCSS with configurable include paths
//! - Minify the compiled CSS and write one artifact per stylesheet
//! - Resolve named tasks and aliases from `sassbuild.toml`

pub mod build;
pub mod cli;
pub mod compile;
pub mod config;
pub mod logging;
pub mod minify;
pub mod output;
pub mod tasks;
