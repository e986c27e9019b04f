//! Build command implementation

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{debug, error, info};

use super::{format_task_list, Cli, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::build::{BuildContext, BuildPipeline, BuildResult};
use crate::config::loader::{check, find_config, load_config, merge_cli_overrides, project_root};
use crate::config::{default_config, SassBuildConfig};
use crate::tasks::{TaskError, TaskGraph, TaskKind};

/// Load the configuration and the directory its relative paths resolve against.
fn locate_config(cli: &Cli) -> Result<(SassBuildConfig, PathBuf), crate::config::ConfigError> {
    let cwd = std::env::current_dir()?;
    let config_path = cli.config.clone().or_else(find_config);

    match config_path {
        Some(path) => {
            info!(config = %path.display(), "using config");
            let config = load_config(Some(&path))?;
            let root = match project_root(&path) {
                Some(dir) if !dir.as_os_str().is_empty() => cwd.join(dir),
                _ => cwd,
            };
            Ok((config, root))
        }
        None => {
            debug!("no sassbuild.toml found, using defaults");
            Ok((default_config(), cwd))
        }
    }
}

/// Run the requested tasks
pub fn run_build(cli: &Cli) -> ExitCode {
    let (mut config, root) = match locate_config(cli) {
        Ok(found) => found,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    merge_cli_overrides(&mut config, &cli.overrides());
    if let Err(e) = check(&config) {
        error!("{}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    let graph = match TaskGraph::with_aliases(&config.tasks) {
        Ok(graph) => graph,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if cli.list {
        println!("{}", format_task_list(&graph));
        return ExitCode::from(EXIT_SUCCESS);
    }

    let order = match graph.resolve(&cli.tasks) {
        Ok(order) => order,
        Err(e @ TaskError::Unknown(_)) => {
            error!("{}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let context = BuildContext::new(config, root);
    let strict = context.is_strict();
    let mut result: Option<BuildResult> = None;

    for task in order {
        match task.kind {
            TaskKind::Alias => debug!(task = %task.name, "alias resolved"),
            TaskKind::Sass => {
                info!(task = %task.name, "starting");
                let pipeline = BuildPipeline::new(context.clone()).with_dry_run(cli.dry_run);
                match pipeline.run() {
                    Ok(r) => result = Some(r),
                    Err(e) => {
                        error!("Build error: {}", e);
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            }
        }
    }

    let Some(result) = result else {
        println!("Nothing to do");
        return ExitCode::from(EXIT_SUCCESS);
    };

    if cli.json {
        match result.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to render report: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("{}", result.summary());
    }

    if result.exit_ok(strict) {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
