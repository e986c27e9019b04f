//! CLI integration tests for the `sassbuild` binary.
//!
//! Runs the binary inside temporary projects and checks artifacts, exit
//! codes, task handling and the JSON report.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run sassbuild in `dir` and return (stdout, stderr, exit code).
fn run_sassbuild(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_sassbuild"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute sassbuild");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A project laid out like the default configuration expects.
fn create_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("node_modules")).unwrap();
    write(temp.path(), "static/sass/a.scss", "$c: red; .x { color: $c; }");
    temp
}

#[test]
fn test_default_task_builds() {
    let temp = create_project();

    let (stdout, _, code) = run_sassbuild(temp.path(), &[]);

    assert_eq!(code, 0);
    assert!(stdout.contains("Build succeeded"));
    let css = fs::read_to_string(temp.path().join("static/css/a.css")).unwrap();
    assert_eq!(css, ".x{color:red}");
}

#[test]
fn test_sass_task_by_name() {
    let temp = create_project();

    let (_, _, code) = run_sassbuild(temp.path(), &["sass"]);

    assert_eq!(code, 0);
    assert!(temp.path().join("static/css/a.css").exists());
}

#[test]
fn test_compile_error_logged_exit_zero() {
    let temp = create_project();
    write(temp.path(), "static/sass/b.scss", ".y { color: }");

    let (stdout, stderr, code) = run_sassbuild(temp.path(), &[]);

    assert_eq!(code, 0);
    assert!(stderr.contains("b.scss"));
    assert!(stdout.contains("1 failed"));
    assert!(temp.path().join("static/css/a.css").exists());
    assert!(!temp.path().join("static/css/b.css").exists());
}

#[test]
fn test_compile_error_strict_exit_one() {
    let temp = create_project();
    write(temp.path(), "static/sass/b.scss", ".y { color: }");

    let (_, _, code) = run_sassbuild(temp.path(), &["--strict"]);

    assert_eq!(code, 1);
    assert!(temp.path().join("static/css/a.css").exists());
}

#[test]
fn test_unknown_task_exit_two() {
    let temp = create_project();

    let (_, stderr, code) = run_sassbuild(temp.path(), &["styles"]);

    assert_eq!(code, 2);
    assert!(stderr.contains("Unknown task 'styles'"));
    assert!(!temp.path().join("static/css").exists());
}

#[test]
fn test_missing_include_path_exit_one() {
    let temp = create_project();

    let (_, stderr, code) = run_sassbuild(temp.path(), &["-I", "vendor"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("vendor"));
}

#[test]
fn test_builds_without_node_modules() {
    let temp = create_project();
    fs::remove_dir(temp.path().join("node_modules")).unwrap();

    let (_, stderr, code) = run_sassbuild(temp.path(), &[]);

    assert_eq!(code, 0);
    assert!(stderr.contains("node_modules"));
    assert!(temp.path().join("static/css/a.css").exists());
}

#[test]
fn test_config_file_and_alias() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "sassbuild.toml",
        r#"
[project]
name = "site"

[sass]
sources = ["styles/*.scss"]
include_paths = []
out = "public/css"

[tasks]
styles = ["sass"]
"#,
    );
    write(temp.path(), "styles/main.scss", ".m { top: 0; }");
    write(temp.path(), "styles/nested/skip.scss", ".s { top: 0; }");

    let (_, _, code) = run_sassbuild(temp.path(), &["styles"]);

    assert_eq!(code, 0);
    assert!(temp.path().join("public/css/main.css").exists());
    assert!(!temp.path().join("public/css/skip.css").exists());
}

#[test]
fn test_config_found_from_subdirectory() {
    let temp = create_project();
    write(temp.path(), "sassbuild.toml", "[project]\nname = \"site\"\n");
    fs::create_dir_all(temp.path().join("static/sass/deep")).unwrap();

    let (_, _, code) = run_sassbuild(&temp.path().join("static/sass/deep"), &[]);

    assert_eq!(code, 0);
    assert!(temp.path().join("static/css/a.css").exists());
}

#[test]
fn test_invalid_config_exit_one() {
    let temp = create_project();
    write(temp.path(), "sassbuild.toml", "[project]\nname = \"\"\n");

    let (_, stderr, code) = run_sassbuild(temp.path(), &[]);

    assert_eq!(code, 1);
    assert!(stderr.contains("project.name"));
}

#[test]
fn test_list_tasks() {
    let temp = create_project();

    let (stdout, _, code) = run_sassbuild(temp.path(), &["--list"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("sass"));
    assert!(stdout.contains("default"));
    assert!(!temp.path().join("static/css").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp = create_project();

    let (stdout, _, code) = run_sassbuild(temp.path(), &["--dry-run"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("Dry run"));
    assert!(stdout.contains("a.css"));
    assert!(!temp.path().join("static/css").exists());
}

#[test]
fn test_json_report() {
    let temp = create_project();
    write(temp.path(), "static/sass/b.scss", ".y { color: }");

    let (stdout, _, code) = run_sassbuild(temp.path(), &["--json", "-j", "2"]);

    assert_eq!(code, 0);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let files = report["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["status"], "written");
    assert_eq!(files[1]["status"], "failed");
    assert_eq!(files[1]["stage"], "compile");
}

#[test]
fn test_src_and_out_overrides() {
    let temp = create_project();
    write(temp.path(), "theme/dark.scss", ".d { color: black; }");

    let (_, _, code) = run_sassbuild(temp.path(), &["--src", "theme/*.scss", "-o", "dist"]);

    assert_eq!(code, 0);
    assert!(temp.path().join("dist/dark.css").exists());
    assert!(!temp.path().join("dist/a.css").exists());
}

#[test]
fn test_no_minify_flag() {
    let temp = create_project();

    let (_, _, code) = run_sassbuild(temp.path(), &["--no-minify"]);

    assert_eq!(code, 0);
    let css = fs::read_to_string(temp.path().join("static/css/a.css")).unwrap();
    assert_eq!(css, ".x {\n  color: red;\n}\n");
}
