//! One-shot subcommands against the built binary
//!
//! Each invocation is a separate process, so stages added by one command are
//! gone for the next: only project rows survive in the spreadsheet.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

fn timeplan_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_timeplan"))
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(timeplan_binary())
        .current_dir(dir.path())
        .env_remove("TIMEPLAN_FILE")
        .env_remove("RUST_LOG")
        .arg("--file")
        .arg(plan_path(dir.path()))
        .args(args)
        .output()
        .expect("failed to execute timeplan")
}

fn plan_path(dir: &Path) -> PathBuf {
    dir.join("TimePlan.xlsx")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn add_project_then_list_in_new_process() {
    let dir = tempdir().unwrap();

    let added = run(&dir, &["add-project", "Alpha", "01/01/2024", "31/12/2024"]);
    assert!(added.status.success());
    assert!(stdout(&added).contains("Project added."));
    assert!(plan_path(dir.path()).exists());

    let listed = run(&dir, &["list"]);
    assert!(listed.status.success());
    assert_eq!(stdout(&listed), "Project: Alpha\n01/01/2024 - 31/12/2024\n");
}

#[test]
fn missing_file_lists_nothing_and_warns() {
    let dir = tempdir().unwrap();

    let output = run(&dir, &["list"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("No projects."));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
    assert!(!plan_path(dir.path()).exists());
}

#[test]
fn malformed_date_fails_with_exit_code() {
    let dir = tempdir().unwrap();

    let output = run(&dir, &["add-project", "Alpha", "2024-01-01", "31/12/2024"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid date '2024-01-01'"), "stderr: {stderr}");
    assert!(!plan_path(dir.path()).exists());
}

#[test]
fn stages_do_not_survive_between_runs() {
    let dir = tempdir().unwrap();
    run(&dir, &["add-project", "Alpha", "01/01/2024", "31/12/2024"]);

    let staged = run(
        &dir,
        &["add-stage", "Alpha", "Design", "01/01/2024", "15/02/2024"],
    );
    assert!(staged.status.success());

    let report = run(&dir, &["completed", "--as-of", "01/03/2024"]);
    assert!(report.status.success());
    assert!(stdout(&report).contains("No completed stages found."));
}

#[test]
fn list_json_emits_projects() {
    let dir = tempdir().unwrap();
    run(&dir, &["add-project", "Alpha", "01/01/2024", "31/12/2024"]);

    let output = run(&dir, &["list", "--format", "json"]);
    assert!(output.status.success());

    let projects: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(projects[0]["name"], "Alpha");
    assert_eq!(projects[0]["start_date"], "2024-01-01");
    assert_eq!(projects[0]["stages"], serde_json::json!([]));
}

#[test]
fn shell_session_reports_completed_stage() {
    use std::io::Write;
    use std::process::Stdio;

    let dir = tempdir().unwrap();
    let mut child = Command::new(timeplan_binary())
        .current_dir(dir.path())
        .env_remove("TIMEPLAN_FILE")
        .env_remove("RUST_LOG")
        .arg("--file")
        .arg(plan_path(dir.path()))
        .arg("shell")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn timeplan");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(
            b"add-project\nAlpha\n01/01/2024\n31/12/2024\n\
              add-stage\nAlpha\nDesign\n01/01/2024\n15/02/2024\n\
              completed\n01/03/2024\nquit\n",
        )
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("Project: Alpha\nStage: Design\n01/01/2024 - 15/02/2024"));
}

#[test]
fn config_file_supplies_storage_path() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("timeplan.toml"),
        "[storage]\npath = \"from-config.xlsx\"\n",
    )
    .unwrap();

    let output = Command::new(timeplan_binary())
        .current_dir(dir.path())
        .env_remove("TIMEPLAN_FILE")
        .env_remove("RUST_LOG")
        .args(["add-project", "Alpha", "01/01/2024", "31/12/2024"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(dir.path().join("from-config.xlsx").exists());
}
