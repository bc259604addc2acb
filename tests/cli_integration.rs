use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::tempdir;

fn tdsp(dir: &Path) -> Command {
    let binary = assert_cmd::cargo::cargo_bin!("tdsp");
    let mut cmd = Command::new(binary);
    cmd.current_dir(dir);
    cmd.env_remove("TODOIST_API_TOKEN");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_snapshot(dir: &Path) {
    let snapshot = json!({
        "projects": [
            {"id": "P1", "name": "Someday Maybe"},
            {"id": "P2", "name": "Errands"}
        ],
        "tasks": [
            {"id": "T1", "project_id": "P1", "content": "Learn piano", "description": "why not",
             "labels": [], "created_at": "2024-01-01T00:00:00Z", "is_completed": false},
            {"id": "T2", "project_id": "P1", "parent_id": "T1", "content": "Book a lesson",
             "created_at": "2024-01-02T00:00:00Z"},
            {"id": "T3", "project_id": "P2", "content": "Buy stamps",
             "created_at": "2024-01-03T00:00:00Z", "due": {"date": "2024-03-01"}}
        ]
    });
    fs::write(dir.join("snapshot.json"), snapshot.to_string()).unwrap();
}

#[test]
fn migrate_writes_backup_and_json_report() {
    let dir = tempdir().unwrap();
    write_snapshot(dir.path());

    let output = tdsp(dir.path())
        .args([
            "--format",
            "json",
            "migrate",
            "--snapshot",
            "snapshot.json",
            "--collection-projects",
            "Someday__Maybe",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["tasks"]["created"], 3);
    assert_eq!(report["projects"]["created"], 2);
    assert_eq!(report["notes"]["created"], 1);
    assert_eq!(report["partial"], false);

    let written = dir
        .path()
        .join("super_productivity_updated_backup_file.json");
    let doc: Value = serde_json::from_str(&fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(
        doc["project"]["ids"],
        json!(["TDI_project_P2", "TDI_subtask_project_P1_T1"])
    );
    assert_eq!(doc["task"]["entities"]["TDI_task_T3"]["plannedAt"], 1_709_251_200);
}

#[test]
fn legacy_flag_names_are_accepted() {
    let dir = tempdir().unwrap();
    write_snapshot(dir.path());

    tdsp(dir.path())
        .args([
            "migrate",
            "--snapshot",
            "snapshot.json",
            "--collection_projects",
            "Someday__Maybe",
            "--output",
            "out.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote"));

    assert!(dir.path().join("out.json").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    write_snapshot(dir.path());

    tdsp(dir.path())
        .args(["migrate", "--snapshot", "snapshot.json", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    assert!(
        !dir.path()
            .join("super_productivity_updated_backup_file.json")
            .exists()
    );
}

#[test]
fn missing_token_fails_with_error_code() {
    let dir = tempdir().unwrap();

    tdsp(dir.path())
        .args(["--format", "json", "migrate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing_token"));
}

#[test]
fn malformed_backup_fails_without_output() {
    let dir = tempdir().unwrap();
    write_snapshot(dir.path());
    fs::write(dir.path().join("backup.json"), "[]").unwrap();

    tdsp(dir.path())
        .args([
            "migrate",
            "--snapshot",
            "snapshot.json",
            "--backup",
            "backup.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed backup"));

    assert!(
        !dir.path()
            .join("super_productivity_updated_backup_file.json")
            .exists()
    );
}

#[test]
fn unreachable_api_with_warn_policy_produces_partial_output() {
    let dir = tempdir().unwrap();

    let output = tdsp(dir.path())
        .args([
            "--format",
            "json",
            "migrate",
            "--token",
            "secret",
            "--api-base-url",
            "http://127.0.0.1:9",
            "--on-fetch-failure",
            "warn",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["partial"], true);
    assert_eq!(report["failed_fetches"], json!(["projects", "tasks"]));
    assert!(String::from_utf8_lossy(&output.stderr).contains("FETCH FAILED"));
}

#[test]
fn unreachable_api_aborts_by_default() {
    let dir = tempdir().unwrap();

    tdsp(dir.path())
        .args([
            "migrate",
            "--token",
            "secret",
            "--api-base-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to fetch projects"));

    assert!(
        !dir.path()
            .join("super_productivity_updated_backup_file.json")
            .exists()
    );
}

#[test]
fn working_directory_template_applies_to_new_projects_only() {
    let dir = tempdir().unwrap();
    write_snapshot(dir.path());
    fs::write(
        dir.path().join("standard_project_fields.json"),
        json!({"isArchived": false, "icon": "folder"}).to_string(),
    )
    .unwrap();

    tdsp(dir.path())
        .args(["migrate", "--snapshot", "snapshot.json", "--output", "first.json"])
        .assert()
        .success();

    let first_path = dir.path().join("first.json");
    let mut first: Value =
        serde_json::from_str(&fs::read_to_string(&first_path).unwrap()).unwrap();
    assert_eq!(first["project"]["entities"]["TDI_project_P2"]["icon"], "folder");

    first["project"]["entities"]["TDI_project_P2"]["icon"] = json!("star");
    first["project"]["entities"]["TDI_project_P2"]["isArchived"] = json!(true);
    fs::write(&first_path, first.to_string()).unwrap();

    tdsp(dir.path())
        .args([
            "migrate",
            "--snapshot",
            "snapshot.json",
            "--backup",
            "first.json",
            "--output",
            "second.json",
        ])
        .assert()
        .success();

    let second: Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("second.json")).unwrap(),
    )
    .unwrap();
    let errands = &second["project"]["entities"]["TDI_project_P2"];
    assert_eq!(errands["icon"], "star");
    assert_eq!(errands["isArchived"], true);
    assert_eq!(errands["title"], "Errands");
}

#[test]
fn explicit_template_fields_land_on_created_projects() {
    let dir = tempdir().unwrap();
    write_snapshot(dir.path());
    fs::write(
        dir.path().join("fields.json"),
        json!({"isHiddenFromMenu": true, "icon": "rocket"}).to_string(),
    )
    .unwrap();

    tdsp(dir.path())
        .args([
            "migrate",
            "--snapshot",
            "snapshot.json",
            "--template",
            "fields.json",
            "--collection-projects",
            "Someday__Maybe",
        ])
        .assert()
        .success();

    let doc: Value = serde_json::from_str(
        &fs::read_to_string(
            dir.path()
                .join("super_productivity_updated_backup_file.json"),
        )
        .unwrap(),
    )
    .unwrap();
    for id in ["TDI_project_P2", "TDI_subtask_project_P1_T1"] {
        let project = &doc["project"]["entities"][id];
        assert_eq!(project["icon"], "rocket");
        assert_eq!(project["isHiddenFromMenu"], true);
    }
    assert!(doc["project"]["entities"]["TDI_project_P2"].get("backlogTaskIds").is_none());
}

#[test]
fn missing_explicit_template_fails() {
    let dir = tempdir().unwrap();
    write_snapshot(dir.path());

    tdsp(dir.path())
        .args([
            "--format",
            "json",
            "migrate",
            "--snapshot",
            "snapshot.json",
            "--template",
            "nope.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("template_not_found"));
}
