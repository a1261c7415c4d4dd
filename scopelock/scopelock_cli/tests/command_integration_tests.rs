use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const DEFINITIONS: &str = r#"
[units.audit]
read = ["audit_log"]
write = ["audit_queue"]

[units.reader]
read = ["X"]

[units.writer]
write = ["X"]

[classes.users]
units = ["common_locks", "audit"]

[classes.promoted]
units = ["reader", "writer"]

[classes.bare]
"#;

fn definitions(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn scopelock() -> Command {
    Command::cargo_bin("scopelock").unwrap()
}

#[test]
fn test_resolve_single_class_as_text() {
    let file = definitions(DEFINITIONS);

    scopelock()
        .args(["resolve", "--class", "promoted", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("promoted\n  read:  \n  write: X"));
}

#[test]
fn test_resolve_all_classes_as_json() {
    let file = definitions(DEFINITIONS);

    let output = scopelock()
        .args(["resolve", "--format", "json", "--config"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let classes: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(classes, vec!["bare", "promoted", "users"]);

    assert_eq!(json["users"]["write"], serde_json::json!(["audit_queue", "core_tasks"]));
    assert_eq!(json["users"]["read"][0], "audit_log");
    assert_eq!(json["bare"]["read"], serde_json::json!([]));
}

#[test]
fn test_explain_marks_promotions() {
    let file = definitions(DEFINITIONS);

    scopelock()
        .args(["explain", "--class", "promoted", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "reader (shared), writer (exclusive)  [promoted]",
        ));
}

#[test]
fn test_explain_as_json() {
    let file = definitions(DEFINITIONS);

    let output = scopelock()
        .args(["explain", "--class", "users", "--format", "json", "--config"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["class"], "users");
    assert_eq!(json["contributors"]["audit_log"][0]["unit"], "audit");
    assert_eq!(json["contributors"]["core_tasks"][0]["mode"], "exclusive");
}

#[test]
fn test_check_reports_success() {
    let file = definitions(DEFINITIONS);

    scopelock()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ok: 3 class(es)"));
}

#[test]
fn test_check_rejects_unknown_unit() {
    let file = definitions(
        r#"
        [classes.users]
        units = ["missing"]
        "#,
    );

    scopelock()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown unit 'missing'"));
}

#[test]
fn test_check_rejects_malformed_name() {
    let file = definitions(
        r#"
        [units.bad]
        write = [" padded"]
        "#,
    );

    scopelock()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid class definitions").or(
            predicate::str::contains("Failed to load definitions"),
        ));
}

#[test]
fn test_missing_class_fails() {
    let file = definitions(DEFINITIONS);

    scopelock()
        .args(["resolve", "--class", "ghost", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_missing_file_fails() {
    scopelock()
        .args(["check", "--config", "/definitely/not/here.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load definitions"));
}

#[test]
fn test_log_level_accepted() {
    let file = definitions(DEFINITIONS);

    scopelock()
        .args(["--log-level", "debug", "check", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("resolved"));
}

#[test]
fn test_invalid_log_level_rejected() {
    scopelock()
        .args(["--log-level", "loud", "check", "--config", "unused.toml"])
        .assert()
        .failure();
}
