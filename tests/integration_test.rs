//! Integration tests for the Vigil CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_cmd() -> Command {
    Command::cargo_bin("vigil").unwrap()
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    temp_dir
}

#[test]
fn test_scan_clean_project_exits_zero() {
    let temp_dir = project(&[("src/lib.rs", "pub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n")]);

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["scan", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found."));
}

#[test]
fn test_scan_critical_finding_exits_one() {
    let temp_dir = project(&[("app.py", "import subprocess\nsubprocess.call(cmd, shell=True)\n")]);

    get_cmd()
        .arg("scan")
        .arg(temp_dir.path())
        .arg("--no-cache")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("B602"));
}

#[test]
fn test_scan_warning_exits_two() {
    let temp_dir = project(&[("app.py", "value = eval(data)\n")]);

    get_cmd()
        .arg("scan")
        .arg(temp_dir.path())
        .arg("--no-cache")
        .assert()
        .code(2);
}

#[test]
fn test_scan_json_output() {
    let temp_dir = project(&[("Main.java", "class Main {\n    void f(String c) throws Exception {\n        Runtime.getRuntime().exec(c);\n    }\n}\n")]);

    let output = get_cmd()
        .arg("scan")
        .arg(temp_dir.path())
        .args(["--format", "json", "--no-cache"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["summary"]["files_scanned"], 1);
    assert_eq!(parsed["findings"][0]["rule_id"], "COMMAND_INJECTION");
    assert_eq!(parsed["findings"][0]["path"], "Main.java");
    assert_eq!(parsed["findings"][0]["line"], 3);
}

#[test]
fn test_scan_output_file() {
    let temp_dir = project(&[("app.py", "value = eval(data)\n")]);
    let report = temp_dir.path().join("out.json");

    get_cmd()
        .arg("scan")
        .arg(temp_dir.path().join("app.py"))
        .args(["--format", "json", "--no-cache", "-o"])
        .arg(&report)
        .assert()
        .code(2);

    let content = fs::read_to_string(&report).unwrap();
    assert!(content.contains("\"B307\""));
}

#[test]
fn test_scan_min_severity_and_only() {
    let temp_dir = project(&[("app.py", "assert ok\nvalue = eval(data)\n")]);

    get_cmd()
        .arg("scan")
        .arg(temp_dir.path())
        .args(["--min-severity", "critical", "--no-cache"])
        .assert()
        .success();

    get_cmd()
        .arg("scan")
        .arg(temp_dir.path())
        .args(["--only", "correctness", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B101"))
        .stdout(predicate::str::contains("B307").not());
}

#[test]
fn test_scan_uses_project_config() {
    let temp_dir = project(&[
        ("app.py", "value = eval(data)\n"),
        (".vigil.toml", "[rules.B307]\nenabled = false\n"),
    ]);

    get_cmd()
        .arg("scan")
        .arg(temp_dir.path())
        .arg("--no-cache")
        .assert()
        .success();
}

#[test]
fn test_scan_writes_cache_by_default() {
    let temp_dir = project(&[("app.py", "value = eval(data)\n")]);

    get_cmd().arg("scan").arg(temp_dir.path()).assert().code(2);
    assert!(temp_dir.path().join(".vigil/cache/scan_cache.json").is_file());

    get_cmd().arg("scan").arg(temp_dir.path()).assert().code(2);
}

#[test]
fn test_invalid_min_severity_exits_four() {
    let temp_dir = project(&[("app.py", "x = 1\n")]);

    get_cmd()
        .arg("scan")
        .arg(temp_dir.path())
        .args(["--min-severity", "extreme"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("extreme"));
}

#[test]
fn test_missing_root_exits_three() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .arg("scan")
        .arg(temp_dir.path().join("missing"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_invalid_config_exits_three() {
    let temp_dir = project(&[("app.py", "x = 1\n"), (".vigil.toml", "[scan]\nmin_severity = \"loud\"\n")]);

    get_cmd()
        .arg("scan")
        .arg(temp_dir.path())
        .arg("--no-cache")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("loud"));
}

#[test]
fn test_rules_command_lists_catalog() {
    get_cmd()
        .args(["rules", "--language", "rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("eq_op"))
        .stdout(predicate::str::contains("SEC001"))
        .stdout(predicate::str::contains("B101").not());
}

#[test]
fn test_rules_command_json() {
    let output = get_cmd()
        .args(["rules", "--format", "json", "--language", "java"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"NP_ALWAYS_NULL"));
    assert!(!ids.contains(&"B101"));
}

#[test]
fn test_rules_unknown_language_exits_four() {
    get_cmd()
        .args(["rules", "--language", "cobol"])
        .assert()
        .code(4);
}

#[test]
fn test_version_flag() {
    get_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vigil"));
}
