use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn semchunk() -> Command {
    let mut cmd = Command::cargo_bin("semchunk").expect("binary");
    cmd.env_remove("RUST_LOG").env_remove("SEMCHUNK_CONCURRENCY");
    cmd
}

fn setup_repo() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("src/math.js"),
        "import { round } from \"./util\";\n\nexport function add(a, b) {\n  return round(a + b);\n}\n",
    )
    .unwrap();
    fs::write(
        root.join("src/jobs.py"),
        "class Job:\n    def run(self):\n        pass\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "# Demo\n").unwrap();
    temp
}

#[test]
fn chunk_json_lists_files_in_input_order() {
    let temp = setup_repo();
    let root = temp.path();

    let output = semchunk()
        .arg("chunk")
        .arg("--json")
        .arg(root.join("src/jobs.py"))
        .arg(root.join("src/math.js"))
        .arg(root.join("README.md"))
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 3);
    assert!(files[0]["filePath"].as_str().unwrap().ends_with("jobs.py"));
    assert_eq!(files[0]["chunks"][0]["metadata"]["name"], "Job");
    assert_eq!(files[1]["language"], "javascript");
    assert_eq!(files[1]["chunks"][1]["metadata"]["type"], "export");
    assert_eq!(
        files[1]["chunks"][1]["metadata"]["imports"][0]["source"],
        "./util"
    );
    assert_eq!(files[2]["language"], Value::Null);
    assert_eq!(body["stats"]["skipped"], 1);
}

#[test]
fn scan_prints_summary_on_stderr() {
    let temp = setup_repo();

    semchunk()
        .arg("scan")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("2 files chunked"))
        .stderr(predicate::str::contains("math.js"));
}

#[test]
fn broken_file_is_reported_but_not_fatal() {
    let temp = setup_repo();
    let broken = temp.path().join("broken.ts");
    fs::write(&broken, "class {\n").unwrap();

    semchunk()
        .arg("--quiet")
        .arg("chunk")
        .arg(&broken)
        .arg(temp.path().join("src/math.js"))
        .assert()
        .success()
        .stderr(predicate::str::contains("1 failed"))
        .stderr(predicate::str::contains("error: "));
}

#[test]
fn config_file_filters_languages() {
    let temp = setup_repo();
    let config = temp.path().join("semchunk.toml");
    fs::write(
        &config,
        "concurrency = 1\n\n[chunker]\nsupported_languages = [\"python\"]\n",
    )
    .unwrap();

    let output = semchunk()
        .arg("--config")
        .arg(&config)
        .arg("scan")
        .arg("--json")
        .arg(temp.path())
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["stats"]["files"], 1);
    assert_eq!(body["stats"]["skipped"], 1);
}

#[test]
fn invalid_config_is_an_error() {
    let temp = setup_repo();
    let config = temp.path().join("bad.toml");
    fs::write(&config, "[chunker]\nsupported_languages = [\"cobol\"]\n").unwrap();

    semchunk()
        .arg("--config")
        .arg(&config)
        .arg("chunk")
        .arg(temp.path().join("src/math.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn scan_of_missing_directory_fails() {
    semchunk()
        .arg("scan")
        .arg("/definitely/not/here")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to scan"));
}
