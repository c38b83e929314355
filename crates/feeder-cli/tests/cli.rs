use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join(relative)
}

fn ieee4() -> PathBuf {
    repo_path("test_data/glm/ieee4.glm")
}

/// Command isolated from any config in the user's home directory.
fn feeder(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("feeder").unwrap();
    cmd.arg("--config")
        .arg(config_dir.path().join("config.toml"));
    cmd
}

#[test]
fn roundtrip_to_stdout_reproduces_fixture() {
    let home = tempdir().unwrap();
    let expected = fs::read_to_string(ieee4()).unwrap();
    feeder(&home)
        .args(["roundtrip", ieee4().to_str().unwrap()])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn roundtrip_honours_configured_indent() {
    let home = tempdir().unwrap();
    fs::write(
        home.path().join("config.toml"),
        "[writer]\nindent = \"  \"\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();
    let out = home.path().join("spaces.glm");
    feeder(&home)
        .args([
            "roundtrip",
            ieee4().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("\n  name node1;\n"));
    assert!(written.contains("\n    interval 60;\n"));
    // text outside objects is untouched
    assert!(written.contains("\n\tsolver_method NR;\n"));
}

#[test]
fn transform_writes_signed_output() {
    let home = tempdir().unwrap();
    let out = home.path().join("out.glm");
    feeder(&home)
        .args([
            "transform",
            ieee4().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "-t",
            "set class=recorder interval=900",
            "-t",
            "annotate name=load4 spot load",
        ])
        .assert()
        .success();
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("// Generated by feeder "));
    assert!(written.contains("//   set class=recorder interval=900\n"));
    assert!(written.contains("\t\tinterval 900;\n"));
    assert!(written.contains("// spot load\nobject load {\n"));
}

#[test]
fn transform_without_signature() {
    let home = tempdir().unwrap();
    let out = home.path().join("plain.glm");
    feeder(&home)
        .args([
            "transform",
            "-o",
            out.to_str().unwrap(),
            "-t",
            "add class=node name=n1",
            "--no-sign",
        ])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "object node {\n\tname n1;\n}\n"
    );
}

#[test]
fn failing_transform_writes_nothing() {
    let home = tempdir().unwrap();
    let out = home.path().join("never.glm");
    feeder(&home)
        .args([
            "transform",
            ieee4().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "-t",
            "explode name=node1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown transform `explode`"));
    assert!(!out.exists());
}

#[test]
fn transform_list_shows_builtins() {
    let home = tempdir().unwrap();
    feeder(&home)
        .args(["transform", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("annotate").and(predicate::str::contains("nest")));
}

#[test]
fn find_reports_json() {
    let home = tempdir().unwrap();
    let output = feeder(&home)
        .args([
            "find",
            ieee4().to_str().unwrap(),
            "--property",
            "class",
            "--value",
            "node",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["node1", "node2", "node3"]);
}

#[test]
fn find_with_count_mismatch_fails() {
    let home = tempdir().unwrap();
    feeder(&home)
        .args([
            "find",
            ieee4().to_str().unwrap(),
            "--property",
            "class",
            "--value",
            "node",
            "--count",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("found 3"));
}

#[test]
fn upstream_to_first_transformer() {
    let home = tempdir().unwrap();
    feeder(&home)
        .args([
            "upstream",
            ieee4().to_str().unwrap(),
            "--name",
            "meter4",
            "--class",
            "transformer",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("xfmr23"));
}

#[test]
fn downstream_lists_children_then_links() {
    let home = tempdir().unwrap();
    feeder(&home)
        .args(["downstream", ieee4().to_str().unwrap(), "--name", "node3"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("recorder")
                .and(predicate::str::contains("line34"))
                .and(predicate::str::contains("node3")),
        );
}

#[test]
fn check_passes_fixture_and_flags_dangling_parent() {
    let home = tempdir().unwrap();
    feeder(&home)
        .args(["check", ieee4().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues"));

    let broken = home.path().join("broken.glm");
    fs::write(
        &broken,
        "object meter {\n\tname m1;\n\tparent ghost;\n}\n",
    )
    .unwrap();
    feeder(&home)
        .args(["check", broken.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("reference"))
        .stdout(predicate::str::contains("parent `ghost` does not exist"));
}

#[test]
fn graph_stats_and_dot() {
    let home = tempdir().unwrap();
    let dot = home.path().join("ieee4.dot");
    let output = feeder(&home)
        .args([
            "graph",
            ieee4().to_str().unwrap(),
            "--format",
            "json",
            "--dot",
            dot.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["components"], 1);
    assert_eq!(stats["edge_count"], 8);
    assert!(fs::read_to_string(&dot).unwrap().starts_with("digraph feeder {"));
}

#[test]
fn parse_errors_name_the_line() {
    let home = tempdir().unwrap();
    let bad = home.path().join("bad.glm");
    fs::write(&bad, "// model\nobject node {\n\tname n1;\n\tphases ABCN\n}\n").unwrap();
    feeder(&home)
        .args(["roundtrip", bad.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 4: unrecognized syntax"));
}

#[test]
fn log_level_is_accepted_after_the_subcommand() {
    let home = tempdir().unwrap();
    feeder(&home)
        .args(["check", ieee4().to_str().unwrap(), "--log-level", "warn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues"));
}

#[test]
fn graph_plain_lists_root_fan_out() {
    let home = tempdir().unwrap();
    feeder(&home)
        .args(["graph", ieee4().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Components    : 1"))
        .stdout(predicate::str::contains("(fan-out "));
}
