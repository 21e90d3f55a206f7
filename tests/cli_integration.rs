use serde_json::Value;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write_fixture(path: &Path, contents: &str) {
    std::fs::write(path, contents).expect("write fixture");
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(assert_cmd::cargo::cargo_bin!("file-replace"))
        .args(args)
        .output()
        .expect("run file-replace")
}

fn parse_stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout utf8");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn cli_replace_rewrites_file_and_reports_counts() {
    let tmp = tempdir().expect("tempdir");
    let target = tmp.path().join("icon.svg");
    write_fixture(&target, "<rect fill=\"#000\"/><circle fill=\"#000\"/>");

    let output = run_cli(&[
        "replace",
        target.to_str().expect("path utf8"),
        "#000",
        "#f0f",
    ]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let payload = parse_stdout_json(&output);
    assert_eq!(payload["replacements"].as_u64(), Some(2));
    assert_eq!(payload["modified"].as_bool(), Some(true));

    let contents = std::fs::read_to_string(&target).expect("read back");
    assert_eq!(contents, "<rect fill=\"#f0f\"/><circle fill=\"#f0f\"/>");
}

#[test]
fn cli_replace_first_mode_stops_after_one() {
    let tmp = tempdir().expect("tempdir");
    let target = tmp.path().join("note.txt");
    write_fixture(&target, "one one one");

    let output = run_cli(&[
        "replace",
        target.to_str().expect("path utf8"),
        "one",
        "two",
        "--mode",
        "first",
    ]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let payload = parse_stdout_json(&output);
    assert_eq!(payload["replacements"].as_u64(), Some(1));
    assert_eq!(
        std::fs::read_to_string(&target).expect("read back"),
        "two one one"
    );
}

#[test]
fn cli_preview_reports_matches_without_modifying() {
    let tmp = tempdir().expect("tempdir");
    let target = tmp.path().join("doc.txt");
    write_fixture(&target, "alpha\nbeta alpha\n");

    let output = run_cli(&["preview", target.to_str().expect("path utf8"), "alpha"]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let payload = parse_stdout_json(&output);
    assert_eq!(payload["match_count"].as_u64(), Some(2));
    assert_eq!(
        std::fs::read_to_string(&target).expect("read back"),
        "alpha\nbeta alpha\n"
    );
}

#[test]
fn cli_batch_and_list_operate_on_workspace_root() {
    let tmp = tempdir().expect("tempdir");
    write_fixture(&tmp.path().join("a.svg"), "fill=\"#000\"");
    write_fixture(&tmp.path().join("b.svg"), "fill=\"#000\" fill=\"#000\"");
    let root = tmp.path().to_str().expect("path utf8");

    let list = run_cli(&["list", "--workspace-root", root]);
    assert!(list.status.success(), "stderr: {:?}", list.stderr);
    let listed = parse_stdout_json(&list);
    assert_eq!(listed["files"].as_array().map(Vec::len), Some(2));

    let batch = run_cli(&[
        "batch",
        "*.svg",
        "#000",
        "#111",
        "--workspace-root",
        root,
    ]);
    assert!(batch.status.success(), "stderr: {:?}", batch.stderr);
    let payload = parse_stdout_json(&batch);
    assert_eq!(payload["files_matched"].as_u64(), Some(2));
    assert_eq!(payload["total_replacements"].as_u64(), Some(3));

    assert_eq!(
        std::fs::read_to_string(tmp.path().join("b.svg")).expect("read back"),
        "fill=\"#111\" fill=\"#111\""
    );
}

#[test]
fn cli_replace_fails_cleanly_for_missing_file() {
    let tmp = tempdir().expect("tempdir");
    let target = tmp.path().join("absent.txt");

    let output = run_cli(&["replace", target.to_str().expect("path utf8"), "a", "b"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot open"), "stderr: {stderr}");
}

#[test]
fn cli_rejects_csv_output() {
    let tmp = tempdir().expect("tempdir");
    let target = tmp.path().join("note.txt");
    write_fixture(&target, "x");

    let output = run_cli(&[
        "--format",
        "csv",
        "preview",
        target.to_str().expect("path utf8"),
        "x",
    ]);
    assert!(!output.status.success());
}
