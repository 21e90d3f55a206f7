use file_replace::model::{PatternKind, ReplaceMode};
use file_replace::ops::{ReplaceManyParams, replace_many};

mod support;

fn batch_params(glob: &str, from: &str, to: &str) -> ReplaceManyParams {
    ReplaceManyParams {
        glob: glob.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        mode: ReplaceMode::All,
        pattern: PatternKind::Literal,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn batch_rewrites_every_matching_file() {
    let workspace = support::TestWorkspace::new();
    workspace.create_file("icons/a.svg", "fill=\"#000\" fill=\"#000\"");
    workspace.create_file("icons/b.svg", "fill=\"#000\"");
    workspace.create_file("icons/skip.txt", "fill=\"#000\"");
    let state = workspace.state();

    let response = replace_many(&state, batch_params("icons/*.svg", "#000", "#fff"))
        .await
        .expect("batch");

    assert_eq!(response.files_matched, 2);
    assert_eq!(response.files_modified, 2);
    assert_eq!(response.total_replacements, 3);
    assert_eq!(
        response.files.keys().collect::<Vec<_>>(),
        vec!["icons/a.svg", "icons/b.svg"]
    );
    assert_eq!(workspace.read_file("icons/a.svg"), "fill=\"#fff\" fill=\"#fff\"");
    assert_eq!(workspace.read_file("icons/b.svg"), "fill=\"#fff\"");
    assert_eq!(
        workspace.read_file("icons/skip.txt"),
        "fill=\"#000\"",
        "glob keeps non-matching files untouched"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn batch_records_per_file_failures_without_aborting() {
    let workspace = support::TestWorkspace::new();
    workspace.create_file("a.txt", "old old");
    workspace.create_binary_file("broken.txt", &[0xff, 0xfe, 0x00]);
    workspace.create_file("z.txt", "old");
    let state = workspace.state();

    let response = replace_many(&state, batch_params("*.txt", "old", "new"))
        .await
        .expect("batch resolves even with per-file failures");

    assert_eq!(response.files_matched, 3);
    assert_eq!(response.files_modified, 2);
    assert_eq!(response.total_replacements, 3);

    let broken = &response.files["broken.txt"];
    assert!(!broken.modified);
    assert!(
        broken
            .error
            .as_deref()
            .unwrap_or("")
            .contains("not valid utf-8")
    );

    assert_eq!(workspace.read_file("a.txt"), "new new");
    assert_eq!(workspace.read_file("z.txt"), "new");
}

#[tokio::test(flavor = "current_thread")]
async fn batch_with_no_matches_reports_empty_sweep() {
    let workspace = support::TestWorkspace::new();
    workspace.create_file("a.txt", "content");
    let state = workspace.state();

    let response = replace_many(&state, batch_params("*.svg", "content", "x"))
        .await
        .expect("empty batch");

    assert_eq!(response.files_matched, 0);
    assert!(response.files.is_empty());
    assert_eq!(response.total_replacements, 0);
}
