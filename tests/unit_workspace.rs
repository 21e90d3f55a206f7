use file_replace::config::{ConfigArgs, ReplacerConfig};
use file_replace::engine;
use file_replace::ops::{ListFilesParams, list_files};
use file_replace::workspace::FileWorkspace;
use std::sync::Arc;

mod support;

#[test]
fn scan_filters_by_extension_and_sorts_by_path() {
    let workspace = support::TestWorkspace::new();
    workspace.create_file("b.svg", "<svg/>");
    workspace.create_file("a.txt", "text");
    workspace.create_file("nested/c.xml", "<x/>");
    workspace.create_file("ignore.bin", "binary");
    let files = FileWorkspace::new(Arc::new(workspace.config()))
        .scan()
        .expect("scan");

    let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "b.svg", "nested/c.xml"]);
}

#[test]
fn scan_reports_bytes_and_content_digest() {
    let workspace = support::TestWorkspace::new();
    workspace.create_file("a.txt", "hello");
    let files = FileWorkspace::new(Arc::new(workspace.config()))
        .scan()
        .expect("scan");

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].bytes, 5);
    assert_eq!(files[0].digest, engine::digest_hex(b"hello"));
    assert!(files[0].last_modified.is_some());
}

#[test]
fn matching_narrows_to_glob() {
    let workspace = support::TestWorkspace::new();
    workspace.create_file("icons/a.svg", "<svg/>");
    workspace.create_file("icons/b.svg", "<svg/>");
    workspace.create_file("docs/readme.txt", "hi");
    let fs_workspace = FileWorkspace::new(Arc::new(workspace.config()));

    let matched = fs_workspace.matching("icons/*.svg").expect("glob");
    assert_eq!(matched.len(), 2);
    assert!(
        matched
            .iter()
            .all(|p| p.extension().and_then(|e| e.to_str()) == Some("svg"))
    );
}

#[tokio::test(flavor = "current_thread")]
async fn list_files_op_applies_optional_glob() {
    let workspace = support::TestWorkspace::new();
    workspace.create_file("keep.svg", "<svg/>");
    workspace.create_file("drop.txt", "text");
    let state = workspace.state();

    let all = list_files(&state, ListFilesParams { glob: None })
        .await
        .expect("list");
    assert_eq!(all.files.len(), 2);

    let narrowed = list_files(
        &state,
        ListFilesParams {
            glob: Some("*.svg".to_string()),
        },
    )
    .await
    .expect("list with glob");
    assert_eq!(narrowed.files.len(), 1);
    assert_eq!(narrowed.files[0].path, "keep.svg");
}

#[test]
fn config_defaults_apply_when_nothing_is_provided() {
    let config = ReplacerConfig::from_args(ConfigArgs::default()).expect("defaults");
    assert_eq!(config.workspace_root, std::path::PathBuf::from("."));
    assert!(config.supported_extensions.contains(&"svg".to_string()));
    assert_eq!(config.max_concurrent_jobs, 4);
    assert_eq!(config.job_ttl_secs, 3600);
}

#[test]
fn config_file_values_yield_to_cli_flags() {
    let workspace = support::TestWorkspace::new();
    let config_path = workspace.create_file(
        "config.yaml",
        "max_concurrent_jobs: 9\nextensions:\n  - svg\n  - \".TXT\"\n",
    );

    let args = ConfigArgs {
        config: Some(config_path),
        max_file_bytes: Some(512),
        ..ConfigArgs::default()
    };
    let config = ReplacerConfig::from_args(args).expect("merge");

    assert_eq!(config.max_concurrent_jobs, 9);
    assert_eq!(config.max_file_bytes, 512);
    assert_eq!(config.supported_extensions, vec!["svg", "txt"]);
}
