#![allow(dead_code)]
use file_replace::config::ReplacerConfig;
use file_replace::state::ReplacerState;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestWorkspace {
    _tmp: TempDir,
    root: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().to_path_buf();
        Self { _tmp: tmp, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn create_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn create_binary_file(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).expect("read fixture")
    }

    pub fn config(&self) -> ReplacerConfig {
        ReplacerConfig {
            workspace_root: self.root.clone(),
            supported_extensions: vec!["svg".into(), "txt".into(), "xml".into()],
            max_file_bytes: 1024 * 1024,
            max_concurrent_jobs: 2,
            job_ttl_secs: 3600,
            cache_capacity: 4,
        }
    }

    pub fn config_with(&self, adjust: impl FnOnce(&mut ReplacerConfig)) -> ReplacerConfig {
        let mut config = self.config();
        adjust(&mut config);
        config
    }

    pub fn state(&self) -> Arc<ReplacerState> {
        app_state_with_config(self.config())
    }
}

pub fn app_state_with_config(config: ReplacerConfig) -> Arc<ReplacerState> {
    Arc::new(ReplacerState::new(Arc::new(config)))
}
