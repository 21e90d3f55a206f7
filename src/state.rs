use crate::config::ReplacerConfig;
use crate::engine::{self, LoadedDocument};
use crate::jobs::JobRegistry;
use crate::workspace::FileWorkspace;
use anyhow::Result;
use lru::LruCache;
use parking_lot::RwLock;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::task;

/// Shared state behind every operation: configuration, the workspace
/// view, the job registry, and a bounded cache of loaded documents.
pub struct ReplacerState {
    config: Arc<ReplacerConfig>,
    workspace: Arc<FileWorkspace>,
    jobs: Arc<JobRegistry>,
    cache: RwLock<LruCache<PathBuf, Arc<LoadedDocument>>>,
}

impl ReplacerState {
    pub fn new(config: Arc<ReplacerConfig>) -> Self {
        let jobs = JobRegistry::new(config.max_concurrent_jobs, config.job_ttl());
        jobs.clone().start_cleanup_task();

        let capacity = NonZeroUsize::new(config.cache_capacity.max(1)).unwrap();

        Self {
            workspace: Arc::new(FileWorkspace::new(config.clone())),
            jobs,
            cache: RwLock::new(LruCache::new(capacity)),
            config,
        }
    }

    pub fn config(&self) -> Arc<ReplacerConfig> {
        self.config.clone()
    }

    pub fn workspace(&self) -> Arc<FileWorkspace> {
        self.workspace.clone()
    }

    pub fn jobs(&self) -> Arc<JobRegistry> {
        self.jobs.clone()
    }

    /// Load `path` through the document cache. Cached entries are
    /// revalidated against the file's current mtime and reloaded when
    /// stale.
    pub async fn open_document(&self, path: &Path) -> Result<Arc<LoadedDocument>> {
        let key = path.to_path_buf();
        let current_mtime = current_mtime(path);

        {
            let mut cache = self.cache.write();
            if let Some(entry) = cache.get(&key)
                && entry.modified_at == current_mtime
            {
                return Ok(entry.clone());
            }
        }

        let max_file_bytes = self.config.max_file_bytes;
        let load_path = key.clone();
        let document =
            task::spawn_blocking(move || engine::load_document(&load_path, max_file_bytes))
                .await??;
        let document = Arc::new(document);

        let mut cache = self.cache.write();
        cache.put(key, document.clone());
        Ok(document)
    }

    /// Drop any cached snapshot of `path`. Called after a successful
    /// replacement so the next read observes the new content.
    pub fn evict_by_path(&self, path: &Path) {
        self.cache.write().pop(&path.to_path_buf());
    }
}

fn current_mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
