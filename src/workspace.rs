use crate::config::ReplacerConfig;
use crate::engine;
use crate::model::FileDescriptor;
use crate::security;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use globset::Glob;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Directory-backed view of the replaceable files under the workspace
/// root. Scans are performed fresh on each call; the state layer owns any
/// caching of file contents.
pub struct FileWorkspace {
    config: Arc<ReplacerConfig>,
}

impl FileWorkspace {
    pub fn new(config: Arc<ReplacerConfig>) -> Self {
        Self { config }
    }

    /// Enumerate workspace files with a supported extension, sorted by
    /// relative path.
    pub fn scan(&self) -> Result<Vec<FileDescriptor>> {
        let mut out = Vec::new();
        for path in self.scan_paths()? {
            out.push(self.describe(&path)?);
        }
        Ok(out)
    }

    /// Workspace files whose relative path matches `glob`, in scan order.
    pub fn matching(&self, glob: &str) -> Result<Vec<PathBuf>> {
        let matcher = Glob::new(glob)?.compile_matcher();
        let paths = self
            .scan_paths()?
            .into_iter()
            .filter(|path| {
                let relative = path
                    .strip_prefix(&self.config.workspace_root)
                    .unwrap_or(path);
                matcher.is_match(relative)
            })
            .collect();
        Ok(paths)
    }

    /// Resolve a caller-supplied target path and enforce the workspace
    /// boundary.
    pub fn resolve_target(
        &self,
        raw: &Path,
        op: &'static str,
        field: &'static str,
    ) -> Result<PathBuf> {
        let resolved = self.config.resolve_user_path(raw);
        security::enforce_within_workspace(&self.config.workspace_root, &resolved, op, field)
    }

    /// Render `path` relative to the workspace root with forward slashes.
    /// Resolved targets are canonical, so both spellings of the root are
    /// tried before falling back to the full path.
    pub fn relative_display(&self, path: &Path) -> String {
        if let Ok(relative) = path.strip_prefix(&self.config.workspace_root) {
            return path_to_forward_slashes(relative);
        }
        if let Ok(root) = self.config.workspace_root.canonicalize()
            && let Ok(relative) = path.strip_prefix(&root)
        {
            return path_to_forward_slashes(relative);
        }
        path_to_forward_slashes(path)
    }

    fn scan_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.config.workspace_root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !has_supported_extension(&self.config.supported_extensions, path) {
                continue;
            }
            paths.push(path.to_path_buf());
        }
        paths.sort();
        Ok(paths)
    }

    fn describe(&self, path: &Path) -> Result<FileDescriptor> {
        let metadata = fs::metadata(path)?;
        let raw = fs::read(path)?;
        Ok(FileDescriptor {
            path: self.relative_display(path),
            bytes: metadata.len(),
            last_modified: metadata.modified().ok().and_then(system_time_to_rfc3339),
            digest: engine::digest_hex(&raw),
        })
    }
}

pub fn path_to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn system_time_to_rfc3339(time: SystemTime) -> Option<String> {
    let datetime: DateTime<Utc> = time.into();
    Some(datetime.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn has_supported_extension(allowed: &[String], path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            allowed.iter().any(|candidate| candidate == &lower)
        })
        .unwrap_or(false)
}
