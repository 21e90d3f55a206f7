use crate::model::FileDescriptor;
use crate::state::ReplacerState;
use anyhow::Result;
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilesParams {
    pub glob: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileDescriptor>,
}

/// Enumerate workspace files, optionally narrowed by a glob over the
/// relative path.
pub async fn list_files(
    state: &Arc<ReplacerState>,
    params: ListFilesParams,
) -> Result<FileListResponse> {
    let matcher = params
        .glob
        .as_deref()
        .map(|glob| Glob::new(glob).map(|g| g.compile_matcher()))
        .transpose()?;

    let workspace = state.workspace();
    let mut files = task::spawn_blocking(move || workspace.scan()).await??;

    if let Some(matcher) = matcher {
        files.retain(|descriptor| matcher.is_match(&descriptor.path));
    }

    Ok(FileListResponse { files })
}
