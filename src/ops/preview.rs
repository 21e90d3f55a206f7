use crate::engine::{self, SearchPattern};
use crate::model::{MatchLocation, PatternKind};
use crate::state::ReplacerState;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

const DEFAULT_MAX_MATCHES: usize = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewParams {
    pub path: String,
    pub from: String,
    #[serde(default)]
    pub pattern: PatternKind,
    pub max_matches: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub path: String,
    pub match_count: usize,
    pub truncated: bool,
    pub matches: Vec<MatchLocation>,
}

/// Dry run: count matches and report positions without touching the file.
pub async fn preview_replace(
    state: &Arc<ReplacerState>,
    params: PreviewParams,
) -> Result<PreviewResponse> {
    let workspace = state.workspace();
    let resolved = workspace.resolve_target(Path::new(&params.path), "preview", "path")?;
    let pattern = SearchPattern::compile(&params.from, params.pattern)?;
    let limit = params.max_matches.unwrap_or(DEFAULT_MAX_MATCHES).max(1);

    let document = state.open_document(&resolved).await?;
    let (match_count, matches) = engine::locate_matches(&document.contents, &pattern, limit);

    Ok(PreviewResponse {
        path: workspace.relative_display(&resolved),
        match_count,
        truncated: match_count > matches.len(),
        matches,
    })
}
