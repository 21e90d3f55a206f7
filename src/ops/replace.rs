use crate::engine::{self, SearchPattern};
use crate::errors::ReplaceError;
use crate::jobs::JobHandle;
use crate::model::{JobId, PatternKind, ReplaceMode, ReplaceOutcome};
use crate::state::ReplacerState;
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceInFileParams {
    pub path: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub mode: ReplaceMode,
    #[serde(default)]
    pub pattern: PatternKind,
}

#[derive(Debug, Serialize)]
pub struct ReplaceScheduled {
    pub job_id: JobId,
    pub path: String,
}

/// Validate params, queue the replacement job, and return its completion
/// handle. Pattern problems and workspace escapes reject here, before
/// anything is scheduled.
pub fn schedule_replace(
    state: &Arc<ReplacerState>,
    params: ReplaceInFileParams,
) -> Result<(ReplaceScheduled, JobHandle)> {
    let workspace = state.workspace();
    let resolved = workspace.resolve_target(Path::new(&params.path), "replace", "path")?;
    let pattern = SearchPattern::compile(&params.from, params.pattern)?;
    let display = workspace.relative_display(&resolved);

    let handle = spawn_replace_job(
        state,
        resolved,
        display.clone(),
        pattern,
        params.to,
        params.mode,
    );

    Ok((
        ReplaceScheduled {
            job_id: handle.job_id.clone(),
            path: display,
        },
        handle,
    ))
}

/// Schedule and await in one step: the convenience surface the CLI uses.
pub async fn replace_in_file(
    state: &Arc<ReplacerState>,
    params: ReplaceInFileParams,
) -> Result<ReplaceOutcome> {
    let (_, handle) = schedule_replace(state, params)?;
    Ok(handle.wait().await?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceManyParams {
    pub glob: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub mode: ReplaceMode,
    #[serde(default)]
    pub pattern: PatternKind,
}

#[derive(Debug, Serialize)]
pub struct FileReplaceReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacements: Option<usize>,
    pub modified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceManyResponse {
    pub glob: String,
    pub files: IndexMap<String, FileReplaceReport>,
    pub files_matched: usize,
    pub files_modified: usize,
    pub total_replacements: usize,
}

/// Apply one replacement across every workspace file matching `glob`.
/// Jobs are scheduled up front (the registry semaphore bounds actual
/// parallelism) and reported in discovery order. One file failing does
/// not stop the sweep.
pub async fn replace_many(
    state: &Arc<ReplacerState>,
    params: ReplaceManyParams,
) -> Result<ReplaceManyResponse> {
    let pattern = SearchPattern::compile(&params.from, params.pattern)?;
    let workspace = state.workspace();
    let targets = workspace.matching(&params.glob)?;

    let mut scheduled = Vec::with_capacity(targets.len());
    for path in targets {
        let display = workspace.relative_display(&path);
        let handle = spawn_replace_job(
            state,
            path,
            display.clone(),
            pattern.clone(),
            params.to.clone(),
            params.mode,
        );
        scheduled.push((display, handle));
    }

    let files_matched = scheduled.len();
    let mut files = IndexMap::with_capacity(files_matched);
    let mut files_modified = 0usize;
    let mut total_replacements = 0usize;

    for (display, handle) in scheduled {
        let report = match handle.wait().await {
            Ok(outcome) => {
                if outcome.modified {
                    files_modified += 1;
                }
                total_replacements += outcome.replacements;
                FileReplaceReport {
                    replacements: Some(outcome.replacements),
                    modified: outcome.modified,
                    error: None,
                }
            }
            Err(error) => FileReplaceReport {
                replacements: None,
                modified: false,
                error: Some(error.to_string()),
            },
        };
        files.insert(display, report);
    }

    Ok(ReplaceManyResponse {
        glob: params.glob,
        files,
        files_matched,
        files_modified,
        total_replacements,
    })
}

fn spawn_replace_job(
    state: &Arc<ReplacerState>,
    path: PathBuf,
    display: String,
    pattern: SearchPattern,
    to: String,
    mode: ReplaceMode,
) -> JobHandle {
    let max_file_bytes = state.config().max_file_bytes;
    let cache_state = state.clone();
    let job_path = path.clone();

    state.jobs().schedule(path, move || {
        let outcome = execute_replace(&job_path, &display, &pattern, &to, mode, max_file_bytes)?;
        if outcome.modified {
            cache_state.evict_by_path(&job_path);
        }
        Ok(outcome)
    })
}

fn execute_replace(
    path: &Path,
    display: &str,
    pattern: &SearchPattern,
    to: &str,
    mode: ReplaceMode,
    max_file_bytes: u64,
) -> Result<ReplaceOutcome, ReplaceError> {
    let start = Instant::now();

    let document = engine::load_document(path, max_file_bytes)?;
    let plan = engine::plan_replacement(&document.contents, pattern, to, mode);

    let modified = plan.replacements > 0 && plan.output != document.contents;
    if modified {
        engine::write_atomic(path, &plan.output)?;
        tracing::debug!(
            path = %path.display(),
            replacements = plan.replacements,
            "rewrote file"
        );
    }

    let (bytes_after, digest_after) = if modified {
        (
            plan.output.len() as u64,
            engine::digest_hex(plan.output.as_bytes()),
        )
    } else {
        (document.bytes, document.digest.clone())
    };

    Ok(ReplaceOutcome {
        path: display.to_string(),
        replacements: plan.replacements,
        modified,
        bytes_before: document.bytes,
        bytes_after,
        digest_before: document.digest,
        digest_after,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
