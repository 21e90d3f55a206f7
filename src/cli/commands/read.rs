use anyhow::Result;
use serde_json::Value;
use std::path::PathBuf;

use crate::config::ConfigArgs;
use crate::model::PatternKind;
use crate::ops;
use crate::ops::{ListFilesParams, PreviewParams};
use crate::runtime::StatelessRuntime;

pub async fn preview(
    config: ConfigArgs,
    file: PathBuf,
    from: String,
    pattern: PatternKind,
    max_matches: Option<usize>,
) -> Result<Value> {
    let runtime = StatelessRuntime;
    let (state, absolute) = runtime.state_for_file(&file, &config)?;
    let response = ops::preview_replace(
        &state,
        PreviewParams {
            path: absolute.to_string_lossy().into_owned(),
            from,
            pattern,
            max_matches,
        },
    )
    .await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn list(config: ConfigArgs, glob: Option<String>) -> Result<Value> {
    let runtime = StatelessRuntime;
    let state = runtime.state_for_workspace(&config)?;
    let response = ops::list_files(&state, ListFilesParams { glob }).await?;
    Ok(serde_json::to_value(response)?)
}
