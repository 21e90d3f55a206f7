use anyhow::Result;
use serde_json::Value;
use std::path::PathBuf;

use crate::config::ConfigArgs;
use crate::model::{PatternKind, ReplaceMode};
use crate::ops;
use crate::ops::{ReplaceInFileParams, ReplaceManyParams};
use crate::runtime::StatelessRuntime;

pub async fn replace(
    config: ConfigArgs,
    file: PathBuf,
    from: String,
    to: String,
    mode: ReplaceMode,
    pattern: PatternKind,
) -> Result<Value> {
    let runtime = StatelessRuntime;
    let (state, absolute) = runtime.state_for_file(&file, &config)?;
    let response = ops::replace_in_file(
        &state,
        ReplaceInFileParams {
            path: absolute.to_string_lossy().into_owned(),
            from,
            to,
            mode,
            pattern,
        },
    )
    .await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn batch(
    config: ConfigArgs,
    glob: String,
    from: String,
    to: String,
    mode: ReplaceMode,
    pattern: PatternKind,
) -> Result<Value> {
    let runtime = StatelessRuntime;
    let state = runtime.state_for_workspace(&config)?;
    let response = ops::replace_many(
        &state,
        ReplaceManyParams {
            glob,
            from,
            to,
            mode,
            pattern,
        },
    )
    .await?;
    Ok(serde_json::to_value(response)?)
}
