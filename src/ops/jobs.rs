use crate::model::{JobId, JobRecord};
use crate::state::ReplacerState;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusParams {
    pub job_id: String,
}

pub async fn job_status(state: &Arc<ReplacerState>, params: JobStatusParams) -> Result<JobRecord> {
    Ok(state.jobs().status(&JobId(params.job_id))?)
}

#[derive(Debug, Serialize)]
pub struct ListJobsResponse {
    pub jobs: Vec<JobRecord>,
}

pub async fn list_jobs(state: &Arc<ReplacerState>) -> Result<ListJobsResponse> {
    Ok(ListJobsResponse {
        jobs: state.jobs().list(),
    })
}
