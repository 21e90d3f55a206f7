use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a scheduled replacement job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which occurrences of the search pattern get rewritten.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReplaceMode {
    /// Only the leftmost occurrence.
    First,
    /// Every non-overlapping occurrence, left to right.
    #[default]
    All,
}

/// How the search text is interpreted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PatternKind {
    #[default]
    Literal,
    Regex,
}

/// A workspace file as reported by `list_files`.
#[derive(Debug, Clone, Serialize)]
pub struct FileDescriptor {
    pub path: String,
    pub bytes: u64,
    pub last_modified: Option<String>,
    pub digest: String,
}

/// Final report of a completed replacement job.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaceOutcome {
    pub path: String,
    pub replacements: usize,
    pub modified: bool,
    pub bytes_before: u64,
    pub bytes_after: u64,
    pub digest_before: String,
    pub digest_after: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobState {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_finished(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// Registry view of a job, kept for polling after the handle is consumed.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub job_id: JobId,
    pub path: String,
    pub state: JobState,
    pub submitted_at: String,
    pub finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacements: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Position of a single match, as reported by preview.
#[derive(Debug, Clone, Serialize)]
pub struct MatchLocation {
    pub line: usize,
    pub column: usize,
    pub excerpt: String,
}
