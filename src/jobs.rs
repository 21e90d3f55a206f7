use crate::errors::ReplaceError;
use crate::model::{JobId, JobRecord, JobState, ReplaceOutcome};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, oneshot};
use tokio::task;
use tokio_util::sync::CancellationToken;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Tracks every scheduled replacement job from submission until its entry
/// expires. Execution happens on the blocking pool, bounded by a
/// semaphore; completion is delivered through a oneshot handle and also
/// recorded here for later status polls.
pub struct JobRegistry {
    entries: RwLock<HashMap<JobId, JobEntry>>,
    semaphore: Arc<Semaphore>,
    ttl: Duration,
    cancel: CancellationToken,
}

#[derive(Debug, Clone)]
struct JobEntry {
    path: PathBuf,
    state: JobState,
    submitted_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    replacements: Option<usize>,
    error: Option<String>,
}

/// Completion handle for one job. Resolved or rejected exactly once;
/// awaiting it consumes the handle, and the registry stays available for
/// anyone polling by id afterwards.
#[derive(Debug)]
pub struct JobHandle {
    pub job_id: JobId,
    rx: oneshot::Receiver<Result<ReplaceOutcome, ReplaceError>>,
}

impl JobHandle {
    pub async fn wait(self) -> Result<ReplaceOutcome, ReplaceError> {
        let job_id = self.job_id;
        self.rx.await.unwrap_or_else(|_| {
            Err(ReplaceError::Interrupted {
                job_id: job_id.to_string(),
            })
        })
    }
}

impl JobRegistry {
    pub fn new(max_concurrent_jobs: usize, ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            entries: RwLock::new(HashMap::new()),
            semaphore: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
            ttl,
            cancel: CancellationToken::new(),
        })
    }

    /// Queue `work` for execution and return the job's completion handle.
    pub fn schedule<F>(self: &Arc<Self>, path: PathBuf, work: F) -> JobHandle
    where
        F: FnOnce() -> Result<ReplaceOutcome, ReplaceError> + Send + 'static,
    {
        let job_id = JobId::generate();
        self.entries.write().insert(
            job_id.clone(),
            JobEntry {
                path: path.clone(),
                state: JobState::Queued,
                submitted_at: Utc::now(),
                finished_at: None,
                replacements: None,
                error: None,
            },
        );

        let (tx, rx) = oneshot::channel();
        let registry = self.clone();
        let id = job_id.clone();
        tokio::spawn(async move {
            let result = registry.run_one(&id, work).await;
            registry.record_finished(&id, &result);
            // Receiver may have been dropped; the registry entry is the
            // durable record either way.
            let _ = tx.send(result);
        });

        tracing::debug!(job_id = %job_id, path = %path.display(), "replacement job queued");
        JobHandle { job_id, rx }
    }

    async fn run_one<F>(&self, job_id: &JobId, work: F) -> Result<ReplaceOutcome, ReplaceError>
    where
        F: FnOnce() -> Result<ReplaceOutcome, ReplaceError> + Send + 'static,
    {
        let permit = match self.semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                return Err(ReplaceError::Interrupted {
                    job_id: job_id.to_string(),
                });
            }
        };

        self.mark_running(job_id);
        let joined = task::spawn_blocking(work).await;
        drop(permit);

        joined.unwrap_or_else(|join_error| {
            tracing::warn!(job_id = %job_id, %join_error, "replacement job panicked");
            Err(ReplaceError::Interrupted {
                job_id: job_id.to_string(),
            })
        })
    }

    fn mark_running(&self, job_id: &JobId) {
        if let Some(entry) = self.entries.write().get_mut(job_id) {
            entry.state = JobState::Running;
        }
    }

    fn record_finished(&self, job_id: &JobId, result: &Result<ReplaceOutcome, ReplaceError>) {
        let mut entries = self.entries.write();
        let Some(entry) = entries.get_mut(job_id) else {
            return;
        };
        entry.finished_at = Some(Utc::now());
        match result {
            Ok(outcome) => {
                entry.state = JobState::Completed;
                entry.replacements = Some(outcome.replacements);
            }
            Err(error) => {
                entry.state = JobState::Failed;
                entry.error = Some(error.to_string());
            }
        }
    }

    pub fn status(&self, job_id: &JobId) -> Result<JobRecord, ReplaceError> {
        self.entries
            .read()
            .get(job_id)
            .map(|entry| entry.to_record(job_id))
            .ok_or_else(|| ReplaceError::JobNotFound {
                job_id: job_id.to_string(),
            })
    }

    pub fn list(&self) -> Vec<JobRecord> {
        let entries = self.entries.read();
        let mut records: Vec<JobRecord> = entries
            .iter()
            .map(|(id, entry)| entry.to_record(id))
            .collect();
        records.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        records
    }

    /// Spawn the background task that purges finished entries past their
    /// TTL. Runs until `shutdown` is called.
    pub fn start_cleanup_task(self: Arc<Self>) {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tick.tick() => self.purge_expired(Utc::now()),
                }
            }
        });
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| {
            !(entry.state.is_finished()
                && entry
                    .finished_at
                    .is_some_and(|finished| now - finished > ttl))
        });
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, "purged expired job records");
        }
    }
}

impl JobEntry {
    fn to_record(&self, job_id: &JobId) -> JobRecord {
        JobRecord {
            job_id: job_id.clone(),
            path: self.path.display().to_string(),
            state: self.state,
            submitted_at: self.submitted_at.to_rfc3339(),
            finished_at: self.finished_at.map(|t| t.to_rfc3339()),
            replacements: self.replacements,
            error: self.error.clone(),
        }
    }
}
