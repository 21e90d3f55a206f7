use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds surfaced by replacement jobs and document loading.
///
/// Job completion handles reject with one of these; the registry keeps the
/// rendered message for late status polls.
#[derive(Debug, Error)]
pub enum ReplaceError {
    #[error("file not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    #[error("permission denied: '{}'", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("not a regular file: '{}'", path.display())]
    NotAFile { path: PathBuf },

    #[error("file too large: '{}' is {bytes} bytes (limit {limit})", path.display())]
    FileTooLarge {
        path: PathBuf,
        bytes: u64,
        limit: u64,
    },

    #[error("file is not valid utf-8: '{}'", path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("search pattern must not be empty")]
    EmptyPattern,

    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("write failed for '{}' at {stage} stage: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        stage: WriteStage,
        source: std::io::Error,
    },

    #[error("job '{job_id}' not found")]
    JobNotFound { job_id: String },

    #[error("job '{job_id}' was interrupted before reporting a result")]
    Interrupted { job_id: String },

    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ReplaceError {
    /// Map an `io::Error` for `path` onto the matching taxonomy entry.
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Stage of the atomic write that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum WriteStage {
    Create,
    Write,
    Rename,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct InvalidParamsError {
    op: &'static str,
    message: String,
    field: Option<String>,
}

impl InvalidParamsError {
    pub fn new(op: &'static str, message: impl Into<String>) -> Self {
        Self {
            op,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}
