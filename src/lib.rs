pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod jobs;
pub mod model;
pub mod ops;
pub mod runtime;
pub mod security;
pub mod state;
pub mod workspace;

pub use config::{ConfigArgs, ReplacerConfig};
pub use errors::{InvalidParamsError, ReplaceError};
pub use jobs::{JobHandle, JobRegistry};
pub use model::{JobId, JobRecord, JobState, PatternKind, ReplaceMode, ReplaceOutcome};
pub use state::ReplacerState;
