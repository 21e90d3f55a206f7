pub mod files;
pub mod jobs;
pub mod preview;
pub mod replace;

pub use files::{FileListResponse, ListFilesParams, list_files};
pub use jobs::{JobStatusParams, ListJobsResponse, job_status, list_jobs};
pub use preview::{PreviewParams, PreviewResponse, preview_replace};
pub use replace::{
    ReplaceInFileParams, ReplaceManyParams, ReplaceManyResponse, ReplaceScheduled,
    replace_in_file, replace_many, schedule_replace,
};
