pub mod config;
pub mod error;
pub mod images;
pub mod report;
pub mod runner;
pub mod submissions;

pub use config::Settings;
pub use error::BatchError;
pub use report::{Report, OUTPUT_COLUMNS};
pub use runner::{run_batch, BatchJob, BatchSummary};
pub use submissions::{Submission, SubmissionSheet, SUBMISSION_COLUMN};
