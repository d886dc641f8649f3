//! Bulk-import submission and job polling.
//!
//! Submitting a file to the bulk import service yields a job id; the
//! poller then watches job status on a fixed interval with a bounded
//! attempt budget. Exhausting the budget is a soft timeout, not a
//! failure: the external job keeps running and the caller may resume.

pub mod job;
pub mod poller;

pub use job::{ImportCounts, ImportJob, ImportJobStatus};
pub use poller::{CancelFlag, ImportPoller, PollOutcome, PollPolicy};
