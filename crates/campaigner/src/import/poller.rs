use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::error::ImportError;
use crate::media::LocalFile;
use crate::remote::BulkImportService;

use super::job::{ImportCounts, ImportJob, ImportJobStatus};

/// Retry policy for the polling loop, injectable for testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 120,
            interval: Duration::from_secs(1),
        }
    }
}

impl PollPolicy {
    /// Zero-delay policy for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            interval: Duration::ZERO,
        }
    }
}

/// Cancellation flag shared with the caller, so abandoning the wizard
/// session stops the loop instead of orphaning a timer.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Terminal result of a polling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Success(ImportCounts),
    /// The import service reported failure; the message is surfaced as-is.
    Failed(String),
    /// Attempt budget exhausted without a terminal state. Not a failure:
    /// the job continues server-side and polling may resume later.
    StillProcessing { attempts: u32 },
    Cancelled,
}

/// Polls a bulk import job until a terminal state, cancellation, or the
/// attempt budget runs out.
pub struct ImportPoller<'a, S: BulkImportService + ?Sized> {
    service: &'a S,
    policy: PollPolicy,
}

impl<'a, S: BulkImportService + ?Sized> ImportPoller<'a, S> {
    pub fn new(service: &'a S, policy: PollPolicy) -> Self {
        Self { service, policy }
    }

    /// Submits a bulk file, returning the job id to poll.
    pub async fn submit(&self, file: &LocalFile) -> Result<String, ImportError> {
        let job_id = self
            .service
            .submit_import(file)
            .await
            .map_err(ImportError::Submit)?;
        info!("submitted bulk import '{}' as job {}", file.name, job_id);
        Ok(job_id)
    }

    /// Polls the job on the policy's interval.
    ///
    /// Transport errors are logged and consume an attempt; a "job not
    /// found" response is fatal and aborts immediately. The loop runs at
    /// most `max_attempts` iterations regardless of server behavior.
    pub async fn poll<F>(
        &self,
        job_id: &str,
        cancel: &CancelFlag,
        mut on_status: F,
    ) -> Result<PollOutcome, ImportError>
    where
        F: FnMut(&ImportJob),
    {
        for attempt in 1..=self.policy.max_attempts {
            if cancel.is_cancelled() {
                info!("polling of job {} cancelled after {} attempts", job_id, attempt - 1);
                return Ok(PollOutcome::Cancelled);
            }

            match self.service.import_job_status(job_id).await {
                Ok(job) => {
                    debug!("job {} attempt {}: {:?}", job_id, attempt, job.status);
                    on_status(&job);
                    match job.status {
                        ImportJobStatus::Success => {
                            return Ok(PollOutcome::Success(job.counts));
                        }
                        ImportJobStatus::Failed => {
                            let message = job
                                .error
                                .unwrap_or_else(|| "Import failed".to_string());
                            return Ok(PollOutcome::Failed(message));
                        }
                        _ => {}
                    }
                }
                Err(error) if error.is_not_found() => {
                    // The job expired or was cancelled server-side.
                    return Err(ImportError::JobNotFound(job_id.to_string()));
                }
                Err(error) => {
                    warn!("job {} status check failed (attempt {}): {}", job_id, attempt, error);
                }
            }

            // No wait after the final attempt; the caller gets the soft
            // timeout as soon as the budget is spent.
            if attempt < self.policy.max_attempts && !self.policy.interval.is_zero() {
                tokio::time::sleep(self.policy.interval).await;
            }
        }

        info!(
            "job {} still processing after {} attempts, check back later",
            job_id, self.policy.max_attempts
        );
        Ok(PollOutcome::StillProcessing {
            attempts: self.policy.max_attempts,
        })
    }
}
