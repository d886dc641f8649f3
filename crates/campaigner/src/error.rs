//! Error types for campaigner operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::remote::RemoteError;

/// Top-level error aggregating every module's failure modes.
#[derive(Error, Debug)]
pub enum CampaignerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Campaign(#[from] CampaignError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type Result<T> = std::result::Result<T, CampaignerError>;

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Invalid config: {message}")]
    Validation { message: String },

    #[error("API token not found in environment variable '{env_var}'")]
    TokenNotFound { env_var: String },
}

/// Errors from reading rows and transforming them into recipients.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The file had no usable header row.
    #[error("The file has no header row")]
    MissingHeaderRow,

    /// No column is mapped to the phone target, so no row can become a
    /// recipient.
    #[error("No column is mapped to the phone field")]
    MissingPhoneMapping,

    /// Raised instead of collecting a row error when skipping invalid
    /// rows is disabled.
    #[error("Row {row} is invalid: {reason}")]
    InvalidRow { row: usize, reason: String },
}

/// Errors from media slot management and uploads.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Media slot {index} is out of range (board has {len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("Media slot {index} has no file to upload")]
    NothingToUpload { index: usize },

    /// A handle was requested from a slot that has none yet.
    #[error("Media slot {index} has no uploaded handle")]
    SlotUnresolved { index: usize },

    /// A per-recipient board must carry one slot per recipient.
    #[error("Board has {slots} media slot(s) for {recipients} recipient(s)")]
    RecipientCountMismatch { slots: usize, recipients: usize },

    #[error("Upload failed for media slot {index}: {source}")]
    Upload {
        index: usize,
        #[source]
        source: RemoteError,
    },
}

/// Errors from the bulk-import submit/poll cycle.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The service no longer knows the job id. Not retried.
    #[error("Import job '{0}' not found")]
    JobNotFound(String),

    #[error("Failed to submit import: {0}")]
    Submit(#[source] RemoteError),
}

/// Errors from the campaign lifecycle.
#[derive(Error, Debug)]
pub enum CampaignError {
    /// An operation that needs a persisted campaign ran before create.
    #[error("Campaign has not been created yet")]
    NotCreated,

    /// The verification read after attachment found zero recipients.
    #[error("Campaign has no recipients")]
    NoRecipients,

    #[error("Scheduled execution requires a schedule time")]
    MissingScheduleTime,

    #[error("Schedule time must be in the future")]
    ScheduleTimeNotFuture,

    /// Execution was requested while media slots are still unresolved.
    #[error("{pending} media slot(s) are not uploaded yet")]
    MediaUnresolved { pending: usize },

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Store(#[from] RemoteError),
}

/// Errors from the wizard state machine.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Cannot advance from {step}: {reason}")]
    StepIncomplete { step: String, reason: String },

    /// An operation was invoked on a step it does not belong to.
    #[error("Operation is not valid on step {step}")]
    WrongStep { step: String },

    /// Template-dependent state was touched before a template was chosen.
    #[error("No template has been selected")]
    NoTemplate,
}
