pub mod campaign;
pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod mapping;
pub mod media;
pub mod recipient;
pub mod remote;
pub mod template;
pub mod wizard;

pub use campaign::{Campaign, CampaignDraft, CampaignManager, CampaignStatus, ExecuteMode};
pub use config::{load_config, Config};
pub use error::{
    CampaignError, CampaignerError, ConfigError, ImportError, MediaError, Result, TransformError,
    WizardError,
};
pub use import::{CancelFlag, ImportPoller, PollOutcome, PollPolicy};
pub use mapping::{auto_map, ColumnMapping, ContactField, MappingProposal, TargetKey};
pub use media::{LocalFile, MediaHandle, MediaUploader, SlotBoard};
pub use recipient::{transform, Recipient, RowError, TransformOptions, TransformOutcome};
pub use remote::{RemoteClient, RemoteError};
pub use template::{extract_schema, TemplateSchema};
pub use wizard::{AudienceSelection, WizardState, WizardStep};
