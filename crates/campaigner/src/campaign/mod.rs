//! Campaign lifecycle: draft creation, recipient attachment and execution.

pub mod lifecycle;
pub mod model;

pub use lifecycle::CampaignManager;
pub use model::{Campaign, CampaignDraft, CampaignStatus, ExecuteMode, ExecuteRequest};
