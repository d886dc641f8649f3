//! Remote collaborators: template, contact, bulk import, media and
//! campaign stores, plus the HTTP client implementing all five.

pub mod client;
pub mod error;
pub mod stores;
pub mod types;

pub use client::RemoteClient;
pub use error::RemoteError;
pub use stores::{BulkImportService, CampaignStore, ContactStore, MediaStore, TemplateStore};
pub use types::{Contact, ContactPage, PreviewMessage, TagSummary};
