use async_trait::async_trait;

use crate::campaign::{Campaign, CampaignDraft, ExecuteRequest};
use crate::import::ImportJob;
use crate::mapping::ContactField;
use crate::media::{LocalFile, MediaHandle};
use crate::recipient::Recipient;
use crate::template::Template;

use super::error::RemoteError;
use super::types::{ContactPage, PreviewMessage, TagSummary};

/// Read access to approved message templates for a channel identity.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn approved_templates(&self, channel_id: &str) -> Result<Vec<Template>, RemoteError>;
}

/// Contact, tag and custom-field listings.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn contacts_page(&self, page: u32, page_size: u32)
        -> Result<ContactPage, RemoteError>;

    async fn tags(&self) -> Result<Vec<TagSummary>, RemoteError>;

    async fn contact_fields(&self) -> Result<Vec<ContactField>, RemoteError>;
}

/// The external bulk-import service.
#[async_trait]
pub trait BulkImportService: Send + Sync {
    /// Submits a file, returning the import job id.
    async fn submit_import(&self, file: &LocalFile) -> Result<String, RemoteError>;

    async fn import_job_status(&self, job_id: &str) -> Result<ImportJob, RemoteError>;
}

/// The media store: file in, opaque handle out.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload_media(&self, file: &LocalFile) -> Result<MediaHandle, RemoteError>;
}

/// Create/update/read campaigns, attach recipients and trigger execution.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn create_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, RemoteError>;

    async fn update_campaign(
        &self,
        id: &str,
        draft: &CampaignDraft,
    ) -> Result<Campaign, RemoteError>;

    async fn fetch_campaign(&self, id: &str) -> Result<Campaign, RemoteError>;

    /// Verification read used after recipient attachment.
    async fn recipient_count(&self, id: &str) -> Result<u64, RemoteError>;

    /// Appends recipients and/or a tag-based segment to the campaign.
    async fn attach_recipients(
        &self,
        id: &str,
        recipients: &[Recipient],
        tag_ids: &[String],
    ) -> Result<(), RemoteError>;

    async fn execute_campaign(
        &self,
        id: &str,
        request: &ExecuteRequest,
    ) -> Result<(), RemoteError>;

    /// Rendered message previews for up to `limit` recipients.
    async fn preview_messages(
        &self,
        id: &str,
        limit: u32,
    ) -> Result<Vec<PreviewMessage>, RemoteError>;
}
