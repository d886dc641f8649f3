//! In-memory implementation of the remote stores for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use campaigner::campaign::{
    Campaign, CampaignDraft, CampaignStatus, ExecuteRequest,
};
use campaigner::import::{ImportCounts, ImportJob, ImportJobStatus};
use campaigner::mapping::ContactField;
use campaigner::media::{LocalFile, MediaHandle};
use campaigner::recipient::Recipient;
use campaigner::remote::{
    BulkImportService, CampaignStore, ContactPage, ContactStore, MediaStore, PreviewMessage,
    RemoteError, TagSummary, TemplateStore,
};
use campaigner::template::Template;

use super::builders::default_contact_fields;

/// One stored campaign with everything attached to it.
#[derive(Default)]
pub struct StoredCampaign {
    pub draft: CampaignDraft,
    pub recipients: Vec<Recipient>,
    pub tag_ids: Vec<String>,
    pub executes: Vec<ExecuteRequest>,
}

/// In-memory remote backend implementing all five store traits.
#[derive(Default)]
pub struct FakeRemote {
    pub templates: Mutex<Vec<Template>>,
    pub tags: Mutex<Vec<TagSummary>>,
    campaigns: Mutex<HashMap<String, StoredCampaign>>,
    campaign_seq: AtomicUsize,
    pub media_uploads: AtomicUsize,
    media_seq: AtomicUsize,
    /// Scripted status responses for import jobs, popped per call. When
    /// exhausted, the job reports running.
    import_script: Mutex<Vec<ImportJob>>,
    import_calls: AtomicUsize,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: Vec<Template>) -> Self {
        let remote = Self::default();
        *remote.templates.lock().unwrap() = templates;
        remote
    }

    pub fn script_import(&self, mut statuses: Vec<ImportJob>) {
        statuses.reverse();
        *self.import_script.lock().unwrap() = statuses;
    }

    pub fn import_status_calls(&self) -> usize {
        self.import_calls.load(Ordering::SeqCst)
    }

    pub fn media_upload_count(&self) -> usize {
        self.media_uploads.load(Ordering::SeqCst)
    }

    pub fn with_campaign<T>(&self, id: &str, f: impl FnOnce(&StoredCampaign) -> T) -> Option<T> {
        self.campaigns.lock().unwrap().get(id).map(f)
    }

    fn as_campaign(&self, id: &str, stored: &StoredCampaign) -> Campaign {
        Campaign {
            id: id.to_string(),
            name: stored.draft.name.clone(),
            status: if stored.executes.is_empty() {
                CampaignStatus::Draft
            } else {
                CampaignStatus::Executing
            },
            template_id: stored.draft.template_id.clone(),
            scheduled_at: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub fn import_job(id: &str, status: ImportJobStatus, imported: u64, failed: u64) -> ImportJob {
    ImportJob {
        id: id.to_string(),
        status,
        counts: ImportCounts {
            total: imported + failed,
            imported,
            failed,
        },
        error: None,
    }
}

#[async_trait]
impl TemplateStore for FakeRemote {
    async fn approved_templates(&self, _channel_id: &str) -> Result<Vec<Template>, RemoteError> {
        Ok(self.templates.lock().unwrap().clone())
    }
}

#[async_trait]
impl ContactStore for FakeRemote {
    async fn contacts_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<ContactPage, RemoteError> {
        Ok(ContactPage {
            contacts: vec![],
            total: 0,
            page,
            page_size,
        })
    }

    async fn tags(&self) -> Result<Vec<TagSummary>, RemoteError> {
        Ok(self.tags.lock().unwrap().clone())
    }

    async fn contact_fields(&self) -> Result<Vec<ContactField>, RemoteError> {
        Ok(default_contact_fields())
    }
}

#[async_trait]
impl BulkImportService for FakeRemote {
    async fn submit_import(&self, file: &LocalFile) -> Result<String, RemoteError> {
        Ok(format!("import-{}", file.name))
    }

    async fn import_job_status(&self, job_id: &str) -> Result<ImportJob, RemoteError> {
        self.import_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .import_script
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| import_job(job_id, ImportJobStatus::Running, 0, 0)))
    }
}

#[async_trait]
impl MediaStore for FakeRemote {
    async fn upload_media(&self, file: &LocalFile) -> Result<MediaHandle, RemoteError> {
        self.media_uploads.fetch_add(1, Ordering::SeqCst);
        let n = self.media_seq.fetch_add(1, Ordering::SeqCst);
        Ok(MediaHandle(format!("media-{}-{}", n, file.name)))
    }
}

#[async_trait]
impl CampaignStore for FakeRemote {
    async fn create_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, RemoteError> {
        let id = format!("camp-{}", self.campaign_seq.fetch_add(1, Ordering::SeqCst) + 1);
        let stored = StoredCampaign {
            draft: draft.clone(),
            ..StoredCampaign::default()
        };
        let campaign = self.as_campaign(&id, &stored);
        self.campaigns.lock().unwrap().insert(id, stored);
        Ok(campaign)
    }

    async fn update_campaign(
        &self,
        id: &str,
        draft: &CampaignDraft,
    ) -> Result<Campaign, RemoteError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        let stored = campaigns
            .get_mut(id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        stored.draft = draft.clone();
        let campaign = self.as_campaign(id, stored);
        Ok(campaign)
    }

    async fn fetch_campaign(&self, id: &str) -> Result<Campaign, RemoteError> {
        let campaigns = self.campaigns.lock().unwrap();
        let stored = campaigns
            .get(id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        Ok(self.as_campaign(id, stored))
    }

    async fn recipient_count(&self, id: &str) -> Result<u64, RemoteError> {
        let campaigns = self.campaigns.lock().unwrap();
        let stored = campaigns
            .get(id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        // Tag segments resolve server-side; count each tag as one here.
        Ok((stored.recipients.len() + stored.tag_ids.len()) as u64)
    }

    async fn attach_recipients(
        &self,
        id: &str,
        recipients: &[Recipient],
        tag_ids: &[String],
    ) -> Result<(), RemoteError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        let stored = campaigns
            .get_mut(id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        stored.recipients.extend_from_slice(recipients);
        stored.tag_ids.extend_from_slice(tag_ids);
        Ok(())
    }

    async fn execute_campaign(
        &self,
        id: &str,
        request: &ExecuteRequest,
    ) -> Result<(), RemoteError> {
        let mut campaigns = self.campaigns.lock().unwrap();
        let stored = campaigns
            .get_mut(id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        stored.executes.push(request.clone());
        Ok(())
    }

    async fn preview_messages(
        &self,
        id: &str,
        limit: u32,
    ) -> Result<Vec<PreviewMessage>, RemoteError> {
        let campaigns = self.campaigns.lock().unwrap();
        let stored = campaigns
            .get(id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        Ok(stored
            .recipients
            .iter()
            .take(limit as usize)
            .map(|r| PreviewMessage {
                phone: r.phone.clone(),
                rendered: format!("rendered for {}", r.phone),
            })
            .collect())
    }
}
