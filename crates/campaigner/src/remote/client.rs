//! HTTP client for the messaging platform API.
//!
//! One `RemoteClient` implements all five store traits against the
//! platform's REST surface. Every request carries the bearer token and
//! the organization scope; media and import submissions go out as
//! multipart uploads.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::campaign::{Campaign, CampaignDraft, ExecuteRequest};
use crate::config::Config;
use crate::error::ConfigError;
use crate::import::ImportJob;
use crate::mapping::ContactField;
use crate::media::{LocalFile, MediaHandle};
use crate::recipient::Recipient;
use crate::template::Template;

use super::error::RemoteError;
use super::stores::{BulkImportService, CampaignStore, ContactStore, MediaStore, TemplateStore};
use super::types::{ContactPage, PreviewMessage, TagSummary};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error bodies longer than this are truncated before they land in
/// `RemoteError::Api`.
const MAX_ERROR_BODY: usize = 512;

/// Creates an HTTP client with appropriate timeouts.
fn create_http_client() -> Result<Client, RemoteError> {
    Ok(Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()?)
}

pub struct RemoteClient {
    client: Client,
    base_url: String,
    token: String,
    organization_id: String,
}

impl RemoteClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        organization_id: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        let base_url = base_url.into();
        Ok(Self {
            client: create_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            organization_id: organization_id.into(),
        })
    }

    /// Builds a client from config, resolving the token from the
    /// configured environment variable.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let token = config.api_token()?;
        Self::new(&config.api_base_url, token, &config.organization_id).map_err(|e| {
            ConfigError::Validation {
                message: format!("Failed to create HTTP client: {}", e),
            }
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/organizations/{}{}",
            self.base_url, self.organization_id, path
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        debug!("GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        decode_response(response, path).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        decode_response(response, path).await
    }

    async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        debug!("PUT {}", path);
        let response = self
            .client
            .put(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        decode_response(response, path).await
    }

    async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        file: &LocalFile,
    ) -> Result<T, RemoteError> {
        debug!("POST {} (multipart, file '{}')", path, file.name);
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|e| RemoteError::ReadFile {
                name: file.name.clone(),
                source: e,
            })?;

        let content_type = file
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");
        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(content_type)
            .map_err(|e| RemoteError::Decode(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;
        decode_response(response, path).await
    }
}

async fn decode_response<T: DeserializeOwned>(
    response: Response,
    path: &str,
) -> Result<T, RemoteError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(RemoteError::NotFound(path.to_string()));
    }

    if !status.is_success() {
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            body.truncate(MAX_ERROR_BODY);
        }
        return Err(RemoteError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| RemoteError::Decode(format!("{}: {}", path, e)))
}

// Response envelopes the platform wraps some payloads in.

#[derive(serde::Deserialize)]
struct IdEnvelope {
    id: String,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountEnvelope {
    recipient_count: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachBody<'a> {
    recipients: &'a [Recipient],
    tag_ids: &'a [String],
}

#[async_trait]
impl TemplateStore for RemoteClient {
    async fn approved_templates(&self, channel_id: &str) -> Result<Vec<Template>, RemoteError> {
        self.get_json(&format!("/channels/{}/templates?status=APPROVED", channel_id))
            .await
    }
}

#[async_trait]
impl ContactStore for RemoteClient {
    async fn contacts_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<ContactPage, RemoteError> {
        self.get_json(&format!("/contacts?page={}&pageSize={}", page, page_size))
            .await
    }

    async fn tags(&self) -> Result<Vec<TagSummary>, RemoteError> {
        self.get_json("/tags").await
    }

    async fn contact_fields(&self) -> Result<Vec<ContactField>, RemoteError> {
        self.get_json("/contact-fields").await
    }
}

#[async_trait]
impl BulkImportService for RemoteClient {
    async fn submit_import(&self, file: &LocalFile) -> Result<String, RemoteError> {
        let envelope: IdEnvelope = self.post_multipart("/imports", file).await?;
        Ok(envelope.id)
    }

    async fn import_job_status(&self, job_id: &str) -> Result<ImportJob, RemoteError> {
        self.get_json(&format!("/imports/{}", job_id)).await
    }
}

#[async_trait]
impl MediaStore for RemoteClient {
    async fn upload_media(&self, file: &LocalFile) -> Result<MediaHandle, RemoteError> {
        let envelope: IdEnvelope = self.post_multipart("/media", file).await?;
        Ok(MediaHandle(envelope.id))
    }
}

#[async_trait]
impl CampaignStore for RemoteClient {
    async fn create_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, RemoteError> {
        self.post_json("/campaigns", draft).await
    }

    async fn update_campaign(
        &self,
        id: &str,
        draft: &CampaignDraft,
    ) -> Result<Campaign, RemoteError> {
        self.put_json(&format!("/campaigns/{}", id), draft).await
    }

    async fn fetch_campaign(&self, id: &str) -> Result<Campaign, RemoteError> {
        self.get_json(&format!("/campaigns/{}", id)).await
    }

    async fn recipient_count(&self, id: &str) -> Result<u64, RemoteError> {
        let envelope: CountEnvelope = self
            .get_json(&format!("/campaigns/{}/recipients/count", id))
            .await?;
        Ok(envelope.recipient_count)
    }

    async fn attach_recipients(
        &self,
        id: &str,
        recipients: &[Recipient],
        tag_ids: &[String],
    ) -> Result<(), RemoteError> {
        let body = AttachBody {
            recipients,
            tag_ids,
        };
        let _: serde_json::Value = self
            .post_json(&format!("/campaigns/{}/recipients", id), &body)
            .await?;
        Ok(())
    }

    async fn execute_campaign(
        &self,
        id: &str,
        request: &ExecuteRequest,
    ) -> Result<(), RemoteError> {
        let _: serde_json::Value = self
            .post_json(&format!("/campaigns/{}/execute", id), request)
            .await?;
        Ok(())
    }

    async fn preview_messages(
        &self,
        id: &str,
        limit: u32,
    ) -> Result<Vec<PreviewMessage>, RemoteError> {
        self.get_json(&format!("/campaigns/{}/previews?limit={}", id, limit))
            .await
    }
}
