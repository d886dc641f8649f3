//! Campaign lifecycle: create or update the draft, attach the audience,
//! then execute.
//!
//! The manager is deliberately forgetful about remote state beyond the
//! campaign it created: it re-reads nothing it does not need, and treats
//! the recipient-count verification read as advisory when it fails.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::error::CampaignError;
use crate::media::{SlotBoard, SlotLayout};
use crate::recipient::Recipient;
use crate::remote::CampaignStore;

use super::model::{Campaign, CampaignDraft, ExecuteMode, ExecuteRequest};

/// Pause before immediate execution so recipient writes settle
/// server-side.
const DEFAULT_SAFETY_DELAY: Duration = Duration::from_secs(10);

pub struct CampaignManager<'a, S: CampaignStore + ?Sized> {
    store: &'a S,
    campaign: Option<Campaign>,
    safety_delay: Duration,
}

impl<'a, S: CampaignStore + ?Sized> CampaignManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            campaign: None,
            safety_delay: DEFAULT_SAFETY_DELAY,
        }
    }

    pub fn with_safety_delay(store: &'a S, safety_delay: Duration) -> Self {
        Self {
            store,
            campaign: None,
            safety_delay,
        }
    }

    /// Resumes management of a campaign that already exists remotely.
    pub fn resume(store: &'a S, campaign: Campaign) -> Self {
        Self {
            store,
            campaign: Some(campaign),
            safety_delay: DEFAULT_SAFETY_DELAY,
        }
    }

    pub fn campaign(&self) -> Option<&Campaign> {
        self.campaign.as_ref()
    }

    pub fn campaign_id(&self) -> Option<&str> {
        self.campaign.as_ref().map(|c| c.id.as_str())
    }

    /// Creates the campaign on first call, updates it in place afterwards.
    ///
    /// Calling this repeatedly with the same draft is safe; it never
    /// creates a second campaign.
    pub async fn create_or_update(
        &mut self,
        draft: &CampaignDraft,
    ) -> Result<&Campaign, CampaignError> {
        let campaign = match &self.campaign {
            Some(existing) => {
                info!("Updating campaign {}", existing.id);
                self.store.update_campaign(&existing.id, draft).await?
            }
            None => {
                let created = self.store.create_campaign(draft).await?;
                info!("Created campaign {}", created.id);
                created
            }
        };

        self.campaign = Some(campaign);
        Ok(self.campaign.as_ref().expect("campaign was just stored"))
    }

    /// Attaches transformed recipients and/or tag segments, then verifies
    /// the attachment with a count read.
    ///
    /// With a per-recipient media board, each recipient's header params
    /// are filled from the matching slot's handle first, so every slot
    /// must already be uploaded. A failing verification read is logged
    /// and ignored; a successful read of zero is an error, since
    /// executing such a campaign would send nothing.
    pub async fn attach_recipients(
        &self,
        recipients: &[Recipient],
        tag_ids: &[String],
        board: &SlotBoard,
    ) -> Result<(), CampaignError> {
        let campaign = self.campaign.as_ref().ok_or(CampaignError::NotCreated)?;

        if recipients.is_empty() && tag_ids.is_empty() {
            return Err(CampaignError::NoRecipients);
        }

        let mut recipients = recipients.to_vec();
        if board.layout() == SlotLayout::PerRecipient {
            let pending = board.unresolved().len();
            if pending > 0 {
                return Err(CampaignError::MediaUnresolved { pending });
            }
            board.apply_to_recipients(&mut recipients)?;
        }

        self.store
            .attach_recipients(&campaign.id, &recipients, tag_ids)
            .await?;
        info!(
            "Attached {} recipient(s) and {} tag(s) to campaign {}",
            recipients.len(),
            tag_ids.len(),
            campaign.id
        );

        match self.store.recipient_count(&campaign.id).await {
            Ok(0) => Err(CampaignError::NoRecipients),
            Ok(count) => {
                info!("Campaign {} now has {} recipient(s)", campaign.id, count);
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Could not verify recipient count for campaign {}: {}",
                    campaign.id, e
                );
                Ok(())
            }
        }
    }

    /// Executes the campaign in the requested mode.
    ///
    /// All media slots must be resolved first. Scheduled mode requires a
    /// future schedule time. Draft mode leaves the campaign untouched
    /// remotely. Immediate mode waits out the safety delay before the
    /// execute call.
    pub async fn execute(
        &self,
        mode: ExecuteMode,
        scheduled_at: Option<DateTime<Utc>>,
        board: &SlotBoard,
    ) -> Result<(), CampaignError> {
        let campaign = self.campaign.as_ref().ok_or(CampaignError::NotCreated)?;

        let pending = board.unresolved().len();
        if pending > 0 {
            return Err(CampaignError::MediaUnresolved { pending });
        }

        let scheduled_at = match mode {
            ExecuteMode::Scheduled => {
                let at = scheduled_at.ok_or(CampaignError::MissingScheduleTime)?;
                if at <= Utc::now() {
                    return Err(CampaignError::ScheduleTimeNotFuture);
                }
                Some(at)
            }
            ExecuteMode::Immediate | ExecuteMode::Draft => None,
        };

        if mode == ExecuteMode::Draft {
            info!("Campaign {} left as draft", campaign.id);
            return Ok(());
        }

        if mode == ExecuteMode::Immediate && !self.safety_delay.is_zero() {
            info!(
                "Waiting {:?} before executing campaign {}",
                self.safety_delay, campaign.id
            );
            tokio::time::sleep(self.safety_delay).await;
        }

        let request = ExecuteRequest {
            mode,
            scheduled_at,
            media_ids: board.campaign_media_ids(),
        };
        self.store.execute_campaign(&campaign.id, &request).await?;
        info!("Executed campaign {} ({:?})", campaign.id, mode);
        Ok(())
    }
}
