//! Wizard state machine driving campaign creation step by step.
//!
//! The wizard owns the draft, the selected template's schema, the column
//! mapping, the media slot board and the audience selection, and gates
//! forward navigation on each step being complete. Template re-selection
//! resets everything derived from the previous template.

use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::campaign::CampaignDraft;
use crate::error::WizardError;
use crate::mapping::ColumnMapping;
use crate::media::{MediaHandle, SlotBoard};
use crate::recipient::{Recipient, RowError};
use crate::template::{extract_schema, Template, TemplateComponent, TemplateSchema};

/// The wizard's four steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Details,
    Template,
    Audience,
    Review,
}

impl WizardStep {
    fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Details => Some(WizardStep::Template),
            WizardStep::Template => Some(WizardStep::Audience),
            WizardStep::Audience => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::Details => None,
            WizardStep::Template => Some(WizardStep::Details),
            WizardStep::Audience => Some(WizardStep::Template),
            WizardStep::Review => Some(WizardStep::Audience),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Details => "details",
            WizardStep::Template => "template",
            WizardStep::Audience => "audience",
            WizardStep::Review => "review",
        };
        f.write_str(name)
    }
}

/// Who the campaign goes to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AudienceSelection {
    #[default]
    Unset,
    /// Hand-picked contacts, already shaped as recipients.
    Manual { recipients: Vec<Recipient> },
    /// Tag-based segments resolved server-side.
    Segment { tag_ids: Vec<String> },
    /// Recipients produced by the CSV transform, with its row errors.
    Import {
        recipients: Vec<Recipient>,
        errors: Vec<RowError>,
    },
}

impl AudienceSelection {
    pub fn is_set(&self) -> bool {
        match self {
            AudienceSelection::Unset => false,
            AudienceSelection::Manual { recipients } => !recipients.is_empty(),
            AudienceSelection::Segment { tag_ids } => !tag_ids.is_empty(),
            AudienceSelection::Import { recipients, .. } => !recipients.is_empty(),
        }
    }

    pub fn recipients(&self) -> &[Recipient] {
        match self {
            AudienceSelection::Manual { recipients }
            | AudienceSelection::Import { recipients, .. } => recipients,
            _ => &[],
        }
    }

    pub fn tag_ids(&self) -> &[String] {
        match self {
            AudienceSelection::Segment { tag_ids } => tag_ids,
            _ => &[],
        }
    }
}

/// Everything the wizard accumulates across its steps.
#[derive(Debug, Clone)]
pub struct WizardState {
    /// Correlates log lines from one wizard session.
    session_id: Uuid,
    step: WizardStep,
    pub draft: CampaignDraft,
    /// Set once the campaign exists remotely.
    pub campaign_id: Option<String>,
    schema: TemplateSchema,
    pub mapping: ColumnMapping,
    pub slots: SlotBoard,
    pub audience: AudienceSelection,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        let session_id = Uuid::new_v4();
        debug!("starting wizard session {}", session_id);
        Self {
            session_id,
            step: WizardStep::Details,
            draft: CampaignDraft::default(),
            campaign_id: None,
            schema: TemplateSchema::empty(),
            mapping: ColumnMapping::default(),
            slots: SlotBoard::none(),
            audience: AudienceSelection::Unset,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn schema(&self) -> &TemplateSchema {
        &self.schema
    }

    /// Selects (or re-selects) a template.
    ///
    /// The schema, mapping and slot board are fully rebuilt; already
    /// imported recipients whose parameter arrays no longer match the new
    /// schema are dropped. Returns the number of dropped recipients.
    pub fn select_template(&mut self, template: &Template) -> usize {
        self.schema = extract_schema(template);
        self.draft.template_id = Some(template.id.clone());
        self.draft.content = None;
        self.mapping = ColumnMapping::default();
        self.slots = board_for_template(&self.schema, template);

        let dropped = self.revalidate_audience();
        if dropped > 0 {
            warn!(
                "Dropped {} recipient(s) incompatible with template '{}'",
                dropped, template.name
            );
        }
        info!(
            "Selected template '{}' ({} parameter slot(s), {} media slot(s))",
            template.name,
            self.schema.slot_counts().total(),
            self.slots.len()
        );
        dropped
    }

    /// Switches to a free-text campaign without a template.
    pub fn select_free_text(&mut self, content: impl Into<String>) {
        self.schema = TemplateSchema::empty();
        self.draft.template_id = None;
        self.draft.content = Some(content.into());
        self.mapping = ColumnMapping::default();
        self.slots = SlotBoard::none();
        self.revalidate_audience();
    }

    /// Drops imported or hand-picked recipients whose parameter arrays do
    /// not fit the current schema. Returns how many were dropped.
    fn revalidate_audience(&mut self) -> usize {
        let counts = self.schema.slot_counts();
        let media_header = self.schema.has_media_header();

        let retain = |r: &Recipient| {
            let p = &r.template_params;
            let header_ok = if media_header {
                // Campaign-level media leaves the header array empty.
                p.header_params.is_empty() || p.header_params.len() == counts.header
            } else {
                p.header_params.len() == counts.header
            };
            header_ok
                && p.body_params.len() == counts.body
                && p.button_params.len() == counts.button
        };

        match &mut self.audience {
            AudienceSelection::Manual { recipients }
            | AudienceSelection::Import { recipients, .. } => {
                let before = recipients.len();
                recipients.retain(retain);
                before - recipients.len()
            }
            _ => 0,
        }
    }

    /// Moves to the next step if the current one is complete.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        if let Some(reason) = self.incomplete_reason() {
            return Err(WizardError::StepIncomplete {
                step: self.step.to_string(),
                reason,
            });
        }

        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(next)
            }
            None => Err(WizardError::WrongStep {
                step: self.step.to_string(),
            }),
        }
    }

    /// Moves back one step. Accumulated state is kept.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                Ok(previous)
            }
            None => Err(WizardError::WrongStep {
                step: self.step.to_string(),
            }),
        }
    }

    fn incomplete_reason(&self) -> Option<String> {
        match self.step {
            WizardStep::Details => {
                if self.draft.name.trim().is_empty() {
                    Some("campaign name is required".to_string())
                } else {
                    None
                }
            }
            WizardStep::Template => {
                if self.draft.template_id.is_none() && self.draft.content.is_none() {
                    Some("select a template or enter message content".to_string())
                } else {
                    None
                }
            }
            WizardStep::Audience => {
                if !self.audience.is_set() {
                    Some("select at least one recipient or segment".to_string())
                } else {
                    None
                }
            }
            WizardStep::Review => None,
        }
    }

    /// True once the review step is reached and every media slot holds a
    /// handle. This mirrors the lifecycle's execute gate.
    pub fn can_execute(&self) -> bool {
        self.step == WizardStep::Review && self.audience.is_set() && self.slots.all_resolved()
    }
}

/// Builds the media slot board a template calls for.
fn board_for_template(schema: &TemplateSchema, template: &Template) -> SlotBoard {
    if schema.carousel_cards > 0 {
        let inherited: Vec<Option<MediaHandle>> = template
            .components
            .iter()
            .find_map(|c| match c {
                TemplateComponent::Carousel { cards } => Some(
                    cards
                        .iter()
                        .map(|card| card.media_id.clone().map(MediaHandle))
                        .collect(),
                ),
                _ => None,
            })
            .unwrap_or_else(|| vec![None; schema.carousel_cards]);
        return SlotBoard::per_card_with_inherited(inherited);
    }

    if schema.has_media_header() {
        let inherited = template.components.iter().find_map(|c| match c {
            TemplateComponent::Header { media_id, .. } => {
                media_id.clone().map(MediaHandle)
            }
            _ => None,
        });
        return SlotBoard::single_with_inherited(inherited);
    }

    SlotBoard::none()
}
