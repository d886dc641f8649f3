use serde::{Deserialize, Serialize};

/// Kind of content a template header carries.
///
/// Media headers (image/video/document) never contribute a text placeholder;
/// they are implicit single slots whose value is a media handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeaderKind {
    #[default]
    Text,
    Image,
    Video,
    Document,
}

impl HeaderKind {
    /// Returns true if this header is satisfied by a media handle rather
    /// than text parameters.
    pub fn is_media(&self) -> bool {
        !matches!(self, HeaderKind::Text)
    }
}

/// One positional or named parameter position in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSlot {
    /// Token name for named parameters, `None` for purely positional ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ParamSlot {
    pub fn positional() -> Self {
        Self { name: None }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Ordered parameter schema derived from a template's components.
///
/// Slot order is stable for the lifetime of a template selection;
/// re-selecting a template fully replaces the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSchema {
    pub header_kind: HeaderKind,
    pub header_slots: Vec<ParamSlot>,
    pub body_slots: Vec<ParamSlot>,
    pub button_slots: Vec<ParamSlot>,
    /// Number of carousel cards, each carrying one per-card media slot.
    /// Zero for non-carousel templates.
    pub carousel_cards: usize,
}

impl TemplateSchema {
    /// An empty schema, used for free-text campaigns without a template.
    pub fn empty() -> Self {
        Self {
            header_kind: HeaderKind::Text,
            header_slots: Vec::new(),
            body_slots: Vec::new(),
            button_slots: Vec::new(),
            carousel_cards: 0,
        }
    }

    /// Returns true if the header slot is satisfied by media.
    pub fn has_media_header(&self) -> bool {
        self.header_kind.is_media()
    }

    /// Per-kind slot counts shared by mapping, transform and lifecycle.
    pub fn slot_counts(&self) -> SlotCounts {
        SlotCounts {
            header: self.header_slots.len(),
            body: self.body_slots.len(),
            button: self.button_slots.len(),
        }
    }

    /// The slot plan consumed by the auto-mapping engine and the transform.
    pub fn slot_plan(&self) -> SlotPlan {
        SlotPlan {
            header_kind: self.header_kind,
            header: self.header_slots.iter().map(|s| s.name.clone()).collect(),
            body: self.body_slots.iter().map(|s| s.name.clone()).collect(),
            button: self.button_slots.iter().map(|s| s.name.clone()).collect(),
        }
    }

    /// Returns true if any template slot uses a named parameter.
    pub fn uses_named_params(&self) -> bool {
        self.header_slots
            .iter()
            .chain(&self.body_slots)
            .chain(&self.button_slots)
            .any(|s| s.name.is_some())
    }
}

/// Per-kind expected slot counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotCounts {
    pub header: usize,
    pub body: usize,
    pub button: usize,
}

impl SlotCounts {
    pub fn total(&self) -> usize {
        self.header + self.body + self.button
    }
}

/// Slot counts plus slot names, in schema order.
///
/// This is the contract between the extractor and the downstream stages:
/// the mapping engine scores column names against the slot names, and the
/// transform sizes each recipient's parameter arrays from the lengths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotPlan {
    pub header_kind: HeaderKind,
    pub header: Vec<Option<String>>,
    pub body: Vec<Option<String>>,
    pub button: Vec<Option<String>>,
}

impl SlotPlan {
    pub fn counts(&self) -> SlotCounts {
        SlotCounts {
            header: self.header.len(),
            body: self.body.len(),
            button: self.button.len(),
        }
    }
}

// ─── Template wire model ────────────────────────────────────────────────────

/// An approved message template as returned by the template store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub language: String,
    pub category: String,
    pub components: Vec<TemplateComponent>,
}

/// One structured component of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TemplateComponent {
    Header {
        #[serde(default)]
        format: HeaderKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Pre-existing media handle shipped with the template, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        media_id: Option<String>,
    },
    Body {
        text: String,
    },
    Footer {
        text: String,
    },
    Buttons {
        buttons: Vec<TemplateButton>,
    },
    Carousel {
        cards: Vec<CarouselCard>,
    },
}

/// One card of a carousel template. Each card carries exactly one media
/// slot; card body text does not contribute parameter slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselCard {
    #[serde(default)]
    pub header_format: HeaderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
    /// Pre-existing media handle shipped with the card, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
}

/// A template button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateButton {
    Url {
        text: String,
        url: String,
    },
    QuickReply {
        text: String,
    },
    /// Copy-code buttons always carry exactly one parameter slot,
    /// regardless of placeholder syntax in the example value.
    CopyCode {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        example: Option<String>,
    },
    PhoneNumber {
        text: String,
        phone_number: String,
    },
}
