use serde::{Deserialize, Serialize};

/// Per-recipient template parameter payload.
///
/// Each array's length equals the corresponding schema slot count. A
/// zero-length array is valid only when the schema has no slots of that
/// kind, or when a media header slot is satisfied by campaign-level media
/// instead of per-recipient media.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateParams {
    #[serde(default)]
    pub header_params: Vec<String>,
    #[serde(default)]
    pub body_params: Vec<String>,
    #[serde(default)]
    pub button_params: Vec<String>,
}

impl TemplateParams {
    pub fn is_empty(&self) -> bool {
        self.header_params.is_empty()
            && self.body_params.is_empty()
            && self.button_params.is_empty()
    }
}

/// One resolved campaign recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Canonical phone number, non-empty after normalization.
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub template_params: TemplateParams,
}

impl Recipient {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            fullname: None,
            email: None,
            template_params: TemplateParams::default(),
        }
    }
}

/// A row that failed validation, produced instead of a recipient.
/// Rows and errors partition the input deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Zero-based index of the offending data row.
    pub row: usize,
    pub reason: String,
}

impl RowError {
    pub fn new(row: usize, reason: impl Into<String>) -> Self {
        Self {
            row,
            reason: reason.into(),
        }
    }
}
