use log::debug;
use tracing::info_span;

use crate::error::TransformError;
use crate::mapping::{ColumnMapping, TargetKey};
use crate::template::SlotPlan;

use super::model::{Recipient, RowError, TemplateParams};
use super::phone::{is_valid_phone, normalize_phone};
use super::rows::Row;

/// Options controlling the transform stage.
#[derive(Debug, Clone, Copy)]
pub struct TransformOptions {
    /// Reject rows whose phone fails the loose E.164 check.
    pub validate_phone: bool,
    /// Reject rows whose per-recipient media header resolves to an empty
    /// reference. Text parameter arrays are sized from the slot plan and
    /// empty text values pass: they may be intentionally optional.
    pub validate_params: bool,
    /// Accumulate invalid rows as errors and continue. When false, the
    /// first invalid row aborts the whole transform.
    pub skip_invalid_rows: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        // Defaults for bulk import.
        Self {
            validate_phone: true,
            validate_params: true,
            skip_invalid_rows: true,
        }
    }
}

/// Result of a transform: recipients and row errors partition the input.
#[derive(Debug, Clone, Default)]
pub struct TransformOutcome {
    pub recipients: Vec<Recipient>,
    pub errors: Vec<RowError>,
}

/// Applies a column mapping to raw rows, producing valid recipients and a
/// parallel error list. Pure: never mutates its inputs, performs no I/O.
///
/// Every input row yields exactly one recipient or one row error when
/// `skip_invalid_rows` is set.
pub fn transform(
    rows: &[Row],
    mapping: &ColumnMapping,
    plan: &SlotPlan,
    options: &TransformOptions,
) -> Result<TransformOutcome, TransformError> {
    let _span = info_span!("recipient.transform", rows = rows.len()).entered();

    let phone_column = mapping
        .get(&TargetKey::Phone)
        .ok_or(TransformError::MissingPhoneMapping)?;

    let mut outcome = TransformOutcome::default();

    for (index, row) in rows.iter().enumerate() {
        match transform_row(index, row, phone_column, mapping, plan, options) {
            Ok(recipient) => outcome.recipients.push(recipient),
            Err(error) => {
                if !options.skip_invalid_rows {
                    return Err(TransformError::InvalidRow {
                        row: error.row,
                        reason: error.reason,
                    });
                }
                outcome.errors.push(error);
            }
        }
    }

    debug!(
        "transformed {} rows: {} recipients, {} errors",
        rows.len(),
        outcome.recipients.len(),
        outcome.errors.len()
    );
    Ok(outcome)
}

fn transform_row(
    index: usize,
    row: &Row,
    phone_column: &str,
    mapping: &ColumnMapping,
    plan: &SlotPlan,
    options: &TransformOptions,
) -> Result<Recipient, RowError> {
    let raw_phone = row.get(phone_column).map(String::as_str).unwrap_or_default();
    let phone = normalize_phone(raw_phone);

    if phone.is_empty() {
        return Err(RowError::new(index, "Missing phone number"));
    }
    if options.validate_phone && !is_valid_phone(&phone) {
        return Err(RowError::new(
            index,
            format!("Invalid phone number '{}'", raw_phone),
        ));
    }

    let template_params = TemplateParams {
        header_params: header_params(row, mapping, plan),
        body_params: resolve_slots(row, mapping, plan.body.len(), TargetKey::Body),
        button_params: resolve_slots(row, mapping, plan.button.len(), TargetKey::Button),
    };

    // Param arrays are sized from the plan, so their lengths always match
    // the slot counts. A mapped media header is the one slot an empty value
    // cannot satisfy: the message would have no media at all.
    if options.validate_params
        && plan.header_kind.is_media()
        && template_params.header_params.iter().any(String::is_empty)
    {
        return Err(RowError::new(
            index,
            "Missing media reference for the header slot",
        ));
    }

    let optional = |key: TargetKey| -> Option<String> {
        mapping
            .get(&key)
            .and_then(|column| row.get(column))
            .filter(|value| !value.is_empty())
            .cloned()
    };

    Ok(Recipient {
        phone,
        fullname: optional(TargetKey::Fullname),
        email: optional(TargetKey::Email),
        template_params,
    })
}

/// Media header slots are per-recipient only when explicitly mapped;
/// an unmapped media header means campaign-level media and resolves to an
/// empty array. Text header slots always keep the schema length.
fn header_params(row: &Row, mapping: &ColumnMapping, plan: &SlotPlan) -> Vec<String> {
    if plan.header_kind.is_media() {
        let mapped = (0..plan.header.len())
            .any(|i| mapping.get(&TargetKey::Header(i)).is_some());
        if !mapped {
            return Vec::new();
        }
    }
    resolve_slots(row, mapping, plan.header.len(), TargetKey::Header)
}

/// Resolves each slot from its mapped column; a missing mapped column
/// yields an empty string, never an error by itself.
fn resolve_slots(
    row: &Row,
    mapping: &ColumnMapping,
    count: usize,
    build: fn(usize) -> TargetKey,
) -> Vec<String> {
    (0..count)
        .map(|i| {
            mapping
                .get(&build(i))
                .and_then(|column| row.get(column))
                .cloned()
                .unwrap_or_default()
        })
        .collect()
}
