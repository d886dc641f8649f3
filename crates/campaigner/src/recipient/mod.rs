//! Recipient resolution: row ingestion, phone normalization and the
//! transform/validation stage that turns raw rows into recipients.

pub mod model;
pub mod phone;
pub mod rows;
pub mod transform;

pub use model::{Recipient, RowError, TemplateParams};
pub use phone::{is_valid_phone, normalize_phone};
pub use rows::{read_rows, read_rows_from_str, Row, RowSet};
pub use transform::{transform, TransformOptions, TransformOutcome};
