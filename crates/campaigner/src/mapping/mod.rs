//! Column-to-slot auto-mapping.
//!
//! Given the header row of an imported file and the active template's slot
//! plan, the engine proposes a column for every contact field and parameter
//! slot. The proposal is advisory: unmatched target keys are left unmapped
//! for manual completion, and the engine never errors.

pub mod engine;
pub mod targets;

pub use engine::{auto_map, Assignment, MappingProposal, MappingSummary};
pub use targets::{ColumnMapping, ContactField, TargetKey};
