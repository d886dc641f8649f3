//! Message template model and parameter schema extraction.
//!
//! A template arrives from the template store as a list of structured
//! components (header/body/footer/buttons, optionally a carousel). This
//! module derives the ordered parameter schema that the mapping engine,
//! the transform stage and the media orchestrator all share.

pub mod extractor;
pub mod schema;

pub use extractor::{extract_schema, SchemaExtractor};
pub use schema::{
    CarouselCard, HeaderKind, ParamSlot, SlotCounts, SlotPlan, Template, TemplateButton,
    TemplateComponent, TemplateSchema,
};
