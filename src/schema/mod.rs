//! WEML Schema
//!
//! Per-tag validation rules as data: attribute constraints, content models,
//! and the frozen process-wide registry they live in.

pub mod constraints;
pub mod content;
pub mod registry;

pub use constraints::{AttrContext, AttributeDef, Constraint, InvalidReason};
pub use content::ContentModel;
pub use registry::{ElementSchema, PARAGRAPH_TAGS, SchemaRegistry};
