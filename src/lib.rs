//! WEML Validator
//!
//! A structural validator for the WEML markup vocabulary: a closed set of
//! element tags, each with its own attribute rules and allowed-children
//! grammar.
//!
//! This library provides:
//! - A per-tag schema registry (attribute constraints + content models)
//! - A generic content-model matcher over child sequences
//! - A recursive tree validator producing located diagnostics
//! - String entry points backed by an external markup parser
//!
//! Validation is pure and synchronous: the frozen registry is shared
//! read-only across threads and each call works on its own tree.

pub mod markup;
pub mod node;
pub mod schema;
pub mod validation;

// Re-exports for a clean public API
pub use markup::{WemlError, parse_fragment};
pub use node::{Attribute, Element, Node, Position, Text};
pub use schema::{ContentModel, ElementSchema, InvalidReason, SchemaRegistry};
pub use validation::{
    ErrorKind, ValidationError, ValidationResult, validate_document, validate_document_nodes,
    validate_element, validate_element_node, validate_paragraph, validate_paragraph_node,
};
