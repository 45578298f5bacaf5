//! WEML Validation
//!
//! Entry points composing the markup adapter, the schema registry, and the
//! tree validator. The string entry points only fail hard on malformed
//! markup; every structural finding accumulates in the `ValidationResult`.

pub mod engine;
pub mod matcher;

pub use engine::{ErrorKind, MAX_DEPTH, ValidationError, ValidationResult};

use crate::markup::{WemlError, parse_fragment};
use crate::node::{Node, Position};
use crate::schema::{PARAGRAPH_TAGS, SchemaRegistry};

/// Validate a single root node against the full tag vocabulary. A bare text
/// node is not a valid root: text is only legal inside an element.
pub fn validate_element_node(node: &Node) -> ValidationResult {
    match node {
        Node::Element(_) => engine::validate_node(node, SchemaRegistry::global()),
        Node::Text(text) => {
            let mut result = ValidationResult::new();
            result.add_error(
                ErrorKind::RootCardinality,
                "Expected an element root, found text".to_string(),
                text.position,
            );
            result
        }
    }
}

/// Validate a single root node restricted to the paragraph-level tags
/// (`w-para`, `w-para-group`, `w-heading`).
pub fn validate_paragraph_node(node: &Node) -> ValidationResult {
    let mut result = ValidationResult::new();
    match node {
        Node::Element(el) if PARAGRAPH_TAGS.contains(&el.tag.as_str()) => {
            result.merge(validate_element_node(node));
        }
        Node::Element(el) => {
            result.add_error(
                ErrorKind::RootCardinality,
                format!("'{}' is not a paragraph-level element", el.tag),
                el.position,
            );
        }
        Node::Text(text) => {
            result.add_error(
                ErrorKind::RootCardinality,
                "Expected a paragraph-level element, found text".to_string(),
                text.position,
            );
        }
    }
    result
}

/// Validate a full document: a non-empty ordered sequence of paragraph-level
/// root nodes. Member errors concatenate in document order.
pub fn validate_document_nodes(nodes: &[Node]) -> ValidationResult {
    let mut result = ValidationResult::new();
    if nodes.is_empty() {
        result.add_error(
            ErrorKind::RootCardinality,
            "Document must contain at least one paragraph-level element".to_string(),
            Position::new(1, 1),
        );
        return result;
    }
    for node in nodes {
        result.merge(validate_paragraph_node(node));
    }
    result
}

/// Parse a markup string and validate its single root node against the full
/// vocabulary. `Err` only for malformed markup.
pub fn validate_element(markup: &str) -> Result<ValidationResult, WemlError> {
    let roots = parse_fragment(markup)?;
    let mut result = ValidationResult::new();
    if let Some(root) = expect_single_root(&roots, &mut result) {
        result.merge(validate_element_node(root));
    }
    Ok(result)
}

/// Parse a markup string and validate its single root as a paragraph-level
/// element.
pub fn validate_paragraph(markup: &str) -> Result<ValidationResult, WemlError> {
    let roots = parse_fragment(markup)?;
    let mut result = ValidationResult::new();
    if let Some(root) = expect_single_root(&roots, &mut result) {
        result.merge(validate_paragraph_node(root));
    }
    Ok(result)
}

/// Parse a markup string and validate it as a full document.
pub fn validate_document(markup: &str) -> Result<ValidationResult, WemlError> {
    let roots = parse_fragment(markup)?;
    Ok(validate_document_nodes(&roots))
}

fn expect_single_root<'a>(roots: &'a [Node], result: &mut ValidationResult) -> Option<&'a Node> {
    match roots {
        [root] => Some(root),
        [] => {
            result.add_error(
                ErrorKind::RootCardinality,
                "Expected exactly one root node, found none".to_string(),
                Position::new(1, 1),
            );
            None
        }
        [_, extra, ..] => {
            result.add_error(
                ErrorKind::RootCardinality,
                format!("Expected exactly one root node, found {}", roots.len()),
                extra.position(),
            );
            None
        }
    }
}
