//! Validation Engine
//!
//! The recursive tree validator: looks up each element's schema, runs the
//! attribute checks and the content-model matcher, and accumulates located
//! diagnostics in pre-order, depth-first discovery order. Validation never
//! fails hard for a well-formed tree; every discoverable error is reported
//! in one pass.

use crate::node::{Element, Node, Position};
use crate::schema::{AttrContext, ElementSchema, InvalidReason, SchemaRegistry};
use crate::validation::matcher::{ChildSym, MatchFailure, child_word, match_content};
use serde::Serialize;

/// Nesting depth guard. Deeper input yields a `DepthExceeded` diagnostic
/// instead of exhausting the call stack.
pub const MAX_DEPTH: usize = 64;

/// Classification of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    UnknownTag,
    UnexpectedAttribute,
    MissingRequiredAttribute,
    InvalidAttributeValue(InvalidReason),
    ContentModelMismatch,
    UnexpectedText,
    SelfNestingForbidden,
    RootCardinality,
    DepthExceeded,
}

/// A single located validation finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// Result of validating a node tree or document.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add_error(&mut self, kind: ErrorKind, message: String, position: Position) {
        self.errors.push(ValidationError {
            kind,
            message,
            line: position.line,
            column: position.column,
        });
    }

    /// True iff no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

/// Validate a single node tree against the full WEML vocabulary.
///
/// A bare text node yields an empty result here: text legality is judged by
/// the parent's content model, and the entry points reject text roots.
pub fn validate_node(node: &Node, registry: &SchemaRegistry) -> ValidationResult {
    let mut result = ValidationResult::new();
    if let Node::Element(el) = node {
        validate_element_into(el, registry, 0, &mut result);
    }
    result
}

fn validate_element_into(
    el: &Element,
    registry: &SchemaRegistry,
    depth: usize,
    result: &mut ValidationResult,
) {
    if depth > MAX_DEPTH {
        result.add_error(
            ErrorKind::DepthExceeded,
            format!("Markup nesting exceeds the supported depth of {MAX_DEPTH}"),
            el.position,
        );
        return;
    }

    let Some(schema) = registry.get(&el.tag) else {
        log::debug!(
            "unknown tag '{}' at {}:{}",
            el.tag,
            el.position.line,
            el.position.column
        );
        result.add_error(
            ErrorKind::UnknownTag,
            format!("Unknown tag '{}'", el.tag),
            el.position,
        );
        // The vocabulary is closed: nothing below an unknown tag is inspected.
        return;
    };

    check_attributes(el, schema, result);

    // Self-nesting is a whole-subtree rule, checked independently of the
    // shape match and reported at the first offending descendant.
    if schema.forbid_self_nesting {
        if let Some(position) = find_self_nested(el, &el.tag) {
            result.add_error(
                ErrorKind::SelfNestingForbidden,
                format!("'{}' may not contain a nested '{}'", el.tag, el.tag),
                position,
            );
        }
    }

    let word = child_word(&el.children);
    let consumed = match match_content(&schema.content, &word) {
        Ok(()) => word.len(),
        Err(MatchFailure::AtChild {
            index,
            position,
            is_text,
        }) => {
            if is_text {
                result.add_error(
                    ErrorKind::UnexpectedText,
                    format!("Text content is not allowed here inside '{}'", el.tag),
                    position,
                );
            } else {
                result.add_error(
                    ErrorKind::ContentModelMismatch,
                    format!("Child is not allowed at this position inside '{}'", el.tag),
                    position,
                );
            }
            index
        }
        Err(MatchFailure::Incomplete) => {
            result.add_error(
                ErrorKind::ContentModelMismatch,
                format!("Content of '{}' does not match its content model", el.tag),
                el.position,
            );
            word.len()
        }
    };

    // Recurse only into children the matcher consumed; a rejected child is
    // already reported and not descended into.
    for sym in &word[..consumed] {
        if let ChildSym::Elem(child) = *sym {
            validate_element_into(child, registry, depth + 1, result);
        }
    }
}

fn check_attributes(el: &Element, schema: &ElementSchema, result: &mut ValidationResult) {
    let ctx = AttrContext {
        child_count: el.element_child_count(),
    };

    for attr in &el.attributes {
        match schema.find_attribute(&attr.name) {
            None => {
                result.add_error(
                    ErrorKind::UnexpectedAttribute,
                    format!("Unexpected attribute '{}' on '{}'", attr.name, el.tag),
                    el.position,
                );
            }
            Some(def) => {
                if let Err(reason) = def.constraint.check(&attr.value, &ctx) {
                    result.add_error(
                        ErrorKind::InvalidAttributeValue(reason),
                        format!(
                            "Invalid value '{}' for attribute '{}' on '{}': {}",
                            attr.value, attr.name, el.tag, reason
                        ),
                        el.position,
                    );
                }
            }
        }
    }

    for def in schema.required_attributes() {
        if el.attribute(def.name).is_none() {
            result.add_error(
                ErrorKind::MissingRequiredAttribute,
                format!("Missing required attribute '{}' on '{}'", def.name, el.tag),
                el.position,
            );
        }
    }

    if let Some([first, second]) = schema.requires_one_of {
        if el.attribute(first).is_none() && el.attribute(second).is_none() {
            result.add_error(
                ErrorKind::InvalidAttributeValue(InvalidReason::MissingDependency),
                format!(
                    "'{}' requires at least one of the attributes '{}' or '{}'",
                    el.tag, first, second
                ),
                el.position,
            );
        }
    }
}

/// Pre-order scan for a descendant element sharing the ancestor's tag.
/// Iterative with an explicit stack: the subtree may be far deeper than the
/// validation depth limit and must not exhaust the call stack.
fn find_self_nested(el: &Element, tag: &str) -> Option<Position> {
    let mut stack: Vec<&Node> = el.children.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if let Node::Element(child_el) = node {
            if child_el.tag == tag {
                return Some(child_el.position);
            }
            stack.extend(child_el.children.iter().rev());
        }
    }
    None
}
