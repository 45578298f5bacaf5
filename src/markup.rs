//! Markup Adapter
//!
//! Bridges the external markup parser (roxmltree) to the validator's own
//! node tree. Parsing is not this crate's job: the adapter only converts an
//! already well-formed document into `Node`s with 1-based source positions.
//! A malformed input surfaces as a hard `WemlError::Parse`, structurally
//! distinct from a `ValidationResult`.

use crate::node::{Attribute, Element, Node, Position, Text};
use thiserror::Error;

/// Fatal failure channel. Validation findings are never reported here;
/// they accumulate in a `ValidationResult` instead.
#[derive(Debug, Error)]
pub enum WemlError {
    /// The markup string is not well-formed and no node tree could be built.
    #[error("malformed markup: {0}")]
    Parse(#[from] roxmltree::Error),
}

/// Parse a markup fragment into its sequence of root nodes.
///
/// A fragment may carry zero, one, or several sibling roots (documents are a
/// sequence of paragraph-level elements). The input is wrapped in a synthetic
/// root so the XML parser accepts the multi-root case; reported positions are
/// corrected for the wrapper line. Whitespace-only text between roots is not
/// a root node.
pub fn parse_fragment(markup: &str) -> Result<Vec<Node>, WemlError> {
    let wrapped = format!("<weml-fragment>\n{markup}\n</weml-fragment>");
    let doc = roxmltree::Document::parse(&wrapped)?;

    let roots = doc
        .root_element()
        .children()
        .filter_map(|child| convert(&doc, child))
        .filter(|node| match node {
            Node::Text(text) => !text.content.trim().is_empty(),
            Node::Element(_) => true,
        })
        .collect();
    Ok(roots)
}

/// Partially converted element together with its remaining source children.
struct Frame<'a, 'input> {
    element: Element,
    children: roxmltree::Children<'a, 'input>,
}

impl<'a, 'input> Frame<'a, 'input> {
    fn open(doc: &roxmltree::Document<'input>, source: roxmltree::Node<'a, 'input>) -> Self {
        Frame {
            element: Element {
                tag: source.tag_name().name().to_string(),
                attributes: source
                    .attributes()
                    .map(|attr| Attribute {
                        name: attr.name().to_string(),
                        value: attr.value().to_string(),
                    })
                    .collect(),
                children: Vec::new(),
                position: position_of(doc, &source),
            },
            children: source.children(),
        }
    }
}

/// Depth-first walk with an explicit frame stack: the source tree's depth
/// must never translate into call-stack depth.
fn convert<'a, 'input>(
    doc: &roxmltree::Document<'input>,
    source: roxmltree::Node<'a, 'input>,
) -> Option<Node> {
    if !source.is_element() {
        return leaf(doc, source);
    }

    let mut stack = vec![Frame::open(doc, source)];
    while let Some(frame) = stack.last_mut() {
        match frame.children.next() {
            Some(child) if child.is_element() => stack.push(Frame::open(doc, child)),
            Some(child) => {
                if let Some(node) = leaf(doc, child) {
                    frame.element.children.push(node);
                }
            }
            None => {
                let Some(done) = stack.pop() else { break };
                match stack.last_mut() {
                    Some(parent) => parent.element.children.push(Node::Element(done.element)),
                    None => return Some(Node::Element(done.element)),
                }
            }
        }
    }
    None
}

fn leaf(doc: &roxmltree::Document, source: roxmltree::Node) -> Option<Node> {
    if source.is_text() {
        Some(Node::Text(Text {
            content: source.text().unwrap_or_default().to_string(),
            position: position_of(doc, &source),
        }))
    } else {
        // Comments and processing instructions carry no structure to validate.
        None
    }
}

fn position_of(doc: &roxmltree::Document, node: &roxmltree::Node) -> Position {
    let pos = doc.text_pos_at(node.range().start);
    // The synthetic wrapper occupies line 1 of the parsed text.
    Position::new(pos.row.saturating_sub(1), pos.col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_root() {
        let roots = parse_fragment("<hr/>").unwrap();
        assert_eq!(roots.len(), 1);
        let el = roots[0].as_element().unwrap();
        assert_eq!(el.tag, "hr");
        assert_eq!(el.position, Position::new(1, 1));
    }

    #[test]
    fn test_multiple_roots_and_interstitial_whitespace() {
        let roots = parse_fragment("<hr/>\n  <br/>").unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[1].position(), Position::new(2, 3));
    }

    #[test]
    fn test_attributes_and_children() {
        let roots = parse_fragment(r#"<w-para align="right">x<hr/></w-para>"#).unwrap();
        let el = roots[0].as_element().unwrap();
        assert_eq!(el.attribute("align"), Some("right"));
        assert_eq!(el.children.len(), 2);
    }

    #[test]
    fn test_deeply_nested_markup_converts() {
        let depth = 500;
        let markup = format!(
            "{}x{}",
            r#"<w-lang lang="en">"#.repeat(depth),
            "</w-lang>".repeat(depth)
        );
        let roots = parse_fragment(&markup).unwrap();
        assert_eq!(roots.len(), 1);
        let mut seen = 0;
        let mut node = &roots[0];
        while let Some(el) = node.as_element() {
            seen += 1;
            match el.children.first() {
                Some(child) => node = child,
                None => break,
            }
        }
        assert_eq!(seen, depth);
    }

    #[test]
    fn test_malformed_markup_is_a_hard_error() {
        assert!(parse_fragment("<w-para>").is_err());
        assert!(parse_fragment("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_empty_fragment_has_no_roots() {
        assert!(parse_fragment("   \n ").unwrap().is_empty());
    }
}
