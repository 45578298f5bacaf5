//! Node Tree
//!
//! Clean, minimal types representing a parsed WEML fragment.
//! No validation logic or parser concerns - pure data representation.

/// Source position of a node, 1-based, pointing at the opening construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A single attribute on an element, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element node like `<w-para align="right">...</w-para>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name (e.g. "w-para", "td")
    pub tag: String,
    /// Attributes in document order; names are unique
    pub attributes: Vec<Attribute>,
    /// Ordered child nodes
    pub children: Vec<Node>,
    pub position: Position,
}

/// A text node.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub position: Position,
}

/// A node in the input tree. The validator treats the tree as read-only.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    pub fn position(&self) -> Position {
        match self {
            Node::Element(el) => el.position,
            Node::Text(text) => text.position,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }
}

impl Element {
    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Number of element children (text children excluded).
    pub fn element_child_count(&self) -> usize {
        self.children
            .iter()
            .filter(|child| matches!(child, Node::Element(_)))
            .count()
    }
}
