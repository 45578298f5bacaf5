//! Schema Registry
//!
//! The closed WEML vocabulary: one `ElementSchema` per recognized tag,
//! looked up by name. Built once at process start, frozen afterward, and
//! shared read-only across threads. Adding a tag is a data change here,
//! never a new code path in the matcher or the engine.

use super::constraints::{AttributeDef, Constraint, pattern};
use super::content::ContentModel;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Tags allowed as a document's top-level units.
pub const PARAGRAPH_TAGS: &[&str] = &["w-para", "w-para-group", "w-heading"];

/// Inline vocabulary admitted inside a text block.
const INLINE_TAGS: &[&str] = &["w-lang", "w-format", "w-entity", "w-sent", "a", "br", "w-page"];

/// Validation rules for a single element tag.
#[derive(Debug, Clone)]
pub struct ElementSchema {
    pub tag: &'static str,
    /// Allowed attributes; anything else on the element is an error
    pub attributes: Vec<AttributeDef>,
    pub content: ContentModel,
    /// The element may not contain a descendant of its own tag
    pub forbid_self_nesting: bool,
    /// At least one of these attribute names must be present
    pub requires_one_of: Option<[&'static str; 2]>,
}

impl ElementSchema {
    pub fn new(tag: &'static str, content: ContentModel) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            content,
            forbid_self_nesting: false,
            requires_one_of: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<AttributeDef>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn forbid_self_nesting(mut self) -> Self {
        self.forbid_self_nesting = true;
        self
    }

    pub fn require_one_of(mut self, first: &'static str, second: &'static str) -> Self {
        self.requires_one_of = Some([first, second]);
        self
    }

    /// Find an attribute definition by name.
    pub fn find_attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Attribute definitions marked required.
    pub fn required_attributes(&self) -> impl Iterator<Item = &AttributeDef> {
        self.attributes.iter().filter(|attr| attr.required)
    }
}

/// In-memory tag registry.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, ElementSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// The process-wide frozen WEML registry.
    pub fn global() -> &'static SchemaRegistry {
        static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(|| {
            let registry = weml_vocabulary();
            registry.verify();
            log::debug!("WEML schema registry initialized with {} tags", registry.len());
            registry
        });
        &REGISTRY
    }

    pub fn add(&mut self, schema: ElementSchema) {
        self.schemas.insert(schema.tag, schema);
    }

    pub fn get(&self, tag: &str) -> Option<&ElementSchema> {
        self.schemas.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.schemas.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Check the closed-vocabulary invariant: every tag referenced by any
    /// content model (and every cross-attribute rule) must resolve to a
    /// registered schema. A violation is a configuration bug, not a
    /// validation finding, so it fails loudly at startup.
    pub fn verify(&self) {
        for schema in self.schemas.values() {
            for tag in schema.content.referenced_tags() {
                assert!(
                    self.schemas.contains_key(tag),
                    "schema '{}' references unregistered tag '{}'",
                    schema.tag,
                    tag
                );
            }
            if let Some(names) = schema.requires_one_of {
                for name in names {
                    assert!(
                        schema.find_attribute(name).is_some(),
                        "schema '{}' requires unknown attribute '{}'",
                        schema.tag,
                        name
                    );
                }
            }
        }
    }
}

/// Content shared by `w-para` and `w-li`: exactly one block-level child.
fn block_choice() -> ContentModel {
    ContentModel::Choice(vec![
        ContentModel::Elem("w-text-block"),
        ContentModel::Elem("hr"),
        ContentModel::Elem("w-list"),
    ])
}

fn table_cell_attributes() -> Vec<AttributeDef> {
    vec![
        AttributeDef::optional("align", Constraint::Enum(&["left", "right", "center"])),
        AttributeDef::optional("valign", Constraint::Enum(&["top", "middle", "bottom"])),
        AttributeDef::optional(
            "colspan",
            Constraint::Int {
                min: Some(1),
                max: Some(10),
            },
        ),
        AttributeDef::optional(
            "rowspan",
            Constraint::Int {
                min: Some(1),
                max: Some(10),
            },
        ),
    ]
}

/// Build the full WEML vocabulary.
pub fn weml_vocabulary() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    // Paragraph-level containers
    registry.add(
        ElementSchema::new("w-heading", ContentModel::Elem("w-text-block")).with_attributes(vec![
            AttributeDef::required(
                "level",
                Constraint::Int {
                    min: Some(1),
                    max: Some(6),
                },
            ),
            AttributeDef::optional("skip", Constraint::ChildCountBounded),
        ]),
    );
    registry.add(
        ElementSchema::new("w-para", block_choice()).with_attributes(vec![
            AttributeDef::optional("skip", Constraint::ChildCountBounded),
            AttributeDef::optional(
                "indent",
                Constraint::Int {
                    min: None,
                    max: None,
                },
            ),
            AttributeDef::optional(
                "role",
                Constraint::Enum(&["date", "address", "salutation", "signature"]),
            ),
            AttributeDef::optional("align", Constraint::Enum(&["left", "right", "center"])),
        ]),
    );
    registry.add(
        ElementSchema::new(
            "w-para-group",
            ContentModel::at_least(1, ContentModel::Elem("w-para")),
        )
        .with_attributes(vec![AttributeDef::optional(
            "skip",
            Constraint::ChildCountBounded,
        )]),
    );

    // Figures
    registry.add(ElementSchema::new(
        "figure",
        ContentModel::Seq(vec![
            ContentModel::Elem("img"),
            ContentModel::optional(ContentModel::Elem("figcaption")),
        ]),
    ));
    registry.add(
        ElementSchema::new("img", ContentModel::Empty).with_attributes(vec![
            AttributeDef::required("src", Constraint::NonEmpty),
            AttributeDef::optional("alt", Constraint::Any),
        ]),
    );
    registry.add(ElementSchema::new(
        "figcaption",
        ContentModel::Elem("w-text-block"),
    ));

    // Tables
    registry.add(ElementSchema::new(
        "table",
        ContentModel::Seq(vec![
            ContentModel::optional(ContentModel::Elem("thead")),
            ContentModel::optional(ContentModel::Elem("tbody")),
        ]),
    ));
    for section in ["thead", "tbody"] {
        registry.add(ElementSchema::new(
            section,
            ContentModel::Mixed {
                tags: &["tr"],
                allow_text: false,
            },
        ));
    }
    registry.add(ElementSchema::new(
        "tr",
        ContentModel::Mixed {
            tags: &["td", "th"],
            allow_text: false,
        },
    ));
    for cell in ["td", "th"] {
        registry.add(
            ElementSchema::new(
                cell,
                ContentModel::Mixed {
                    tags: &["w-text-block", "w-list"],
                    allow_text: false,
                },
            )
            .with_attributes(table_cell_attributes()),
        );
    }

    // Blocks
    registry.add(
        ElementSchema::new(
            "w-text-block",
            ContentModel::Mixed {
                tags: INLINE_TAGS,
                allow_text: true,
            },
        )
        .with_attributes(vec![AttributeDef::optional(
            "type",
            Constraint::Enum(&["paragraph", "blockquote", "poem"]),
        )])
        .forbid_self_nesting(),
    );
    registry.add(
        ElementSchema::new(
            "w-list",
            ContentModel::at_least(1, ContentModel::Elem("w-li")),
        )
        .with_attributes(vec![
            AttributeDef::optional("type", Constraint::Enum(&["ordered", "unordered"])),
            AttributeDef::optional("marker", Constraint::Any),
            AttributeDef::optional(
                "start",
                Constraint::Int {
                    min: Some(1),
                    max: None,
                },
            ),
        ]),
    );
    registry.add(ElementSchema::new("w-li", block_choice()));

    // Void elements
    registry.add(ElementSchema::new("hr", ContentModel::Empty));
    registry.add(ElementSchema::new("br", ContentModel::Empty));
    registry.add(
        ElementSchema::new("w-page", ContentModel::Empty).with_attributes(vec![
            AttributeDef::required("number", Constraint::NonEmpty),
        ]),
    );

    // Inline containers
    registry.add(
        ElementSchema::new("w-format", ContentModel::TextOnly).with_attributes(vec![
            AttributeDef::required(
                "type",
                Constraint::Enum(&[
                    "bold",
                    "italic",
                    "underline",
                    "superscript",
                    "subscript",
                    "small-caps",
                    "all-caps",
                ]),
            ),
        ]),
    );
    registry.add(
        ElementSchema::new(
            "w-lang",
            ContentModel::Mixed {
                tags: &["w-lang"],
                allow_text: true,
            },
        )
        .with_attributes(vec![
            AttributeDef::required(
                "lang",
                Constraint::All(vec![
                    Constraint::MaxLength(5),
                    pattern("[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})?"),
                ]),
            ),
            AttributeDef::optional("dir", Constraint::Enum(&["ltr", "rtl"])),
        ]),
    );
    registry.add(
        ElementSchema::new(
            "w-entity",
            ContentModel::Mixed {
                tags: &[],
                allow_text: true,
            },
        )
        .with_attributes(vec![
            AttributeDef::required(
                "type",
                Constraint::Enum(&["addressee", "person", "place", "date", "topic"]),
            ),
            AttributeDef::required("value", Constraint::NonEmpty),
        ]),
    );
    registry.add(
        ElementSchema::new(
            "w-sent",
            ContentModel::Mixed {
                tags: &["w-lang"],
                allow_text: true,
            },
        )
        .forbid_self_nesting(),
    );
    registry.add(
        ElementSchema::new(
            "a",
            ContentModel::Mixed {
                tags: &[],
                allow_text: true,
            },
        )
        .with_attributes(vec![
            AttributeDef::optional("href", Constraint::NonEmpty),
            AttributeDef::optional("id", Constraint::NonEmpty),
            AttributeDef::optional("title", Constraint::Any),
        ])
        .require_one_of("href", "id")
        .forbid_self_nesting(),
    );

    // Notes
    registry.add(ElementSchema::new(
        "w-note",
        ContentModel::Seq(vec![
            ContentModel::Elem("w-note-header"),
            ContentModel::Elem("w-note-body"),
        ]),
    ));
    registry.add(ElementSchema::new("w-note-header", ContentModel::TextOnly));
    registry.add(ElementSchema::new(
        "w-note-body",
        ContentModel::Elem("w-text-block"),
    ));

    registry
}
