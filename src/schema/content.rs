//! Content Models
//!
//! Algebraic grammar expressions describing which children an element may
//! legally contain. One generic matcher (validation::matcher) interprets
//! these; there is no per-tag child-counting code.

/// Grammar over the alphabet {Element(tag), Text}.
#[derive(Debug, Clone)]
pub enum ContentModel {
    /// No children and no text (void elements)
    Empty,
    /// Only text content, no child elements
    TextOnly,
    /// Exactly one child element with the given tag
    Elem(&'static str),
    /// Each sub-model matches in order over disjoint contiguous runs
    Seq(Vec<ContentModel>),
    /// Exactly one alternative matches the entire child sequence
    Choice(Vec<ContentModel>),
    /// The model matches consecutively between `min` and `max` times
    /// (`max = None` means unbounded)
    Repeat {
        model: Box<ContentModel>,
        min: u32,
        max: Option<u32>,
    },
    /// Any interleaving of permitted element tags and (optionally) text,
    /// in any order and multiplicity
    Mixed {
        tags: &'static [&'static str],
        allow_text: bool,
    },
}

impl ContentModel {
    /// Shorthand for `Repeat(model, 0, 1)`.
    pub fn optional(model: ContentModel) -> ContentModel {
        ContentModel::Repeat {
            model: Box::new(model),
            min: 0,
            max: Some(1),
        }
    }

    /// Shorthand for `Repeat(model, min, unbounded)`.
    pub fn at_least(min: u32, model: ContentModel) -> ContentModel {
        ContentModel::Repeat {
            model: Box::new(model),
            min,
            max: None,
        }
    }

    /// Every tag name this model can refer to, for registry verification.
    pub fn referenced_tags(&self) -> Vec<&'static str> {
        match self {
            ContentModel::Empty | ContentModel::TextOnly => Vec::new(),
            ContentModel::Elem(tag) => vec![tag],
            ContentModel::Seq(models) | ContentModel::Choice(models) => models
                .iter()
                .flat_map(|model| model.referenced_tags())
                .collect(),
            ContentModel::Repeat { model, .. } => model.referenced_tags(),
            ContentModel::Mixed { tags, .. } => tags.to_vec(),
        }
    }
}
