//! Content-Model Matcher
//!
//! A small backtracking acceptor deciding whether an ordered child sequence
//! instantiates a content-model expression. The matcher works on the word
//! the children spell over the alphabet {Element(tag), Text}; it knows
//! nothing about attributes or the registry.
//!
//! Each model is interpreted as a prefix matcher yielding the set of end
//! offsets reachable from a start offset; the whole word is accepted when
//! its full length is reachable from offset zero. Folding reachable-position
//! sets through `Seq` gives backtracking across `Repeat` and `Choice`
//! boundaries without an explicit search stack.

use crate::node::{Element, Node, Position, Text};
use crate::schema::ContentModel;
use std::collections::HashSet;

/// A child reduced to a grammar symbol.
#[derive(Debug, Clone, Copy)]
pub enum ChildSym<'a> {
    Elem(&'a Element),
    Text(&'a Text),
}

impl ChildSym<'_> {
    pub fn position(&self) -> Position {
        match self {
            ChildSym::Elem(el) => el.position,
            ChildSym::Text(text) => text.position,
        }
    }

    fn is_text(&self) -> bool {
        matches!(self, ChildSym::Text(_))
    }
}

/// Reduce children to the word the matcher runs over.
///
/// Whitespace-only text is layout between block elements, not content, and
/// is dropped; text with substance is always part of the word.
pub fn child_word(children: &[Node]) -> Vec<ChildSym<'_>> {
    children
        .iter()
        .filter_map(|child| match child {
            Node::Element(el) => Some(ChildSym::Elem(el)),
            Node::Text(text) if text.content.trim().is_empty() => None,
            Node::Text(text) => Some(ChildSym::Text(text)),
        })
        .collect()
}

/// The most informative failure point of a rejected match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchFailure {
    /// A child could not be matched; everything before `index` was consumed.
    AtChild {
        index: usize,
        position: Position,
        is_text: bool,
    },
    /// Every child was consumed but the model wants more (too few children);
    /// reported at the parent node.
    Incomplete,
}

/// Match a whole child word against a content model.
pub fn match_content(model: &ContentModel, word: &[ChildSym<'_>]) -> Result<(), MatchFailure> {
    let mut matcher = Matcher { word, furthest: 0 };
    let ends = matcher.ends(model, 0);
    if ends.contains(&word.len()) {
        return Ok(());
    }
    if matcher.furthest < word.len() {
        let sym = &word[matcher.furthest];
        Err(MatchFailure::AtChild {
            index: matcher.furthest,
            position: sym.position(),
            is_text: sym.is_text(),
        })
    } else {
        Err(MatchFailure::Incomplete)
    }
}

struct Matcher<'a, 'w> {
    word: &'w [ChildSym<'a>],
    /// Furthest offset any partial match reached, for error positioning.
    furthest: usize,
}

impl Matcher<'_, '_> {
    /// End offsets reachable by matching `model` starting at `start`.
    fn ends(&mut self, model: &ContentModel, start: usize) -> Vec<usize> {
        self.furthest = self.furthest.max(start);
        let ends = match model {
            ContentModel::Empty => vec![start],
            ContentModel::TextOnly => {
                let mut ends = vec![start];
                let mut offset = start;
                while self.word.get(offset).is_some_and(ChildSym::is_text) {
                    offset += 1;
                    ends.push(offset);
                }
                ends
            }
            ContentModel::Elem(tag) => match self.word.get(start) {
                Some(ChildSym::Elem(el)) if el.tag == *tag => vec![start + 1],
                _ => Vec::new(),
            },
            ContentModel::Seq(models) => {
                let mut positions = vec![start];
                for sub in models {
                    positions = self.step_all(sub, &positions);
                    if positions.is_empty() {
                        break;
                    }
                }
                positions
            }
            ContentModel::Choice(models) => {
                let mut ends = Vec::new();
                for sub in models {
                    merge(&mut ends, self.ends(sub, start));
                }
                ends
            }
            ContentModel::Repeat { model, min, max } => self.repeat(model, *min, *max, start),
            ContentModel::Mixed { tags, allow_text } => {
                let mut ends = vec![start];
                let mut offset = start;
                while let Some(sym) = self.word.get(offset) {
                    let permitted = match sym {
                        ChildSym::Text(_) => *allow_text,
                        ChildSym::Elem(el) => tags.contains(&el.tag.as_str()),
                    };
                    if !permitted {
                        break;
                    }
                    offset += 1;
                    ends.push(offset);
                }
                ends
            }
        };
        if let Some(max) = ends.iter().max() {
            self.furthest = self.furthest.max(*max);
        }
        ends
    }

    /// Union of `ends` over a set of start positions.
    fn step_all(&mut self, model: &ContentModel, positions: &[usize]) -> Vec<usize> {
        let mut next = Vec::new();
        for &position in positions {
            merge(&mut next, self.ends(model, position));
        }
        next
    }

    fn repeat(
        &mut self,
        model: &ContentModel,
        min: u32,
        max: Option<u32>,
        start: usize,
    ) -> Vec<usize> {
        let mut ends = Vec::new();
        if min == 0 {
            ends.push(start);
        }
        // Breadth-first search over (offset, repetition count) states.
        // Counts saturate at `cap`: once a state may stop repeating, higher
        // counts are indistinguishable, which keeps the state space finite
        // even for unbounded repeats and zero-width sub-models.
        let cap = max.unwrap_or(min);
        let mut seen: HashSet<(usize, u32)> = HashSet::from([(start, 0)]);
        let mut frontier = vec![(start, 0u32)];
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for (offset, count) in frontier {
                if max.is_some_and(|max| count >= max) {
                    continue;
                }
                for end in self.ends(model, offset) {
                    let stepped = (count + 1).min(cap);
                    if count + 1 >= min {
                        merge(&mut ends, vec![end]);
                    }
                    if seen.insert((end, stepped)) {
                        next.push((end, stepped));
                    }
                }
            }
            frontier = next;
        }
        ends
    }
}

fn merge(into: &mut Vec<usize>, from: Vec<usize>) {
    for offset in from {
        if !into.contains(&offset) {
            into.push(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Attribute;

    fn elem(tag: &str) -> Node {
        Node::Element(Element {
            tag: tag.to_string(),
            attributes: Vec::<Attribute>::new(),
            children: Vec::new(),
            position: Position::new(1, 1),
        })
    }

    fn text(content: &str) -> Node {
        Node::Text(Text {
            content: content.to_string(),
            position: Position::new(1, 1),
        })
    }

    fn accepts(model: &ContentModel, children: &[Node]) -> bool {
        match_content(model, &child_word(children)).is_ok()
    }

    #[test]
    fn test_empty_model() {
        let model = ContentModel::Empty;
        assert!(accepts(&model, &[]));
        assert!(accepts(&model, &[text("  \n ")]));
        assert!(!accepts(&model, &[text("content")]));
        assert!(!accepts(&model, &[elem("hr")]));
    }

    #[test]
    fn test_text_only_model() {
        let model = ContentModel::TextOnly;
        assert!(accepts(&model, &[]));
        assert!(accepts(&model, &[text("some text")]));
        assert!(!accepts(&model, &[text("a"), elem("br")]));
    }

    #[test]
    fn test_elem_model() {
        let model = ContentModel::Elem("w-text-block");
        assert!(accepts(&model, &[elem("w-text-block")]));
        assert!(!accepts(&model, &[]));
        assert!(!accepts(&model, &[elem("br")]));
        assert!(!accepts(&model, &[elem("w-text-block"), elem("w-text-block")]));
    }

    #[test]
    fn test_seq_with_optional_tail() {
        // figure: img then optional figcaption
        let model = ContentModel::Seq(vec![
            ContentModel::Elem("img"),
            ContentModel::optional(ContentModel::Elem("figcaption")),
        ]);
        assert!(accepts(&model, &[elem("img")]));
        assert!(accepts(&model, &[elem("img"), elem("figcaption")]));
        assert!(!accepts(&model, &[elem("img"), elem("img")]));
        assert!(!accepts(&model, &[elem("figcaption")]));
        assert!(!accepts(&model, &[]));
    }

    #[test]
    fn test_two_optionals_do_not_double_up() {
        // table: optional thead then optional tbody
        let model = ContentModel::Seq(vec![
            ContentModel::optional(ContentModel::Elem("thead")),
            ContentModel::optional(ContentModel::Elem("tbody")),
        ]);
        assert!(accepts(&model, &[]));
        assert!(accepts(&model, &[elem("thead")]));
        assert!(accepts(&model, &[elem("tbody")]));
        assert!(accepts(&model, &[elem("thead"), elem("tbody")]));
        assert!(!accepts(&model, &[elem("tbody"), elem("tbody")]));
        assert!(!accepts(&model, &[elem("tbody"), elem("thead")]));
    }

    #[test]
    fn test_choice_accepts_exactly_one_alternative() {
        let model = ContentModel::Choice(vec![
            ContentModel::Elem("w-text-block"),
            ContentModel::Elem("hr"),
        ]);
        assert!(accepts(&model, &[elem("hr")]));
        assert!(!accepts(&model, &[elem("hr"), elem("hr")]));
        assert!(!accepts(&model, &[elem("w-text-block"), elem("hr")]));
    }

    #[test]
    fn test_repeat_bounds() {
        let model = ContentModel::at_least(1, ContentModel::Elem("w-li"));
        assert!(!accepts(&model, &[]));
        assert!(accepts(&model, &[elem("w-li")]));
        assert!(accepts(&model, &[elem("w-li"), elem("w-li"), elem("w-li")]));
        assert!(!accepts(&model, &[elem("w-li"), elem("hr")]));
    }

    #[test]
    fn test_repeat_of_optional_terminates() {
        let model = ContentModel::at_least(0, ContentModel::optional(ContentModel::Elem("hr")));
        assert!(accepts(&model, &[]));
        assert!(accepts(&model, &[elem("hr"), elem("hr")]));
    }

    #[test]
    fn test_mixed_model() {
        let model = ContentModel::Mixed {
            tags: &["td", "th"],
            allow_text: false,
        };
        assert!(accepts(&model, &[]));
        assert!(accepts(&model, &[elem("td"), elem("th"), elem("td")]));
        assert!(!accepts(&model, &[elem("hr")]));
        assert!(!accepts(&model, &[text("stray")]));
    }

    #[test]
    fn test_failure_points_at_first_unmatched_child() {
        let model = ContentModel::Seq(vec![
            ContentModel::Elem("img"),
            ContentModel::optional(ContentModel::Elem("figcaption")),
        ]);
        let children = vec![elem("img"), elem("img")];
        let word = child_word(&children);
        match match_content(&model, &word) {
            Err(MatchFailure::AtChild { index, is_text, .. }) => {
                assert_eq!(index, 1);
                assert!(!is_text);
            }
            other => panic!("expected child failure, got {other:?}"),
        }
    }

    #[test]
    fn test_too_few_children_reports_incomplete() {
        let model = ContentModel::Seq(vec![
            ContentModel::Elem("w-note-header"),
            ContentModel::Elem("w-note-body"),
        ]);
        let children = vec![elem("w-note-header")];
        let word = child_word(&children);
        assert_eq!(match_content(&model, &word), Err(MatchFailure::Incomplete));
    }

    #[test]
    fn test_text_failure_is_flagged_as_text() {
        let model = ContentModel::Mixed {
            tags: &["tr"],
            allow_text: false,
        };
        let children = vec![elem("tr"), text("stray")];
        let word = child_word(&children);
        match match_content(&model, &word) {
            Err(MatchFailure::AtChild { index, is_text, .. }) => {
                assert_eq!(index, 1);
                assert!(is_text);
            }
            other => panic!("expected text failure, got {other:?}"),
        }
    }
}
