//! Attribute Constraints
//!
//! Reusable, composable value checks for element attributes. Each check
//! yields a typed `InvalidReason` on failure; turning reasons into located
//! diagnostics is the validation engine's job.

use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Why an attribute value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidReason {
    /// Integer value outside its permitted bounds
    OutOfRange,
    /// Value not in the closed set of allowed values
    NotInEnum,
    /// Value is empty where a non-empty string is required
    EmptyValue,
    /// Value exceeds the maximum length
    TooLong,
    /// Value does not have the required shape (non-integer text, pattern mismatch)
    Malformed,
    /// A companion attribute the value depends on is missing
    MissingDependency,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidReason::OutOfRange => "value out of range",
            InvalidReason::NotInEnum => "value not in the allowed set",
            InvalidReason::EmptyValue => "value must not be empty",
            InvalidReason::TooLong => "value too long",
            InvalidReason::Malformed => "value is malformed",
            InvalidReason::MissingDependency => "required companion attribute missing",
        };
        f.write_str(text)
    }
}

/// Sibling context an attribute check may consult. Some attributes (the
/// recurring `skip` counter) are bounded by the node's own child count.
#[derive(Debug, Clone, Copy)]
pub struct AttrContext {
    /// Number of element children of the node carrying the attribute
    pub child_count: usize,
}

/// A composable attribute value check.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Any string is acceptable
    Any,
    /// Integer with optional inclusive bounds; non-integer text is rejected
    Int { min: Option<i64>, max: Option<i64> },
    /// Closed set of allowed values
    Enum(&'static [&'static str]),
    /// Non-empty string
    NonEmpty,
    /// At most `n` characters
    MaxLength(usize),
    /// Must match the given pattern over the whole value
    Pattern(Regex),
    /// Integer `v` with `1 <= v <= N` where `N` is the element-child count
    ChildCountBounded,
    /// Every listed check must pass; the first failure wins
    All(Vec<Constraint>),
}

impl Constraint {
    pub fn check(&self, value: &str, ctx: &AttrContext) -> Result<(), InvalidReason> {
        match self {
            Constraint::Any => Ok(()),
            Constraint::Int { min, max } => {
                let parsed: i64 = value.parse().map_err(|_| InvalidReason::Malformed)?;
                if min.is_some_and(|min| parsed < min) || max.is_some_and(|max| parsed > max) {
                    return Err(InvalidReason::OutOfRange);
                }
                Ok(())
            }
            Constraint::Enum(allowed) => {
                if allowed.contains(&value) {
                    Ok(())
                } else {
                    Err(InvalidReason::NotInEnum)
                }
            }
            Constraint::NonEmpty => {
                if value.is_empty() {
                    Err(InvalidReason::EmptyValue)
                } else {
                    Ok(())
                }
            }
            Constraint::MaxLength(limit) => {
                if value.chars().count() > *limit {
                    Err(InvalidReason::TooLong)
                } else {
                    Ok(())
                }
            }
            Constraint::Pattern(pattern) => {
                if pattern.is_match(value) {
                    Ok(())
                } else {
                    Err(InvalidReason::Malformed)
                }
            }
            Constraint::ChildCountBounded => {
                let parsed: i64 = value.parse().map_err(|_| InvalidReason::Malformed)?;
                if parsed < 1 || parsed > ctx.child_count as i64 {
                    return Err(InvalidReason::OutOfRange);
                }
                Ok(())
            }
            Constraint::All(checks) => checks.iter().try_for_each(|check| check.check(value, ctx)),
        }
    }
}

/// A named attribute rule on an element schema.
#[derive(Debug, Clone)]
pub struct AttributeDef {
    pub name: &'static str,
    pub required: bool,
    pub constraint: Constraint,
}

impl AttributeDef {
    pub fn required(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            required: true,
            constraint,
        }
    }

    pub fn optional(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            required: false,
            constraint,
        }
    }
}

/// Compile a whole-value pattern constraint. The expression comes from the
/// registry's own vocabulary data, so a bad pattern is a configuration bug
/// and fails loudly at startup.
pub fn pattern(expr: &str) -> Constraint {
    let anchored = format!("^(?:{expr})$");
    match Regex::new(&anchored) {
        Ok(regex) => Constraint::Pattern(regex),
        Err(err) => panic!("invalid schema pattern '{expr}': {err}"),
    }
}
