//! Declarative per-field constraints.
//!
//! Constraints are presentation-level checks. A failing field is reported
//! through [`FieldError`] and never stops a form from being extracted or
//! reset. As in browser form validation, every constraint except
//! [`Constraint::Required`] passes on an empty value.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// A single constraint on a form field.
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    /// Value must be present and non-blank.
    Required,
    /// Text must have at least this many characters.
    MinLength(usize),
    /// Text must have at most this many characters.
    MaxLength(usize),
    /// Number must be at least this value.
    Min(f64),
    /// Number must be at most this value.
    Max(f64),
    /// Text must match the whole pattern.
    Pattern(&'static LazyLock<Regex>),
}

/// Which constraint a field value broke.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("is required")]
    Required,
    #[error("must be at least {0} characters")]
    MinLength(usize),
    #[error("cannot be longer than {0} characters")]
    MaxLength(usize),
    #[error("must be at least {0}")]
    Min(f64),
    #[error("cannot be more than {0}")]
    Max(f64),
    #[error("must match the pattern {0}")]
    Pattern(String),
}

/// A constraint failure on a named field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} {violation}")]
pub struct FieldError {
    pub field: &'static str,
    pub violation: Violation,
}

/// Value of a field as seen by the constraint checker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldInput<'a> {
    Empty,
    Text(&'a str),
    Number(f64),
    /// A non-text, non-numeric value such as an enum or a reference.
    Present,
}

impl FieldInput<'_> {
    /// Input for a field whose only constraint can be `Required`.
    #[must_use]
    pub const fn presence(present: bool) -> Self {
        if present { Self::Present } else { Self::Empty }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Present => false,
        }
    }
}

impl<'a> From<Option<&'a str>> for FieldInput<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Empty, Self::Text)
    }
}

impl From<Option<i32>> for FieldInput<'_> {
    fn from(value: Option<i32>) -> Self {
        value.map_or(Self::Empty, |n| Self::Number(f64::from(n)))
    }
}

impl From<Option<f64>> for FieldInput<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }
}

impl From<Option<Decimal>> for FieldInput<'_> {
    fn from(value: Option<Decimal>) -> Self {
        value
            .and_then(|d| d.to_f64())
            .map_or(Self::Empty, Self::Number)
    }
}

/// Check `input` against `constraints`, pushing one error per violation.
pub fn check(
    field: &'static str,
    input: FieldInput<'_>,
    constraints: &[Constraint],
    errors: &mut Vec<FieldError>,
) {
    let empty = input.is_empty();

    for constraint in constraints {
        let violation = match (*constraint, input) {
            (Constraint::Required, _) if empty => Some(Violation::Required),
            _ if empty => None,
            (Constraint::MinLength(min), FieldInput::Text(text))
                if text.chars().count() < min =>
            {
                Some(Violation::MinLength(min))
            }
            (Constraint::MaxLength(max), FieldInput::Text(text))
                if text.chars().count() > max =>
            {
                Some(Violation::MaxLength(max))
            }
            (Constraint::Min(min), FieldInput::Number(n)) if n < min => Some(Violation::Min(min)),
            (Constraint::Max(max), FieldInput::Number(n)) if n > max => Some(Violation::Max(max)),
            (Constraint::Pattern(pattern), FieldInput::Text(text)) if !pattern.is_match(text) => {
                Some(Violation::Pattern(pattern.as_str().to_string()))
            }
            _ => None,
        };

        if let Some(violation) = violation {
            errors.push(FieldError { field, violation });
        }
    }
}
