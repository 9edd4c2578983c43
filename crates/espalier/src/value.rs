// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parse values.
//!
//! The interpreter produces a [`Raw`] intermediate tree whose tagged nodes
//! record how each piece of input was matched; the flattener folds it into
//! the user-visible [`Value`]. Both are closed unions, so every consumer is
//! an exhaustive match.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::span::Span;

/// The tag on an intermediate list node.
///
/// Only sequences and repetitions produce tagged lists; the tag selects the
/// flattening rule (merge-fold, collapse, or unwrap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Produced by a sequence; flattened by merge-folding its items.
    Sequence,
    /// Produced by `repeat`; flattened by collapsing its items.
    Repetition,
    /// Produced by `maybe`; flattened to its single item, or nil when empty.
    Maybe,
}

/// The intermediate value returned by applying an atom, before flattening.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Raw {
    /// Byte span of the input this value was matched from.
    pub span: Span,
    /// The payload.
    pub kind: RawKind,
}

/// The shape of an intermediate value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawKind {
    /// No contribution to the tree (lookaheads).
    Nil,
    /// Matched text (literals and character matches).
    Str(EcoString),
    /// The singleton mapping produced by a named capture.
    Name {
        /// The capture key.
        key: EcoString,
        /// The captured value.
        child: Box<Raw>,
    },
    /// A tagged list produced by a sequence or repetition.
    Tagged {
        /// Selects the flattening rule.
        tag: Tag,
        /// The item values, in match order.
        items: Vec<Raw>,
    },
}

impl Raw {
    /// Creates a raw value.
    pub(crate) fn new(span: Span, kind: RawKind) -> Self {
        Self { span, kind }
    }
}

/// A flattened parse result: the tree handed back to the caller.
///
/// Trees are built from three shapes — matched text, named captures
/// (mappings), and lists of captures — plus [`Value::Nil`] for the one case
/// where nothing was matched at all: a `maybe` that did not match produces
/// `Nil`, and `Nil` vanishes when folded into a surrounding sequence.
///
/// # Examples
///
/// ```
/// use espalier::dsl::str;
/// use espalier::Value;
///
/// let atom = str("a").named("x") >> str("b").named("y");
/// let value = atom.parse("ab").unwrap();
/// assert_eq!(value, Value::map([("x", Value::str("a")), ("y", Value::str("b"))]));
/// assert_eq!(value.get("x").and_then(Value::as_str), Some("a"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Absence of a value (an empty `maybe`).
    Nil,
    /// Matched text.
    Str(EcoString),
    /// Named captures.
    Map(BTreeMap<EcoString, Value>),
    /// A list of values, produced by repetitions of named captures.
    List(Vec<Value>),
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn str(text: impl Into<EcoString>) -> Self {
        Self::Str(text.into())
    }

    /// Creates a mapping value from key/value pairs.
    #[must_use]
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<EcoString>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Creates a list value.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Returns true for [`Value::Nil`].
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the entry under `key` of a mapping value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Returns the items of a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::str(text)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(other)
    }
}
