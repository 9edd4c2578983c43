// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The atom algebra.
//!
//! An [`Atom`] is a node of a parser expression tree. Atoms are immutable
//! values: combinator methods and the `>>` / `|` operators consume their
//! operands and build larger trees, so a grammar is assembled bottom-up and
//! never changes once built. Rule references ([`Atom::Call`]) are resolved
//! against a [`Grammar`] registry at parse time, which is what makes
//! recursive grammars possible without self-referential ownership.
//!
//! Matching semantics live in the interpreter; this module only defines the
//! shapes, the construction surface, and the printed form.
//!
//! [`Grammar`]: crate::grammar::Grammar

use ecow::EcoString;
use regex::Regex;

use crate::parse::{self, ParseError};
use crate::value::{Tag, Value};

mod display;
mod ops;

/// A node of a parser expression tree.
///
/// Constructed through [`dsl`](crate::dsl) functions, the combinator methods
/// below, and the `>>` (sequence) and `|` (ordered choice) operators.
///
/// # Examples
///
/// ```
/// use espalier::dsl::{re, str};
///
/// // An integer: an optional sign followed by one or more digits.
/// let integer = str("-").maybe() >> re("[0-9]").repeat(1, None);
/// assert_eq!(integer.parse("-42").unwrap(), "-42");
/// ```
#[derive(Debug, Clone)]
pub enum Atom {
    /// Matches a literal string.
    Str {
        /// The literal text.
        text: EcoString,
    },

    /// Matches a single char against a regular expression fragment.
    Re {
        /// The pattern as written.
        pattern: EcoString,
        /// The compiled matcher, anchored to exactly one char.
        matcher: Regex,
    },

    /// Matches its children in order; all must match.
    Sequence {
        /// The child atoms, in match order.
        children: Vec<Atom>,
    },

    /// Ordered choice: tries its children in order, first success wins.
    Alternative {
        /// The child atoms, in preference order.
        children: Vec<Atom>,
    },

    /// Matches its child between `min` and `max` times.
    Repetition {
        /// Minimum number of occurrences.
        min: u32,
        /// Maximum number of occurrences; `None` means unbounded.
        max: Option<u32>,
        /// Distinguishes `repeat` from `maybe` for the flattener.
        tag: Tag,
        /// The repeated atom.
        child: Box<Atom>,
    },

    /// Asserts that its child does (or does not) match, without consuming.
    Lookahead {
        /// True for `present`, false for `absent`.
        positive: bool,
        /// The asserted atom.
        child: Box<Atom>,
    },

    /// Wraps its child's value under a capture key.
    Named {
        /// The capture key.
        name: EcoString,
        /// The wrapped atom.
        child: Box<Atom>,
    },

    /// A reference to a named rule in a [`Grammar`](crate::grammar::Grammar).
    Call {
        /// The rule name.
        name: EcoString,
    },
}

impl Atom {
    /// Creates an atom matching the literal `text`.
    #[must_use]
    pub fn literal(text: impl Into<EcoString>) -> Self {
        Self::Str { text: text.into() }
    }

    /// Creates an atom matching one char against a regex fragment.
    ///
    /// The pattern is compiled anchored to exactly one char, with `.`
    /// matching newlines.
    ///
    /// # Panics
    ///
    /// Panics if the pattern does not compile; an invalid pattern is a
    /// mistake in the grammar, not a parse failure.
    #[must_use]
    pub fn pattern(pattern: impl Into<EcoString>) -> Self {
        let pattern = pattern.into();
        let anchored = format!("(?s)^(?:{pattern})$");
        let matcher = Regex::new(&anchored)
            .unwrap_or_else(|error| panic!("invalid pattern {pattern:?}: {error}"));
        Self::Re { pattern, matcher }
    }

    /// Creates a reference to the rule `name`.
    #[must_use]
    pub fn rule(name: impl Into<EcoString>) -> Self {
        Self::Call { name: name.into() }
    }

    /// Matches this atom between `min` and `max` times (`None`: unbounded).
    ///
    /// Matching is greedy and never backtracks out of accepted occurrences;
    /// fewer than `min` occurrences is a failure.
    #[must_use]
    pub fn repeat(self, min: u32, max: impl Into<Option<u32>>) -> Self {
        Self::Repetition {
            min,
            max: max.into(),
            tag: Tag::Repetition,
            child: Box::new(self),
        }
    }

    /// Matches this atom zero or one time.
    ///
    /// An absent match flattens to [`Value::Nil`].
    #[must_use]
    pub fn maybe(self) -> Self {
        Self::Repetition {
            min: 0,
            max: Some(1),
            tag: Tag::Maybe,
            child: Box::new(self),
        }
    }

    /// Asserts that this atom matches here, without consuming input.
    #[must_use]
    pub fn present(self) -> Self {
        Self::Lookahead {
            positive: true,
            child: Box::new(self),
        }
    }

    /// Asserts that this atom does not match here, without consuming input.
    #[must_use]
    pub fn absent(self) -> Self {
        Self::Lookahead {
            positive: false,
            child: Box::new(self),
        }
    }

    /// Captures this atom's value under `name` in the result tree.
    #[must_use]
    pub fn named(self, name: impl Into<EcoString>) -> Self {
        Self::Named {
            name: name.into(),
            child: Box::new(self),
        }
    }

    /// Parses `input` with this atom as the whole grammar.
    ///
    /// The input must be consumed completely. Any [`Atom::Call`] reached
    /// during the parse fails with [`ParseError::UndefinedRule`], since a
    /// bare atom has no rule registry; use a
    /// [`Grammar`](crate::grammar::Grammar) for recursive rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the deepest failure.
    pub fn parse(&self, input: &str) -> Result<Value, ParseError> {
        parse::parse_atom(self, input)
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str { text: a }, Self::Str { text: b }) => a == b,
            // Matchers compile deterministically from the pattern.
            (Self::Re { pattern: a, .. }, Self::Re { pattern: b, .. }) => a == b,
            (Self::Sequence { children: a }, Self::Sequence { children: b })
            | (Self::Alternative { children: a }, Self::Alternative { children: b }) => a == b,
            (
                Self::Repetition {
                    min: a_min,
                    max: a_max,
                    tag: a_tag,
                    child: a,
                },
                Self::Repetition {
                    min: b_min,
                    max: b_max,
                    tag: b_tag,
                    child: b,
                },
            ) => a_min == b_min && a_max == b_max && a_tag == b_tag && a == b,
            (
                Self::Lookahead {
                    positive: a_pos,
                    child: a,
                },
                Self::Lookahead {
                    positive: b_pos,
                    child: b,
                },
            ) => a_pos == b_pos && a == b,
            (
                Self::Named { name: a_name, child: a },
                Self::Named { name: b_name, child: b },
            ) => a_name == b_name && a == b,
            (Self::Call { name: a }, Self::Call { name: b }) => a == b,
            _ => false,
        }
    }
}
