// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rule registries.
//!
//! A [`Grammar`] is a set of named productions plus the name of the root
//! rule. Rule bodies reference each other (and themselves) through
//! [`call`](crate::dsl::call); the reference is looked up when the parse
//! reaches it, so definition order does not matter and recursion needs no
//! special wiring. A grammar is immutable during parsing and can be shared
//! freely across threads.
//!
//! Left recursion is not supported: a rule whose body can reach itself
//! without consuming input will recurse until the interpreter's stack guard
//! gives out. Write such rules with repetition instead.

use std::collections::BTreeMap;
use std::io::Read;

use ecow::EcoString;

use crate::atom::Atom;
use crate::parse::{self, ParseError, Warning};
use crate::value::Value;

/// A named-rule grammar.
///
/// # Examples
///
/// A recursive grammar for nested parenthesized groups:
///
/// ```
/// use espalier::dsl::{call, re, str};
/// use espalier::Grammar;
///
/// let mut grammar = Grammar::new("group");
/// grammar.define(
///     "group",
///     str("(") >> (call("group") | re("[a-z]").repeat(0, None)) >> str(")"),
/// );
/// assert_eq!(grammar.parse("((abc))").unwrap(), "((abc))");
/// assert!(grammar.parse("((abc)").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    /// The rule the parse starts from.
    root: EcoString,
    /// The productions, by name.
    rules: BTreeMap<EcoString, Atom>,
}

impl Grammar {
    /// Creates an empty grammar whose parse starts at the rule `root`.
    #[must_use]
    pub fn new(root: impl Into<EcoString>) -> Self {
        Self {
            root: root.into(),
            rules: BTreeMap::new(),
        }
    }

    /// Defines (or redefines) the rule `name`.
    pub fn define(&mut self, name: impl Into<EcoString>, body: Atom) -> &mut Self {
        self.rules.insert(name.into(), body);
        self
    }

    /// Returns the body of the rule `name`, if defined.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Atom> {
        self.rules.get(name)
    }

    /// Returns the root rule name.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    pub(crate) fn rules(&self) -> &BTreeMap<EcoString, Atom> {
        &self.rules
    }

    /// Parses `input` from the root rule, consuming it completely.
    ///
    /// Duplicate-capture warnings encountered while building the result tree
    /// are logged through `tracing`; use [`Grammar::parse_with_warnings`] to
    /// collect them instead.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the deepest failure, leftover
    /// input, or an undefined rule reference.
    pub fn parse(&self, input: &str) -> Result<Value, ParseError> {
        let (result, warnings) = self.parse_with_warnings(input);
        parse::log_warnings(&warnings);
        result
    }

    /// Parses `input`, returning the result together with any warnings.
    ///
    /// Warnings are non-fatal: today's only source is two named captures
    /// merging under the same key, where the later value wins.
    pub fn parse_with_warnings(&self, input: &str) -> (Result<Value, ParseError>, Vec<Warning>) {
        parse::parse_grammar(self, input)
    }

    /// Reads `reader` to the end and parses the text from the root rule.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Io`] if reading fails, or any error
    /// [`Grammar::parse`] can return.
    pub fn parse_reader(&self, mut reader: impl Read) -> Result<Value, ParseError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        self.parse(&input)
    }
}
