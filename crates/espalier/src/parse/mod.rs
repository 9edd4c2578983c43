// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The parse driver.
//!
//! This module wires the pieces together for one parse call: it wraps the
//! input in a [`Source`], applies the root atom through the interpreter,
//! verifies that the whole input was consumed, and flattens the raw match
//! tree into the caller's [`Value`].
//!
//! All mutable parse state lives in the per-call [`Context`] — grammars and
//! atoms are never written to during a parse, so one grammar can serve any
//! number of concurrent parses.
//!
//! [`Value`]: crate::value::Value

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::atom::Atom;
use crate::flatten;
use crate::grammar::Grammar;
use crate::source::Source;
use crate::span::Span;
use crate::value::Value;

mod error;
mod interp;
#[cfg(test)]
mod property_tests;

pub use error::{ErrorTree, ParseError};

/// A suspicious-but-tolerated condition noticed while folding a parse into
/// its result tree.
///
/// Warnings never fail the parse. [`Grammar::parse_with_warnings`] hands
/// them back to the caller; the plain entry points log them through
/// `tracing` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// What was noticed.
    pub kind: WarningKind,
    /// The input region the warning points at.
    pub span: Span,
}

/// The conditions a parse warns about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// Two named captures merged under the same key, so the later value
    /// replaced the earlier one. Usually the grammar meant to use two
    /// different keys, or a repetition around the captures.
    DuplicateKey {
        /// The colliding capture key.
        key: EcoString,
    },
}

impl Warning {
    /// A duplicate-capture-key warning, spanning the later of the two
    /// colliding matches.
    pub(crate) fn duplicate_key(key: EcoString, span: Span) -> Self {
        Self {
            kind: WarningKind::DuplicateKey { key },
            span,
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            WarningKind::DuplicateKey { key } => {
                write!(f, "duplicate capture key `{key}`; the later value wins")
            }
        }
    }
}

/// Per-parse mutable state.
///
/// Holds the rule registry the parse resolves [`Atom::Call`] against, and
/// the most recent failure a repetition recovered from — the driver consults
/// it when the root matches without consuming everything.
pub(crate) struct Context<'g> {
    rules: &'g BTreeMap<EcoString, Atom>,
    swallowed: Option<ErrorTree>,
}

impl<'g> Context<'g> {
    pub(crate) fn new(rules: &'g BTreeMap<EcoString, Atom>) -> Self {
        Self {
            rules,
            swallowed: None,
        }
    }

    /// Looks up a rule body in the registry.
    pub(crate) fn rule(&self, name: &str) -> Option<&'g Atom> {
        self.rules.get(name)
    }

    /// Records a failure that was recovered from rather than propagated.
    pub(crate) fn swallow(&mut self, failure: ErrorTree) {
        self.swallowed = Some(failure);
    }

    pub(crate) fn take_swallowed(&mut self) -> Option<ErrorTree> {
        self.swallowed.take()
    }
}

/// Parses `input` with a grammar's root rule.
pub(crate) fn parse_grammar(
    grammar: &Grammar,
    input: &str,
) -> (Result<Value, ParseError>, Vec<Warning>) {
    let Some(root) = grammar.rule(grammar.root()) else {
        let error = ParseError::UndefinedRule {
            name: grammar.root().into(),
        };
        return (Err(error), Vec::new());
    };
    run(grammar.rules(), root, input)
}

/// Parses `input` with a bare atom and no rule registry.
pub(crate) fn parse_atom(atom: &Atom, input: &str) -> Result<Value, ParseError> {
    let rules = BTreeMap::new();
    let (result, warnings) = run(&rules, atom, input);
    log_warnings(&warnings);
    result
}

/// Logs warnings the caller chose not to collect.
pub(crate) fn log_warnings(warnings: &[Warning]) {
    for warning in warnings {
        tracing::warn!(target: "espalier", span = ?warning.span, "{warning}");
    }
}

fn run(
    rules: &BTreeMap<EcoString, Atom>,
    root: &Atom,
    input: &str,
) -> (Result<Value, ParseError>, Vec<Warning>) {
    let mut source = Source::new(input);
    let mut ctx = Context::new(rules);

    let raw = match interp::apply(root, &mut source, &mut ctx) {
        Ok(raw) => raw,
        Err(interp::Failure::Match(tree)) => {
            let error = ParseError::Failed {
                message: tree.message().to_owned(),
                at: source.span(tree.position(), tree.position()),
                tree: *tree,
                input: input.to_owned(),
            };
            return (Err(error), Vec::new());
        }
        Err(interp::Failure::Rule { name }) => {
            return (Err(ParseError::UndefinedRule { name }), Vec::new());
        }
    };

    if !source.eof() {
        let leftover = source.span(source.pos(), source.len());
        let error = match ctx.take_swallowed() {
            Some(tree) => ParseError::Unconsumed {
                cause: tree.message().to_owned(),
                tree,
                at: leftover,
                input: input.to_owned(),
            },
            None => {
                let (line, column) = source.line_and_column(source.pos());
                ParseError::Unexpected {
                    snippet: source.preview(100).to_owned(),
                    line,
                    column,
                    at: leftover,
                    input: input.to_owned(),
                }
            }
        };
        return (Err(error), Vec::new());
    }

    let mut warnings = Vec::new();
    let value = flatten::flatten(raw, &mut warnings);
    (Ok(value), warnings)
}
