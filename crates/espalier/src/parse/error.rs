// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! What a failed parse reports.
//!
//! A [`ParseError`] pairs the human-readable cause (already formatted with
//! line and char) with a labeled [`Span`] and the input text, so [`miette`]
//! can render the failure in context. Match failures additionally carry an
//! [`ErrorTree`]: the trail of causes from the outermost atom that gave up
//! down to the atoms that actually touched the input.

use miette::Diagnostic;
use thiserror::Error;

use ecow::EcoString;

use crate::span::Span;

/// A node in the cause trail of a failed parse.
///
/// The message is already location-formatted (`"… at line L char C."`).
/// Children are the causes one level further in: the offending child of a
/// sequence, every arm of an exhausted alternative, or the occurrence that
/// stopped a repetition short of its minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTree {
    message: String,
    position: usize,
    children: Vec<ErrorTree>,
}

impl ErrorTree {
    /// Creates a node with nested causes.
    #[must_use]
    pub fn new(message: String, position: usize, children: Vec<ErrorTree>) -> Self {
        Self {
            message,
            position,
            children,
        }
    }

    /// Creates a node with no nested causes.
    #[must_use]
    pub fn leaf(message: String, position: usize) -> Self {
        Self::new(message, position, Vec::new())
    }

    /// Returns the location-formatted message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the char position the failure was reported at.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the nested causes.
    #[must_use]
    pub fn children(&self) -> &[ErrorTree] {
        &self.children
    }

    /// Returns the node that failed furthest into the input.
    #[must_use]
    pub fn deepest(&self) -> &ErrorTree {
        self.children
            .iter()
            .map(ErrorTree::deepest)
            .max_by_key(|node| node.position)
            .filter(|node| node.position >= self.position)
            .unwrap_or(self)
    }

    fn write_tree(&self, f: &mut std::fmt::Formatter<'_>, prefix: &str) -> std::fmt::Result {
        for (i, child) in self.children.iter().enumerate() {
            let last = i + 1 == self.children.len();
            let connector = if last { "`- " } else { "|- " };
            writeln!(f, "{prefix}{connector}{}", child.message)?;
            let extension = if last { "   " } else { "|  " };
            child.write_tree(f, &format!("{prefix}{extension}"))?;
        }
        Ok(())
    }
}

impl std::fmt::Display for ErrorTree {
    /// Renders the trail as an indented tree, one cause per line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.message)?;
        self.write_tree(f, "")
    }
}

/// An error raised by a parse entry point.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    /// The root atom failed to match.
    #[error("{message}")]
    #[diagnostic(code(espalier::parse_failed))]
    Failed {
        /// The cause stored by the atom that ultimately failed,
        /// location-formatted.
        message: String,
        /// Where the failure was reported.
        #[label("parse failed here")]
        at: Span,
        /// The full cause trail.
        tree: ErrorTree,
        /// The parse input.
        #[source_code]
        input: String,
    },

    /// The root atom matched but input remains, and a recovered failure
    /// explains where matching stopped.
    #[error("Unconsumed input, maybe because of this: {cause}")]
    #[diagnostic(code(espalier::unconsumed_input))]
    Unconsumed {
        /// The recovered cause, location-formatted.
        cause: String,
        /// The cause trail behind `cause`.
        tree: ErrorTree,
        /// The leftover input.
        #[label("left over")]
        at: Span,
        /// The parse input.
        #[source_code]
        input: String,
    },

    /// The root atom matched but input remains, with nothing to blame.
    #[error("Don't know what to do with \"{snippet}\" at line {line} char {column}.")]
    #[diagnostic(code(espalier::unexpected_input))]
    Unexpected {
        /// Up to 100 chars of the leftover input.
        snippet: String,
        /// Line number where the leftover starts.
        line: usize,
        /// Char number where the leftover starts.
        column: usize,
        /// The leftover input.
        #[label("unexpected")]
        at: Span,
        /// The parse input.
        #[source_code]
        input: String,
    },

    /// A rule reference could not be resolved. This is a mistake in the
    /// grammar, not a property of the input.
    #[error("rule `{name}` is not defined in this grammar")]
    #[diagnostic(
        code(espalier::undefined_rule),
        help("define the rule with `Grammar::define`, or check the name in `call`")
    )]
    UndefinedRule {
        /// The unresolved rule name.
        name: EcoString,
    },

    /// Reading a `parse_reader` input failed.
    #[error("failed to read parse input")]
    #[diagnostic(code(espalier::input_io))]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Returns the cause trail of a failed or incomplete parse.
    #[must_use]
    pub fn error_tree(&self) -> Option<&ErrorTree> {
        match self {
            Self::Failed { tree, .. } | Self::Unconsumed { tree, .. } => Some(tree),
            Self::Unexpected { .. } | Self::UndefinedRule { .. } | Self::Io(_) => None,
        }
    }
}
