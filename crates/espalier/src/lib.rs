// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Espalier: PEG parser combinators.
//!
//! A grammar is a tree of [`Atom`]s built with a small set of combinators —
//! literals, single-char matches, sequence (`>>`), ordered choice (`|`),
//! repetition, lookahead, and named captures. Parsing is recursive descent
//! with backtracking: ordered choice tries arms left to right, and a failed
//! attempt always rewinds the cursor before the next one. Matched text
//! folds into a structured [`Value`] tree, where named captures become
//! mappings and repetitions of captures become lists.
//!
//! Failures come back as a [`ParseError`] whose message names the deepest
//! cause with its line and char, with the full cause trail available as an
//! [`ErrorTree`] and rendered through [`miette`].
//!
//! # Example
//!
//! ```
//! use espalier::dsl::{re, str};
//! use espalier::Value;
//!
//! let digits = re("[0-9]").repeat(1, None);
//! let version = digits.clone().named("major")
//!     >> str(".")
//!     >> digits.clone().named("minor")
//!     >> (str(".") >> digits.named("patch")).maybe();
//!
//! let value = version.parse("1.24.0").unwrap();
//! assert_eq!(value.get("major").and_then(Value::as_str), Some("1"));
//! assert_eq!(value.get("patch").and_then(Value::as_str), Some("0"));
//!
//! let value = version.parse("1.24").unwrap();
//! assert!(value.get("patch").is_none());
//! ```
//!
//! Recursive grammars name their rules in a [`Grammar`] registry and
//! reference them with [`dsl::call`]; see the [`grammar`] module.

#![doc = include_str!("../../../README.md")]

pub mod atom;
pub mod dsl;
mod flatten;
pub mod grammar;
pub mod parse;
pub mod source;
pub mod span;
pub mod value;

pub use atom::Atom;
pub use grammar::Grammar;
pub use parse::{ErrorTree, ParseError, Warning, WarningKind};
pub use source::Source;
pub use span::Span;
pub use value::{Tag, Value};

/// Re-export of the types most grammars need.
pub mod prelude {
    pub use crate::dsl::{call, re, str};
    pub use crate::{Atom, Grammar, ParseError, Value};
}
