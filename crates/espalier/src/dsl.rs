// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Grammar construction functions.
//!
//! These are the leaf constructors of the combinator surface; everything
//! else is built with the methods and operators on [`Atom`]:
//!
//! ```
//! use espalier::dsl::{re, str};
//!
//! let hex_color = str("#") >> re("[0-9a-f]").repeat(6, 6);
//! assert_eq!(hex_color.parse("#1a2b3c").unwrap(), "#1a2b3c");
//! ```

use ecow::EcoString;

use crate::atom::Atom;

/// Matches the literal `text`.
///
/// Matching is exact and case-sensitive. The empty literal matches at any
/// position, including at the end of input.
#[must_use]
pub fn str(text: impl Into<EcoString>) -> Atom {
    Atom::literal(text)
}

/// Matches a single char against the regex fragment `pattern`.
///
/// The fragment is anchored to exactly one char, and `.` matches newlines;
/// `re(".")` therefore means "any char". Multi-char matching is expressed
/// with repetition: `re("[0-9]").repeat(1, None)`.
///
/// # Panics
///
/// Panics if the pattern does not compile (see [`Atom::pattern`]).
#[must_use]
pub fn re(pattern: impl Into<EcoString>) -> Atom {
    Atom::pattern(pattern)
}

/// References the rule `name` of the enclosing [`Grammar`].
///
/// The reference is resolved when the parse reaches it, so rules may refer
/// to rules defined later, or to themselves.
///
/// [`Grammar`]: crate::grammar::Grammar
#[must_use]
pub fn call(name: impl Into<EcoString>) -> Atom {
    Atom::rule(name)
}
