// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The printed form of atoms.
//!
//! Atoms display as PEG-like text: `'foo' [a-z]{1, } / BAR?`. The form is
//! used in error messages ("Failed to match sequence (…)"), so it inserts
//! parentheses only where the precedence ladder requires them:
//! atom/lookahead/repetition bind tightest, then named captures, then
//! sequences, then alternatives.

use std::fmt;

use super::Atom;

/// Precedence ranks, loosest to tightest. A child is parenthesized when its
/// rank is below the rank its context requires.
const OUTER: u8 = 0;
const ALTERNATIVE: u8 = 1;
const SEQUENCE: u8 = 2;
const NAMED: u8 = 3;
const UNARY: u8 = 4;

impl Atom {
    fn rank(&self) -> u8 {
        match self {
            Self::Alternative { .. } => ALTERNATIVE,
            Self::Sequence { .. } => SEQUENCE,
            Self::Named { .. } => NAMED,
            Self::Str { .. }
            | Self::Re { .. }
            | Self::Repetition { .. }
            | Self::Lookahead { .. }
            | Self::Call { .. } => UNARY,
        }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, required: u8) -> fmt::Result {
        let parens = self.rank() < required;
        if parens {
            f.write_str("(")?;
        }
        match self {
            Self::Str { text } => {
                write!(f, "'{}'", text.replace("'", "\\'"))?;
            }
            Self::Re { pattern, .. } => {
                write!(f, "{pattern}")?;
            }
            Self::Sequence { children } => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    child.write(f, NAMED)?;
                }
            }
            Self::Alternative { children } => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" / ")?;
                    }
                    child.write(f, SEQUENCE)?;
                }
            }
            Self::Repetition { min, max, child, .. } => {
                child.write(f, UNARY)?;
                match (min, max) {
                    (0, Some(1)) => f.write_str("?")?,
                    (min, Some(max)) => write!(f, "{{{min}, {max}}}")?,
                    (min, None) => write!(f, "{{{min}, }}")?,
                }
            }
            Self::Lookahead { positive, child } => {
                f.write_str(if *positive { "&" } else { "!" })?;
                child.write(f, UNARY)?;
            }
            Self::Named { name, child } => {
                child.write(f, UNARY)?;
                write!(f, ":{name}")?;
            }
            Self::Call { name } => {
                write!(f, "{}", name.to_uppercase())?;
            }
        }
        if parens {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, OUTER)
    }
}
