// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Byte ranges into the parse input.
//!
//! The interpreter stamps every matched value with the byte range it was
//! read from; duplicate-capture warnings and parse errors reuse those
//! ranges as [`miette`] labels. Nothing here knows about chars — the cursor
//! owns the char/byte translation (see [`Source::byte_pos`]).
//!
//! [`Source::byte_pos`]: crate::source::Source::byte_pos

/// A half-open byte range `start..end` into the parse input.
///
/// # Examples
///
/// ```
/// use espalier::Span;
///
/// let key = Span::new(4, 7);
/// let value = Span::new(10, 14);
/// assert_eq!(key.join(value), Span::new(4, 14));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// A span over the bytes `start..end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width span: a mark at `at` rather than a range.
    #[must_use]
    pub const fn point(at: usize) -> Self {
        Self::new(at, at)
    }

    /// First byte covered.
    #[must_use]
    pub const fn start(self) -> usize {
        self.start
    }

    /// One past the last byte covered.
    #[must_use]
    pub const fn end(self) -> usize {
        self.end
    }

    /// The smallest span containing both `self` and `other`, gaps included.
    #[must_use]
    pub fn join(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(span.start.into(), span.end - span.start)
    }
}
