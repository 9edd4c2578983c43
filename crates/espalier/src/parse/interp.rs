// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The matcher: one function per atom kind.
//!
//! [`apply`] is the single entry point. It enforces the universal
//! try-and-restore discipline — save the cursor, dispatch on the atom kind,
//! and rewind to the saved position on any failure — so backtracking is a
//! property of the protocol rather than of individual matchers. Failures
//! travel on the `Err` branch as [`Failure`] values: match failures are
//! recoverable (ordered choice tries the next arm, repetition stops
//! iterating, lookahead may invert), while an unresolved rule reference
//! passes through every handler untouched.

use ecow::EcoString;
use regex::Regex;

use crate::atom::Atom;
use crate::source::Source;
use crate::value::{Raw, RawKind, Tag};

use super::error::ErrorTree;
use super::Context;

/// Why an atom did not produce a value.
#[derive(Debug)]
pub(crate) enum Failure {
    /// The input did not match. Recoverable by enclosing handlers.
    Match(Box<ErrorTree>),
    /// A rule reference could not be resolved. Never recovered.
    Rule {
        /// The unresolved rule name.
        name: EcoString,
    },
}

/// Minimum stack headroom before `apply` continues on a heap-allocated
/// segment, so a deeply recursive grammar costs allocations rather than a
/// stack overflow.
const RED_ZONE: usize = 32 * 1024;
const STACK_SEGMENT: usize = 256 * 1024;

/// Applies `atom` at the cursor's current position.
///
/// On success the cursor has advanced by exactly the chars the atom
/// consumed; on failure it is back where it started.
pub(crate) fn apply(
    atom: &Atom,
    source: &mut Source<'_>,
    ctx: &mut Context<'_>,
) -> Result<Raw, Failure> {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || {
        let entry = source.pos();
        tracing::trace!(target: "espalier", pos = entry, atom = %atom, "apply");
        let result = match atom {
            Atom::Str { text } => match_str(text, source, entry),
            Atom::Re { pattern, matcher } => match_re(pattern, matcher, source, entry),
            Atom::Sequence { children } => match_sequence(atom, children, source, ctx, entry),
            Atom::Alternative { children } => match_alternative(children, source, ctx, entry),
            Atom::Repetition {
                min,
                max,
                tag,
                child,
            } => match_repetition(*min, *max, *tag, child, source, ctx, entry),
            Atom::Lookahead { positive, child } => {
                match_lookahead(*positive, child, source, ctx, entry)
            }
            Atom::Named { name, child } => match_named(name, child, source, ctx, entry),
            Atom::Call { name } => match_call(name, source, ctx),
        };
        if result.is_err() {
            source.seek(entry);
        }
        result
    })
}

/// Builds a location-formatted cause at `pos`.
fn cause(source: &Source<'_>, pos: usize, message: &str, children: Vec<ErrorTree>) -> ErrorTree {
    let (line, column) = source.line_and_column(pos);
    ErrorTree::new(format!("{message} at line {line} char {column}."), pos, children)
}

fn fail(
    source: &Source<'_>,
    pos: usize,
    message: &str,
    children: Vec<ErrorTree>,
) -> Result<Raw, Failure> {
    Err(Failure::Match(Box::new(cause(source, pos, message, children))))
}

fn match_str(text: &EcoString, source: &mut Source<'_>, entry: usize) -> Result<Raw, Failure> {
    let want = text.chars().count();
    let got = source.read(want);
    if got.chars().count() < want {
        return fail(source, entry, "Premature end of input", Vec::new());
    }
    if got != text.as_str() {
        let message = format!("Expected {:?}, but got {:?}", text.as_str(), got);
        return fail(source, entry, &message, Vec::new());
    }
    Ok(Raw::new(
        source.span(entry, source.pos()),
        RawKind::Str(got.into()),
    ))
}

fn match_re(
    pattern: &EcoString,
    matcher: &Regex,
    source: &mut Source<'_>,
    entry: usize,
) -> Result<Raw, Failure> {
    let got = source.read(1);
    if got.is_empty() {
        return fail(source, entry, "Premature end of input", Vec::new());
    }
    if !matcher.is_match(got) {
        let message = format!("Failed to match {pattern}");
        return fail(source, entry, &message, Vec::new());
    }
    Ok(Raw::new(
        source.span(entry, source.pos()),
        RawKind::Str(got.into()),
    ))
}

fn match_sequence(
    atom: &Atom,
    children: &[Atom],
    source: &mut Source<'_>,
    ctx: &mut Context<'_>,
    entry: usize,
) -> Result<Raw, Failure> {
    let mut items = Vec::with_capacity(children.len());
    for child in children {
        match apply(child, source, ctx) {
            Ok(value) => items.push(value),
            Err(Failure::Match(offending)) => {
                let message = format!("Failed to match sequence ({atom})");
                return fail(source, entry, &message, vec![*offending]);
            }
            Err(fatal @ Failure::Rule { .. }) => return Err(fatal),
        }
    }
    Ok(Raw::new(
        source.span(entry, source.pos()),
        RawKind::Tagged {
            tag: Tag::Sequence,
            items,
        },
    ))
}

fn match_alternative(
    children: &[Atom],
    source: &mut Source<'_>,
    ctx: &mut Context<'_>,
    entry: usize,
) -> Result<Raw, Failure> {
    let mut arms = Vec::with_capacity(children.len());
    for child in children {
        match apply(child, source, ctx) {
            // First success wins, and its value passes through untagged.
            Ok(value) => return Ok(value),
            Err(Failure::Match(arm)) => arms.push(*arm),
            Err(fatal @ Failure::Rule { .. }) => return Err(fatal),
        }
    }
    let printed = children
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let message = format!("Expected one of [{printed}]");
    fail(source, entry, &message, arms)
}

fn match_repetition(
    min: u32,
    max: Option<u32>,
    tag: Tag,
    child: &Atom,
    source: &mut Source<'_>,
    ctx: &mut Context<'_>,
    entry: usize,
) -> Result<Raw, Failure> {
    let mut items = Vec::new();
    let mut occ: u32 = 0;
    let mut stopped_by = None;
    loop {
        let before = source.pos();
        match apply(child, source, ctx) {
            Ok(value) => {
                items.push(value);
                occ += 1;
                if max.is_some_and(|max| occ >= max) {
                    // Leave a note in case the bound is why input is left
                    // over after an otherwise successful parse.
                    let message = format!("Stopped after {occ} occurrences of {child}");
                    ctx.swallow(cause(source, source.pos(), &message, Vec::new()));
                    break;
                }
                if source.pos() == before {
                    // A zero-width match would repeat forever.
                    break;
                }
            }
            Err(Failure::Match(stopper)) => {
                stopped_by = Some((*stopper).clone());
                ctx.swallow(*stopper);
                break;
            }
            Err(fatal @ Failure::Rule { .. }) => return Err(fatal),
        }
    }
    if occ < min {
        let message = format!("Expected at least {min} of {child}");
        return fail(source, entry, &message, stopped_by.into_iter().collect());
    }
    Ok(Raw::new(
        source.span(entry, source.pos()),
        RawKind::Tagged { tag, items },
    ))
}

fn match_lookahead(
    positive: bool,
    child: &Atom,
    source: &mut Source<'_>,
    ctx: &mut Context<'_>,
    entry: usize,
) -> Result<Raw, Failure> {
    let outcome = match apply(child, source, ctx) {
        Ok(_) => None,
        Err(Failure::Match(unmatched)) => Some(*unmatched),
        Err(fatal @ Failure::Rule { .. }) => {
            source.seek(entry);
            return Err(fatal);
        }
    };
    // A lookahead never consumes, whichever way it goes.
    source.seek(entry);
    match (positive, outcome) {
        (true, None) | (false, Some(_)) => {
            Ok(Raw::new(source.span(entry, entry), RawKind::Nil))
        }
        (true, Some(unmatched)) => {
            let message = format!("Input should start with {child}");
            fail(source, entry, &message, vec![unmatched])
        }
        (false, None) => {
            let message = format!("Input should not start with {child}");
            fail(source, entry, &message, Vec::new())
        }
    }
}

fn match_named(
    name: &EcoString,
    child: &Atom,
    source: &mut Source<'_>,
    ctx: &mut Context<'_>,
    entry: usize,
) -> Result<Raw, Failure> {
    let value = apply(child, source, ctx)?;
    Ok(Raw::new(
        source.span(entry, source.pos()),
        RawKind::Name {
            key: name.clone(),
            child: Box::new(value),
        },
    ))
}

fn match_call(
    name: &EcoString,
    source: &mut Source<'_>,
    ctx: &mut Context<'_>,
) -> Result<Raw, Failure> {
    let Some(body) = ctx.rule(name) else {
        return Err(Failure::Rule { name: name.clone() });
    };
    apply(body, source, ctx)
}
