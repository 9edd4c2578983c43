// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the interpreter and flattener.
//!
//! These use `proptest` to verify the universal invariants over generated
//! inputs:
//!
//! 1. **Cursor restoration** — a failing `apply` leaves the cursor where it
//!    was; a succeeding one never rewinds it
//! 2. **Lookaheads never consume** — success or failure, either polarity
//! 3. **Ordered choice is left-biased** — a matching first arm decides the
//!    value
//! 4. **The flattener is total and deterministic** — any raw tree flattens
//!    without panicking, to the same value every time
//! 5. **Parsing never panics** — a recursive grammar fed arbitrary input
//!    returns `Ok` or `Err`, nothing else

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::dsl::{call, re, str};
use crate::flatten::flatten;
use crate::grammar::Grammar;
use crate::source::Source;
use crate::span::Span;
use crate::value::{Raw, RawKind, Tag};

use super::interp::apply;
use super::Context;

/// A pool of structurally varied atoms for cursor-discipline checks.
fn atom_pool() -> Vec<crate::atom::Atom> {
    vec![
        str("ab"),
        str(""),
        re("[a-z]"),
        re("."),
        str("a") >> str("b"),
        str("a") | str("b") | re("[0-9]"),
        str("a").repeat(1, 3),
        str("a").repeat(0, None),
        str("ab").maybe(),
        str("a").present(),
        str("a").absent(),
        re("[a-z]").repeat(1, None).named("word"),
        (str("a") >> re(".")).repeat(0, 2),
    ]
}

fn raw_strategy() -> impl Strategy<Value = Raw> {
    let leaf = prop_oneof![
        Just(RawKind::Nil),
        "[a-z]{0,4}".prop_map(|text| RawKind::Str(text.into())),
    ]
    .prop_map(|kind| Raw::new(Span::default(), kind));
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            ("[a-z]{1,3}", inner.clone()).prop_map(|(key, child)| {
                Raw::new(
                    Span::default(),
                    RawKind::Name {
                        key: key.into(),
                        child: Box::new(child),
                    },
                )
            }),
            (
                prop_oneof![
                    Just(Tag::Sequence),
                    Just(Tag::Repetition),
                    Just(Tag::Maybe)
                ],
                prop::collection::vec(inner, 0..4)
            )
                .prop_map(|(tag, items)| Raw::new(Span::default(), RawKind::Tagged { tag, items })),
        ]
    })
}

/// The recursive angle-bracket grammar from the integration scenarios.
fn markup_grammar() -> Grammar {
    let mut grammar = Grammar::new("doc");
    grammar.define("name", re("[a-z]").repeat(1, None));
    grammar.define("text", re("[^<]").repeat(0, None));
    grammar.define(
        "doc",
        (str("<")
            >> call("name").named("tag")
            >> str(">")
            >> call("doc").named("inner")
            >> str("</")
            >> call("name")
            >> str(">"))
            | call("text"),
    );
    grammar
}

proptest! {
    #[test]
    fn cursor_is_restored_on_failure(input in ".{0,12}", start in 0usize..8) {
        let rules = BTreeMap::new();
        for atom in atom_pool() {
            let mut ctx = Context::new(&rules);
            let mut source = Source::new(&input);
            let entry = usize::min(start, source.len());
            source.seek(entry);
            match apply(&atom, &mut source, &mut ctx) {
                Ok(_) => prop_assert!(source.pos() >= entry && source.pos() <= source.len()),
                Err(_) => prop_assert_eq!(source.pos(), entry),
            }
        }
    }

    #[test]
    fn lookaheads_never_consume(input in ".{0,12}", literal in "[a-z]{1,3}") {
        let rules = BTreeMap::new();
        for atom in [str(literal.as_str()).present(), str(literal.as_str()).absent()] {
            let mut ctx = Context::new(&rules);
            let mut source = Source::new(&input);
            let _ = apply(&atom, &mut source, &mut ctx);
            prop_assert_eq!(source.pos(), 0);
        }
    }

    #[test]
    fn ordered_choice_is_left_biased(
        first in "[a-z]{1,3}",
        second in "[a-z]{1,3}",
        suffix in "[a-z]{0,3}",
    ) {
        let rules = BTreeMap::new();
        let mut ctx = Context::new(&rules);
        let input = format!("{first}{suffix}");
        let mut source = Source::new(&input);
        let atom = str(first.as_str()) | str(second.as_str());
        let raw = apply(&atom, &mut source, &mut ctx).expect("first arm matches its own prefix");
        prop_assert_eq!(raw.kind, RawKind::Str(first.into()));
        prop_assert_eq!(source.pos(), input.chars().count() - suffix.chars().count());
    }

    #[test]
    fn flattener_is_total_and_deterministic(raw in raw_strategy()) {
        let mut warnings = Vec::new();
        let once = flatten(raw.clone(), &mut warnings);
        let twice = flatten(raw, &mut Vec::new());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn parsing_never_panics(input in ".{0,24}") {
        let grammar = markup_grammar();
        let _ = grammar.parse(&input);
    }

    #[test]
    fn quoted_string_grammar_round_trips(body in "[a-z ]{0,12}") {
        let quoted = str("\"")
            >> ((str("\\") >> re(".")) | (str("\"").absent() >> re(".")))
                .repeat(0, None)
                .named("s")
            >> str("\"");
        let input = format!("\"{body}\"");
        let value = quoted.parse(&input).expect("body has no quotes or escapes");
        prop_assert_eq!(value.get("s").and_then(crate::value::Value::as_str), Some(body.as_str()));
    }
}
