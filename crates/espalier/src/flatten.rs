// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The flattener.
//!
//! A pure pass from the interpreter's [`Raw`] tree to the user-visible
//! [`Value`], applied bottom-up. The rules:
//!
//! - a `maybe` unwraps to its single item, or [`Value::Nil`] when it
//!   matched nothing;
//! - a sequence drops nils and merge-folds the rest, starting from the
//!   empty string;
//! - a repetition collapses: named captures win over interleaved text,
//!   inner lists splice one level, plain text concatenates.
//!
//! The effect is that text merges greedily, named captures dominate text in
//! mixed contexts, and repeating a named item yields a list while repeating
//! plain matches yields a string. Two captures merging under one key emit a
//! [`Warning`] and keep the later value.

use std::collections::BTreeMap;

use ecow::EcoString;

use crate::parse::Warning;
use crate::span::Span;
use crate::value::{Raw, RawKind, Tag, Value};

/// Flattens a raw match tree into the caller's value.
pub(crate) fn flatten(raw: Raw, warnings: &mut Vec<Warning>) -> Value {
    weave(raw, warnings).0
}

/// Flattens while keeping each value's source span for warning locations.
fn weave(raw: Raw, warnings: &mut Vec<Warning>) -> (Value, Span) {
    let span = raw.span;
    let value = match raw.kind {
        RawKind::Nil => Value::Nil,
        RawKind::Str(text) => Value::Str(text),
        RawKind::Name { key, child } => {
            let (child, _) = weave(*child, warnings);
            let mut entries = BTreeMap::new();
            entries.insert(key, child);
            Value::Map(entries)
        }
        RawKind::Tagged { tag, items } => {
            let items: Vec<(Value, Span)> = items
                .into_iter()
                .map(|item| weave(item, warnings))
                .collect();
            match tag {
                Tag::Maybe => items
                    .into_iter()
                    .next()
                    .map_or(Value::Nil, |(value, _)| value),
                Tag::Sequence => {
                    let mut accum = (Value::Str(EcoString::new()), Span::point(span.start()));
                    for item in items {
                        if item.0.is_nil() {
                            continue;
                        }
                        accum = merge(accum, item, warnings);
                    }
                    accum.0
                }
                Tag::Repetition => collapse(items),
            }
        }
    };
    (value, span)
}

/// Folds two adjacent sequence values into one.
fn merge(
    (left, left_span): (Value, Span),
    (right, right_span): (Value, Span),
    warnings: &mut Vec<Warning>,
) -> (Value, Span) {
    let span = left_span.join(right_span);
    let value = match (left, right) {
        (Value::Str(mut left), Value::Str(right)) => {
            left.push_str(&right);
            Value::Str(left)
        }
        (Value::Map(mut left), Value::Map(right)) => {
            for (key, value) in right {
                if left.contains_key(&key) {
                    warnings.push(Warning::duplicate_key(key.clone(), right_span));
                }
                left.insert(key, value);
            }
            Value::Map(left)
        }
        (Value::List(mut left), Value::List(right)) => {
            left.extend(right);
            Value::List(left)
        }
        // Text between structured values is discarded.
        (Value::Str(_), structured) => structured,
        (structured, Value::Str(_)) => structured,
        // A lone capture joins an adjacent list on its own side.
        (capture @ Value::Map(_), Value::List(list)) => {
            let mut items = Vec::with_capacity(list.len() + 1);
            items.push(capture);
            items.extend(list);
            Value::List(items)
        }
        (Value::List(mut list), capture @ Value::Map(_)) => {
            list.push(capture);
            Value::List(list)
        }
        // Nils are dropped before folding; nothing is left to merge with.
        (Value::Nil, right) => right,
        (left, Value::Nil) => left,
    };
    (value, span)
}

/// Collapses the flattened items of a repetition.
fn collapse(items: Vec<(Value, Span)>) -> Value {
    let items: Vec<Value> = items
        .into_iter()
        .map(|(value, _)| value)
        .filter(|value| !value.is_nil())
        .collect();
    if items.iter().any(|item| matches!(item, Value::Map(_))) {
        Value::List(
            items
                .into_iter()
                .filter(|item| matches!(item, Value::Map(_)))
                .collect(),
        )
    } else if items.iter().any(|item| matches!(item, Value::List(_))) {
        Value::List(
            items
                .into_iter()
                .flat_map(|item| match item {
                    Value::List(inner) => inner,
                    _ => Vec::new(),
                })
                .collect(),
        )
    } else {
        let mut text = EcoString::new();
        for item in items {
            if let Value::Str(piece) = item {
                text.push_str(&piece);
            }
        }
        Value::Str(text)
    }
}
