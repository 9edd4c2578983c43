// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end parsing scenarios against the public API.

use espalier::dsl::{call, re, str};
use espalier::{Grammar, ParseError, Value, WarningKind};

#[test]
fn literal_matches_itself() {
    assert_eq!(str("foo").parse("foo").unwrap(), "foo");
}

#[test]
fn literal_reports_premature_end() {
    let error = str("foo").parse("fo").unwrap_err();
    assert!(
        error.to_string().starts_with("Premature end of input"),
        "unexpected message: {error}"
    );
}

#[test]
fn literal_reports_mismatch_with_both_sides() {
    let error = str("foo").parse("fox").unwrap_err();
    assert_eq!(
        error.to_string(),
        "Expected \"foo\", but got \"fox\" at line 1 char 0."
    );
}

#[test]
fn choice_takes_the_first_matching_arm() {
    let atom = str("a") | str("b");
    assert_eq!(atom.parse("b").unwrap(), "b");
    let error = atom.parse("c").unwrap_err();
    assert!(
        error.to_string().starts_with("Expected one of ['a', 'b']"),
        "unexpected message: {error}"
    );
}

#[test]
fn choice_is_left_biased() {
    assert_eq!((str("ab") | str("a")).parse("ab").unwrap(), "ab");
    // The shorter first arm wins and leaves input behind.
    assert!((str("a") | str("ab")).parse("ab").is_err());
}

#[test]
fn bounded_repetition_within_range() {
    let atom = str("a").repeat(2, 3);
    assert_eq!(atom.parse("aaa").unwrap(), "aaa");
    assert_eq!(atom.parse("aa").unwrap(), "aa");
}

#[test]
fn repetition_below_minimum_fails() {
    let error = str("a").repeat(2, 3).parse("a").unwrap_err();
    assert!(
        error.to_string().starts_with("Expected at least 2 of 'a'"),
        "unexpected message: {error}"
    );
}

#[test]
fn repetition_above_maximum_leaves_input() {
    let error = str("a").repeat(2, 3).parse("aaaa").unwrap_err();
    assert!(
        error
            .to_string()
            .starts_with("Unconsumed input, maybe because of this:"),
        "unexpected message: {error}"
    );
}

#[test]
fn quoted_string_with_escapes() {
    let atom = str("\"")
        >> ((str("\\") >> re(".")) | (str("\"").absent() >> re(".")))
            .repeat(0, None)
            .named("s")
        >> str("\"");
    let value = atom.parse("\"a\\\"b\"").unwrap();
    assert_eq!(value, Value::map([("s", Value::str("a\\\"b"))]));
}

#[test]
fn adjacent_captures_build_one_mapping() {
    let atom = str("a").named("x") >> str("b").named("y");
    assert_eq!(
        atom.parse("ab").unwrap(),
        Value::map([("x", Value::str("a")), ("y", Value::str("b"))])
    );
}

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

#[test]
fn recursive_grammar_builds_nested_mappings() {
    let value = markup_grammar().parse("<a><b>hi</b></a>").unwrap();
    let expected = Value::map([
        ("tag", Value::str("a")),
        (
            "inner",
            Value::map([("tag", Value::str("b")), ("inner", Value::str("hi"))]),
        ),
    ]);
    assert_eq!(value, expected);
}

#[test]
fn naming_wraps_the_inner_result() {
    let digits = re("[0-9]").repeat(1, None);
    let plain = digits.clone().parse("2026").unwrap();
    let named = digits.named("year").parse("2026").unwrap();
    assert_eq!(named, Value::map([("year", plain)]));
}

#[test]
fn sequence_of_literals_concatenates() {
    assert_eq!((str("a") >> str("b")).parse("ab").unwrap(), "ab");
}

#[test]
fn maybe_is_transparent_when_absent() {
    let atom = str("a").maybe() >> str("b");
    assert_eq!(atom.parse("ab").unwrap(), "ab");
    assert_eq!(atom.parse("b").unwrap(), "b");
    assert_eq!(str("a").maybe().parse("").unwrap(), Value::Nil);
}

#[test]
fn repetition_of_captures_is_a_list() {
    let item = re("[0-9]").named("digit") >> str(",").maybe();
    let value = item.repeat(0, None).parse("1,2,3").unwrap();
    let expected = Value::list([
        Value::map([("digit", Value::str("1"))]),
        Value::map([("digit", Value::str("2"))]),
        Value::map([("digit", Value::str("3"))]),
    ]);
    assert_eq!(value, expected);
}

#[test]
fn duplicate_capture_keys_warn_and_keep_the_later_value() {
    let mut grammar = Grammar::new("pair");
    grammar.define("pair", str("a").named("k") >> str("b").named("k"));
    let (result, warnings) = grammar.parse_with_warnings("ab");
    assert_eq!(result.unwrap(), Value::map([("k", Value::str("b"))]));
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        warnings[0].kind,
        WarningKind::DuplicateKey { ref key } if key == "k"
    ));
    assert_eq!(
        warnings[0].to_string(),
        "duplicate capture key `k`; the later value wins"
    );
}

#[test]
fn undefined_rule_is_fatal_not_backtrackable() {
    let mut grammar = Grammar::new("top");
    // The second arm would match, but the broken first arm must not be
    // silently skipped.
    grammar.define("top", call("missing") | str("x"));
    let error = grammar.parse("x").unwrap_err();
    assert!(matches!(error, ParseError::UndefinedRule { ref name } if name == "missing"));
}

#[test]
fn error_tree_exposes_the_cause_trail() {
    let atom = str("<") >> (str("a") | str("b")) >> str(">");
    let error = atom.parse("<c>").unwrap_err();
    let tree = error.error_tree().expect("failed parses carry a tree");
    assert!(tree.message().starts_with("Failed to match sequence"));
    let rendered = tree.to_string();
    assert!(rendered.contains("Expected one of ['a', 'b']"));
    assert_eq!(tree.deepest().position(), 1);
}

#[test]
fn lookahead_does_not_consume_or_contribute() {
    let atom = str("a").present() >> re(".").repeat(1, None).named("rest");
    assert_eq!(
        atom.parse("abc").unwrap(),
        Value::map([("rest", Value::str("abc"))])
    );
}

#[test]
fn multibyte_input_counts_chars() {
    assert_eq!(str("héllo").parse("héllo").unwrap(), "héllo");
    let error = re("[a-z]").parse("日").unwrap_err();
    assert_eq!(
        error.to_string(),
        "Failed to match [a-z] at line 1 char 0."
    );
}

#[test]
fn positions_in_messages_span_lines() {
    let atom = str("one\n") >> str("two");
    let error = atom.parse("one\ntwx").unwrap_err();
    let tree = error.error_tree().unwrap();
    assert_eq!(
        tree.children()[0].message(),
        "Expected \"two\", but got \"twx\" at line 2 char 0."
    );
}

#[test]
fn parse_reader_accepts_streams() {
    let mut grammar = Grammar::new("word");
    grammar.define("word", re("[a-z]").repeat(1, None));
    let value = grammar.parse_reader(&b"stream"[..]).unwrap();
    assert_eq!(value, "stream");
}

#[test]
fn grammars_are_shareable_across_threads() {
    fn assert_sync<T: Send + Sync>(_: &T) {}
    let grammar = markup_grammar();
    assert_sync(&grammar);

    let grammar = &grammar;
    std::thread::scope(|scope| {
        for input in ["<a>x</a>", "<b><c>y</c></b>", "plain"] {
            scope.spawn(move || {
                assert!(grammar.parse(input).is_ok());
            });
        }
    });
}
