// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parses a tiny angle-bracket markup language with a recursive rule, then
//! shows what a structured parse failure looks like.
//!
//! ```bash
//! cargo run --example markup
//! ```

use espalier::dsl::{call, re, str};
use espalier::Grammar;

fn main() {
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

    let tree = grammar
        .parse("<article><title>espalier</title></article>")
        .expect("well-formed document");
    println!("parsed: {tree:#?}");

    match grammar.parse("<article>unclosed") {
        Ok(_) => unreachable!("the document is missing its closing tag"),
        Err(error) => {
            println!("\nfailure: {error}");
            if let Some(causes) = error.error_tree() {
                println!("\ncause trail:\n{causes}");
            }
        }
    }
}
