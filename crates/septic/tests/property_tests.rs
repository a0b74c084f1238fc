// Dweve SEPTIC - Process Control Configuration Language Tools
//
// Copyright (c) 2026 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Property-based tests over the tokenizer and object parser.
//!
//! These pin the invariants the live-editing pipeline depends on:
//! idempotence, total source coverage, forward progress on arbitrary
//! input, identity-key equivalence and error resilience.

use proptest::prelude::*;
use septic::{identity_key, parse, tokenize, CancelToken, TokenKind};

/// Structured documents mixed with arbitrary character soup: the scanner
/// must handle both without ever losing ground.
fn arb_source() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Evr: Test\nMeas= 1.5\nText1= \"descr\"\n".to_string()),
        Just("System: Plant\nDmmyAppl: App\nEvr: Var1\nMeas= 1\n".to_string()),
        Just("CalcPvr: Out\nAlg= \"Var1 + abs(Var2)\"\n".to_string()),
        Just("{% for w in wells %}\nEvr: {{ w }}Flow\nMeas= 1\n{% endfor %}\n".to_string()),
        Just(String::new()),
        // Arbitrary soup over the scanner's interesting alphabet.
        proptest::string::string_regex("[A-Za-z0-9=:\"\\n\\t ./\\\\{}%#*?+-]{0,80}")
            .expect("valid regex"),
    ]
}

/// Verifies a region between tokens contains only whitespace and
/// well-formed-or-unterminated comments.
fn is_trivia_region(mut gap: &str) -> bool {
    loop {
        gap = gap.trim_start();
        if gap.is_empty() {
            return true;
        }
        if let Some(rest) = gap.strip_prefix("//") {
            gap = rest.find('\n').map_or("", |i| &rest[i..]);
        } else if let Some(rest) = gap.strip_prefix("/*") {
            gap = rest.find("*/").map_or("", |i| &rest[i + 2..]);
        } else {
            return false;
        }
    }
}

proptest! {
    /// Re-tokenizing identical text yields identical tokens,
    /// position for position.
    #[test]
    fn prop_tokenize_is_idempotent(source in arb_source()) {
        let cancel = CancelToken::new();
        prop_assert_eq!(tokenize(&source, &cancel), tokenize(&source, &cancel));
    }

    /// Re-parsing identical text yields identical objects and errors.
    #[test]
    fn prop_parse_is_idempotent(source in arb_source()) {
        let cancel = CancelToken::new();
        let tokens = tokenize(&source, &cancel);
        prop_assert_eq!(parse(&tokens, &cancel), parse(&tokens, &cancel));
    }

    /// Token spans are strictly increasing and non-overlapping, and the
    /// regions between them are exactly the elided whitespace/comments:
    /// together they reconstruct the source with no byte lost.
    #[test]
    fn prop_tokens_cover_the_source(source in arb_source()) {
        let cancel = CancelToken::new();
        let tokens = tokenize(&source, &cancel);

        let eof = tokens.last().expect("stream always ends with Eof");
        prop_assert_eq!(eof.kind, TokenKind::Eof);
        prop_assert_eq!(eof.span.end, source.len());

        let mut pos = 0;
        for token in &tokens {
            prop_assert!(token.span.start >= pos, "overlapping token at {}", token.span);
            prop_assert!(token.span.end <= source.len());
            prop_assert!(
                is_trivia_region(&source[pos..token.span.start]),
                "gap {:?} is not whitespace/comment",
                &source[pos..token.span.start]
            );
            pos = token.span.end;
        }
        prop_assert!(is_trivia_region(&source[pos..]));
    }

    /// The identity key is whitespace-insensitive: however whitespace is
    /// interleaved into a name, the key stays that of the compact name.
    #[test]
    fn prop_identity_key_ignores_whitespace(
        name in "[A-Za-z][A-Za-z0-9]{0,8}",
        seed in proptest::collection::vec(0usize..8, 0..4),
    ) {
        let mut spaced = name.clone();
        for (i, position) in seed.iter().enumerate() {
            let at = (position + i).min(spaced.len());
            spaced.insert(at, ' ');
        }
        prop_assert_eq!(identity_key(&spaced), identity_key(&name));
    }

    /// One malformed object declaration never takes down its well-formed
    /// neighbors, and always surfaces at least one error.
    #[test]
    fn prop_parser_recovers_around_malformed_objects(
        before in 0usize..3,
        after in 0usize..3,
        // Only unknown-class tokens: bare words and numbers would join the
        // preceding attribute's value list, which is legal.
        garbage in prop_oneof![
            Just("? ? ?"),
            Just("= ?"),
            Just("! ! !"),
            Just("; ;"),
        ],
    ) {
        let mut source = String::new();
        for i in 0..before {
            source.push_str(&format!("Evr: Before{}\nMeas= 1\n", i));
        }
        source.push_str(garbage);
        source.push('\n');
        for i in 0..after {
            source.push_str(&format!("Evr: After{}\nMeas= 1\n", i));
        }

        let cancel = CancelToken::new();
        let outcome = parse(&tokenize(&source, &cancel), &cancel);
        prop_assert_eq!(outcome.objects.len(), before + after);
        prop_assert!(!outcome.errors.is_empty());
    }
}
