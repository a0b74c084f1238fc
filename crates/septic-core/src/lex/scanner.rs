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

//! Left-to-right scanner for the SEPTIC config language.
//!
//! The scanner applies an ordered list of pattern rules at the current
//! position; the first (most specific) rule that matches wins, and a
//! catch-all single-character `Unknown` rule guarantees forward progress on
//! malformed input. Whitespace and regular comments are recognized but
//! elided from the stream; jinja comments and `{% %}` statements are
//! retained because formatting consumers must preserve them verbatim.
//!
//! Scanning never hard-fails: unterminated constructs are logged and the
//! scan continues to the end of input.

use crate::cancel::CancelToken;
use crate::lex::token::{Token, TokenKind};
use crate::span::Span;
use std::ops::Range;

/// Result of applying one rule at the current position.
struct RuleMatch {
    kind: TokenKind,
    /// Bytes consumed from the input, including structural punctuation.
    len: usize,
    /// Sub-range of the consumed bytes stored as the token text.
    text: Range<usize>,
    /// The construct ran to end of input without its closing delimiter.
    unterminated: bool,
}

impl RuleMatch {
    fn full(kind: TokenKind, len: usize) -> Self {
        Self {
            kind,
            len,
            text: 0..len,
            unterminated: false,
        }
    }
}

type Rule = fn(&str) -> Option<RuleMatch>;

/// Ordered rule table, most specific first. The scanner falls back to a
/// single-character `Unknown` match when none of these apply.
const RULES: &[Rule] = &[
    match_line_comment,
    match_block_comment,
    match_jinja_comment,
    match_jinja_expression,
    match_object,
    match_attribute,
    match_string,
    match_path,
    match_numeric,
    match_identifier,
];

/// Tokenizes SEPTIC source text.
///
/// Cancellation is checked once per token; a cancelled scan returns an empty
/// stream which callers must treat as "aborted", never as an empty file.
///
/// # Examples
///
/// ```
/// use septic_core::{tokenize, CancelToken, TokenKind};
///
/// let tokens = tokenize("Evr: Test\nMeas= 1.5\n", &CancelToken::new());
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Object,
///         TokenKind::Identifier,
///         TokenKind::Attribute,
///         TokenKind::Numeric,
///         TokenKind::Eof,
///     ]
/// );
/// ```
pub fn tokenize(source: &str, cancel: &CancelToken) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        if cancel.is_cancelled() {
            return Vec::new();
        }
        let rest = &source[pos..];

        // Elide whitespace between tokens.
        if rest.starts_with(|c: char| c.is_whitespace()) {
            let skip = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            pos += skip;
            continue;
        }

        let m = match_token(rest);
        if m.unterminated {
            tracing::warn!(
                offset = pos,
                kind = ?m.kind,
                "unterminated construct runs to end of input"
            );
        }
        if !m.kind.is_trivia() {
            let text = rest[m.text.clone()].to_string();
            tokens.push(Token::new(m.kind, Span::new(pos, pos + m.len), text));
        }
        pos += m.len;
    }

    let mut tokens = merge_adjacent_identifiers(tokens);
    tokens.push(Token::new(TokenKind::Eof, Span::empty(source.len()), ""));
    tokens
}

/// Applies the rule table; falls back to a one-character `Unknown` token so
/// the scanner can never loop forever on malformed input.
fn match_token(rest: &str) -> RuleMatch {
    for rule in RULES {
        if let Some(m) = rule(rest) {
            return m;
        }
    }
    let len = rest.chars().next().map_or(1, char::len_utf8);
    RuleMatch::full(TokenKind::Unknown, len)
}

/// Merges adjacent identifier tokens with zero gap into one logical token.
///
/// Embedded templating markers can split a logical name across multiple
/// lexical scans; the earliest start and latest end are preserved and the
/// texts concatenated.
fn merge_adjacent_identifiers(tokens: Vec<Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    for tok in tokens {
        if tok.kind == TokenKind::Identifier {
            if let Some(prev) = merged.last_mut() {
                if prev.kind == TokenKind::Identifier && prev.span.end == tok.span.start {
                    prev.span.end = tok.span.end;
                    prev.text.push_str(&tok.text);
                    continue;
                }
            }
        }
        merged.push(tok);
    }
    merged
}

// ==================== rule implementations ====================

fn match_line_comment(rest: &str) -> Option<RuleMatch> {
    if !rest.starts_with("//") {
        return None;
    }
    let len = rest.find('\n').unwrap_or(rest.len());
    Some(RuleMatch::full(TokenKind::LineComment, len))
}

fn match_block_comment(rest: &str) -> Option<RuleMatch> {
    if !rest.starts_with("/*") {
        return None;
    }
    match rest[2..].find("*/") {
        Some(i) => Some(RuleMatch::full(TokenKind::BlockComment, i + 4)),
        None => Some(RuleMatch {
            unterminated: true,
            ..RuleMatch::full(TokenKind::BlockComment, rest.len())
        }),
    }
}

fn match_jinja_comment(rest: &str) -> Option<RuleMatch> {
    match_delimited(rest, "{#", "#}", TokenKind::JinjaComment)
}

fn match_jinja_expression(rest: &str) -> Option<RuleMatch> {
    match_delimited(rest, "{%", "%}", TokenKind::JinjaExpression)
}

fn match_delimited(rest: &str, open: &str, close: &str, kind: TokenKind) -> Option<RuleMatch> {
    if !rest.starts_with(open) {
        return None;
    }
    match rest[open.len()..].find(close) {
        Some(i) => Some(RuleMatch::full(kind, open.len() + i + close.len())),
        None => Some(RuleMatch {
            unterminated: true,
            ..RuleMatch::full(kind, rest.len())
        }),
    }
}

/// `Type:` followed by at least one blank. The lookahead blank is required
/// to distinguish object keywords from identifiers that merely contain a
/// colon; it is not consumed.
fn match_object(rest: &str) -> Option<RuleMatch> {
    match_keyword(rest, b':', TokenKind::Object)
}

/// `key=` followed by at least one blank, analogous to [`match_object`].
fn match_attribute(rest: &str) -> Option<RuleMatch> {
    match_keyword(rest, b'=', TokenKind::Attribute)
}

fn match_keyword(rest: &str, punct: u8, kind: TokenKind) -> Option<RuleMatch> {
    let word = keyword_len(rest);
    if word == 0 || rest.as_bytes().get(word) != Some(&punct) {
        return None;
    }
    let after = rest[word + 1..].chars().next()?;
    if !after.is_whitespace() {
        return None;
    }
    Some(RuleMatch {
        kind,
        len: word + 1,
        text: 0..word,
        unterminated: false,
    })
}

fn keyword_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return 0,
    }
    bytes
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
        .unwrap_or(bytes.len())
}

/// Double-quoted string. SEPTIC strings carry no escape sequences; an
/// unterminated string stops at the end of the line.
fn match_string(rest: &str) -> Option<RuleMatch> {
    if !rest.starts_with('"') {
        return None;
    }
    for (i, b) in rest.bytes().enumerate().skip(1) {
        if b == b'"' {
            return Some(RuleMatch::full(TokenKind::String, i + 1));
        }
        if b == b'\n' {
            return Some(RuleMatch {
                unterminated: true,
                ..RuleMatch::full(TokenKind::String, i)
            });
        }
    }
    Some(RuleMatch {
        unterminated: true,
        ..RuleMatch::full(TokenKind::String, rest.len())
    })
}

/// Unquoted path: a run of path characters containing at least one slash
/// or backslash (`templates/well.cnfg`, `C:\Septic\master.cnfg`).
fn match_path(rest: &str) -> Option<RuleMatch> {
    fn is_path_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric()
            || matches!(b, b'_' | b'.' | b'~' | b'$' | b'-' | b':' | b'/' | b'\\')
    }
    let bytes = rest.as_bytes();
    let len = bytes
        .iter()
        .position(|b| !is_path_byte(*b))
        .unwrap_or(bytes.len());
    if len == 0 || !bytes[..len].iter().any(|b| matches!(b, b'/' | b'\\')) {
        return None;
    }
    Some(RuleMatch::full(TokenKind::Path, len))
}

/// Integer, decimal or scientific-notation literal. When the literal is
/// immediately followed by identifier characters (`3.1Test`) the rule
/// declines so the whole word classifies as an identifier instead of a
/// number plus garbage.
fn match_numeric(rest: &str) -> Option<RuleMatch> {
    fn digit_run(bytes: &[u8]) -> usize {
        bytes
            .iter()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(bytes.len())
    }

    let bytes = rest.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }
    let int = digit_run(&bytes[i..]);
    if int == 0 {
        return None;
    }
    i += int;
    if bytes.get(i) == Some(&b'.') {
        i += 1 + digit_run(&bytes[i + 1..]);
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp = digit_run(&bytes[j..]);
        if exp > 0 {
            i = j + exp;
        }
    }
    if let Some(&next) = bytes.get(i) {
        if next.is_ascii_alphanumeric() || matches!(next, b'_' | b'.' | b'{') {
            return None;
        }
    }
    Some(RuleMatch::full(TokenKind::Numeric, i))
}

/// Identifier, possibly interleaved with `{{ }}` interpolation groups
/// (`Var{{ well }}Flow`). Colons and equals signs are legal continuation
/// characters; the object/attribute rules run earlier and claim the
/// keyword shapes.
fn match_identifier(rest: &str) -> Option<RuleMatch> {
    fn is_ident_start(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_'
    }
    fn is_ident_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b'*' | b':' | b'=')
    }

    let bytes = rest.as_bytes();
    let mut i = 0;
    let mut unterminated = false;
    loop {
        if rest[i..].starts_with("{{") {
            match rest[i + 2..].find("}}") {
                Some(close) => i += close + 4,
                None => {
                    i = rest.len();
                    unterminated = true;
                    break;
                }
            }
        } else {
            let accept = match bytes.get(i) {
                Some(&b) if i == 0 => is_ident_start(b),
                Some(&b) => is_ident_byte(b),
                None => false,
            };
            if !accept {
                break;
            }
            i += 1;
        }
    }
    if i == 0 {
        return None;
    }
    Some(RuleMatch {
        kind: TokenKind::Identifier,
        len: i,
        text: 0..i,
        unterminated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, &CancelToken::new())
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    // ==================== rule tests ====================

    #[test]
    fn test_object_and_attribute_tokens() {
        let tokens = tokenize("Evr: Test\nMeas= 1.5\n", &CancelToken::new());
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].kind, TokenKind::Object);
        assert_eq!(tokens[0].text, "Evr");
        assert_eq!(tokens[0].span, Span::new(0, 4));
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "Test");
        assert_eq!(tokens[2].kind, TokenKind::Attribute);
        assert_eq!(tokens[2].text, "Meas");
        assert_eq!(tokens[3].kind, TokenKind::Numeric);
        assert_eq!(tokens[3].text, "1.5");
        assert_eq!(tokens[4].kind, TokenKind::Eof);
    }

    #[test]
    fn test_object_requires_blank_after_colon() {
        // Without the lookahead blank the word is an ordinary identifier
        // that happens to contain a colon.
        let tokens = tokenize("Evr:Test", &CancelToken::new());
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "Evr:Test");
    }

    #[test]
    fn test_numeric_scientific_notation() {
        assert_eq!(
            kinds("1e-3 2E+5 42 -1.5"),
            vec![
                TokenKind::Numeric,
                TokenKind::Numeric,
                TokenKind::Numeric,
                TokenKind::Numeric,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_numeric_falls_back_to_identifier() {
        let tokens = tokenize("3.1Test", &CancelToken::new());
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "3.1Test");
    }

    #[test]
    fn test_comments_are_discarded() {
        assert_eq!(
            kinds("// note\n/* block */ Test"),
            vec![TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_jinja_markers_are_retained() {
        let tokens = tokenize("{# keep #}\n{% for w in wells %}", &CancelToken::new());
        assert_eq!(tokens[0].kind, TokenKind::JinjaComment);
        assert_eq!(tokens[0].text, "{# keep #}");
        assert_eq!(tokens[1].kind, TokenKind::JinjaExpression);
        assert_eq!(tokens[1].text, "{% for w in wells %}");
    }

    #[test]
    fn test_identifier_with_interpolation() {
        let tokens = tokenize("Var{{ well }}Flow", &CancelToken::new());
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "Var{{ well }}Flow");
    }

    #[test]
    fn test_string_token_keeps_quotes() {
        let tokens = tokenize("\"hello world\"", &CancelToken::new());
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "\"hello world\"");
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        let tokens = tokenize("\"open\nNext", &CancelToken::new());
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "\"open");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "Next");
    }

    #[test]
    fn test_path_tokens() {
        assert_eq!(
            kinds("templates/well.cnfg C:\\Septic\\master.cnfg"),
            vec![TokenKind::Path, TokenKind::Path, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unknown_guarantees_progress() {
        assert_eq!(
            kinds("? ! #"),
            vec![
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_dashed_variable_name() {
        let tokens = tokenize("D-13TI1234", &CancelToken::new());
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "D-13TI1234");
    }

    // ==================== stream invariant tests ====================

    #[test]
    fn test_spans_are_increasing_and_non_overlapping() {
        let source = "Evr: Test\n// gone\nMeas= 1.5 \"s\" {% if x %}\n";
        let tokens = tokenize(source, &CancelToken::new());
        for pair in tokens.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start);
        }
    }

    #[test]
    fn test_gaps_are_whitespace_or_comments() {
        let source = "Evr: Test /* mid */ Meas= 1 // tail";
        let tokens = tokenize(source, &CancelToken::new());
        let mut pos = 0;
        for tok in &tokens {
            let gap = &source[pos..tok.span.start];
            assert!(
                gap.chars().all(char::is_whitespace)
                    || gap.trim_start().starts_with("//")
                    || gap.trim_start().starts_with("/*"),
                "unexpected gap content: {:?}",
                gap
            );
            pos = tok.span.end;
        }
        assert!(source[pos..].chars().all(char::is_whitespace));
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let source = "Evr: Test\nMeas= 1.5 2E+5 \"txt\"\n{# c #}\n";
        let first = tokenize(source, &CancelToken::new());
        let second = tokenize(source, &CancelToken::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_cancelled_scan_returns_empty_stream() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(tokenize("Evr: Test", &cancel).is_empty());
    }

    // ==================== merge tests ====================

    #[test]
    fn test_merge_adjacent_identifiers() {
        let tokens = vec![
            Token::new(TokenKind::Identifier, Span::new(0, 3), "Var"),
            Token::new(TokenKind::Identifier, Span::new(3, 5), "22"),
            Token::new(TokenKind::Identifier, Span::new(6, 7), "X"),
        ];
        let merged = merge_adjacent_identifiers(tokens);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "Var22");
        assert_eq!(merged[0].span, Span::new(0, 5));
        assert_eq!(merged[1].text, "X");
    }

    #[test]
    fn test_merge_leaves_gapped_identifiers_alone() {
        let tokens = vec![
            Token::new(TokenKind::Identifier, Span::new(0, 3), "Var"),
            Token::new(TokenKind::JinjaComment, Span::new(3, 11), "{# id #}"),
            Token::new(TokenKind::Identifier, Span::new(11, 12), "X"),
        ];
        assert_eq!(merge_adjacent_identifiers(tokens).len(), 3);
    }

    // ==================== property tests ====================

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The catch-all rule guarantees forward progress: scanning
            /// any printable input terminates and ends with an Eof token
            /// at the end of the source.
            #[test]
            fn prop_scanner_always_terminates_with_eof(source in "\\PC{0,60}") {
                let tokens = tokenize(&source, &CancelToken::new());
                let eof = tokens.last().expect("stream is never empty");
                prop_assert_eq!(eof.kind, TokenKind::Eof);
                prop_assert_eq!(eof.span.start, source.len());
            }
        }
    }
}
