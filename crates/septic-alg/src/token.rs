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

//! Lexer for the calculation sub-language.
//!
//! Operates on stripped calculation text (control markers already removed)
//! and fails hard on anything it cannot classify; the caller treats a
//! failure as "no information available for this calculation".

use crate::error::AlgError;
use septic_core::Span;

/// Kind of a calculation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgTokenKind {
    /// Numeric literal.
    Number,
    /// String literal; token text excludes the quotes.
    Str,
    /// Plain identifier fragment.
    Identifier,
    /// `{{ ... }}` interpolation fragment, legal inside variable names.
    Jinja,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `==`
    EqEq,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// End of input. Always the last token.
    End,
}

/// A calculation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgToken {
    pub kind: AlgTokenKind,
    pub span: Span,
    pub text: String,
}

impl AlgToken {
    fn new(kind: AlgTokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

/// Lexes stripped calculation text.
pub(crate) fn lex(text: &str) -> Result<Vec<AlgToken>, AlgError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        if rest.starts_with(|c: char| c.is_whitespace()) {
            pos += rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            continue;
        }

        // Jinja interpolation is legal; comments and statements are not.
        if rest.starts_with("{{") {
            let len = match rest[2..].find("}}") {
                Some(close) => close + 4,
                None => {
                    return Err(AlgError::syntax(
                        "unterminated '{{' interpolation",
                        Span::new(pos, text.len()),
                    ))
                }
            };
            let span = Span::new(pos, pos + len);
            tokens.push(AlgToken::new(AlgTokenKind::Jinja, span, &rest[..len]));
            pos += len;
            continue;
        }
        if rest.starts_with("{%") || rest.starts_with("{#") {
            let close = if rest.starts_with("{%") { "%}" } else { "#}" };
            let end = rest[2..]
                .find(close)
                .map_or(text.len(), |i| pos + i + 4);
            return Err(AlgError::UnsupportedJinja {
                span: Span::new(pos, end),
            });
        }

        let b = bytes[pos];
        if b == b'"' {
            let inner = &rest[1..];
            let Some(close) = inner.find('"') else {
                return Err(AlgError::syntax(
                    "unterminated string literal",
                    Span::new(pos, text.len()),
                ));
            };
            let span = Span::new(pos, pos + close + 2);
            tokens.push(AlgToken::new(AlgTokenKind::Str, span, &inner[..close]));
            pos = span.end;
            continue;
        }
        if b.is_ascii_digit() {
            let len = numeric_len(rest);
            let span = Span::new(pos, pos + len);
            tokens.push(AlgToken::new(AlgTokenKind::Number, span, &rest[..len]));
            pos += len;
            continue;
        }
        if b.is_ascii_alphabetic() || b == b'_' {
            let len = rest
                .bytes()
                .position(|c| !(c.is_ascii_alphanumeric() || c == b'_'))
                .unwrap_or(rest.len());
            let span = Span::new(pos, pos + len);
            tokens.push(AlgToken::new(AlgTokenKind::Identifier, span, &rest[..len]));
            pos += len;
            continue;
        }

        let (kind, len) = match b {
            b'=' if rest.starts_with("==") => (AlgTokenKind::EqEq, 2),
            b'>' if rest.starts_with(">=") => (AlgTokenKind::Ge, 2),
            b'<' if rest.starts_with("<=") => (AlgTokenKind::Le, 2),
            b'>' => (AlgTokenKind::Gt, 1),
            b'<' => (AlgTokenKind::Lt, 1),
            b'+' => (AlgTokenKind::Plus, 1),
            b'-' => (AlgTokenKind::Minus, 1),
            b'*' => (AlgTokenKind::Star, 1),
            b'/' => (AlgTokenKind::Slash, 1),
            b'(' => (AlgTokenKind::LParen, 1),
            b')' => (AlgTokenKind::RParen, 1),
            b',' => (AlgTokenKind::Comma, 1),
            b'.' => (AlgTokenKind::Dot, 1),
            _ => {
                let ch = rest.chars().next().unwrap_or('?');
                return Err(AlgError::syntax(
                    format!("unexpected character '{}'", ch),
                    Span::new(pos, pos + ch.len_utf8()),
                ));
            }
        };
        let span = Span::new(pos, pos + len);
        tokens.push(AlgToken::new(kind, span, &rest[..len]));
        pos += len;
    }

    tokens.push(AlgToken::new(
        AlgTokenKind::End,
        Span::empty(text.len()),
        "",
    ));
    Ok(tokens)
}

/// Length of a numeric literal: integer, decimal or scientific notation.
fn numeric_len(rest: &str) -> usize {
    fn digit_run(bytes: &[u8]) -> usize {
        bytes
            .iter()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(bytes.len())
    }

    let bytes = rest.as_bytes();
    let mut i = digit_run(bytes);
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
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<AlgTokenKind> {
        lex(text).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_operators_and_literals() {
        assert_eq!(
            kinds("1 + 2.5 * x >= 1e-3"),
            vec![
                AlgTokenKind::Number,
                AlgTokenKind::Plus,
                AlgTokenKind::Number,
                AlgTokenKind::Star,
                AlgTokenKind::Identifier,
                AlgTokenKind::Ge,
                AlgTokenKind::Number,
                AlgTokenKind::End,
            ]
        );
    }

    #[test]
    fn test_lex_string_excludes_quotes() {
        let tokens = lex("\"mode\"").unwrap();
        assert_eq!(tokens[0].kind, AlgTokenKind::Str);
        assert_eq!(tokens[0].text, "mode");
        assert_eq!(tokens[0].span, Span::new(0, 6));
    }

    #[test]
    fn test_lex_jinja_interpolation() {
        let tokens = lex("{{ well }}").unwrap();
        assert_eq!(tokens[0].kind, AlgTokenKind::Jinja);
        assert_eq!(tokens[0].text, "{{ well }}");
    }

    #[test]
    fn test_lex_rejects_jinja_statement_and_comment() {
        assert!(lex("{% set x %}").unwrap_err().is_unsupported_jinja());
        assert!(lex("{# note #}").unwrap_err().is_unsupported_jinja());
    }

    #[test]
    fn test_lex_rejects_unknown_character() {
        let err = lex("1+2+?").unwrap_err();
        assert!(matches!(err, AlgError::Syntax { .. }));
    }

    #[test]
    fn test_lex_spans_are_exact() {
        let tokens = lex("abs(Var1)").unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(3, 4));
        assert_eq!(tokens[2].span, Span::new(4, 8));
        assert_eq!(tokens[3].span, Span::new(8, 9));
    }
}
