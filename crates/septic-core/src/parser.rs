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

//! Object parser for the SEPTIC config language.
//!
//! Single-pass, non-backtracking (1-token lookahead), with local error
//! synchronization: a mismatched token is skipped with a recorded error
//! until a recovery kind is reached, so later well-formed objects parse
//! even when an earlier object is malformed. The parser runs on every
//! keystroke of a document that is frequently in a transiently invalid
//! state and therefore never hard-fails.
//!
//! Retained jinja marker tokens are skipped silently wherever they appear;
//! they exist for formatting consumers, not for the object grammar.

use crate::cancel::CancelToken;
use crate::error::ParseError;
use crate::lex::{Token, TokenKind};
use crate::object::{Attribute, AttributeValue, Identifier, SepticObject, ValueKind};

/// A best-effort object list plus the problems found along the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseOutcome {
    /// Objects in file order. Parent/child links are unset; run the
    /// hierarchy builder to assign them.
    pub objects: Vec<SepticObject>,
    /// Recoverable problems, in discovery order.
    pub errors: Vec<ParseError>,
}

/// Parses a token stream into a flat object list.
///
/// Cancellation is checked once per top-level object; a cancelled parse
/// returns an empty outcome which callers must treat as "aborted", never as
/// a valid empty document.
///
/// # Examples
///
/// ```
/// use septic_core::{parse, tokenize, CancelToken};
///
/// let cancel = CancelToken::new();
/// let tokens = tokenize("Evr: Test\nMeas= 1.5\n", &cancel);
/// let outcome = parse(&tokens, &cancel);
/// assert_eq!(outcome.objects.len(), 1);
/// assert_eq!(outcome.objects[0].type_name, "Evr");
/// assert!(outcome.errors.is_empty());
/// ```
pub fn parse(tokens: &[Token], cancel: &CancelToken) -> ParseOutcome {
    Parser::new(tokens).run(cancel)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> &'a Token {
        let tok = &self.tokens[self.pos];
        self.pos += 1;
        tok
    }

    fn run(mut self, cancel: &CancelToken) -> ParseOutcome {
        let mut objects = Vec::new();
        while let Some(tok) = self.peek() {
            if tok.kind == TokenKind::Eof {
                break;
            }
            if cancel.is_cancelled() {
                return ParseOutcome::default();
            }
            match tok.kind {
                TokenKind::Object => objects.push(self.parse_object()),
                TokenKind::JinjaComment | TokenKind::JinjaExpression => {
                    self.pos += 1;
                }
                _ => {
                    // Synchronize: skip forward to the next object
                    // declaration, one error per skipped token.
                    self.errors.push(ParseError::new(
                        format!("unexpected token '{}', expected object declaration", tok.text),
                        tok.span,
                    ));
                    self.pos += 1;
                }
            }
        }
        ParseOutcome {
            objects,
            errors: self.errors,
        }
    }

    fn parse_object(&mut self) -> SepticObject {
        let header = self.bump();
        let mut obj = SepticObject::new(header.text.clone(), header.span);

        match self.peek() {
            Some(tok) if tok.kind == TokenKind::Identifier => {
                obj.identifier = Some(Identifier::new(tok.text.clone(), tok.span));
                self.pos += 1;
            }
            _ => self.errors.push(ParseError::new(
                format!("missing name for object '{}'", obj.type_name),
                header.span,
            )),
        }

        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Attribute => {
                    let attr = self.parse_attribute();
                    obj.attributes.push(attr);
                }
                TokenKind::JinjaComment | TokenKind::JinjaExpression => self.pos += 1,
                TokenKind::Object | TokenKind::Eof => break,
                _ => {
                    self.errors.push(ParseError::new(
                        format!(
                            "unexpected token '{}' in object '{}'",
                            tok.text, obj.type_name
                        ),
                        tok.span,
                    ));
                    self.pos += 1;
                }
            }
        }

        // Two-phase construction: the end is known only once the body has
        // been consumed.
        obj.span.end = obj
            .attributes
            .last()
            .map(|a| a.span.end)
            .or_else(|| obj.identifier.as_ref().map(|i| i.span.end))
            .unwrap_or(obj.span.end);
        obj
    }

    fn parse_attribute(&mut self) -> Attribute {
        let key = self.bump();
        let mut attr = Attribute::new(key.text.clone(), key.span);

        while let Some(tok) = self.peek() {
            if let Some(kind) = ValueKind::from_token(tok.kind) {
                attr.values
                    .push(AttributeValue::new(tok.text.clone(), kind, tok.span));
                self.pos += 1;
                continue;
            }
            match tok.kind {
                // Start of the next attribute or object: the value list
                // ends cleanly.
                TokenKind::Attribute | TokenKind::Object | TokenKind::Eof => break,
                TokenKind::JinjaComment | TokenKind::JinjaExpression => self.pos += 1,
                _ => {
                    self.errors.push(ParseError::new(
                        format!(
                            "unexpected token '{}' in values of attribute '{}'",
                            tok.text, attr.key
                        ),
                        tok.span,
                    ));
                    self.pos += 1;
                }
            }
        }

        attr.span.end = attr.values.last().map_or(attr.span.end, |v| v.span.end);
        attr
    }
}
