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

//! Recursive-descent parser for the calculation sub-language.
//!
//! Grammar, precedence low to high:
//!
//! ```text
//! comparison     = additive (("==" | ">" | ">=" | "<" | "<=") additive)*
//! additive       = multiplicative (("+" | "-") multiplicative)*
//! multiplicative = unary (("*" | "/") unary)*
//! unary          = "-" unary | primary
//! primary        = number | string | "(" comparison ")" | variable | call
//! variable       = (identifier | jinja)+ ("." (identifier | jinja))*   (no gaps)
//! call           = identifier "(" (comparison ("," comparison)*)? ")"  (no gap before "(")
//! ```
//!
//! On failure the parser throws; it never returns a partial tree. Callers
//! use the throw as a hard boundary: extract no references from this
//! calculation.

use crate::ast::{AlgExpr, BinaryOp, LiteralKind, UnaryOp};
use crate::error::AlgError;
use crate::strip::{strip_control_markers, PositionMap};
use crate::token::{lex, AlgToken, AlgTokenKind};
use septic_core::Span;

/// A parsed calculation: the expression tree plus the position map from
/// stripped coordinates back to the original attribute text.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgCalc {
    /// Root of the expression tree. Spans are stripped coordinates.
    pub expr: AlgExpr,
    /// Translates stripped spans back to original offsets.
    pub map: PositionMap,
}

/// Parses calculation text into an expression tree.
///
/// Jinja control markers are stripped first (see
/// [`strip_control_markers`]); other jinja statements or comments raise the
/// distinguished [`AlgError::UnsupportedJinja`].
///
/// # Examples
///
/// ```
/// use septic_alg::{parse_alg, AlgExpr, LiteralKind};
/// use septic_core::Span;
///
/// let calc = parse_alg("abs(Var1)").unwrap();
/// let AlgExpr::Call { name, args, span, .. } = calc.expr else {
///     panic!("expected a call");
/// };
/// assert_eq!(name, "abs");
/// assert_eq!(span, Span::new(0, 9));
/// assert!(matches!(
///     &args[0],
///     AlgExpr::Literal { kind: LiteralKind::Variable, value, .. } if value == "Var1"
/// ));
/// ```
pub fn parse_alg(calc_text: &str) -> Result<AlgCalc, AlgError> {
    let stripped = strip_control_markers(calc_text);
    let tokens = lex(&stripped.text)?;
    let mut parser = AlgParser::new(&tokens);
    let expr = parser.parse_comparison()?;
    let trailing = parser.peek();
    if trailing.kind != AlgTokenKind::End {
        return Err(AlgError::syntax(
            format!("unexpected token '{}' after expression", trailing.text),
            trailing.span,
        ));
    }
    Ok(AlgCalc {
        expr,
        map: stripped.map,
    })
}

struct AlgParser<'a> {
    tokens: &'a [AlgToken],
    pos: usize,
}

impl<'a> AlgParser<'a> {
    fn new(tokens: &'a [AlgToken]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// The lexer guarantees a trailing `End` token, so `peek` is total.
    fn peek(&self) -> &'a AlgToken {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> &'a AlgToken {
        let tok = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn parse_comparison(&mut self) -> Result<AlgExpr, AlgError> {
        let mut left = self.parse_additive()?;
        loop {
            let operator = match self.peek().kind {
                AlgTokenKind::EqEq => BinaryOp::Eq,
                AlgTokenKind::Gt => BinaryOp::Gt,
                AlgTokenKind::Ge => BinaryOp::Ge,
                AlgTokenKind::Lt => BinaryOp::Lt,
                AlgTokenKind::Le => BinaryOp::Le,
                _ => break,
            };
            self.bump();
            let right = self.parse_additive()?;
            left = binary(left, operator, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<AlgExpr, AlgError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let operator = match self.peek().kind {
                AlgTokenKind::Plus => BinaryOp::Add,
                AlgTokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump();
            let right = self.parse_multiplicative()?;
            left = binary(left, operator, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<AlgExpr, AlgError> {
        let mut left = self.parse_unary()?;
        loop {
            let operator = match self.peek().kind {
                AlgTokenKind::Star => BinaryOp::Mul,
                AlgTokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.bump();
            let right = self.parse_unary()?;
            left = binary(left, operator, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<AlgExpr, AlgError> {
        if self.peek().kind == AlgTokenKind::Minus {
            let minus = self.bump();
            let operand = self.parse_unary()?;
            let span = minus.span.union(operand.span());
            return Ok(AlgExpr::Unary {
                operator: UnaryOp::Neg,
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<AlgExpr, AlgError> {
        let tok = self.peek();
        match tok.kind {
            AlgTokenKind::Number => {
                self.bump();
                Ok(AlgExpr::Literal {
                    kind: LiteralKind::Number,
                    value: tok.text.clone(),
                    span: tok.span,
                })
            }
            AlgTokenKind::Str => {
                self.bump();
                Ok(AlgExpr::Literal {
                    kind: LiteralKind::Str,
                    value: tok.text.clone(),
                    span: tok.span,
                })
            }
            AlgTokenKind::LParen => {
                let open = self.bump();
                let inner = self.parse_comparison()?;
                let close = self.peek();
                if close.kind != AlgTokenKind::RParen {
                    return Err(AlgError::syntax(
                        "expected ')' after parenthesized expression",
                        close.span,
                    ));
                }
                self.bump();
                Ok(AlgExpr::Grouping {
                    inner: Box::new(inner),
                    span: Span::new(open.span.start, close.span.end),
                })
            }
            AlgTokenKind::Identifier | AlgTokenKind::Jinja => self.parse_variable_or_call(),
            AlgTokenKind::End => Err(AlgError::syntax(
                "unexpected end of calculation",
                tok.span,
            )),
            _ => Err(AlgError::syntax(
                format!("unexpected token '{}'", tok.text),
                tok.span,
            )),
        }
    }

    /// Variables are built from adjacent identifier/jinja fragments plus
    /// dotted continuations, all with zero gap; an identifier immediately
    /// followed by `(` is a function call instead.
    fn parse_variable_or_call(&mut self) -> Result<AlgExpr, AlgError> {
        let first = self.bump();
        let mut name = first.text.clone();
        let mut span = first.span;

        loop {
            let next = self.peek();
            let adjacent = next.span.start == span.end;
            match next.kind {
                AlgTokenKind::Identifier | AlgTokenKind::Jinja if adjacent => {
                    name.push_str(&next.text);
                    span.end = next.span.end;
                    self.bump();
                }
                AlgTokenKind::Dot if adjacent => {
                    let dot = self.bump();
                    let prop = self.peek();
                    let prop_adjacent = prop.span.start == dot.span.end;
                    if !prop_adjacent
                        || !matches!(
                            prop.kind,
                            AlgTokenKind::Identifier | AlgTokenKind::Jinja
                        )
                    {
                        return Err(AlgError::syntax(
                            format!("expected property name after '.' in '{}'", name),
                            dot.span,
                        ));
                    }
                    name.push('.');
                    name.push_str(&prop.text);
                    span.end = prop.span.end;
                    self.bump();
                }
                _ => break,
            }
        }

        let open = self.peek();
        if open.kind == AlgTokenKind::LParen && open.span.start == span.end {
            return self.parse_call(name, span);
        }

        Ok(AlgExpr::Literal {
            kind: LiteralKind::Variable,
            value: name,
            span,
        })
    }

    fn parse_call(&mut self, name: String, name_span: Span) -> Result<AlgExpr, AlgError> {
        self.bump();
        let mut args = Vec::new();

        if self.peek().kind == AlgTokenKind::RParen {
            let close = self.bump();
            return Ok(AlgExpr::Call {
                name,
                name_span,
                args,
                span: Span::new(name_span.start, close.span.end),
            });
        }

        loop {
            args.push(self.parse_comparison()?);
            let tok = self.peek();
            match tok.kind {
                AlgTokenKind::Comma => {
                    self.bump();
                    if self.peek().kind == AlgTokenKind::RParen {
                        return Err(AlgError::syntax(
                            format!("missing argument in call to '{}'", name),
                            name_span,
                        ));
                    }
                }
                AlgTokenKind::RParen => {
                    let close = self.bump();
                    return Ok(AlgExpr::Call {
                        name,
                        name_span,
                        args,
                        span: Span::new(name_span.start, close.span.end),
                    });
                }
                AlgTokenKind::End => {
                    return Err(AlgError::syntax(
                        format!("missing closing parenthesis in call to '{}'", name),
                        name_span,
                    ));
                }
                _ => {
                    return Err(AlgError::syntax(
                        format!("unexpected token '{}' in arguments of '{}'", tok.text, name),
                        tok.span,
                    ));
                }
            }
        }
    }
}

fn binary(left: AlgExpr, operator: BinaryOp, right: AlgExpr) -> AlgExpr {
    let span = left.span().union(right.span());
    AlgExpr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        span,
    }
}
