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

//! Error types for SEPTIC tokenizing and object parsing.
//!
//! Lexical and structural problems are always recovered locally and
//! *collected* alongside a best-effort object list; they are never thrown.
//! The config language backs a live editing session, so the parser must stay
//! usable on arbitrarily malformed input.

use crate::span::Span;
use thiserror::Error;

/// A recoverable problem found while parsing a SEPTIC document.
///
/// Collected into [`ParseOutcome::errors`](crate::ParseOutcome) rather than
/// returned as a failure; the accompanying object list is still valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {span}")]
pub struct ParseError {
    /// Human-readable description of the problem.
    pub message: String,
    /// Span of the offending token.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("unexpected token 'foo'", Span::new(3, 6));
        assert_eq!(err.to_string(), "unexpected token 'foo' at 3..6");
    }
}
