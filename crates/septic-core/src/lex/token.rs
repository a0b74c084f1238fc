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

//! Token types for the SEPTIC config language.

use crate::span::Span;

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Object declaration keyword: a bare word immediately followed by `:`
    /// and a blank (`Evr: `). The token text excludes the colon.
    Object,
    /// Attribute keyword: a bare word immediately followed by `=` and a
    /// blank (`Meas= `). The token text excludes the equals sign.
    Attribute,
    /// Identifier, including identifiers with embedded `{{ }}` templating.
    Identifier,
    /// Integer, decimal or scientific-notation numeric literal.
    Numeric,
    /// Double-quoted string literal. The token text keeps the quotes.
    String,
    /// Unquoted file-system path (contains at least one `/` or `\`).
    Path,
    /// `// ...` comment. Recognized but discarded from the stream.
    LineComment,
    /// `/* ... */` comment. Recognized but discarded from the stream.
    BlockComment,
    /// `{# ... #}` jinja comment. Retained for formatting consumers.
    JinjaComment,
    /// `{% ... %}` jinja statement. Retained for formatting consumers.
    JinjaExpression,
    /// Catch-all for a single unrecognized character.
    Unknown,
    /// End of input. Always the last token of a stream.
    Eof,
}

impl TokenKind {
    /// Returns `true` for comment kinds that are dropped from the stream.
    #[inline]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Returns `true` for kinds that may appear in an attribute value list.
    #[inline]
    pub const fn is_value(&self) -> bool {
        matches!(
            self,
            Self::Numeric | Self::String | Self::Identifier | Self::Path
        )
    }

    /// Returns `true` for retained jinja marker kinds.
    #[inline]
    pub const fn is_jinja(&self) -> bool {
        matches!(self, Self::JinjaComment | Self::JinjaExpression)
    }
}

/// A lexical token with its source span and text.
///
/// Tokens are produced in strictly increasing, non-overlapping span order;
/// the regions elided between consecutive tokens are whitespace and regular
/// comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// Source span covered by the token, including structural punctuation
    /// such as the trailing `:` of an object keyword.
    pub span: Span,
    /// The token text. For [`TokenKind::Object`] and
    /// [`TokenKind::Attribute`] this is the bare keyword without the
    /// trailing `:` / `=`.
    pub text: String,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}
