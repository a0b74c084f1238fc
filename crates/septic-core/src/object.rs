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

//! Object model for parsed SEPTIC documents.
//!
//! A parsed file is a flat, file-ordered vector of [`SepticObject`]s owned
//! by the caller. Parent/child relationships are *indices* into that vector,
//! assigned by the hierarchy builder after parsing; an object never owns its
//! children. The whole model is rebuilt wholesale on every reparse.

use crate::lex::TokenKind;
use crate::span::Span;

/// Derives the identity key of a variable name: the display name with all
/// whitespace removed.
///
/// Two identifiers are the same variable iff their identity keys are equal,
/// regardless of whitespace introduced by templating. All reference
/// matching and graph node identity use this key, never the display name.
///
/// # Examples
///
/// ```
/// use septic_core::identity_key;
///
/// assert_eq!(identity_key(" Var 1 "), "Var1");
/// assert_eq!(identity_key("{{ well }}Flow"), "{{well}}Flow");
/// ```
pub fn identity_key(display_name: &str) -> String {
    display_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// The declared name of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// Name as written in the source, whitespace and templating included.
    pub name: String,
    /// Source span of the name.
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// The identity key of this identifier (see [`identity_key`]).
    pub fn identity_key(&self) -> String {
        identity_key(&self.name)
    }
}

/// Kind of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Numeric literal.
    Numeric,
    /// Quoted string literal.
    String,
    /// Bare identifier.
    Identifier,
    /// Unquoted file-system path.
    Path,
}

impl ValueKind {
    /// Maps a token kind to a value kind, for the kinds legal in a value
    /// list.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Numeric => Some(Self::Numeric),
            TokenKind::String => Some(Self::String),
            TokenKind::Identifier => Some(Self::Identifier),
            TokenKind::Path => Some(Self::Path),
            _ => None,
        }
    }
}

/// A single value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    /// The value text exactly as written, quotes included for strings.
    pub raw: String,
    /// The value kind.
    pub kind: ValueKind,
    /// Source span of the value.
    pub span: Span,
}

impl AttributeValue {
    /// Creates a new attribute value.
    pub fn new(raw: impl Into<String>, kind: ValueKind, span: Span) -> Self {
        Self {
            raw: raw.into(),
            kind,
            span,
        }
    }

    /// The value text with surrounding quotes stripped for strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use septic_core::{AttributeValue, Span, ValueKind};
    ///
    /// let v = AttributeValue::new("\"Var1\"", ValueKind::String, Span::new(0, 6));
    /// assert_eq!(v.value(), "Var1");
    /// ```
    pub fn value(&self) -> &str {
        if self.kind == ValueKind::String {
            self.raw
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(&self.raw)
        } else {
            &self.raw
        }
    }
}

/// A `key= value ...` attribute of an object.
///
/// Value order is significant: the first value of certain attributes has
/// different reference semantics than the remainder (list-reference
/// attributes treat it as a count prefix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute key, without the `=`.
    pub key: String,
    /// Values in source order. An empty list is legal.
    pub values: Vec<AttributeValue>,
    /// Span from the key to the last value.
    pub span: Span,
}

impl Attribute {
    /// Creates a new attribute with no values.
    pub fn new(key: impl Into<String>, span: Span) -> Self {
        Self {
            key: key.into(),
            values: Vec::new(),
            span,
        }
    }

    /// The first value, if any.
    pub fn first_value(&self) -> Option<&AttributeValue> {
        self.values.first()
    }
}

/// A parsed `Type: Name` object with its attributes.
///
/// `parent` and `children` are indices into the flat object vector of the
/// owning parse; they are `None`/empty until the hierarchy builder runs and
/// may be reset and recomputed repeatedly as documents change.
#[derive(Debug, Clone, PartialEq)]
pub struct SepticObject {
    /// The object type keyword (`Evr`, `CalcPvr`, ...).
    pub type_name: String,
    /// The declared name, when present.
    pub identifier: Option<Identifier>,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Span from the type keyword to the end of the last attribute (or the
    /// identifier when the object has no attributes). Finalized after the
    /// object body is consumed.
    pub span: Span,
    /// Index of the parent object, assigned by the hierarchy builder.
    pub parent: Option<usize>,
    /// Indices of child objects in file order.
    pub children: Vec<usize>,
}

impl SepticObject {
    /// Creates a new object whose span starts (and provisionally ends) at
    /// the type keyword.
    pub fn new(type_name: impl Into<String>, span: Span) -> Self {
        Self {
            type_name: type_name.into(),
            identifier: None,
            attributes: Vec::new(),
            span,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Looks up an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.key == key)
    }

    /// The identity key of the declared name, when present.
    pub fn identity_key(&self) -> Option<String> {
        self.identifier.as_ref().map(Identifier::identity_key)
    }
}
