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

//! Tokenizer, object parser and data model for SEPTIC configuration files.
//!
//! SEPTIC is a config language for industrial process control; this crate
//! provides the front half of its analysis pipeline:
//!
//! - [`lex`]: ordered-rule tokenizer, entry point [`tokenize`]
//! - [`parse`]: error-recovering object parser producing [`SepticObject`]s
//! - [`build_hierarchy`]: parent/child assignment via per-type nesting levels
//! - [`ObjectCatalog`] / [`FunctionCatalog`]: static, data-driven metadata
//!
//! Everything operates on byte offsets ([`Span`]); line/column translation
//! is a host concern. All entry points are synchronous pure functions over
//! their inputs plus the read-only metadata tables, re-entrant and safe to
//! run concurrently on different documents. Long scans poll a
//! [`CancelToken`] and return best-effort-empty results when cancelled.

mod cancel;
mod error;
mod hierarchy;
pub mod lex;
mod meta;
mod object;
mod parser;
mod span;

pub use cancel::CancelToken;
pub use error::ParseError;
pub use hierarchy::build_hierarchy;
pub use lex::{tokenize, Token, TokenKind};
pub use meta::{
    CalcFunction, CatalogError, FunctionCatalog, ObjectCatalog, ObjectTypeMeta, ReferenceRules,
    SymbolCategory, DEFAULT_NESTING_LEVEL,
};
pub use object::{
    identity_key, Attribute, AttributeValue, Identifier, SepticObject, ValueKind,
};
pub use parser::{parse, ParseOutcome};
pub use span::Span;
