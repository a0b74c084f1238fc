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

//! SEPTIC - language tooling for process-control configuration files.
//!
//! This facade re-exports the whole pipeline:
//!
//! - `septic-core`: tokenizer, object parser, hierarchy, metadata tables
//! - `septic-alg`: the calculation sub-language parser
//! - `septic-analysis`: references, project contexts, cycle detection
//!
//! # Examples
//!
//! ```
//! use septic::{analyze, CancelToken};
//!
//! let cancel = CancelToken::new();
//! let doc = analyze("CalcPvr: Out\nAlg= \"Var1 + 1\"\n", &cancel).unwrap();
//! assert_eq!(doc.objects().len(), 1);
//! assert!(doc.references().get("Var1").is_some());
//! ```

pub use septic_alg::{
    parse_alg, AlgCalc, AlgError, AlgExpr, BinaryOp, LiteralKind, PositionMap, UnaryOp,
};
pub use septic_analysis::{
    calc_inputs, extract_references, find_cycles, visit_variables, CalcInput, Cycle, CycleNode,
    DescriptorError, DocumentAnalysis, DocumentSource, InMemoryDocuments, Position,
    ProjectContext, ProjectDescriptor, ReferenceIndex, ReferenceKind, SepticReference,
};
pub use septic_core::{
    build_hierarchy, identity_key, parse, tokenize, Attribute, AttributeValue, CalcFunction,
    CancelToken, CatalogError, FunctionCatalog, Identifier, ObjectCatalog, ObjectTypeMeta,
    ParseError, ParseOutcome, ReferenceRules, SepticObject, Span, SymbolCategory, Token,
    TokenKind, ValueKind,
};

/// One-call pipeline: tokenize, parse and build the hierarchy of a
/// document, ready for reference and cycle queries.
///
/// Returns `None` when cancelled; an aborted parse must never be treated
/// as a valid empty document.
pub fn analyze(text: &str, cancel: &CancelToken) -> Option<DocumentAnalysis> {
    DocumentAnalysis::parse(text, cancel)
}
