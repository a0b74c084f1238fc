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

//! Per-document analysis state with derived caches.
//!
//! The reference multimap and the cycle list are derived state keyed to
//! the originating parse by a generation counter: computed on first access
//! after a (re)parse and invalidated wholesale, never patched, whenever
//! the document is reparsed.

use crate::cycle::{calc_inputs, find_cycles, Cycle};
use crate::reference::{extract_references, ReferenceIndex};
use septic_core::{
    build_hierarchy, parse, tokenize, CancelToken, FunctionCatalog, ObjectCatalog, ParseError,
    SepticObject,
};
use std::cell::OnceCell;

/// A parsed document plus its lazily derived analyses.
///
/// # Examples
///
/// ```
/// use septic_analysis::DocumentAnalysis;
/// use septic_core::CancelToken;
///
/// let cancel = CancelToken::new();
/// let doc = DocumentAnalysis::parse("Evr: Var1\nMeas= 1\n", &cancel).unwrap();
/// assert_eq!(doc.objects().len(), 1);
/// assert!(doc.references().get("Var1").is_some());
/// ```
#[derive(Debug)]
pub struct DocumentAnalysis {
    objects: Vec<SepticObject>,
    errors: Vec<ParseError>,
    generation: u64,
    references: OnceCell<ReferenceIndex>,
    cycles: OnceCell<Vec<Cycle>>,
}

impl DocumentAnalysis {
    /// Tokenizes, parses and builds the hierarchy of a document.
    ///
    /// Returns `None` when the parse was cancelled; an aborted result must
    /// never be cached as if it were a real parse, so it is simply not
    /// constructed.
    pub fn parse(text: &str, cancel: &CancelToken) -> Option<Self> {
        let tokens = tokenize(text, cancel);
        let mut outcome = parse(&tokens, cancel);
        if cancel.is_cancelled() {
            return None;
        }
        build_hierarchy(&mut outcome.objects, ObjectCatalog::bundled());
        Some(Self {
            objects: outcome.objects,
            errors: outcome.errors,
            generation: 0,
            references: OnceCell::new(),
            cycles: OnceCell::new(),
        })
    }

    /// Replaces the parse with a fresh one, bumping the generation and
    /// dropping both derived caches.
    ///
    /// Returns `false` (leaving the analysis untouched) when the new parse
    /// was cancelled.
    pub fn reparse(&mut self, text: &str, cancel: &CancelToken) -> bool {
        let Some(next) = Self::parse(text, cancel) else {
            return false;
        };
        self.objects = next.objects;
        self.errors = next.errors;
        self.generation += 1;
        self.references = OnceCell::new();
        self.cycles = OnceCell::new();
        true
    }

    /// Objects in file order, hierarchy links assigned.
    pub fn objects(&self) -> &[SepticObject] {
        &self.objects
    }

    /// Recoverable parse problems, in discovery order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Generation counter tying derived state to this parse's identity.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The reference multimap, computed on first access after a parse.
    pub fn references(&self) -> &ReferenceIndex {
        self.references
            .get_or_init(|| extract_references(&self.objects, ObjectCatalog::bundled()))
    }

    /// The dependency cycles, computed on first access after a parse.
    pub fn cycles(&self) -> &[Cycle] {
        self.cycles.get_or_init(|| {
            find_cycles(
                &calc_inputs(&self.objects, ObjectCatalog::bundled()),
                FunctionCatalog::bundled(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_lazy_references() {
        let cancel = CancelToken::new();
        let doc = DocumentAnalysis::parse("Evr: Var1\nMeas= 1\n", &cancel).unwrap();
        assert_eq!(doc.generation(), 0);
        assert!(doc.references().get("Var1").is_some());
    }

    #[test]
    fn test_reparse_invalidates_caches_and_bumps_generation() {
        let cancel = CancelToken::new();
        let mut doc = DocumentAnalysis::parse("Evr: Var1\nMeas= 1\n", &cancel).unwrap();
        assert!(doc.references().get("Var1").is_some());

        assert!(doc.reparse("Evr: Var2\nMeas= 1\n", &cancel));
        assert_eq!(doc.generation(), 1);
        assert!(doc.references().get("Var1").is_none());
        assert!(doc.references().get("Var2").is_some());
    }

    #[test]
    fn test_cancelled_parse_is_not_constructed() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(DocumentAnalysis::parse("Evr: Var1\n", &cancel).is_none());
    }

    #[test]
    fn test_cancelled_reparse_leaves_analysis_untouched() {
        let live = CancelToken::new();
        let mut doc = DocumentAnalysis::parse("Evr: Var1\n", &live).unwrap();
        let cancelled = CancelToken::new();
        cancelled.cancel();
        assert!(!doc.reparse("Evr: Var2\n", &cancelled));
        assert_eq!(doc.generation(), 0);
        assert!(doc.references().get("Var1").is_some());
    }

    #[test]
    fn test_cycles_from_document() {
        let cancel = CancelToken::new();
        let doc = DocumentAnalysis::parse(
            "CalcPvr: A\nAlg= \"B + 1\"\nCalcPvr: B\nAlg= \"A + 1\"\n",
            &cancel,
        )
        .unwrap();
        assert_eq!(doc.cycles().len(), 1);
        assert!(doc.cycles()[0].contains("A"));
    }
}
