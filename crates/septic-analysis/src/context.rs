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

//! Multi-file project contexts.
//!
//! A context is an ordered list of member files forming one logical unit
//! for cross-file reference resolution. Member files load independently
//! (no shared mutable parse state, any order, concurrently if the host
//! wishes); aggregation is pure concatenation in the declared file order
//! so multi-file results are deterministic.

use crate::document::DocumentAnalysis;
use crate::host::DocumentSource;
use crate::reference::SepticReference;
use septic_core::CancelToken;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Error raised when a project descriptor cannot be deserialized.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The YAML source is malformed or does not match the schema.
    #[error("malformed project descriptor: {0}")]
    Malformed(#[from] serde_yaml::Error),
}

/// A project descriptor: the small structured file naming a template
/// directory and the ordered member files of the context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectDescriptor {
    /// Directory holding the member templates.
    pub template_dir: String,
    /// Member file names, in context order.
    pub members: Vec<String>,
}

impl ProjectDescriptor {
    /// Deserializes a descriptor from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, DescriptorError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Resolves member names against a caller-supplied listing of
    /// candidate files under the template directory, by base-name match
    /// (with or without extension). Unresolved members are logged and
    /// skipped, never treated as parse errors. Resolution order follows
    /// the declared member order.
    pub fn resolve_members(&self, candidates: &[String]) -> Vec<String> {
        let mut resolved = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let found = candidates.iter().find(|candidate| {
                let base = candidate
                    .rsplit(['/', '\\'])
                    .next()
                    .unwrap_or(candidate.as_str());
                base == member || base.rsplit_once('.').map(|(stem, _)| stem) == Some(member)
            });
            match found {
                Some(path) => resolved.push(path.clone()),
                None => tracing::warn!(member = %member, "context member not found"),
            }
        }
        resolved
    }
}

/// An ordered set of files forming one compilation unit.
#[derive(Debug, Default)]
pub struct ProjectContext {
    file_order: Vec<String>,
    files: HashMap<String, DocumentAnalysis>,
}

impl ProjectContext {
    /// Creates a context over the given member files, none loaded yet.
    pub fn new(file_order: Vec<String>) -> Self {
        Self {
            file_order,
            files: HashMap::new(),
        }
    }

    /// The declared member order.
    pub fn file_order(&self) -> &[String] {
        &self.file_order
    }

    /// Inserts (or replaces) the analysis of one member file. Files may
    /// load out of order; aggregation order is unaffected.
    pub fn insert(&mut self, name: impl Into<String>, analysis: DocumentAnalysis) {
        self.files.insert(name.into(), analysis);
    }

    /// The analysis of one member file, when loaded.
    pub fn file(&self, name: &str) -> Option<&DocumentAnalysis> {
        self.files.get(name)
    }

    /// Loads every member file available from `source`. Unavailable
    /// members are logged and skipped; aborted parses are not cached.
    pub fn load_all(&mut self, source: &impl DocumentSource, cancel: &CancelToken) {
        for name in self.file_order.clone() {
            match source.text(&name) {
                Some(text) => {
                    if let Some(analysis) = DocumentAnalysis::parse(&text, cancel) {
                        self.files.insert(name, analysis);
                    }
                }
                None => tracing::warn!(file = %name, "context member not available"),
            }
        }
    }

    /// All references to `name` across the context, each paired with the
    /// member file that contributed it, concatenated in the declared file
    /// order regardless of load order.
    ///
    /// Returns `None` when no member file contributes any reference;
    /// callers distinguish "no references anywhere" from an empty list.
    pub fn references(&self, name: &str) -> Option<Vec<(&str, &SepticReference)>> {
        let mut out = Vec::new();
        let mut contributed = false;
        for file in &self.file_order {
            if let Some(analysis) = self.files.get(file) {
                if let Some(refs) = analysis.references().get(name) {
                    contributed = true;
                    out.extend(refs.iter().map(|r| (file.as_str(), r)));
                }
            }
        }
        contributed.then_some(out)
    }
}
