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

//! Host collaborator boundary.
//!
//! The analysis core never performs I/O and operates purely on byte
//! offsets; document loading and offset/position translation are owned by
//! the host environment behind [`DocumentSource`]. The in-memory
//! implementation here backs tests and simple embeddings.

use std::collections::HashMap;

/// A zero-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Zero-based line.
    pub line: usize,
    /// Zero-based column within the line.
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Host-owned access to document text and position translation.
pub trait DocumentSource {
    /// The full text of a document, when available.
    fn text(&self, uri: &str) -> Option<String>;

    /// Translates a byte offset into a line/column position.
    fn position_at(&self, uri: &str, offset: usize) -> Option<Position>;

    /// Translates a line/column position into a byte offset.
    fn offset_at(&self, uri: &str, position: Position) -> Option<usize>;
}

/// In-memory document store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocuments {
    docs: HashMap<String, String>,
}

impl InMemoryDocuments {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a document.
    pub fn insert(&mut self, uri: impl Into<String>, text: impl Into<String>) {
        self.docs.insert(uri.into(), text.into());
    }
}

impl DocumentSource for InMemoryDocuments {
    fn text(&self, uri: &str) -> Option<String> {
        self.docs.get(uri).cloned()
    }

    fn position_at(&self, uri: &str, offset: usize) -> Option<Position> {
        let text = self.docs.get(uri)?;
        let offset = offset.min(text.len());
        let before = &text[..offset];
        let line = before.bytes().filter(|b| *b == b'\n').count();
        let column = offset - before.rfind('\n').map_or(0, |i| i + 1);
        Some(Position::new(line, column))
    }

    fn offset_at(&self, uri: &str, position: Position) -> Option<usize> {
        let text = self.docs.get(uri)?;
        let line_start = if position.line == 0 {
            0
        } else {
            text.match_indices('\n')
                .nth(position.line - 1)
                .map(|(i, _)| i + 1)?
        };
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |i| line_start + i);
        Some((line_start + position.column).min(line_end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryDocuments {
        let mut docs = InMemoryDocuments::new();
        docs.insert("a.cnfg", "Evr: Var1\nMeas= 1\n");
        docs
    }

    #[test]
    fn test_text_lookup() {
        assert!(store().text("a.cnfg").is_some());
        assert!(store().text("missing.cnfg").is_none());
    }

    #[test]
    fn test_position_at() {
        let docs = store();
        assert_eq!(docs.position_at("a.cnfg", 0), Some(Position::new(0, 0)));
        assert_eq!(docs.position_at("a.cnfg", 5), Some(Position::new(0, 5)));
        // "Meas" starts right after the first newline.
        assert_eq!(docs.position_at("a.cnfg", 10), Some(Position::new(1, 0)));
    }

    #[test]
    fn test_offset_at_round_trips() {
        let docs = store();
        for offset in [0, 5, 9, 10, 14] {
            let pos = docs.position_at("a.cnfg", offset).unwrap();
            assert_eq!(docs.offset_at("a.cnfg", pos), Some(offset));
        }
    }

    #[test]
    fn test_offset_at_clamps_to_line_end() {
        let docs = store();
        // Column past the end of line 0 clamps to the newline.
        assert_eq!(docs.offset_at("a.cnfg", Position::new(0, 99)), Some(9));
    }
}
