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

//! Jinja control-marker stripping for calculation text.
//!
//! The calculation sub-language does not parse templating control flow:
//! `{% for %}` / `{% endfor %}` / `{% if %}` / `{% endif %}` markers are
//! removed from the text before lexing. All subsequent AST spans live in
//! the stripped coordinate space; a [`PositionMap`] translates them back to
//! original-source offsets at the point a reference span is recorded.
//!
//! Other `{% %}` statements and `{# #}` comments are *not* stripped; the
//! lexer reports them as the distinguished unsupported-jinja error.

use septic_core::Span;

/// Calculation text with control markers removed, plus the offset map back
/// to the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    /// The text with control markers removed.
    pub text: String,
    /// Maps stripped offsets back to original offsets.
    pub map: PositionMap,
}

/// One run of retained text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    /// Start of the run in stripped coordinates.
    stripped: usize,
    /// Start of the run in original coordinates.
    original: usize,
}

/// Translates stripped-text offsets back to original-text offsets.
///
/// # Examples
///
/// ```
/// use septic_alg::strip_control_markers;
/// use septic_core::Span;
///
/// let stripped = strip_control_markers("{% if x %}Var1{% endif %}");
/// assert_eq!(stripped.text, "Var1");
/// assert_eq!(stripped.map.original_span(Span::new(0, 4)), Span::new(10, 14));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionMap {
    segments: Vec<Segment>,
}

impl PositionMap {
    /// Translates a single stripped offset to an original offset.
    pub fn original_offset(&self, stripped: usize) -> usize {
        let idx = self
            .segments
            .partition_point(|seg| seg.stripped <= stripped);
        if idx == 0 {
            return stripped;
        }
        let seg = &self.segments[idx - 1];
        seg.original + (stripped - seg.stripped)
    }

    /// Translates a half-open stripped span to an original span.
    ///
    /// The end offset is translated through the last covered byte so a
    /// span ending exactly at a removed marker does not absorb it.
    pub fn original_span(&self, span: Span) -> Span {
        if span.end > span.start {
            Span::new(
                self.original_offset(span.start),
                self.original_offset(span.end - 1) + 1,
            )
        } else {
            let offset = self.original_offset(span.start);
            Span::new(offset, offset)
        }
    }
}

/// Removes `{% for %}` / `{% endfor %}` / `{% if %}` / `{% endif %}`
/// markers from calculation text, producing the stripped text and its
/// position map. Unterminated and non-control markers are left in place
/// for the lexer to report.
pub fn strip_control_markers(source: &str) -> Stripped {
    let mut cuts: Vec<(usize, usize)> = Vec::new();
    let mut search = 0;
    while let Some(found) = source[search..].find("{%") {
        let start = search + found;
        let Some(close) = source[start + 2..].find("%}") else {
            break;
        };
        let end = start + 2 + close + 2;
        let keyword = source[start + 2..end - 2]
            .split_whitespace()
            .next()
            .unwrap_or("");
        if matches!(keyword, "for" | "endfor" | "if" | "endif") {
            cuts.push((start, end));
        }
        search = end;
    }

    let mut text = String::with_capacity(source.len());
    let mut segments = Vec::new();
    let mut pos = 0;
    for (start, end) in cuts {
        if start > pos {
            segments.push(Segment {
                stripped: text.len(),
                original: pos,
            });
            text.push_str(&source[pos..start]);
        }
        pos = end;
    }
    if pos < source.len() {
        segments.push(Segment {
            stripped: text.len(),
            original: pos,
        });
        text.push_str(&source[pos..]);
    }

    Stripped {
        text,
        map: PositionMap { segments },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_identity() {
        let stripped = strip_control_markers("Var1 + 2");
        assert_eq!(stripped.text, "Var1 + 2");
        assert_eq!(stripped.map.original_offset(5), 5);
    }

    #[test]
    fn test_control_markers_are_removed() {
        let stripped = strip_control_markers("{% for w in wells %}Var{% endfor %} + 1");
        assert_eq!(stripped.text, "Var + 1");
    }

    #[test]
    fn test_non_control_statements_are_kept() {
        let stripped = strip_control_markers("{% set x = 1 %}Var");
        assert_eq!(stripped.text, "{% set x = 1 %}Var");
    }

    #[test]
    fn test_offsets_translate_through_cuts() {
        //           0123456789...
        let source = "{% if x %}Var1{% endif %}+2";
        let stripped = strip_control_markers(source);
        assert_eq!(stripped.text, "Var1+2");
        // "Var1" is at 0..4 stripped, 10..14 original.
        let original = stripped.map.original_span(Span::new(0, 4));
        assert_eq!(&source[original.start..original.end], "Var1");
        // "+2" straddles the endif cut.
        let plus = stripped.map.original_span(Span::new(4, 6));
        assert_eq!(&source[plus.start..plus.end], "+2");
    }

    #[test]
    fn test_span_ending_at_cut_does_not_absorb_marker() {
        let source = "Var1{% endif %}";
        let stripped = strip_control_markers(source);
        assert_eq!(stripped.text, "Var1");
        assert_eq!(stripped.map.original_span(Span::new(0, 4)), Span::new(0, 4));
    }

    #[test]
    fn test_unterminated_marker_is_left_in_place() {
        let stripped = strip_control_markers("Var1 {% if x");
        assert_eq!(stripped.text, "Var1 {% if x");
    }
}
