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

//! Error types for the calculation sub-language.
//!
//! Unlike the object parser, the calculation parser fails hard: a syntax
//! error means "extract no references from this calculation", and every
//! caller wraps the parse in a recoverable boundary. Spans are in the
//! stripped-text coordinate space (see [`strip_control_markers`]).
//!
//! [`strip_control_markers`]: crate::strip_control_markers

use septic_core::Span;
use thiserror::Error;

/// A hard failure from the calculation parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgError {
    /// Ordinary authoring mistake in a calculation.
    #[error("calculation syntax error at {span}: {message}")]
    Syntax {
        /// Human-readable description of the problem.
        message: String,
        /// Span of the offending text, stripped coordinates.
        span: Span,
    },

    /// A jinja comment or statement block inside a calculation. The
    /// sub-language supports `{{ }}` interpolation in variable names but
    /// not templating control flow; this variant is distinguished from
    /// [`AlgError::Syntax`] so callers can suppress it instead of
    /// surfacing a user-facing defect.
    #[error("unsupported jinja construct in calculation at {span}")]
    UnsupportedJinja {
        /// Span of the jinja marker, stripped coordinates.
        span: Span,
    },
}

impl AlgError {
    /// Creates an ordinary syntax error.
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    /// Returns `true` for the distinguished unsupported-jinja subtype.
    pub fn is_unsupported_jinja(&self) -> bool {
        matches!(self, Self::UnsupportedJinja { .. })
    }
}
