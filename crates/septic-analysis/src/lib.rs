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

//! Reference resolution, project contexts and cycle detection for SEPTIC
//! configurations.
//!
//! Sits on top of `septic-core` (object model) and `septic-alg`
//! (calculation expressions):
//!
//! - [`extract_references`] / [`ReferenceIndex`]: the per-file multimap
//!   from variable identity to every declaration and use
//! - [`DocumentAnalysis`]: a parse plus its lazily derived caches,
//!   invalidated wholesale on reparse
//! - [`ProjectContext`] / [`ProjectDescriptor`]: ordered multi-file
//!   aggregation with deterministic result order
//! - [`find_cycles`]: write/read dependency loops across calculations
//! - [`host`]: the document-source boundary owned by the embedding host

pub mod host;

mod context;
mod cycle;
mod document;
mod reference;

pub use context::{DescriptorError, ProjectContext, ProjectDescriptor};
pub use cycle::{calc_inputs, find_cycles, CalcInput, Cycle, CycleNode};
pub use document::DocumentAnalysis;
pub use host::{DocumentSource, InMemoryDocuments, Position};
pub use reference::{
    extract_references, visit_variables, ReferenceIndex, ReferenceKind, SepticReference,
};
