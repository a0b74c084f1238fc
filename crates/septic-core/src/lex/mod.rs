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

//! Lexical analysis for the SEPTIC config language.
//!
//! # Module Structure
//!
//! - [`token`] - Token kinds and the token type
//! - [`scanner`] - The ordered-rule scanner, entry point [`tokenize`]
//!
//! The scanner produces a flat token stream with strictly increasing,
//! non-overlapping spans; concatenating all token spans together with the
//! elided whitespace/comment regions reconstructs the source text exactly.

mod scanner;
mod token;

pub use scanner::tokenize;
pub use token::{Token, TokenKind};
