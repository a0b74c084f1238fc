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

//! Parser for the calculation sub-language embedded in SEPTIC `Alg`
//! attributes.
//!
//! Independent of the object parser: input is the raw calculation string,
//! output is an [`AlgExpr`] tree or a hard [`AlgError`]. Callers always
//! wrap the parse in a recoverable boundary and degrade to "no information
//! available for this calculation" on failure.
//!
//! # Examples
//!
//! ```
//! use septic_alg::{parse_alg, AlgExpr};
//!
//! let calc = parse_alg("Var1 + abs(Var2)").unwrap();
//! assert!(matches!(calc.expr, AlgExpr::Binary { .. }));
//!
//! assert!(parse_alg("1+2+?").is_err());
//! ```

mod ast;
mod error;
mod parser;
mod strip;
mod token;

pub use ast::{AlgExpr, BinaryOp, LiteralKind, UnaryOp};
pub use error::AlgError;
pub use parser::{parse_alg, AlgCalc};
pub use strip::{strip_control_markers, PositionMap, Stripped};
