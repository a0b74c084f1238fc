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

//! Reference extraction for parsed SEPTIC documents.
//!
//! Walks the object list under the metadata table's reference rules and,
//! for calculation attributes, the calculation AST, building a multimap
//! from variable identity key to every declaration and use. A broken
//! calculation contributes zero references; extraction never fails.

use septic_alg::{parse_alg, AlgExpr, LiteralKind};
use septic_core::{identity_key, ObjectCatalog, SepticObject, Span, ValueKind};
use std::collections::HashMap;

/// How a reference was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Declaration-class: the declared identifier of a variable-declaring
    /// object type.
    Identifier,
    /// A value of a single- or list-reference attribute.
    Attribute,
    /// A variable inside a calculation expression.
    Calc,
}

/// One occurrence of a variable in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SepticReference {
    /// Identity key: the display name with all whitespace removed.
    pub identity_key: String,
    /// The name exactly as written.
    pub display_name: String,
    /// Span in original-source coordinates.
    pub span: Span,
    /// How the reference was produced.
    pub kind: ReferenceKind,
    /// Index of the owning object in the parse's object vector; set only
    /// for declaration-class references.
    pub object: Option<usize>,
}

/// Multimap from identity key to references, in extraction order.
///
/// Append-only per parse: rebuilt wholesale (never patched) when the
/// owning document is reparsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceIndex {
    map: HashMap<String, Vec<SepticReference>>,
}

impl ReferenceIndex {
    /// Looks up all references to `name`. The name is normalized to its
    /// identity key first, so `" Var 1 "` and `"Var1"` resolve alike.
    ///
    /// Returns `None` when the document contains no reference at all;
    /// a returned slice is never empty.
    pub fn get(&self, name: &str) -> Option<&[SepticReference]> {
        self.map.get(&identity_key(name)).map(Vec::as_slice)
    }

    /// Number of distinct identity keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when no references were extracted.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over all (identity key, references) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SepticReference])> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn insert(&mut self, reference: SepticReference) {
        self.map
            .entry(reference.identity_key.clone())
            .or_default()
            .push(reference);
    }
}

/// Extracts every reference from a parsed object list.
///
/// Per object: a declaration-kind reference for the identifier of types
/// whose metadata marks it; attribute-kind references for single- and
/// list-reference attributes (list attributes treat the first value as a
/// count prefix, only the remainder are references); calc-kind references
/// for every variable in a calculation attribute, spans translated from
/// stripped coordinates back to the original attribute text.
pub fn extract_references(
    objects: &[SepticObject],
    catalog: &ObjectCatalog,
) -> ReferenceIndex {
    let mut index = ReferenceIndex::default();

    for (object_index, obj) in objects.iter().enumerate() {
        let rules = &catalog.lookup(&obj.type_name).refs;

        if rules.identifier_is_reference {
            if let Some(ident) = &obj.identifier {
                index.insert(SepticReference {
                    identity_key: ident.identity_key(),
                    display_name: ident.name.clone(),
                    span: ident.span,
                    kind: ReferenceKind::Identifier,
                    object: Some(object_index),
                });
            }
        }

        for attr_name in &rules.single_reference_attributes {
            if let Some(value) = obj.attribute(attr_name).and_then(|a| a.first_value()) {
                index.insert(value_reference(value.value(), value.span));
            }
        }

        for attr_name in &rules.list_reference_attributes {
            if let Some(attr) = obj.attribute(attr_name) {
                // The first value is a count prefix, not a reference.
                for value in attr.values.iter().skip(1) {
                    index.insert(value_reference(value.value(), value.span));
                }
            }
        }

        for attr_name in &rules.calc_attributes {
            let Some(value) = obj.attribute(attr_name).and_then(|a| a.first_value()) else {
                continue;
            };
            // A broken calculation yields zero references, not a crash.
            let Ok(calc) = parse_alg(value.value()) else {
                continue;
            };
            // Calculation spans are relative to the unquoted, stripped
            // text; shift past the opening quote when the value is a
            // string literal.
            let base = if value.kind == ValueKind::String {
                value.span.start + 1
            } else {
                value.span.start
            };
            visit_variables(&calc.expr, &mut |name, span| {
                index.insert(SepticReference {
                    identity_key: identity_key(name),
                    display_name: name.to_string(),
                    span: calc.map.original_span(span).offset(base),
                    kind: ReferenceKind::Calc,
                    object: None,
                });
            });
        }
    }

    index
}

/// Visits every variable literal of an expression, depth first.
///
/// Free function over the tagged union; the cycle detector builds its own
/// specialized walk on top of the same shape.
pub fn visit_variables(expr: &AlgExpr, visit: &mut impl FnMut(&str, Span)) {
    match expr {
        AlgExpr::Literal {
            kind: LiteralKind::Variable,
            value,
            span,
        } => visit(value, *span),
        AlgExpr::Literal { .. } => {}
        AlgExpr::Unary { operand, .. } => visit_variables(operand, visit),
        AlgExpr::Binary { left, right, .. } => {
            visit_variables(left, visit);
            visit_variables(right, visit);
        }
        AlgExpr::Grouping { inner, .. } => visit_variables(inner, visit),
        AlgExpr::Call { args, .. } => {
            for arg in args {
                visit_variables(arg, visit);
            }
        }
    }
}

fn value_reference(name: &str, span: Span) -> SepticReference {
    SepticReference {
        identity_key: identity_key(name),
        display_name: name.to_string(),
        span,
        kind: ReferenceKind::Attribute,
        object: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use septic_core::{build_hierarchy, parse, tokenize, CancelToken};

    fn extract(source: &str) -> (Vec<SepticObject>, ReferenceIndex) {
        let cancel = CancelToken::new();
        let mut outcome = parse(&tokenize(source, &cancel), &cancel);
        build_hierarchy(&mut outcome.objects, ObjectCatalog::bundled());
        let index = extract_references(&outcome.objects, ObjectCatalog::bundled());
        (outcome.objects, index)
    }

    // ==================== declaration tests ====================

    #[test]
    fn test_declaration_reference_from_identifier() {
        let (_, index) = extract("Evr: Var1\nMeas= 1\n");
        let refs = index.get("Var1").expect("declaration should be indexed");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ReferenceKind::Identifier);
        assert_eq!(refs[0].object, Some(0));
    }

    #[test]
    fn test_xvr_and_sopc_share_identity() {
        let (_, index) = extract("Evr: Var1\nSopcEvr: Var1\n");
        let refs = index.get("Var1").expect("both declarations indexed");
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|r| r.kind == ReferenceKind::Identifier));
    }

    #[test]
    fn test_identity_key_ignores_whitespace() {
        // Templating can introduce spaces inside a logical name.
        let (_, index) = extract("Evr: Var1\n");
        assert!(index.get(" Var 1 ").is_some());
    }

    #[test]
    fn test_non_declaring_type_identifier_is_not_indexed() {
        let (_, index) = extract("DmmyAppl: Main\n");
        assert!(index.get("Main").is_none());
    }

    // ==================== attribute tests ====================

    #[test]
    fn test_list_reference_attribute_skips_count_prefix() {
        let (_, index) = extract("XvrPlot: Plot1\nXvrs= 2 \"Var1\" \"Var2\"\n");
        assert!(index.get("2").is_none());
        assert_eq!(index.get("Var1").map(<[_]>::len), Some(1));
        assert_eq!(index.get("Var2").map(<[_]>::len), Some(1));
        assert_eq!(index.get("Var1").unwrap()[0].kind, ReferenceKind::Attribute);
    }

    #[test]
    fn test_single_reference_attribute_uses_first_value() {
        let (_, index) = extract("XvrBar: Bar1\nXvr= \"Var1\"\n");
        assert_eq!(index.get("Var1").map(<[_]>::len), Some(1));
    }

    // ==================== calculation tests ====================

    #[test]
    fn test_calc_references_from_alg_attribute() {
        let source = "CalcPvr: Out\nAlg= \"Var1 + abs(Var2)\"\n";
        let (objects, index) = extract(source);

        let out = index.get("Out").expect("CalcPvr declares a variable");
        assert_eq!(out[0].kind, ReferenceKind::Identifier);

        let alg_span = objects[0].attribute("Alg").unwrap().values[0].span;
        for name in ["Var1", "Var2"] {
            let refs = index.get(name).expect("calc variable indexed");
            assert_eq!(refs[0].kind, ReferenceKind::Calc);
            assert!(alg_span.contains_span(refs[0].span));
            assert_eq!(&source[refs[0].span.start..refs[0].span.end], name);
        }
    }

    #[test]
    fn test_broken_calc_yields_zero_calc_references() {
        let (_, index) = extract("CalcPvr: X\nAlg= \"1+2+?\"\n");
        // The declaration itself is still indexed; the calculation is not.
        let refs = index.get("X").expect("declaration survives");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ReferenceKind::Identifier);
        assert!(index.iter().all(|(_, refs)| refs
            .iter()
            .all(|r| r.kind != ReferenceKind::Calc)));
    }

    #[test]
    fn test_calc_with_control_markers_maps_spans_into_attribute() {
        let source = "CalcPvr: Out\nAlg= \"{% if x %}Var1{% endif %} + 2\"\n";
        let (objects, index) = extract(source);
        let alg_span = objects[0].attribute("Alg").unwrap().values[0].span;
        let refs = index.get("Var1").expect("variable indexed");
        assert!(alg_span.contains_span(refs[0].span));
        assert_eq!(&source[refs[0].span.start..refs[0].span.end], "Var1");
    }

    #[test]
    fn test_unknown_object_type_extracts_nothing() {
        let (_, index) = extract("FutureThing: F1\nAlg= \"Var1\"\n");
        assert!(index.is_empty());
    }
}
