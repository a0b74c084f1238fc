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

//! Dependency-cycle detection over calculation expressions.
//!
//! Builds one shared directed graph across all calculations of a context.
//! A calculation's own name is a node whose edges lead to every variable it
//! reads. Write functions (`setmeas` and friends, `writes_first_arg` in the
//! function catalog) are special: their first argument is a node of its
//! own, and the variables read inside the write call hang off that node
//! instead of the enclosing calculation's.
//!
//! Nodes are keyed by identity key, created on first reference, insertion
//! order preserved so discovery order is deterministic.

use septic_core::{identity_key, FunctionCatalog, ObjectCatalog, SepticObject};
use septic_alg::{parse_alg, AlgExpr, LiteralKind};

/// One calculation to feed the detector: the owning variable's name plus
/// the raw calculation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcInput {
    /// Display name of the variable the calculation produces.
    pub owning_name: String,
    /// The calculation text, unquoted.
    pub text: String,
}

impl CalcInput {
    /// Creates a new calculation input.
    pub fn new(owning_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            owning_name: owning_name.into(),
            text: text.into(),
        }
    }
}

/// Pulls `(owning name, calculation text)` pairs out of a parsed object
/// list, one per calculation attribute present.
pub fn calc_inputs(objects: &[SepticObject], catalog: &ObjectCatalog) -> Vec<CalcInput> {
    let mut inputs = Vec::new();
    for obj in objects {
        let rules = &catalog.lookup(&obj.type_name).refs;
        if rules.calc_attributes.is_empty() {
            continue;
        }
        let Some(ident) = &obj.identifier else {
            continue;
        };
        for attr_name in &rules.calc_attributes {
            if let Some(value) = obj.attribute(attr_name).and_then(|a| a.first_value()) {
                inputs.push(CalcInput::new(ident.name.clone(), value.value()));
            }
        }
    }
    inputs
}

/// One node of a reported cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleNode {
    /// Identity key of the variable.
    pub name: String,
    /// Display name of the calculation that first touched the node.
    pub owning_calc: String,
}

/// An ordered dependency loop: `nodes[i]` depends on `nodes[i + 1]` and
/// the last node closes the loop back to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// The nodes of the loop, in edge order.
    pub nodes: Vec<CycleNode>,
}

impl Cycle {
    /// Number of nodes in the loop.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` for a loop with no nodes (never produced by
    /// detection; kept for completeness).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` when the loop touches the given variable name.
    pub fn contains(&self, name: &str) -> bool {
        let key = identity_key(name);
        self.nodes.iter().any(|n| n.name == key)
    }
}

#[derive(Debug, Default)]
struct Graph {
    nodes: Vec<NodeData>,
    index: std::collections::HashMap<String, usize>,
}

#[derive(Debug)]
struct NodeData {
    name: String,
    owning_calc: String,
    edges: Vec<usize>,
}

impl Graph {
    /// Node for `key`, created on first reference.
    fn node(&mut self, key: &str, owning_calc: &str) -> usize {
        if let Some(&index) = self.index.get(key) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            name: key.to_string(),
            owning_calc: owning_calc.to_string(),
            edges: Vec::new(),
        });
        self.index.insert(key.to_string(), index);
        index
    }

    fn edge(&mut self, from: usize, to: usize) {
        let edges = &mut self.nodes[from].edges;
        if !edges.contains(&to) {
            edges.push(to);
        }
    }
}

/// Finds all dependency loops across the given calculations.
///
/// Calculations that fail to parse are skipped, not fatal. Cycles are
/// reported longest first; equal-length cycles keep discovery order, which
/// follows node first-touch order and is therefore deterministic.
///
/// # Examples
///
/// ```
/// use septic_analysis::{find_cycles, CalcInput};
/// use septic_core::FunctionCatalog;
///
/// let calcs = vec![
///     CalcInput::new("A", "setmeas(A, B)"),
///     CalcInput::new("B", "setmeas(B, A)"),
/// ];
/// let cycles = find_cycles(&calcs, FunctionCatalog::bundled());
/// assert_eq!(cycles.len(), 1);
/// assert!(cycles[0].contains("A") && cycles[0].contains("B"));
/// ```
pub fn find_cycles(calcs: &[CalcInput], functions: &FunctionCatalog) -> Vec<Cycle> {
    let mut graph = Graph::default();
    for calc in calcs {
        let Ok(parsed) = parse_alg(&calc.text) else {
            continue;
        };
        let owner = graph.node(&identity_key(&calc.owning_name), &calc.owning_name);
        add_dependencies(&parsed.expr, owner, &calc.owning_name, &mut graph, functions);
    }

    let mut cycles = Vec::new();
    let mut visited = vec![false; graph.nodes.len()];
    let mut stack: Vec<usize> = Vec::new();
    for start in 0..graph.nodes.len() {
        if !visited[start] {
            dfs(start, &graph, &mut visited, &mut stack, &mut cycles);
        }
    }

    // Longest first for readability; the stable sort keeps equal-length
    // cycles in discovery order.
    cycles.sort_by(|a, b| b.nodes.len().cmp(&a.nodes.len()));
    cycles
}

/// Depth-first search with an explicit recursion stack: a neighbor already
/// on the stack closes a loop consisting of the stack slice from that
/// neighbor to the top.
fn dfs(
    node: usize,
    graph: &Graph,
    visited: &mut [bool],
    stack: &mut Vec<usize>,
    cycles: &mut Vec<Cycle>,
) {
    visited[node] = true;
    stack.push(node);
    for &next in &graph.nodes[node].edges {
        if let Some(position) = stack.iter().position(|&n| n == next) {
            let nodes = stack[position..]
                .iter()
                .map(|&i| CycleNode {
                    name: graph.nodes[i].name.clone(),
                    owning_calc: graph.nodes[i].owning_calc.clone(),
                })
                .collect();
            cycles.push(Cycle { nodes });
        } else if !visited[next] {
            dfs(next, graph, visited, stack, cycles);
        }
    }
    stack.pop();
}

/// Adds the dependency edges of one expression. `owner` is the node the
/// current reads attach to: the enclosing calculation's own node, or the
/// written variable inside a write call.
fn add_dependencies(
    expr: &AlgExpr,
    owner: usize,
    owner_display: &str,
    graph: &mut Graph,
    functions: &FunctionCatalog,
) {
    match expr {
        AlgExpr::Literal {
            kind: LiteralKind::Variable,
            value,
            ..
        } => {
            let read = graph.node(&identity_key(value), owner_display);
            graph.edge(owner, read);
        }
        AlgExpr::Literal { .. } => {}
        AlgExpr::Unary { operand, .. } => {
            add_dependencies(operand, owner, owner_display, graph, functions);
        }
        AlgExpr::Binary { left, right, .. } => {
            add_dependencies(left, owner, owner_display, graph, functions);
            add_dependencies(right, owner, owner_display, graph, functions);
        }
        AlgExpr::Grouping { inner, .. } => {
            add_dependencies(inner, owner, owner_display, graph, functions);
        }
        AlgExpr::Call { name, args, .. } => {
            if functions.writes_first_arg(name) {
                if let Some((
                    AlgExpr::Literal {
                        kind: LiteralKind::Variable,
                        value,
                        ..
                    },
                    rest,
                )) = args.split_first()
                {
                    // The first argument is written, not read: it becomes
                    // a node of its own and the reads inside the call hang
                    // off it instead of the enclosing calculation.
                    let target = graph.node(&identity_key(value), owner_display);
                    for arg in rest {
                        add_dependencies(arg, target, owner_display, graph, functions);
                    }
                    return;
                }
            }
            for arg in args {
                add_dependencies(arg, owner, owner_display, graph, functions);
            }
        }
    }
}
