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

//! Parent/child assignment for parsed objects.
//!
//! SEPTIC expresses nesting purely through object *order* and a per-type
//! nesting *level* from the metadata table, like heading levels in an
//! outline. There are no braces.

use crate::meta::ObjectCatalog;
use crate::object::SepticObject;

/// Assigns parent/child links to a flat, file-ordered object list.
///
/// Maintains a stack of current ancestors: for each object, ancestors at a
/// level greater than or equal to the object's own level are popped, the
/// object attaches to the new stack top (or becomes a root), and is pushed.
/// Single left-to-right pass, O(n) amortized.
///
/// All previous links are cleared first, so the builder is idempotent and
/// callable after every edit.
pub fn build_hierarchy(objects: &mut [SepticObject], catalog: &ObjectCatalog) {
    for obj in objects.iter_mut() {
        obj.parent = None;
        obj.children.clear();
    }

    // (index, nesting level) of the ancestors of the current position.
    let mut stack: Vec<(usize, u32)> = Vec::new();
    for index in 0..objects.len() {
        let level = catalog.lookup(&objects[index].type_name).level;
        while stack.last().is_some_and(|&(_, top)| top >= level) {
            stack.pop();
        }
        if let Some(&(parent, _)) = stack.last() {
            objects[index].parent = Some(parent);
            objects[parent].children.push(index);
        }
        stack.push((index, level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    fn obj(type_name: &str) -> SepticObject {
        SepticObject::new(type_name, Span::new(0, 0))
    }

    #[test]
    fn test_nesting_follows_levels() {
        // System (0) > DmmyAppl (1) > Evr (2), Evr (2)
        let mut objects = vec![obj("System"), obj("DmmyAppl"), obj("Evr"), obj("Evr")];
        build_hierarchy(&mut objects, ObjectCatalog::bundled());

        assert_eq!(objects[0].parent, None);
        assert_eq!(objects[1].parent, Some(0));
        assert_eq!(objects[2].parent, Some(1));
        assert_eq!(objects[3].parent, Some(1));
        assert_eq!(objects[0].children, vec![1]);
        assert_eq!(objects[1].children, vec![2, 3]);
    }

    #[test]
    fn test_sibling_at_same_level_pops_stack() {
        let mut objects = vec![obj("System"), obj("DmmyAppl"), obj("Evr"), obj("DmmyAppl")];
        build_hierarchy(&mut objects, ObjectCatalog::bundled());

        assert_eq!(objects[3].parent, Some(0));
        assert_eq!(objects[0].children, vec![1, 3]);
    }

    #[test]
    fn test_unknown_type_gets_default_level() {
        // Unknown types default to level 2 and so nest under applications.
        let mut objects = vec![obj("DmmyAppl"), obj("FutureThing")];
        build_hierarchy(&mut objects, ObjectCatalog::bundled());
        assert_eq!(objects[1].parent, Some(0));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut objects = vec![obj("System"), obj("DmmyAppl"), obj("Evr")];
        build_hierarchy(&mut objects, ObjectCatalog::bundled());
        let first = objects.clone();
        build_hierarchy(&mut objects, ObjectCatalog::bundled());
        assert_eq!(objects, first);
    }
}
