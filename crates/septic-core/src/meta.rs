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

//! Static object-type and calculation-function metadata.
//!
//! Both tables are driven by human-maintained YAML files embedded in the
//! crate and loaded once per process; they are immutable after load. A
//! lookup miss never fails: unknown object types degrade to a documented
//! default (nesting level 2, no reference rules) so future types keep
//! analyzing gracefully.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Nesting level used for object types the catalog does not know.
pub const DEFAULT_NESTING_LEVEL: u32 = 2;

/// Error raised when a catalog data file cannot be deserialized.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The YAML source is malformed or does not match the schema.
    #[error("malformed catalog data: {0}")]
    Malformed(#[from] serde_yaml::Error),
}

/// Coarse symbol classification of an object type, consumed by outline and
/// symbol features outside this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolCategory {
    /// Grouping object (`System`, applications, calc modules).
    Namespace,
    /// Plain object with no symbol semantics.
    #[default]
    Object,
    /// Declared process variable (the Xvr family).
    Variable,
    /// Calculation producing a value (`CalcPvr`).
    Function,
}

/// Which parts of an object carry references to variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceRules {
    /// The object's own declared identifier is a variable reference.
    #[serde(default)]
    pub identifier_is_reference: bool,
    /// Attributes whose first value is a reference.
    #[serde(default)]
    pub single_reference_attributes: Vec<String>,
    /// Attributes whose value list is a count prefix followed by
    /// references (only the second and later values are references).
    #[serde(default)]
    pub list_reference_attributes: Vec<String>,
    /// Attributes holding a calculation expression.
    #[serde(default)]
    pub calc_attributes: Vec<String>,
}

/// Metadata for one object type.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectTypeMeta {
    /// The type keyword as it appears in source.
    pub name: String,
    /// Outline nesting level.
    #[serde(default = "default_level")]
    pub level: u32,
    /// Symbol classification.
    #[serde(default)]
    pub category: SymbolCategory,
    /// Reference extraction rules.
    #[serde(default)]
    pub refs: ReferenceRules,
}

fn default_level() -> u32 {
    DEFAULT_NESTING_LEVEL
}

#[derive(Debug, Deserialize)]
struct ObjectCatalogFile {
    types: Vec<ObjectTypeMeta>,
}

/// The object-type metadata table.
///
/// # Examples
///
/// ```
/// use septic_core::ObjectCatalog;
///
/// let catalog = ObjectCatalog::bundled();
/// assert_eq!(catalog.lookup("Evr").level, 2);
/// assert!(catalog.lookup("Evr").refs.identifier_is_reference);
/// // Unknown types degrade to the default.
/// assert_eq!(catalog.lookup("FutureThing").level, 2);
/// ```
#[derive(Debug, Clone)]
pub struct ObjectCatalog {
    types: HashMap<String, ObjectTypeMeta>,
    fallback: ObjectTypeMeta,
}

impl ObjectCatalog {
    /// Deserializes a catalog from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let file: ObjectCatalogFile = serde_yaml::from_str(source)?;
        let types = file
            .types
            .into_iter()
            .map(|meta| (meta.name.clone(), meta))
            .collect();
        Ok(Self {
            types,
            fallback: ObjectTypeMeta {
                name: String::new(),
                level: DEFAULT_NESTING_LEVEL,
                category: SymbolCategory::default(),
                refs: ReferenceRules::default(),
            },
        })
    }

    /// The catalog bundled with the crate, loaded once per process.
    pub fn bundled() -> &'static ObjectCatalog {
        static CATALOG: OnceLock<ObjectCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            ObjectCatalog::from_yaml(include_str!("../data/objects.yaml"))
                .expect("bundled object catalog is valid")
        })
    }

    /// Looks up a type, falling back to the default metadata on a miss.
    pub fn lookup(&self, type_name: &str) -> &ObjectTypeMeta {
        self.types.get(type_name).unwrap_or(&self.fallback)
    }

    /// Looks up a type without the fallback.
    pub fn get(&self, type_name: &str) -> Option<&ObjectTypeMeta> {
        self.types.get(type_name)
    }

    /// Iterates over all known types.
    pub fn types(&self) -> impl Iterator<Item = &ObjectTypeMeta> {
        self.types.values()
    }
}

/// One function of the calculation sub-language.
#[derive(Debug, Clone, Deserialize)]
pub struct CalcFunction {
    /// Function name as written in calculations.
    pub name: String,
    /// Display signature.
    #[serde(default)]
    pub signature: String,
    /// One-line documentation.
    #[serde(default)]
    pub doc: String,
    /// The first argument is the variable being written, not read.
    #[serde(default)]
    pub writes_first_arg: bool,
}

#[derive(Debug, Deserialize)]
struct FunctionCatalogFile {
    functions: Vec<CalcFunction>,
}

/// The calculation function catalog.
#[derive(Debug, Clone)]
pub struct FunctionCatalog {
    functions: HashMap<String, CalcFunction>,
}

impl FunctionCatalog {
    /// Deserializes a catalog from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let file: FunctionCatalogFile = serde_yaml::from_str(source)?;
        let functions = file
            .functions
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect();
        Ok(Self { functions })
    }

    /// The catalog bundled with the crate, loaded once per process.
    pub fn bundled() -> &'static FunctionCatalog {
        static CATALOG: OnceLock<FunctionCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            FunctionCatalog::from_yaml(include_str!("../data/functions.yaml"))
                .expect("bundled function catalog is valid")
        })
    }

    /// Looks up a function by name.
    pub fn get(&self, name: &str) -> Option<&CalcFunction> {
        self.functions.get(name)
    }

    /// Returns `true` when `name` is a write function: its first argument
    /// is the variable being written rather than read.
    pub fn writes_first_arg(&self, name: &str) -> bool {
        self.functions
            .get(name)
            .is_some_and(|f| f.writes_first_arg)
    }

    /// Iterates over all known functions.
    pub fn functions(&self) -> impl Iterator<Item = &CalcFunction> {
        self.functions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_object_catalog_loads() {
        let catalog = ObjectCatalog::bundled();
        assert!(catalog.get("System").is_some());
        assert!(catalog.get("CalcPvr").is_some());
    }

    #[test]
    fn test_lookup_miss_returns_default() {
        let catalog = ObjectCatalog::bundled();
        let meta = catalog.lookup("NoSuchType");
        assert_eq!(meta.level, DEFAULT_NESTING_LEVEL);
        assert!(!meta.refs.identifier_is_reference);
        assert!(meta.refs.list_reference_attributes.is_empty());
    }

    #[test]
    fn test_xvr_family_declares_variables() {
        let catalog = ObjectCatalog::bundled();
        for name in ["Evr", "Mvr", "Cvr", "Tvr", "Dvr", "SopcEvr", "CalcPvr"] {
            assert!(
                catalog.lookup(name).refs.identifier_is_reference,
                "{} should declare a variable",
                name
            );
        }
    }

    #[test]
    fn test_calc_pvr_has_alg_attribute() {
        let meta = ObjectCatalog::bundled().lookup("CalcPvr");
        assert_eq!(meta.refs.calc_attributes, vec!["Alg".to_string()]);
    }

    #[test]
    fn test_write_functions() {
        let catalog = FunctionCatalog::bundled();
        assert!(catalog.writes_first_arg("setmeas"));
        assert!(catalog.writes_first_arg("setmode"));
        assert!(!catalog.writes_first_arg("abs"));
        assert!(!catalog.writes_first_arg("nosuchfn"));
    }

    #[test]
    fn test_from_yaml_rejects_malformed_input() {
        assert!(ObjectCatalog::from_yaml("types: 3").is_err());
        assert!(FunctionCatalog::from_yaml("[").is_err());
    }
}
