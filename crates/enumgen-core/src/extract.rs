//! Descriptor extraction.
//!
//! The generator never looks at declarations itself. It asks a
//! [`DescriptorSource`] for the constants of one type, with labels already
//! computed. [`ManifestSource`] is the shipped source: a YAML or JSON
//! document listing each type's representation and constants.

use crate::errors::{GenerateError, Result};
use crate::value::{Enumerant, EnumerantSet, Repr, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Supplies the constants declared for a named type.
pub trait DescriptorSource: Send + Sync {
    fn descriptors(&self, type_name: &str) -> Result<EnumerantSet>;
}

/// Computes the label a constant stringifies to.
pub trait Stringify: Send + Sync {
    fn label(&self, original_name: &str, value: Value) -> String;
}

/// Default stringification: the constant's name, minus an optional prefix.
///
/// A name that equals the prefix keeps its full text rather than becoming
/// an empty label.
#[derive(Debug, Clone, Default)]
pub struct TrimPrefix {
    prefix: Option<String>,
}

impl TrimPrefix {
    pub fn new(prefix: Option<String>) -> Self {
        Self {
            prefix: prefix.filter(|p| !p.is_empty()),
        }
    }
}

impl Stringify for TrimPrefix {
    fn label(&self, original_name: &str, _value: Value) -> String {
        match &self.prefix {
            Some(prefix) => match original_name.strip_prefix(prefix.as_str()) {
                Some(rest) if !rest.is_empty() => rest.to_string(),
                _ => original_name.to_string(),
            },
            None => original_name.to_string(),
        }
    }
}

/// A literal value in the manifest. Negative literals parse as `Signed`,
/// literals above `i64::MAX` as `Unsigned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Signed(i64),
    Unsigned(u64),
}

impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Signed(v) => Value::from(v),
            RawValue::Unsigned(v) => Value::from(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerantDecl {
    pub name: String,
    pub value: RawValue,
    /// Overrides the stringified name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub repr: Repr,
    #[serde(default)]
    pub enumerants: Vec<EnumerantDecl>,
}

/// Declaration manifest
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl Manifest {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| GenerateError::Manifest(e.to_string()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| GenerateError::Manifest(e.to_string()))
    }

    /// Load a manifest; `.json` files are JSON, anything else YAML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }
}

/// [`DescriptorSource`] backed by a [`Manifest`].
pub struct ManifestSource {
    types: IndexMap<String, TypeDecl>,
    stringify: Box<dyn Stringify>,
}

impl ManifestSource {
    /// Index the manifest by type name. A type declared twice is an error.
    pub fn new(manifest: Manifest) -> Result<Self> {
        let mut types = IndexMap::with_capacity(manifest.types.len());
        for decl in manifest.types {
            if types.contains_key(&decl.name) {
                return Err(GenerateError::Manifest(format!(
                    "type {} is declared more than once",
                    decl.name
                )));
            }
            types.insert(decl.name.clone(), decl);
        }
        Ok(Self {
            types,
            stringify: Box::new(TrimPrefix::default()),
        })
    }

    pub fn with_stringify(mut self, stringify: impl Stringify + 'static) -> Self {
        self.stringify = Box::new(stringify);
        self
    }

    /// Declared type names, in manifest order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl DescriptorSource for ManifestSource {
    fn descriptors(&self, type_name: &str) -> Result<EnumerantSet> {
        let decl = self
            .types
            .get(type_name)
            .ok_or_else(|| GenerateError::UnknownType {
                type_name: type_name.to_string(),
            })?;

        let signed = decl.repr.is_signed();
        let enumerants = decl
            .enumerants
            .iter()
            .map(|e| {
                let value = Value::from(e.value);
                let label = match &e.label {
                    Some(label) => label.clone(),
                    None => self.stringify.label(&e.name, value),
                };
                Enumerant::new(e.name.clone(), value, signed, label)
            })
            .collect();

        debug!(
            type_name,
            count = decl.enumerants.len(),
            repr = %decl.repr,
            "extracted descriptors"
        );
        EnumerantSet::new(type_name, decl.repr, enumerants)
    }
}
