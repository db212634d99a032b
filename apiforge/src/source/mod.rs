//! Source description model
//!
//! The host environment describes the classes of a project as a TOML or JSON
//! document. This module owns that model and the queries the analyzer and
//! validator run against it (lookup by name, ancestry walk).
//!
//! # Example
//!
//! ```rust
//! use apiforge::source::SourceSet;
//!
//! let sources = SourceSet::from_toml_str(r#"
//! [[classes]]
//! name = "Customer"
//! package = "com.example.domain"
//! annotations = ["jakarta.persistence.Entity"]
//!
//! [[classes.fields]]
//! name = "id"
//! type = "Long"
//! annotations = ["jakarta.persistence.Id"]
//! "#).unwrap();
//!
//! let customer = sources.find("Customer").unwrap();
//! assert_eq!(customer.qualified_name(), "com.example.domain.Customer");
//! ```

mod markers;

pub use markers::{is_serializable_marker, marker_of, Marker, ROOT_CLASS};

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ApiForgeError, Result};

/// Kind of a described type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// Concrete or abstract class
    #[default]
    Class,
    /// Interface
    Interface,
    /// Enumeration
    Enum,
    /// Annotation type
    Annotation,
}

/// Declaration modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Transient,
    Volatile,
}

/// An annotation usage: qualified name plus string attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AnnotationRepr")]
pub struct Annotation {
    /// Qualified annotation name, e.g. `jakarta.persistence.Column`
    pub name: String,
    /// Attribute values as written in source
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Annotation {
    /// Annotation without attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Attribute value with surrounding or embedded double quotes removed
    #[must_use]
    pub fn unquoted(&self, key: &str) -> Option<String> {
        self.attributes
            .get(key)
            .map(|value| value.replace('"', ""))
            .filter(|value| !value.is_empty())
    }

    /// Vocabulary marker of this annotation, if it is one we recognize
    #[must_use]
    pub fn marker(&self) -> Option<Marker> {
        marker_of(&self.name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
    },
}

impl From<AnnotationRepr> for Annotation {
    fn from(repr: AnnotationRepr) -> Self {
        match repr {
            AnnotationRepr::Name(name) => Self::new(name),
            AnnotationRepr::Full { name, attributes } => Self { name, attributes },
        }
    }
}

/// A declared field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescription {
    /// Field name
    pub name: String,
    /// Declared type as written, e.g. `List<Order>`
    #[serde(rename = "type")]
    pub type_name: String,
    /// Declaration modifiers
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Annotations on the field
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl FieldDescription {
    /// Private field of the given type
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            modifiers: vec![Modifier::Private],
            annotations: Vec::new(),
        }
    }

    /// Add an annotation
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Add a modifier
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Whether the field carries a modifier
    #[must_use]
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Whether the field carries an annotation mapping to `marker`
    #[must_use]
    pub fn has_marker(&self, marker: Marker) -> bool {
        self.annotation(marker).is_some()
    }

    /// First annotation mapping to `marker`
    #[must_use]
    pub fn annotation(&self, marker: Marker) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.marker() == Some(marker))
    }
}

/// A declared constructor (only the parameter list matters here)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstructorDescription {
    /// Parameter types
    #[serde(default)]
    pub parameters: Vec<String>,
}

/// A described class, interface, enum or annotation type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescription {
    /// Simple name
    pub name: String,
    /// Package (namespace); empty for the default package
    #[serde(default)]
    pub package: String,
    /// Type kind
    #[serde(default)]
    pub kind: ClassKind,
    /// Declaration modifiers
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Annotations on the type
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Superclass, simple or qualified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    /// Implemented interfaces
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Declared constructors; empty means the implicit default constructor
    #[serde(default)]
    pub constructors: Vec<ConstructorDescription>,
    /// Declared fields in source order
    #[serde(default)]
    pub fields: Vec<FieldDescription>,
}

impl ClassDescription {
    /// Empty public class
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            kind: ClassKind::Class,
            modifiers: vec![Modifier::Public],
            annotations: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Add an annotation
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Add a field
    #[must_use]
    pub fn with_field(mut self, field: FieldDescription) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a modifier
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Set the superclass
    #[must_use]
    pub fn extending(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Add an implemented interface
    #[must_use]
    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Add a constructor with the given parameter types
    #[must_use]
    pub fn with_constructor<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constructors.push(ConstructorDescription {
            parameters: parameters.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Fully qualified name
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Whether the type carries a modifier
    #[must_use]
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// First annotation mapping to `marker`
    #[must_use]
    pub fn annotation(&self, marker: Marker) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.marker() == Some(marker))
    }

    /// Whether the type carries an annotation mapping to `marker`
    #[must_use]
    pub fn has_marker(&self, marker: Marker) -> bool {
        self.annotation(marker).is_some()
    }

    /// Concrete, non-interface, non-enum class
    #[must_use]
    pub fn is_concrete_class(&self) -> bool {
        self.kind == ClassKind::Class && !self.has_modifier(Modifier::Abstract)
    }
}

/// All classes known to one generation session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSet {
    /// Described classes
    #[serde(default)]
    pub classes: Vec<ClassDescription>,
}

impl SourceSet {
    /// Build from already-described classes
    #[must_use]
    pub const fn new(classes: Vec<ClassDescription>) -> Self {
        Self { classes }
    }

    /// Parse a TOML source description
    ///
    /// # Errors
    ///
    /// Returns [`ApiForgeError::SourceParse`] if the document is malformed.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| ApiForgeError::SourceParse(e.to_string()))
    }

    /// Parse a JSON source description
    ///
    /// # Errors
    ///
    /// Returns [`ApiForgeError::SourceParse`] if the document is malformed.
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| ApiForgeError::SourceParse(e.to_string()))
    }

    /// Load a source description, choosing the format from the file extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension, or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(ApiForgeError::SourceParse(format!(
                "unsupported source description format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Find a class by qualified name, then by simple name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ClassDescription> {
        self.classes
            .iter()
            .find(|class| class.qualified_name() == name)
            .or_else(|| self.classes.iter().find(|class| class.name == name))
    }

    /// Like [`find`](Self::find) but fails with [`ApiForgeError::UnknownClass`]
    ///
    /// # Errors
    ///
    /// Returns an error if no class matches `name`.
    pub fn require(&self, name: &str) -> Result<&ClassDescription> {
        self.find(name)
            .ok_or_else(|| ApiForgeError::UnknownClass(name.to_string()))
    }

    /// The class followed by each resolvable ancestor
    ///
    /// The walk stops at the root object class, at a superclass that is not
    /// described, or when a class would be visited twice.
    #[must_use]
    pub fn ancestry<'a>(&'a self, class: &'a ClassDescription) -> Vec<&'a ClassDescription> {
        let mut chain = vec![class];
        let mut seen = HashSet::from([class.qualified_name()]);
        let mut current = class;

        while let Some(parent_name) = current.superclass.as_deref() {
            if parent_name == ROOT_CLASS || parent_name == "Object" {
                break;
            }
            let Some(parent) = self.find(parent_name) else {
                tracing::debug!(class = %current.name, superclass = parent_name, "Superclass not described, stopping ancestry walk");
                break;
            };
            if !seen.insert(parent.qualified_name()) {
                tracing::warn!(class = %class.name, "Cyclic inheritance in source description");
                break;
            }
            chain.push(parent);
            current = parent;
        }

        chain
    }

    /// Classes carrying an entity marker
    pub fn entity_candidates(&self) -> impl Iterator<Item = &ClassDescription> {
        self.classes
            .iter()
            .filter(|class| class.has_marker(Marker::Entity))
    }

    /// Whether `name` denotes a described enum
    #[must_use]
    pub fn is_enum(&self, name: &str) -> bool {
        self.find(name)
            .is_some_and(|class| class.kind == ClassKind::Enum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP: &str = r#"
[[classes]]
name = "BaseEntity"
package = "com.example.shop.domain"
modifiers = ["public", "abstract"]

[[classes.fields]]
name = "id"
type = "Long"
modifiers = ["private"]
annotations = ["jakarta.persistence.Id"]

[[classes]]
name = "Customer"
package = "com.example.shop.domain"
superclass = "BaseEntity"
annotations = [
  "jakarta.persistence.Entity",
  { name = "jakarta.persistence.Table", attributes = { name = "customers" } },
]

[[classes.fields]]
name = "firstName"
type = "String"

[[classes]]
name = "Status"
package = "com.example.shop.domain"
kind = "enum"
"#;

    #[test]
    fn test_parse_toml() {
        let sources = SourceSet::from_toml_str(SHOP).unwrap();
        assert_eq!(sources.classes.len(), 3);

        let customer = sources.find("Customer").unwrap();
        assert_eq!(customer.kind, ClassKind::Class);
        assert!(customer.has_marker(Marker::Entity));
        let table = customer.annotation(Marker::Table).unwrap();
        assert_eq!(table.unquoted("name").as_deref(), Some("customers"));
        assert_eq!(customer.fields[0].modifiers, Vec::<Modifier>::new());
    }

    #[test]
    fn test_parse_json() {
        let sources = SourceSet::from_json_str(
            r#"{"classes":[{"name":"Tag","package":"a.b","fields":[{"name":"label","type":"String"}]}]}"#,
        )
        .unwrap();
        assert_eq!(sources.require("a.b.Tag").unwrap().fields[0].type_name, "String");
    }

    #[test]
    fn test_parse_error() {
        let err = SourceSet::from_toml_str("[[classes]]\npackage = 1").unwrap_err();
        assert!(matches!(err, ApiForgeError::SourceParse(_)));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("model.toml");
        fs::write(&toml_path, SHOP).unwrap();
        assert_eq!(SourceSet::load(&toml_path).unwrap().classes.len(), 3);

        let yaml_path = dir.path().join("model.yaml");
        fs::write(&yaml_path, "classes: []").unwrap();
        assert!(matches!(
            SourceSet::load(&yaml_path),
            Err(ApiForgeError::SourceParse(_))
        ));
    }

    #[test]
    fn test_find_prefers_qualified_name() {
        let sources = SourceSet::new(vec![
            ClassDescription::new("Order", "a"),
            ClassDescription::new("Order", "b"),
        ]);
        assert_eq!(sources.find("b.Order").unwrap().package, "b");
        assert_eq!(sources.find("Order").unwrap().package, "a");
        assert!(matches!(
            sources.require("c.Order"),
            Err(ApiForgeError::UnknownClass(_))
        ));
    }

    #[test]
    fn test_ancestry_stops_at_root_and_unknown() {
        let sources = SourceSet::from_toml_str(SHOP).unwrap();
        let customer = sources.find("Customer").unwrap();
        let names: Vec<_> = sources
            .ancestry(customer)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Customer", "BaseEntity"]);

        let orphan = ClassDescription::new("Orphan", "x").extending("lib.Missing");
        let sources = SourceSet::new(vec![orphan.clone()]);
        assert_eq!(sources.ancestry(&orphan).len(), 1);

        let rooted = ClassDescription::new("Rooted", "x").extending(ROOT_CLASS);
        assert_eq!(SourceSet::default().ancestry(&rooted).len(), 1);
    }

    #[test]
    fn test_ancestry_survives_cycles() {
        let a = ClassDescription::new("A", "x").extending("B");
        let b = ClassDescription::new("B", "x").extending("A");
        let sources = SourceSet::new(vec![a, b]);
        let start = sources.find("A").unwrap();
        assert_eq!(sources.ancestry(start).len(), 2);
    }

    #[test]
    fn test_entity_candidates_and_enums() {
        let sources = SourceSet::from_toml_str(SHOP).unwrap();
        let names: Vec<_> = sources.entity_candidates().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Customer".to_string()]);
        assert!(sources.is_enum("Status"));
        assert!(!sources.is_enum("Customer"));
    }
}
