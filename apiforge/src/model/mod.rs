//! Entity model
//!
//! The normalized description of one persistent class that every generator
//! consumes. Built by the [`analyzer`](crate::analyzer); immutable afterwards.

use crate::types::{CanonicalType, CollectionKind};

/// Relationship kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelationshipKind {
    /// Plain column
    #[default]
    None,
    /// Many-to-one reference
    ManyToOne,
    /// One-to-one reference
    OneToOne,
    /// One-to-many association
    OneToMany,
    /// Many-to-many association
    ManyToMany,
}

impl RelationshipKind {
    /// Single-valued reference to another entity
    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::ManyToOne | Self::OneToOne)
    }

    /// Multi-valued association
    #[must_use]
    pub const fn is_to_many(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }
}

/// One persisted (or transient) field of an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityField {
    /// Field name
    pub name: String,
    /// Declared type as written
    pub declared_type: String,
    /// Canonical descriptor of the declared type
    pub canonical_type: CanonicalType,
    /// Column name: explicit mapping, else the lower-cased field name
    pub persisted_name: String,
    /// Declared with a primitive type
    pub is_primitive: bool,
    /// Declared with a recognized collection type
    pub is_collection: bool,
    /// Declared with a described enum type
    pub is_enum: bool,
    /// Identifier marker present
    pub is_id: bool,
    /// Version marker present
    pub is_version: bool,
    /// Transient marker or modifier present
    pub is_transient: bool,
    /// Relationship kind
    pub relationship: RelationshipKind,
    /// Container kind when `is_collection`
    pub collection_kind: Option<CollectionKind>,
    /// First type argument when `is_collection` and generic
    pub element_type: Option<CanonicalType>,
}

impl EntityField {
    /// Field with the given name and canonical type; every flag cleared
    pub fn new(name: impl Into<String>, canonical_type: CanonicalType) -> Self {
        let name = name.into();
        Self {
            declared_type: canonical_type.to_string(),
            persisted_name: name.to_lowercase(),
            is_primitive: canonical_type.is_primitive(),
            canonical_type,
            name,
            is_collection: false,
            is_enum: false,
            is_id: false,
            is_version: false,
            is_transient: false,
            relationship: RelationshipKind::None,
            collection_kind: None,
            element_type: None,
        }
    }
}

/// Normalized description of one persistent class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityModel {
    /// Simple class name
    pub class_name: String,
    /// Package of the entity
    pub package_name: String,
    /// Table name: explicit mapping, else the lower-cased class name
    pub table_name: String,
    /// Fields: own fields first, then each ancestor's
    pub fields: Vec<EntityField>,
    /// First field carrying the identifier marker
    pub id_field: Option<EntityField>,
}

impl EntityModel {
    /// Qualified class name
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.package_name.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package_name, self.class_name)
        }
    }

    /// The entity itself as a type reference
    #[must_use]
    pub fn entity_type(&self) -> CanonicalType {
        CanonicalType::reference(&self.package_name, &self.class_name)
    }

    /// Identifier type, defaulting to a boxed long when no identifier exists
    #[must_use]
    pub fn id_type(&self) -> CanonicalType {
        self.id_field
            .as_ref()
            .map_or_else(CanonicalType::boxed_long, |field| field.canonical_type.clone())
    }

    /// Identifier field name, defaulting to `id`
    #[must_use]
    pub fn id_name(&self) -> &str {
        self.id_field.as_ref().map_or("id", |field| field.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarKind;

    fn model(id_field: Option<EntityField>) -> EntityModel {
        EntityModel {
            class_name: "Customer".to_string(),
            package_name: "com.example".to_string(),
            table_name: "customer".to_string(),
            fields: Vec::new(),
            id_field,
        }
    }

    #[test]
    fn test_id_defaults() {
        let model = model(None);
        assert_eq!(model.id_type(), CanonicalType::boxed_long());
        assert_eq!(model.id_name(), "id");
    }

    #[test]
    fn test_id_from_field() {
        let mut id = EntityField::new("code", CanonicalType::Primitive(ScalarKind::Int));
        id.is_id = true;
        let model = model(Some(id));
        assert_eq!(model.id_type(), CanonicalType::Primitive(ScalarKind::Int));
        assert_eq!(model.id_name(), "code");
        assert_eq!(model.qualified_name(), "com.example.Customer");
    }

    #[test]
    fn test_relationship_groups() {
        assert!(RelationshipKind::ManyToOne.is_reference());
        assert!(RelationshipKind::OneToOne.is_reference());
        assert!(RelationshipKind::OneToMany.is_to_many());
        assert!(!RelationshipKind::None.is_reference());
        assert!(!RelationshipKind::None.is_to_many());
    }
}
