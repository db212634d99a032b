//! Field projection shared by the DTO and mapper generators

use std::collections::HashSet;

use crate::generator::TemplateHelpers;
use crate::model::EntityModel;
use crate::types::CanonicalType;

/// One member of the projected data shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedMember {
    /// Member name
    pub name: String,
    /// Member type
    pub member_type: CanonicalType,
    /// Entity field the member was derived from
    pub source_field: String,
    /// Derived from a single-valued relationship (`<field>Id`)
    pub foreign_key: bool,
}

/// Project an entity's fields onto a flat data shape
///
/// - transient fields are dropped
/// - one-to-many and many-to-many fields are dropped
/// - many-to-one and one-to-one fields become `<field>Id` of boxed long
/// - other collections keep their parameterized container type
/// - everything else keeps its canonical type
///
/// Members are unique by name; the first occurrence wins, so a subclass
/// field shadows an inherited one.
#[must_use]
pub fn project_fields(model: &EntityModel) -> Vec<ProjectedMember> {
    let mut seen = HashSet::new();

    model
        .fields
        .iter()
        .filter(|field| !field.is_transient && !field.relationship.is_to_many())
        .map(|field| {
            if field.relationship.is_reference() {
                ProjectedMember {
                    name: TemplateHelpers::foreign_key_name(&field.name),
                    member_type: CanonicalType::boxed_long(),
                    source_field: field.name.clone(),
                    foreign_key: true,
                }
            } else {
                ProjectedMember {
                    name: field.name.clone(),
                    member_type: field.canonical_type.clone(),
                    source_field: field.name.clone(),
                    foreign_key: false,
                }
            }
        })
        .filter(|member| seen.insert(member.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityField, RelationshipKind};
    use crate::types::{CollectionKind, ScalarKind, TypeResolver};

    fn model(fields: Vec<EntityField>) -> EntityModel {
        EntityModel {
            class_name: "Customer".to_string(),
            package_name: "com.shop".to_string(),
            table_name: "customer".to_string(),
            id_field: fields.iter().find(|f| f.is_id).cloned(),
            fields,
        }
    }

    fn field(name: &str, declared: &str) -> EntityField {
        let resolver = TypeResolver::new().with_local_type("Order", "com.shop");
        let mut field = EntityField::new(name, resolver.resolve(declared));
        field.declared_type = declared.to_string();
        field
    }

    #[test]
    fn test_projection_rules() {
        let mut id = field("id", "Long");
        id.is_id = true;
        let mut orders = field("orders", "List<Order>");
        orders.is_collection = true;
        orders.relationship = RelationshipKind::OneToMany;
        let mut referrer = field("referrer", "Customer");
        referrer.relationship = RelationshipKind::ManyToOne;
        let mut scratch = field("scratch", "String");
        scratch.is_transient = true;
        let mut tags = field("tags", "Set<String>");
        tags.is_collection = true;
        tags.collection_kind = Some(CollectionKind::Set);

        let members = project_fields(&model(vec![id, orders, referrer, scratch, tags]));
        let rendered: Vec<_> = members
            .iter()
            .map(|m| format!("{} {}", m.member_type, m.name))
            .collect();
        assert_eq!(rendered, vec!["Long id", "Long referrerId", "Set<String> tags"]);
        assert!(members[1].foreign_key);
        assert_eq!(members[1].source_field, "referrer");
    }

    #[test]
    fn test_identifier_only_entity() {
        let mut id = field("code", "int");
        id.is_id = true;
        let members = project_fields(&model(vec![id]));
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].member_type, CanonicalType::Primitive(ScalarKind::Int));
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let members = project_fields(&model(vec![field("name", "String"), field("name", "Integer")]));
        assert_eq!(members.len(), 1);
        assert!(members[0].member_type.is_string());

        let mut owner = field("owner", "Customer");
        owner.relationship = RelationshipKind::OneToOne;
        let members = project_fields(&model(vec![field("ownerId", "String"), owner]));
        assert_eq!(members.len(), 1);
        assert!(!members[0].foreign_key);
    }
}
