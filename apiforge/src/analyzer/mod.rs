//! Source analysis
//!
//! Turns a described class into an [`EntityModel`]: walks the inheritance
//! chain, resolves field types, and reads the persistence vocabulary.

use crate::error::{ApiForgeError, Result};
use crate::model::{EntityField, EntityModel, RelationshipKind};
use crate::source::{ClassDescription, FieldDescription, Marker, Modifier, SourceSet};
use crate::types::{CollectionKind, TypeExpr, TypeResolver};

/// Relationship markers in precedence order; the first one present wins
const RELATIONSHIP_PRECEDENCE: [(Marker, RelationshipKind); 4] = [
    (Marker::ManyToOne, RelationshipKind::ManyToOne),
    (Marker::OneToMany, RelationshipKind::OneToMany),
    (Marker::ManyToMany, RelationshipKind::ManyToMany),
    (Marker::OneToOne, RelationshipKind::OneToOne),
];

/// Builds entity models from a [`SourceSet`]
#[derive(Debug)]
pub struct SourceAnalyzer<'a> {
    sources: &'a SourceSet,
    resolver: TypeResolver,
}

impl<'a> SourceAnalyzer<'a> {
    /// Analyzer over `sources`; described classes resolve to their own packages
    #[must_use]
    pub fn new(sources: &'a SourceSet) -> Self {
        Self {
            sources,
            resolver: TypeResolver::with_sources(sources),
        }
    }

    /// The resolver used for field types
    #[must_use]
    pub const fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// Whether the class is a concrete class carrying the entity marker
    #[must_use]
    pub fn is_eligible(class: &ClassDescription) -> bool {
        class.is_concrete_class() && class.has_marker(Marker::Entity)
    }

    /// Build the entity model for `class`
    ///
    /// # Errors
    ///
    /// Returns [`ApiForgeError::NotAnEntity`] if the class is not eligible.
    pub fn analyze(&self, class: &ClassDescription) -> Result<EntityModel> {
        if !Self::is_eligible(class) {
            return Err(ApiForgeError::NotAnEntity(class.qualified_name()));
        }

        let fields: Vec<EntityField> = self
            .sources
            .ancestry(class)
            .into_iter()
            .flat_map(|owner| owner.fields.iter())
            .filter(|field| {
                !field.has_modifier(Modifier::Static) && !field.has_modifier(Modifier::Final)
            })
            .map(|field| self.analyze_field(field))
            .collect();

        let id_field = fields.iter().find(|field| field.is_id).cloned();
        let table_name = class
            .annotation(Marker::Table)
            .and_then(|table| table.unquoted("name"))
            .unwrap_or_else(|| class.name.to_lowercase());

        tracing::debug!(
            entity = %class.qualified_name(),
            fields = fields.len(),
            id = id_field.as_ref().map(|f| f.name.as_str()),
            "Analyzed entity"
        );

        Ok(EntityModel {
            class_name: class.name.clone(),
            package_name: class.package.clone(),
            table_name,
            fields,
            id_field,
        })
    }

    fn analyze_field(&self, field: &FieldDescription) -> EntityField {
        let expr = TypeExpr::parse(&field.type_name);
        let canonical_type = self.resolver.resolve_expr(&expr);
        let collection_kind = CollectionKind::from_raw(&expr.raw);
        let element_type = collection_kind
            .and_then(|_| expr.arguments.first())
            .map(|argument| self.resolver.resolve_expr(argument));

        let persisted_name = field
            .annotation(Marker::Column)
            .and_then(|column| column.unquoted("name"))
            .unwrap_or_else(|| field.name.to_lowercase());

        let relationship = RELATIONSHIP_PRECEDENCE
            .iter()
            .find(|(marker, _)| field.has_marker(*marker))
            .map_or(RelationshipKind::None, |(_, kind)| *kind);

        EntityField {
            name: field.name.clone(),
            declared_type: field.type_name.clone(),
            is_primitive: canonical_type.is_primitive(),
            is_collection: collection_kind.is_some(),
            is_enum: self.sources.is_enum(&expr.raw),
            is_id: field.has_marker(Marker::Id),
            is_version: field.has_marker(Marker::Version),
            is_transient: field.has_marker(Marker::Transient)
                || field.has_modifier(Modifier::Transient),
            relationship,
            collection_kind,
            element_type,
            persisted_name,
            canonical_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Annotation, ClassKind};
    use crate::types::{CanonicalType, ScalarKind};

    const PKG: &str = "com.example.shop.domain";

    fn entity(name: &str) -> ClassDescription {
        ClassDescription::new(name, PKG).with_annotation(Annotation::new("jakarta.persistence.Entity"))
    }

    fn id_field() -> FieldDescription {
        FieldDescription::new("id", "Long").with_annotation(Annotation::new("jakarta.persistence.Id"))
    }

    #[test]
    fn test_eligibility() {
        assert!(SourceAnalyzer::is_eligible(&entity("Customer")));
        assert!(!SourceAnalyzer::is_eligible(&ClassDescription::new("Plain", PKG)));
        assert!(!SourceAnalyzer::is_eligible(
            &entity("Base").with_modifier(Modifier::Abstract)
        ));

        let mut interface = entity("Shape");
        interface.kind = ClassKind::Interface;
        assert!(!SourceAnalyzer::is_eligible(&interface));

        let mut enumeration = entity("Status");
        enumeration.kind = ClassKind::Enum;
        assert!(!SourceAnalyzer::is_eligible(&enumeration));
    }

    #[test]
    fn test_not_an_entity() {
        let sources = SourceSet::default();
        let analyzer = SourceAnalyzer::new(&sources);
        let err = analyzer
            .analyze(&ClassDescription::new("Plain", PKG))
            .unwrap_err();
        assert!(matches!(err, ApiForgeError::NotAnEntity(name) if name == "com.example.shop.domain.Plain"));
    }

    #[test]
    fn test_basic_model() {
        let customer = entity("Customer")
            .with_annotation(
                Annotation::new("javax.persistence.Table").with_attribute("name", "\"shop_customers\""),
            )
            .with_field(id_field())
            .with_field(
                FieldDescription::new("firstName", "String").with_annotation(
                    Annotation::new("jakarta.persistence.Column").with_attribute("name", "\"first_name\""),
                ),
            )
            .with_field(FieldDescription::new("loyaltyPoints", "int"));
        let sources = SourceSet::new(vec![customer]);
        let analyzer = SourceAnalyzer::new(&sources);

        let model = analyzer.analyze(&sources.classes[0]).unwrap();
        assert_eq!(model.class_name, "Customer");
        assert_eq!(model.package_name, PKG);
        assert_eq!(model.table_name, "shop_customers");
        assert_eq!(model.fields.len(), 3);
        assert_eq!(model.id_field.as_ref().unwrap().name, "id");

        let first_name = &model.fields[1];
        assert_eq!(first_name.persisted_name, "first_name");
        assert!(first_name.canonical_type.is_string());

        let points = &model.fields[2];
        assert_eq!(points.persisted_name, "loyaltypoints");
        assert!(points.is_primitive);
        assert_eq!(points.canonical_type, CanonicalType::Primitive(ScalarKind::Int));
    }

    #[test]
    fn test_default_table_name() {
        let sources = SourceSet::new(vec![entity("OrderLine").with_field(id_field())]);
        let model = SourceAnalyzer::new(&sources).analyze(&sources.classes[0]).unwrap();
        assert_eq!(model.table_name, "orderline");
    }

    #[test]
    fn test_static_and_final_fields_skipped() {
        let sources = SourceSet::new(vec![entity("Customer")
            .with_field(id_field())
            .with_field(FieldDescription::new("serialVersionUID", "long").with_modifier(Modifier::Static))
            .with_field(FieldDescription::new("region", "String").with_modifier(Modifier::Final))]);
        let model = SourceAnalyzer::new(&sources).analyze(&sources.classes[0]).unwrap();
        let names: Vec<_> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id"]);
    }

    #[test]
    fn test_inherited_fields_follow_own_fields() {
        let base = ClassDescription::new("BaseEntity", PKG)
            .with_modifier(Modifier::Abstract)
            .with_field(id_field())
            .with_field(FieldDescription::new("createdAt", "Instant"));
        let customer = entity("Customer")
            .extending("BaseEntity")
            .with_field(FieldDescription::new("email", "String"));
        let sources = SourceSet::new(vec![base, customer]);
        let model = SourceAnalyzer::new(&sources)
            .analyze(sources.find("Customer").unwrap())
            .unwrap();

        let names: Vec<_> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["email", "id", "createdAt"]);
        assert_eq!(model.id_field.unwrap().name, "id");
    }

    #[test]
    fn test_shadowed_fields_are_not_deduplicated() {
        let base = ClassDescription::new("Named", PKG).with_field(FieldDescription::new("name", "String"));
        let tag = entity("Tag")
            .extending("Named")
            .with_field(id_field())
            .with_field(FieldDescription::new("name", "String"));
        let sources = SourceSet::new(vec![base, tag]);
        let model = SourceAnalyzer::new(&sources)
            .analyze(sources.find("Tag").unwrap())
            .unwrap();
        assert_eq!(model.fields.iter().filter(|f| f.name == "name").count(), 2);
    }

    #[test]
    fn test_first_identifier_wins() {
        let sources = SourceSet::new(vec![entity("Pair")
            .with_field(FieldDescription::new("left", "Long").with_annotation(Annotation::new("javax.persistence.Id")))
            .with_field(FieldDescription::new("right", "Long").with_annotation(Annotation::new("javax.persistence.Id")))]);
        let model = SourceAnalyzer::new(&sources).analyze(&sources.classes[0]).unwrap();
        assert_eq!(model.id_field.unwrap().name, "left");
    }

    #[test]
    fn test_relationships_and_collections() {
        let order = entity("Order");
        let status = {
            let mut status = ClassDescription::new("Status", PKG);
            status.kind = ClassKind::Enum;
            status
        };
        let customer = entity("Customer")
            .with_field(id_field())
            .with_field(
                FieldDescription::new("orders", "List<Order>")
                    .with_annotation(Annotation::new("jakarta.persistence.OneToMany")),
            )
            .with_field(
                FieldDescription::new("referrer", "Customer")
                    .with_annotation(Annotation::new("jakarta.persistence.OneToOne"))
                    // ManyToOne outranks OneToOne
                    .with_annotation(Annotation::new("jakarta.persistence.ManyToOne")),
            )
            .with_field(FieldDescription::new("status", "Status"))
            .with_field(FieldDescription::new("nicknames", "java.util.Set<String>"))
            .with_field(FieldDescription::new("scratch", "String").with_modifier(Modifier::Transient))
            .with_field(
                FieldDescription::new("revision", "int")
                    .with_annotation(Annotation::new("jakarta.persistence.Version")),
            );
        let sources = SourceSet::new(vec![order, status, customer]);
        let model = SourceAnalyzer::new(&sources)
            .analyze(sources.find("Customer").unwrap())
            .unwrap();
        let field = |name: &str| model.fields.iter().find(|f| f.name == name).unwrap();

        let orders = field("orders");
        assert!(orders.is_collection);
        assert_eq!(orders.relationship, RelationshipKind::OneToMany);
        assert_eq!(orders.collection_kind, Some(CollectionKind::List));
        assert_eq!(
            orders.element_type,
            Some(CanonicalType::reference(PKG, "Order"))
        );

        assert_eq!(field("referrer").relationship, RelationshipKind::ManyToOne);
        assert!(field("status").is_enum);
        assert_eq!(field("nicknames").collection_kind, Some(CollectionKind::Set));
        assert!(field("scratch").is_transient);
        assert!(field("revision").is_version);
        assert!(!field("status").is_collection);
    }
}
