//! Repository generator

use std::collections::HashSet;

use serde_json::json;

use super::{ArtifactGenerator, Imports, TemplateHelpers, TemplateRegistry};
use crate::error::Result;
use crate::model::EntityModel;
use crate::policy::{ArtifactKind, GenerationPolicy};

/// Persistence interface keyed by the entity's identifier type
///
/// With query methods enabled, every plain field other than the identifier
/// gets a derived finder: string fields match by case-insensitive substring,
/// others by equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryGenerator;

impl ArtifactGenerator for RepositoryGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Repository
    }

    fn render(&self, model: &EntityModel, policy: &GenerationPolicy) -> Result<String> {
        let package_name = self.package_name(model, policy);
        let entity_type = model.entity_type();
        let id_type = model.id_type().boxed();

        let mut imports = Imports::new(&package_name);
        imports
            .add("org.springframework.data.jpa.repository.JpaRepository")
            .add("org.springframework.stereotype.Repository")
            .add_type(&entity_type)
            .add_type(&id_type);

        let mut seen = HashSet::new();
        let mut queries = Vec::new();
        if policy.repository_query_methods {
            for field in &model.fields {
                if field.is_transient || field.is_collection || field.is_id {
                    continue;
                }
                let property = TemplateHelpers::capitalize(&field.name);
                let name = if field.canonical_type.is_string() {
                    format!("findBy{property}ContainingIgnoreCase")
                } else {
                    format!("findBy{property}")
                };
                if !seen.insert(name.clone()) {
                    continue;
                }
                imports.add_type(&field.canonical_type);
                queries.push(json!({
                    "name": name,
                    "parameter": field.name,
                    "parameter_type": field.canonical_type.to_string(),
                }));
            }
        }
        if !queries.is_empty() {
            imports.add("java.util.List");
        }

        TemplateRegistry::shared().render(
            self.kind(),
            json!({
                "header": imports.header(),
                "class_name": self.class_name(model, policy),
                "entity": entity_type.to_string(),
                "id_type": id_type.to_string(),
                "queries": queries,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::fixtures;
    use crate::model::EntityField;
    use crate::types::{CanonicalType, ScalarKind};

    #[test]
    fn test_generate_repository() {
        let model = fixtures::customer();
        let artifact = RepositoryGenerator
            .generate(&model, &GenerationPolicy::default())
            .unwrap()
            .unwrap();

        assert_eq!(artifact.qualified_name(), "com.example.shop.domain.repository.CustomerRepository");
        let source = &artifact.source;
        assert!(source.contains("import com.example.shop.domain.Customer;"));
        assert!(source.contains("import org.springframework.data.jpa.repository.JpaRepository;"));
        assert!(source.contains("import java.util.List;"));
        assert!(source.contains("@Repository\npublic interface CustomerRepository extends JpaRepository<Customer, Long> {"));
        assert!(source.contains("    List<Customer> findByEmailContainingIgnoreCase(String email);\n"));
        assert!(source.contains("    List<Customer> findByBalance(BigDecimal balance);\n"));
        assert!(source.contains("    List<Customer> findByReferrer(Customer referrer);\n"));
        assert!(!source.contains("findById"));
        assert!(!source.contains("findByOrders"));
        assert!(!source.contains("findByNicknames"));
        assert!(!source.contains("findBySessionToken"));
    }

    #[test]
    fn test_without_query_methods() {
        let model = fixtures::customer();
        let mut policy = GenerationPolicy::default();
        policy.repository_query_methods = false;
        let source = RepositoryGenerator.render(&model, &policy).unwrap();
        assert!(source.ends_with("extends JpaRepository<Customer, Long> {\n}\n"));
        assert!(!source.contains("import java.util.List;"));
    }

    #[test]
    fn test_primitive_identifier_is_boxed() {
        let mut model = fixtures::customer();
        let mut id = EntityField::new("id", CanonicalType::Primitive(ScalarKind::Long));
        id.is_id = true;
        model.id_field = Some(id);
        let source = RepositoryGenerator
            .render(&model, &GenerationPolicy::default())
            .unwrap();
        assert!(source.contains("JpaRepository<Customer, Long>"));
    }

    #[test]
    fn test_missing_identifier_defaults_to_long() {
        let mut model = fixtures::customer();
        model.id_field = None;
        let source = RepositoryGenerator
            .render(&model, &GenerationPolicy::default())
            .unwrap();
        assert!(source.contains("JpaRepository<Customer, Long>"));
    }
}
