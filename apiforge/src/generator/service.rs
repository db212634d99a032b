//! Service generator

use serde_json::json;

use super::{artifact_type, ArtifactGenerator, Imports, TemplateRegistry};
use crate::error::Result;
use crate::model::EntityModel;
use crate::policy::{ArtifactKind, GenerationPolicy};

/// Service holding the repository and delegating list, find, save and delete
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceGenerator;

impl ArtifactGenerator for ServiceGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Service
    }

    fn render(&self, model: &EntityModel, policy: &GenerationPolicy) -> Result<String> {
        let package_name = self.package_name(model, policy);
        let entity_type = model.entity_type();
        let id_type = model.id_type();
        let repository_type = artifact_type(ArtifactKind::Repository, model, policy);

        let mut imports = Imports::new(&package_name);
        imports
            .add("org.springframework.stereotype.Service")
            .add("java.util.List")
            .add("java.util.Optional")
            .add_type(&entity_type)
            .add_type(&id_type)
            .add_type(&repository_type);

        TemplateRegistry::shared().render(
            self.kind(),
            json!({
                "header": imports.header(),
                "class_name": self.class_name(model, policy),
                "entity": entity_type.to_string(),
                "id_type": id_type.to_string(),
                "repository": repository_type.to_string(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::fixtures;

    #[test]
    fn test_generate_service() {
        let model = fixtures::customer();
        let artifact = ServiceGenerator
            .generate(&model, &GenerationPolicy::default())
            .unwrap()
            .unwrap();
        assert_eq!(artifact.package_name, "com.example.shop.domain.service");

        let source = &artifact.source;
        assert!(source.contains("import com.example.shop.domain.repository.CustomerRepository;"));
        assert!(source.contains("import java.util.Optional;"));
        assert!(source.contains("@Service\npublic class CustomerService {"));
        assert!(source.contains("    private final CustomerRepository repository;"));
        assert!(source.contains("    public CustomerService(CustomerRepository repository) {"));
        assert!(source.contains("    public List<Customer> findAll() {\n        return repository.findAll();\n    }"));
        assert!(source.contains("    public Optional<Customer> findById(Long id) {"));
        assert!(source.contains("    public Customer save(Customer entity) {\n        return repository.save(entity);"));
        assert!(source.contains("    public void deleteById(Long id) {\n        repository.deleteById(id);"));
    }

    #[test]
    fn test_custom_repository_naming() {
        let model = fixtures::customer();
        let mut policy = GenerationPolicy::default().with_base_package("com.example.api");
        policy.repository.class_name_suffix = "Store".to_string();
        policy.repository.sub_package = "persistence".to_string();
        let source = ServiceGenerator.render(&model, &policy).unwrap();
        assert!(source.starts_with("package com.example.api.service;"));
        assert!(source.contains("import com.example.api.persistence.CustomerStore;"));
        assert!(source.contains("private final CustomerStore repository;"));
    }
}
