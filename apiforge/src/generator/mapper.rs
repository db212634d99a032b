//! Mapper generator

use serde_json::json;

use super::{artifact_type, project_fields, ArtifactGenerator, Imports, TemplateRegistry};
use crate::error::Result;
use crate::model::EntityModel;
use crate::policy::{ArtifactKind, GenerationPolicy};

/// Conversion interface between the entity and its DTO
///
/// Only produced when the DTO is enabled. Foreign-key members of the DTO get
/// explicit mappings; the reverse direction ignores the reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapperGenerator;

impl ArtifactGenerator for MapperGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Mapper
    }

    fn render(&self, model: &EntityModel, policy: &GenerationPolicy) -> Result<String> {
        let package_name = self.package_name(model, policy);
        let entity_type = model.entity_type();
        let dto_type = artifact_type(ArtifactKind::Dto, model, policy);

        let foreign_keys: Vec<_> = project_fields(model)
            .into_iter()
            .filter(|member| member.foreign_key)
            .map(|member| json!({ "field": member.source_field, "member": member.name }))
            .collect();

        let mut imports = Imports::new(&package_name);
        imports
            .add("org.mapstruct.Mapper")
            .add("java.util.List")
            .add_type(&entity_type)
            .add_type(&dto_type);
        if !foreign_keys.is_empty() {
            imports.add("org.mapstruct.Mapping");
        }

        TemplateRegistry::shared().render(
            self.kind(),
            json!({
                "header": imports.header(),
                "class_name": self.class_name(model, policy),
                "entity": entity_type.to_string(),
                "dto": dto_type.to_string(),
                "foreign_keys": foreign_keys,
            }),
        )
    }
}
