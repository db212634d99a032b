//! DTO generator

use serde_json::json;

use super::{project_fields, ArtifactGenerator, Imports, TemplateHelpers, TemplateRegistry};
use crate::error::Result;
use crate::model::EntityModel;
use crate::policy::{ArtifactKind, GenerationPolicy};

const ACCESSOR_ANNOTATIONS: [&str; 4] = [
    "lombok.AllArgsConstructor",
    "lombok.Builder",
    "lombok.Data",
    "lombok.NoArgsConstructor",
];

/// Flat data shape of an entity
#[derive(Debug, Clone, Copy, Default)]
pub struct DtoGenerator;

impl ArtifactGenerator for DtoGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Dto
    }

    fn render(&self, model: &EntityModel, policy: &GenerationPolicy) -> Result<String> {
        let package_name = self.package_name(model, policy);
        let members = project_fields(model);

        let mut imports = Imports::new(&package_name);
        if policy.use_accessor_annotation_style {
            for annotation in ACCESSOR_ANNOTATIONS {
                imports.add(annotation);
            }
        }
        for member in &members {
            imports.add_type(&member.member_type);
        }

        let members: Vec<_> = members
            .iter()
            .map(|member| {
                json!({
                    "name": member.name,
                    "type": member.member_type.to_string(),
                    "property": TemplateHelpers::capitalize(&member.name),
                })
            })
            .collect();

        TemplateRegistry::shared().render(
            self.kind(),
            json!({
                "header": imports.header(),
                "class_name": self.class_name(model, policy),
                "accessor_annotations": policy.use_accessor_annotation_style,
                "members": members,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::fixtures;

    #[test]
    fn test_generate_with_accessor_annotations() {
        let model = fixtures::customer();
        let artifact = DtoGenerator
            .generate(&model, &GenerationPolicy::default())
            .unwrap()
            .unwrap();

        assert_eq!(artifact.package_name, "com.example.shop.domain.dto");
        assert_eq!(artifact.class_name, "CustomerDto");
        let source = &artifact.source;
        assert!(source.starts_with("package com.example.shop.domain.dto;\n\n"));
        assert!(source.contains("import java.math.BigDecimal;"));
        assert!(source.contains("import java.util.Set;"));
        assert!(source.contains("import lombok.Data;"));
        assert!(source.contains("@Data\n@NoArgsConstructor\n@AllArgsConstructor\n@Builder\npublic class CustomerDto {"));
        assert!(source.contains("    private Long id;\n"));
        assert!(source.contains("    private String email;\n"));
        assert!(source.contains("    private BigDecimal balance;\n"));
        assert!(source.contains("    private Long referrerId;\n"));
        assert!(source.contains("    private Set<String> nicknames;\n"));
        assert!(!source.contains("orders"));
        assert!(!source.contains("sessionToken"));
        assert!(!source.contains("getEmail"));
        assert!(!source.contains("import java.util.List;"));
    }

    #[test]
    fn test_generate_with_written_accessors() {
        let model = fixtures::customer();
        let policy = GenerationPolicy::default().with_accessor_annotation_style(false);
        let source = DtoGenerator.render(&model, &policy).unwrap();

        assert!(!source.contains("lombok"));
        assert!(!source.contains("@Data"));
        assert!(source.contains("public class CustomerDto {\n    private Long id;"));
        assert!(source.contains(
            "    public String getEmail() {\n        return email;\n    }\n"
        ));
        assert!(source.contains(
            "    public void setReferrerId(Long referrerId) {\n        this.referrerId = referrerId;\n    }\n"
        ));
        assert!(source.ends_with("    }\n}\n"));
    }

    #[test]
    fn test_base_package_override() {
        let model = fixtures::customer();
        let policy = GenerationPolicy::default().with_base_package("com.example.api.");
        let artifact = DtoGenerator.generate(&model, &policy).unwrap().unwrap();
        assert_eq!(artifact.package_name, "com.example.api.dto");
    }
}
