//! Controller generator

use serde_json::json;

use super::{artifact_type, ArtifactGenerator, Imports, TemplateHelpers, TemplateRegistry};
use crate::error::Result;
use crate::model::EntityModel;
use crate::policy::{ArtifactKind, GenerationPolicy};

const WEB_IMPORTS: [&str; 10] = [
    "org.springframework.http.HttpStatus",
    "org.springframework.http.ResponseEntity",
    "org.springframework.web.bind.annotation.DeleteMapping",
    "org.springframework.web.bind.annotation.GetMapping",
    "org.springframework.web.bind.annotation.PathVariable",
    "org.springframework.web.bind.annotation.PostMapping",
    "org.springframework.web.bind.annotation.PutMapping",
    "org.springframework.web.bind.annotation.RequestBody",
    "org.springframework.web.bind.annotation.RequestMapping",
    "org.springframework.web.bind.annotation.RestController",
];

/// How request/response bodies relate to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    /// Bodies are the entity itself
    Identity,
    /// Bodies are DTOs converted by the generated mapper
    Mapper,
    /// Bodies are DTOs converted by private stubs
    Stubs,
}

impl Conversion {
    const fn for_policy(policy: &GenerationPolicy) -> Self {
        if !policy.dto.enabled {
            Self::Identity
        } else if policy.produces(ArtifactKind::Mapper) {
            Self::Mapper
        } else {
            Self::Stubs
        }
    }

    fn to_body(self, expr: &str) -> String {
        match self {
            Self::Identity => expr.to_string(),
            Self::Mapper => format!("mapper.toDto({expr})"),
            Self::Stubs => format!("toDto({expr})"),
        }
    }

    fn to_entity(self, expr: &str) -> String {
        match self {
            Self::Identity => expr.to_string(),
            Self::Mapper => format!("mapper.toEntity({expr})"),
            Self::Stubs => format!("toEntity({expr})"),
        }
    }

    fn list(self) -> String {
        match self {
            Self::Identity => "service.findAll()".to_string(),
            Self::Mapper => "mapper.toDtoList(service.findAll())".to_string(),
            Self::Stubs => {
                "service.findAll().stream().map(this::toDto).collect(Collectors.toList())".to_string()
            }
        }
    }

    fn found(self) -> String {
        match self {
            Self::Identity => "ResponseEntity::ok".to_string(),
            other => format!("entity -> ResponseEntity.ok({})", other.to_body("entity")),
        }
    }
}

/// REST controller over the service
///
/// Bodies are typed as the DTO when it is enabled and as the entity
/// otherwise. The base path is the lower-cased plural of the entity name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerGenerator;

impl ArtifactGenerator for ControllerGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Controller
    }

    fn render(&self, model: &EntityModel, policy: &GenerationPolicy) -> Result<String> {
        let package_name = self.package_name(model, policy);
        let conversion = Conversion::for_policy(policy);
        let entity_type = model.entity_type();
        let id_type = model.id_type();
        let service_type = artifact_type(ArtifactKind::Service, model, policy);
        let body_type = if conversion == Conversion::Identity {
            entity_type.clone()
        } else {
            artifact_type(ArtifactKind::Dto, model, policy)
        };
        let mapper_type = (conversion == Conversion::Mapper)
            .then(|| artifact_type(ArtifactKind::Mapper, model, policy));

        let mut imports = Imports::new(&package_name);
        for import in WEB_IMPORTS {
            imports.add(import);
        }
        imports
            .add("java.util.List")
            .add_type(&entity_type)
            .add_type(&id_type)
            .add_type(&service_type)
            .add_type(&body_type);
        if let Some(mapper_type) = &mapper_type {
            imports.add_type(mapper_type);
        }
        if conversion == Conversion::Stubs {
            imports.add("java.util.stream.Collectors");
        }

        let body_param = if conversion == Conversion::Identity {
            "entity"
        } else {
            "dto"
        };

        TemplateRegistry::shared().render(
            self.kind(),
            json!({
                "header": imports.header(),
                "class_name": self.class_name(model, policy),
                "base_path": TemplateHelpers::to_route_path(&model.class_name),
                "entity": entity_type.to_string(),
                "id_type": id_type.to_string(),
                "id_property": TemplateHelpers::capitalize(model.id_name()),
                "service": service_type.to_string(),
                "mapper": mapper_type.map(|ty| ty.to_string()),
                "body": body_type.to_string(),
                "body_param": body_param,
                "list_expr": conversion.list(),
                "found_expr": conversion.found(),
                "incoming_expr": conversion.to_entity(body_param),
                "saved_expr": conversion.to_body("saved"),
                "conversion_stubs": conversion == Conversion::Stubs,
            }),
        )
    }
}
