//! Embedded source templates
//!
//! One template per artifact kind. Rendering contexts are computed per call,
//! so the registry itself is read-only and shared.

use minijinja::{AutoEscape, Environment};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::Result;
use crate::policy::ArtifactKind;

/// DTO with either accessor annotations or written accessors
pub const DTO_TEMPLATE: &str = r"{{ header }}{% if accessor_annotations %}
@Data
@NoArgsConstructor
@AllArgsConstructor
@Builder
{% endif %}
public class {{ class_name }} {
{% for member in members %}
    private {{ member.type }} {{ member.name }};
{% endfor %}
{% if not accessor_annotations %}
{% for member in members %}

    public {{ member.type }} get{{ member.property }}() {
        return {{ member.name }};
    }

    public void set{{ member.property }}({{ member.type }} {{ member.name }}) {
        this.{{ member.name }} = {{ member.name }};
    }
{% endfor %}
{% endif %}
}
";

/// Repository interface with derived finders
pub const REPOSITORY_TEMPLATE: &str = r"{{ header }}@Repository
public interface {{ class_name }} extends JpaRepository<{{ entity }}, {{ id_type }}> {
{% for query in queries %}

    List<{{ entity }}> {{ query.name }}({{ query.parameter_type }} {{ query.parameter }});
{% endfor %}
}
";

/// Service delegating to the repository
pub const SERVICE_TEMPLATE: &str = r"{{ header }}@Service
public class {{ class_name }} {

    private final {{ repository }} repository;

    public {{ class_name }}({{ repository }} repository) {
        this.repository = repository;
    }

    public List<{{ entity }}> findAll() {
        return repository.findAll();
    }

    public Optional<{{ entity }}> findById({{ id_type }} id) {
        return repository.findById(id);
    }

    public {{ entity }} save({{ entity }} entity) {
        return repository.save(entity);
    }

    public void deleteById({{ id_type }} id) {
        repository.deleteById(id);
    }
}
";

/// REST controller delegating to the service
pub const CONTROLLER_TEMPLATE: &str = r#"{{ header }}@RestController
@RequestMapping("{{ base_path }}")
public class {{ class_name }} {

    private final {{ service }} service;
{% if mapper %}
    private final {{ mapper }} mapper;
{% endif %}

    public {{ class_name }}({{ service }} service{% if mapper %}, {{ mapper }} mapper{% endif %}) {
        this.service = service;
{% if mapper %}
        this.mapper = mapper;
{% endif %}
    }

    @GetMapping
    public ResponseEntity<List<{{ body }}>> getAll() {
        return ResponseEntity.ok({{ list_expr }});
    }

    @GetMapping("/{id}")
    public ResponseEntity<{{ body }}> getById(@PathVariable {{ id_type }} id) {
        return service.findById(id)
                .map({{ found_expr }})
                .orElseGet(() -> ResponseEntity.notFound().build());
    }

    @PostMapping
    public ResponseEntity<{{ body }}> create(@RequestBody {{ body }} {{ body_param }}) {
        {{ entity }} saved = service.save({{ incoming_expr }});
        return ResponseEntity.status(HttpStatus.CREATED).body({{ saved_expr }});
    }

    @PutMapping("/{id}")
    public ResponseEntity<{{ body }}> update(@PathVariable {{ id_type }} id, @RequestBody {{ body }} {{ body_param }}) {
        if (service.findById(id).isEmpty()) {
            return ResponseEntity.notFound().build();
        }
        {{ entity }} updated = {{ incoming_expr }};
        updated.set{{ id_property }}(id);
        {{ entity }} saved = service.save(updated);
        return ResponseEntity.ok({{ saved_expr }});
    }

    @DeleteMapping("/{id}")
    public ResponseEntity<Void> delete(@PathVariable {{ id_type }} id) {
        service.deleteById(id);
        return ResponseEntity.noContent().build();
    }
{% if conversion_stubs %}

    private {{ body }} toDto({{ entity }} entity) {
        throw new UnsupportedOperationException("Conversion from {{ entity }} to {{ body }} is not implemented");
    }

    private {{ entity }} toEntity({{ body }} dto) {
        throw new UnsupportedOperationException("Conversion from {{ body }} to {{ entity }} is not implemented");
    }
{% endif %}
}
"#;

/// Conversion interface between entity and DTO
pub const MAPPER_TEMPLATE: &str = r#"{{ header }}@Mapper(componentModel = "spring")
public interface {{ class_name }} {

{% for key in foreign_keys %}
    @Mapping(source = "{{ key.field }}.id", target = "{{ key.member }}")
{% endfor %}
    {{ dto }} toDto({{ entity }} entity);

{% for key in foreign_keys %}
    @Mapping(target = "{{ key.field }}", ignore = true)
{% endfor %}
    {{ entity }} toEntity({{ dto }} dto);

    List<{{ dto }}> toDtoList(List<{{ entity }}> entities);

    List<{{ entity }}> toEntityList(List<{{ dto }}> dtos);
}
"#;

static SHARED: Lazy<TemplateRegistry> = Lazy::new(TemplateRegistry::new);

/// Template environment for generated sources
pub struct TemplateRegistry {
    env: Environment<'static>,
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry").finish_non_exhaustive()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    /// Environment configured for source code: no escaping, block tags on
    /// their own line leave no trace, trailing newline kept
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        Self { env }
    }

    /// Process-wide registry
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Template source for an artifact kind
    #[must_use]
    pub const fn source(kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::Dto => DTO_TEMPLATE,
            ArtifactKind::Mapper => MAPPER_TEMPLATE,
            ArtifactKind::Repository => REPOSITORY_TEMPLATE,
            ArtifactKind::Service => SERVICE_TEMPLATE,
            ArtifactKind::Controller => CONTROLLER_TEMPLATE,
        }
    }

    /// Render the template of `kind` with `context`
    ///
    /// # Errors
    ///
    /// Returns [`ApiForgeError::Template`](crate::error::ApiForgeError::Template)
    /// if rendering fails.
    pub fn render<S: Serialize>(&self, kind: ArtifactKind, context: S) -> Result<String> {
        Ok(self
            .env
            .render_named_str(kind.as_str(), Self::source(kind), context)?)
    }
}
