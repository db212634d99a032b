//! Structural validation
//!
//! Two passes: [`validate_entity`] inspects the described class before
//! analysis, [`validate_model`] inspects the analyzed model. Each pass reports
//! every problem it finds rather than stopping at the first.

use std::fmt;

use crate::model::{EntityModel, RelationshipKind};
use crate::source::{is_serializable_marker, ClassDescription, Marker, Modifier, SourceSet};
use crate::types::{CollectionKind, TypeExpr};

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The class lacks the entity marker
    MissingEntityMarker {
        /// Class name
        class: String,
    },
    /// The class is abstract
    AbstractClass {
        /// Class name
        class: String,
    },
    /// Constructors are declared but none takes no arguments
    MissingNoArgConstructor {
        /// Class name
        class: String,
    },
    /// No field (own or inherited) carries the identifier marker
    MissingIdentifier {
        /// Class name
        class: String,
    },
    /// A to-many relationship on a field that is not a collection
    RelationshipOnNonCollection {
        /// Field name
        field: String,
        /// Offending relationship
        relationship: RelationshipKind,
    },
    /// The class does not implement the serialization marker
    NotSerializable {
        /// Class name
        class: String,
    },
    /// A collection field without a generic element type
    UntypedCollection {
        /// Field name
        field: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEntityMarker { class } => {
                write!(f, "Class '{class}' is not annotated with @Entity")
            }
            Self::AbstractClass { class } => {
                write!(f, "Class '{class}' is abstract; entities must be concrete classes")
            }
            Self::MissingNoArgConstructor { class } => {
                write!(f, "Class '{class}' declares constructors but none without parameters")
            }
            Self::MissingIdentifier { class } => {
                write!(f, "Class '{class}' has no field annotated with @Id")
            }
            Self::RelationshipOnNonCollection { field, relationship } => {
                let annotation = match relationship {
                    RelationshipKind::ManyToMany => "@ManyToMany",
                    _ => "@OneToMany",
                };
                write!(f, "Field '{field}' is annotated with {annotation} but is not a collection")
            }
            Self::NotSerializable { class } => {
                write!(f, "Class '{class}' does not implement java.io.Serializable")
            }
            Self::UntypedCollection { field } => {
                write!(f, "Collection field '{field}' has no generic element type")
            }
        }
    }
}

/// Errors and warnings of one or more validation passes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that block generation
    pub errors: Vec<ValidationIssue>,
    /// Problems the caller may choose to override
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// No errors (warnings allowed)
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Append another report's findings
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Error messages
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Warning messages
    #[must_use]
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// Validate a described class before analysis
///
/// Identifier and relationship checks include inherited fields, and the
/// serialization check looks at every ancestor.
#[must_use]
pub fn validate_entity(class: &ClassDescription, sources: &SourceSet) -> ValidationReport {
    let mut report = ValidationReport::default();
    let name = class.name.clone();
    let ancestry = sources.ancestry(class);

    if !class.has_marker(Marker::Entity) {
        report.errors.push(ValidationIssue::MissingEntityMarker { class: name.clone() });
    }

    if class.has_modifier(Modifier::Abstract) {
        report.errors.push(ValidationIssue::AbstractClass { class: name.clone() });
    }

    if !class.constructors.is_empty()
        && !class.constructors.iter().any(|ctor| ctor.parameters.is_empty())
    {
        report
            .errors
            .push(ValidationIssue::MissingNoArgConstructor { class: name.clone() });
    }

    let fields = || ancestry.iter().flat_map(|owner| owner.fields.iter());

    if !fields().any(|field| field.has_marker(Marker::Id)) {
        report.errors.push(ValidationIssue::MissingIdentifier { class: name.clone() });
    }

    for field in fields() {
        let relationship = if field.has_marker(Marker::OneToMany) {
            RelationshipKind::OneToMany
        } else if field.has_marker(Marker::ManyToMany) {
            RelationshipKind::ManyToMany
        } else {
            continue;
        };
        let raw = TypeExpr::parse(&field.type_name).raw;
        if CollectionKind::from_raw(&raw).is_none() {
            report.errors.push(ValidationIssue::RelationshipOnNonCollection {
                field: field.name.clone(),
                relationship,
            });
        }
    }

    let serializable = ancestry
        .iter()
        .flat_map(|owner| owner.interfaces.iter())
        .any(|interface| is_serializable_marker(interface));
    if !serializable {
        report.warnings.push(ValidationIssue::NotSerializable { class: name });
    }

    report
}

/// Validate an analyzed model
#[must_use]
pub fn validate_model(model: &EntityModel) -> ValidationReport {
    let mut report = ValidationReport::default();

    if model.id_field.is_none() {
        report.errors.push(ValidationIssue::MissingIdentifier {
            class: model.class_name.clone(),
        });
    }

    for field in &model.fields {
        if field.relationship.is_to_many() && !field.is_collection {
            report.errors.push(ValidationIssue::RelationshipOnNonCollection {
                field: field.name.clone(),
                relationship: field.relationship,
            });
        }
        if field.is_collection && field.element_type.is_none() {
            report.warnings.push(ValidationIssue::UntypedCollection {
                field: field.name.clone(),
            });
        }
    }

    report
}
