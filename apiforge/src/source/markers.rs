//! Persistence annotation vocabulary

use phf::phf_map;

/// Root of every class hierarchy; ancestry walks stop here
pub const ROOT_CLASS: &str = "java.lang.Object";

/// Recognized persistence annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Persistent entity
    Entity,
    /// Identifier field
    Id,
    /// Optimistic-lock version field
    Version,
    /// Not persisted
    Transient,
    /// Column mapping (carries `name`)
    Column,
    /// Table mapping (carries `name`)
    Table,
    /// Many-to-one relationship
    ManyToOne,
    /// One-to-many relationship
    OneToMany,
    /// Many-to-many relationship
    ManyToMany,
    /// One-to-one relationship
    OneToOne,
}

static MARKERS: phf::Map<&'static str, Marker> = phf_map! {
    "javax.persistence.Entity" => Marker::Entity,
    "jakarta.persistence.Entity" => Marker::Entity,
    "javax.persistence.Id" => Marker::Id,
    "jakarta.persistence.Id" => Marker::Id,
    "javax.persistence.Version" => Marker::Version,
    "jakarta.persistence.Version" => Marker::Version,
    "javax.persistence.Transient" => Marker::Transient,
    "jakarta.persistence.Transient" => Marker::Transient,
    "javax.persistence.Column" => Marker::Column,
    "jakarta.persistence.Column" => Marker::Column,
    "javax.persistence.Table" => Marker::Table,
    "jakarta.persistence.Table" => Marker::Table,
    "javax.persistence.ManyToOne" => Marker::ManyToOne,
    "jakarta.persistence.ManyToOne" => Marker::ManyToOne,
    "javax.persistence.OneToMany" => Marker::OneToMany,
    "jakarta.persistence.OneToMany" => Marker::OneToMany,
    "javax.persistence.ManyToMany" => Marker::ManyToMany,
    "jakarta.persistence.ManyToMany" => Marker::ManyToMany,
    "javax.persistence.OneToOne" => Marker::OneToOne,
    "jakarta.persistence.OneToOne" => Marker::OneToOne,
};

/// Look up the marker for a qualified annotation name
///
/// Both the `javax.persistence` and `jakarta.persistence` namespaces are
/// recognized. Unqualified names are not.
///
/// ```rust
/// use apiforge::source::{marker_of, Marker};
///
/// assert_eq!(marker_of("javax.persistence.Id"), Some(Marker::Id));
/// assert_eq!(marker_of("jakarta.persistence.Id"), Some(Marker::Id));
/// assert_eq!(marker_of("Id"), None);
/// ```
#[must_use]
pub fn marker_of(annotation: &str) -> Option<Marker> {
    MARKERS.get(annotation.trim_start_matches('@')).copied()
}

/// Whether an implemented interface is the serialization marker
#[must_use]
pub fn is_serializable_marker(interface: &str) -> bool {
    matches!(interface, "java.io.Serializable" | "Serializable")
}
