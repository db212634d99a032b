//! Type resolution
//!
//! Maps declared field types to canonical descriptors through a finite table
//! built once at compile time. Resolution never fails: names the table does
//! not know become opaque references.

mod expr;

pub use expr::TypeExpr;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use phf::phf_map;

use crate::source::SourceSet;

/// Namespace whose types never need importing
pub const DEFAULT_NAMESPACE: &str = "java.lang";

/// Namespace of the recognized collection containers
pub const COLLECTIONS_NAMESPACE: &str = "java.util";

/// Scalar kinds with both a primitive and a boxed spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ScalarKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl ScalarKind {
    /// Primitive keyword
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Wrapper class name in [`DEFAULT_NAMESPACE`]
    #[must_use]
    pub const fn wrapper(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Integer",
            Self::Long => "Long",
            Self::Char => "Character",
            Self::Float => "Float",
            Self::Double => "Double",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum TableEntry {
    Primitive(ScalarKind),
    Boxed(ScalarKind),
    Class(&'static str),
}

static TYPE_TABLE: phf::Map<&'static str, TableEntry> = phf_map! {
    "boolean" => TableEntry::Primitive(ScalarKind::Boolean),
    "byte" => TableEntry::Primitive(ScalarKind::Byte),
    "short" => TableEntry::Primitive(ScalarKind::Short),
    "int" => TableEntry::Primitive(ScalarKind::Int),
    "long" => TableEntry::Primitive(ScalarKind::Long),
    "char" => TableEntry::Primitive(ScalarKind::Char),
    "float" => TableEntry::Primitive(ScalarKind::Float),
    "double" => TableEntry::Primitive(ScalarKind::Double),
    "Boolean" => TableEntry::Boxed(ScalarKind::Boolean),
    "Byte" => TableEntry::Boxed(ScalarKind::Byte),
    "Short" => TableEntry::Boxed(ScalarKind::Short),
    "Integer" => TableEntry::Boxed(ScalarKind::Int),
    "Long" => TableEntry::Boxed(ScalarKind::Long),
    "Character" => TableEntry::Boxed(ScalarKind::Char),
    "Float" => TableEntry::Boxed(ScalarKind::Float),
    "Double" => TableEntry::Boxed(ScalarKind::Double),
    "String" => TableEntry::Class("java.lang"),
    "BigDecimal" => TableEntry::Class("java.math"),
    "BigInteger" => TableEntry::Class("java.math"),
    "LocalDate" => TableEntry::Class("java.time"),
    "LocalDateTime" => TableEntry::Class("java.time"),
    "LocalTime" => TableEntry::Class("java.time"),
    "ZonedDateTime" => TableEntry::Class("java.time"),
    "OffsetDateTime" => TableEntry::Class("java.time"),
    "Instant" => TableEntry::Class("java.time"),
    "UUID" => TableEntry::Class("java.util"),
};

impl TableEntry {
    const fn namespace(self) -> &'static str {
        match self {
            Self::Primitive(_) => "",
            Self::Boxed(_) => DEFAULT_NAMESPACE,
            Self::Class(namespace) => namespace,
        }
    }

    fn to_canonical(self, name: &str) -> CanonicalType {
        match self {
            Self::Primitive(kind) => CanonicalType::Primitive(kind),
            Self::Boxed(kind) => CanonicalType::Boxed(kind),
            Self::Class(namespace) => CanonicalType::reference(namespace, name),
        }
    }
}

/// Canonical type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalType {
    /// Unboxed scalar, e.g. `int`
    Primitive(ScalarKind),
    /// Boxed scalar, e.g. `java.lang.Integer`
    Boxed(ScalarKind),
    /// Any other class, identified by namespace and simple name
    Reference {
        /// Package of the class
        namespace: String,
        /// Simple name
        name: String,
    },
    /// A generic class applied to type arguments, e.g. `java.util.List<Order>`
    Parameterized {
        /// Package of the raw class
        namespace: String,
        /// Simple name of the raw class
        name: String,
        /// Type arguments in declaration order
        arguments: Vec<CanonicalType>,
    },
}

impl CanonicalType {
    /// Opaque reference to `namespace.name`
    pub fn reference(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Reference {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Boxed long, the type of foreign-key members and the default identifier
    #[must_use]
    pub const fn boxed_long() -> Self {
        Self::Boxed(ScalarKind::Long)
    }

    /// Namespace of the (raw) type; empty for primitives
    #[must_use]
    pub fn namespace(&self) -> &str {
        match self {
            Self::Primitive(_) => "",
            Self::Boxed(_) => DEFAULT_NAMESPACE,
            Self::Reference { namespace, .. } | Self::Parameterized { namespace, .. } => namespace,
        }
    }

    /// Simple name of the raw type, without type arguments
    #[must_use]
    pub fn raw_name(&self) -> &str {
        match self {
            Self::Primitive(kind) => kind.keyword(),
            Self::Boxed(kind) => kind.wrapper(),
            Self::Reference { name, .. } | Self::Parameterized { name, .. } => name,
        }
    }

    /// Qualified name of the raw type
    #[must_use]
    pub fn qualified_name(&self) -> String {
        let namespace = self.namespace();
        if namespace.is_empty() {
            self.raw_name().to_string()
        } else {
            format!("{namespace}.{}", self.raw_name())
        }
    }

    /// Whether this is an unboxed scalar
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// Whether this is `java.lang.String`
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::Reference { namespace, name } if namespace == DEFAULT_NAMESPACE && name == "String")
    }

    /// The boxed form of a primitive; other types unchanged
    #[must_use]
    pub fn boxed(&self) -> Self {
        match self {
            Self::Primitive(kind) => Self::Boxed(*kind),
            other => other.clone(),
        }
    }

    /// Add the imports needed to spell this type inside `own_package`
    pub fn collect_imports(&self, own_package: &str, imports: &mut BTreeSet<String>) {
        let namespace = self.namespace();
        if !namespace.is_empty() && namespace != DEFAULT_NAMESPACE && namespace != own_package {
            imports.insert(self.qualified_name());
        }
        if let Self::Parameterized { arguments, .. } = self {
            for argument in arguments {
                argument.collect_imports(own_package, imports);
            }
        }
    }
}

impl fmt::Display for CanonicalType {
    /// Source spelling using simple names; type arguments are boxed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameterized { name, arguments, .. } => {
                write!(f, "{name}<")?;
                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument.boxed())?;
                }
                write!(f, ">")
            }
            other => write!(f, "{}", other.raw_name()),
        }
    }
}

/// Recognized collection containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum CollectionKind {
    List,
    Set,
    Collection,
    Map,
}

impl CollectionKind {
    /// Classify a raw type name; qualified names must be in [`COLLECTIONS_NAMESPACE`]
    #[must_use]
    pub fn from_raw(raw: &str) -> Option<Self> {
        let simple = match raw.rsplit_once('.') {
            Some((namespace, simple)) if namespace == COLLECTIONS_NAMESPACE => simple,
            Some(_) => return None,
            None => raw,
        };
        match simple {
            "List" => Some(Self::List),
            "Set" => Some(Self::Set),
            "Collection" => Some(Self::Collection),
            "Map" => Some(Self::Map),
            _ => None,
        }
    }

    /// Simple container name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Set => "Set",
            Self::Collection => "Collection",
            Self::Map => "Map",
        }
    }
}

/// Resolves declared type spellings to [`CanonicalType`]s
///
/// Undotted names the table does not know are placed in
/// [`DEFAULT_NAMESPACE`], unless the resolver was seeded with a described
/// class of that name, in which case the class's package is used.
///
/// ```rust
/// use apiforge::types::{CanonicalType, ScalarKind, TypeResolver};
///
/// let resolver = TypeResolver::new();
/// assert_eq!(resolver.resolve("int"), CanonicalType::Primitive(ScalarKind::Int));
/// assert_eq!(resolver.resolve("BigDecimal").qualified_name(), "java.math.BigDecimal");
/// assert_eq!(resolver.resolve("List<Order>").to_string(), "List<Order>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeResolver {
    local_types: HashMap<String, String>,
}

impl TypeResolver {
    /// Resolver with only the built-in table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that also knows every class of `sources`
    #[must_use]
    pub fn with_sources(sources: &SourceSet) -> Self {
        sources.classes.iter().fold(Self::new(), |resolver, class| {
            resolver.with_local_type(&class.name, &class.package)
        })
    }

    /// Register a described class; the first registration of a name wins
    #[must_use]
    pub fn with_local_type(mut self, name: &str, package: &str) -> Self {
        self.local_types
            .entry(name.to_string())
            .or_insert_with(|| package.to_string());
        self
    }

    /// Resolve a declared type spelling
    #[must_use]
    pub fn resolve(&self, declared: &str) -> CanonicalType {
        self.resolve_expr(&TypeExpr::parse(declared))
    }

    /// Resolve the element type of a collection spelling (its first type argument)
    #[must_use]
    pub fn resolve_element(&self, declared: &str) -> Option<CanonicalType> {
        TypeExpr::parse(declared)
            .arguments
            .first()
            .map(|argument| self.resolve_expr(argument))
    }

    /// Resolve a parsed type expression
    #[must_use]
    pub fn resolve_expr(&self, expr: &TypeExpr) -> CanonicalType {
        let (namespace, name) = self.locate(&expr.raw);

        if expr.arguments.is_empty() {
            if let Some(entry) = TYPE_TABLE.get(name.as_str()) {
                if entry.namespace() == namespace {
                    return entry.to_canonical(&name);
                }
            }
            return CanonicalType::Reference { namespace, name };
        }

        CanonicalType::Parameterized {
            namespace,
            name,
            arguments: expr
                .arguments
                .iter()
                .map(|argument| self.resolve_expr(argument))
                .collect(),
        }
    }

    fn locate(&self, raw: &str) -> (String, String) {
        if let Some((namespace, simple)) = raw.rsplit_once('.') {
            return (namespace.to_string(), simple.to_string());
        }
        if let Some(entry) = TYPE_TABLE.get(raw) {
            return (entry.namespace().to_string(), raw.to_string());
        }
        if CollectionKind::from_raw(raw).is_some() {
            return (COLLECTIONS_NAMESPACE.to_string(), raw.to_string());
        }
        let namespace = self
            .local_types
            .get(raw)
            .map_or(DEFAULT_NAMESPACE, String::as_str);
        (namespace.to_string(), raw.to_string())
    }
}
