//! Schema type descriptors of the Entity Data Model.
//!
//! A [`Type`] is identified by its fully qualified name (`Namespace.Name`, or
//! `Edm.<Primitive>` for built-in primitives) and classified by [`MetaType`].

use std::fmt;

/// Namespace of the built-in primitive types.
pub const EDM_NAMESPACE: &str = "Edm";

/// Classification of a schema type.
///
/// Renderers only know how to write primitive and complex properties; every
/// other classification must be handled by a default branch, which is why
/// this enum is non-exhaustive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MetaType {
    Primitive,
    Complex,
    Entity,
    Enum,
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaType::Primitive => write!(f, "PRIMITIVE"),
            MetaType::Complex => write!(f, "COMPLEX"),
            MetaType::Entity => write!(f, "ENTITY"),
            MetaType::Enum => write!(f, "ENUM"),
        }
    }
}

/// Built-in EDM primitive types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Double,
    Decimal,
    String,
    Guid,
    Date,
    DateTimeOffset,
    TimeOfDay,
    Binary,
}

impl PrimitiveType {
    pub const ALL: &'static [PrimitiveType] = &[
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Int16,
        PrimitiveType::Int32,
        PrimitiveType::Int64,
        PrimitiveType::Double,
        PrimitiveType::Decimal,
        PrimitiveType::String,
        PrimitiveType::Guid,
        PrimitiveType::Date,
        PrimitiveType::DateTimeOffset,
        PrimitiveType::TimeOfDay,
        PrimitiveType::Binary,
    ];

    /// Fully qualified name, e.g. `Edm.String`.
    #[must_use]
    pub fn full_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "Edm.Boolean",
            PrimitiveType::Byte => "Edm.Byte",
            PrimitiveType::Int16 => "Edm.Int16",
            PrimitiveType::Int32 => "Edm.Int32",
            PrimitiveType::Int64 => "Edm.Int64",
            PrimitiveType::Double => "Edm.Double",
            PrimitiveType::Decimal => "Edm.Decimal",
            PrimitiveType::String => "Edm.String",
            PrimitiveType::Guid => "Edm.Guid",
            PrimitiveType::Date => "Edm.Date",
            PrimitiveType::DateTimeOffset => "Edm.DateTimeOffset",
            PrimitiveType::TimeOfDay => "Edm.TimeOfDay",
            PrimitiveType::Binary => "Edm.Binary",
        }
    }

    /// Look up a primitive by its fully qualified name.
    #[must_use]
    pub fn from_full_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.full_name() == name)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

/// A single structural property of a complex or entity type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralProperty {
    pub name: String,
    /// Fully qualified name of the property's element type.
    pub type_name: String,
    pub is_collection: bool,
    pub nullable: bool,
}

impl StructuralProperty {
    /// Nullable single-valued property.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_collection: false,
            nullable: true,
        }
    }

    #[must_use]
    pub fn collection(mut self) -> Self {
        self.is_collection = true;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Descriptor shared by complex and entity types: named fields, plus key
/// properties for entities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredType {
    namespace: String,
    name: String,
    full_name: String,
    properties: Vec<StructuralProperty>,
    key: Vec<String>,
}

impl StructuredType {
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        let full_name = format!("{namespace}.{name}");
        Self {
            namespace,
            name,
            full_name,
            properties: Vec::new(),
            key: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: StructuralProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Mark a property as part of the entity key.
    #[must_use]
    pub fn with_key(mut self, property_name: impl Into<String>) -> Self {
        self.key.push(property_name.into());
        self
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn properties(&self) -> &[StructuralProperty] {
        &self.properties
    }

    #[must_use]
    pub fn key(&self) -> &[String] {
        &self.key
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&StructuralProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Enumeration type with named members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    namespace: String,
    name: String,
    full_name: String,
    members: Vec<String>,
}

impl EnumType {
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        let full_name = format!("{namespace}.{name}");
        Self {
            namespace,
            name,
            full_name,
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.members.push(member.into());
        self
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }
}

/// A schema type registered in the [`EntityDataModel`](crate::EntityDataModel).
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Type {
    Primitive(PrimitiveType),
    Complex(StructuredType),
    Entity(StructuredType),
    Enum(EnumType),
}

impl Type {
    #[must_use]
    pub fn meta_type(&self) -> MetaType {
        match self {
            Type::Primitive(_) => MetaType::Primitive,
            Type::Complex(_) => MetaType::Complex,
            Type::Entity(_) => MetaType::Entity,
            Type::Enum(_) => MetaType::Enum,
        }
    }

    /// Fully qualified type name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        match self {
            Type::Primitive(p) => p.full_name(),
            Type::Complex(s) | Type::Entity(s) => s.full_name(),
            Type::Enum(e) => e.full_name(),
        }
    }

    /// Structured view of complex and entity types.
    #[must_use]
    pub fn as_structured(&self) -> Option<&StructuredType> {
        match self {
            Type::Complex(s) | Type::Entity(s) => Some(s),
            Type::Primitive(_) | Type::Enum(_) => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name(), self.meta_type())
    }
}
