use thiserror::Error;

use crate::value::TypeTag;

/// Schema errors raised while building or querying an [`EntityDataModel`](crate::EntityDataModel).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EdmError {
    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("no type registered for value tagged '{0}'")]
    UnmappedShape(TypeTag),

    #[error("cannot infer the element type of an empty collection")]
    EmptyCollection,

    #[error("type already registered: {0}")]
    DuplicateType(String),

    #[error("type tag '{tag}' already registered for {type_name}")]
    DuplicateTypeTag { tag: TypeTag, type_name: String },

    #[error("entity set already registered: {0}")]
    DuplicateEntitySet(String),

    #[error("property '{property}' of {owner} references unknown type {type_name}")]
    UnknownPropertyType {
        owner: String,
        property: String,
        type_name: String,
    },

    #[error("type {0} is not a structured type")]
    NotStructured(String),

    #[error("entity set {entity_set} references {type_name}, which is not an entity type")]
    NotEntityType {
        entity_set: String,
        type_name: String,
    },
}

impl EdmError {
    #[must_use]
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType(name.into())
    }

    #[must_use]
    pub fn not_structured(name: impl Into<String>) -> Self {
        Self::NotStructured(name.into())
    }
}
