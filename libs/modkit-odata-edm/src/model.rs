//! The Entity Data Model: an immutable registry of schema types.
//!
//! The model answers two questions:
//! - which [`Type`] is registered under a fully qualified name, and
//! - which [`Type`] a runtime value belongs to, via the value's [`TypeTag`].
//!
//! Models are assembled once with [`EntityDataModelBuilder`] and never mutated
//! afterwards, so a built model can be shared freely between requests.

use std::collections::HashMap;

use tracing::debug;

use crate::error::EdmError;
use crate::types::{EnumType, PrimitiveType, StructuredType, Type};
use crate::value::{PropertyValue, TypeTag};

/// Named, addressable collection of entities of one entity type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntitySet {
    name: String,
    entity_type: String,
}

impl EntitySet {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified name of the entity type.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }
}

#[derive(Clone, Debug)]
pub struct EntityDataModel {
    types: HashMap<String, Type>,
    tags: HashMap<TypeTag, String>,
    entity_sets: HashMap<String, EntitySet>,
}

impl EntityDataModel {
    pub fn builder() -> EntityDataModelBuilder {
        EntityDataModelBuilder::default()
    }

    /// Look up a type by fully qualified name.
    ///
    /// # Errors
    /// Returns `EdmError::UnknownType` if no such type is registered.
    pub fn get_type(&self, name: &str) -> Result<&Type, EdmError> {
        self.types
            .get(name)
            .ok_or_else(|| EdmError::unknown_type(name))
    }

    /// Look up a complex or entity type by name.
    ///
    /// # Errors
    /// Returns `EdmError::UnknownType` for unknown names and
    /// `EdmError::NotStructured` for primitive and enum types.
    pub fn structured_type(&self, name: &str) -> Result<&StructuredType, EdmError> {
        self.get_type(name)?
            .as_structured()
            .ok_or_else(|| EdmError::not_structured(name))
    }

    #[must_use]
    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.get(name)
    }

    pub fn entity_sets(&self) -> impl Iterator<Item = &EntitySet> {
        self.entity_sets.values()
    }

    /// Resolve the type a tag was registered under.
    ///
    /// # Errors
    /// Returns `EdmError::UnmappedShape` if the tag is unknown.
    pub fn type_for_tag(&self, tag: &TypeTag) -> Result<&Type, EdmError> {
        let name = self
            .tags
            .get(tag)
            .ok_or_else(|| EdmError::UnmappedShape(tag.clone()))?;
        self.get_type(name)
    }

    /// Resolve the type of a runtime value. Collections are resolved through
    /// their first element.
    ///
    /// # Errors
    /// Returns `EdmError::EmptyCollection` for an empty collection and
    /// `EdmError::UnmappedShape` when the value's tag is not registered.
    pub fn type_for_shape(&self, value: &PropertyValue) -> Result<&Type, EdmError> {
        let representative = value.representative().ok_or(EdmError::EmptyCollection)?;
        self.type_for_tag(&representative.type_tag())
    }
}

/// Collects type and entity set declarations and validates them on
/// [`build`](Self::build).
///
/// All EDM primitive types are registered implicitly.
#[derive(Debug, Default)]
#[must_use]
pub struct EntityDataModelBuilder {
    types: Vec<(Type, TypeTag)>,
    entity_sets: Vec<EntitySet>,
}

impl EntityDataModelBuilder {
    /// Register a complex type, tagged with its full name.
    pub fn add_complex_type(self, ty: StructuredType) -> Self {
        let tag = TypeTag::new(ty.full_name());
        self.add_complex_type_as(ty, tag)
    }

    /// Register a complex type under an explicit tag.
    pub fn add_complex_type_as(mut self, ty: StructuredType, tag: impl Into<TypeTag>) -> Self {
        self.types.push((Type::Complex(ty), tag.into()));
        self
    }

    pub fn add_entity_type(self, ty: StructuredType) -> Self {
        let tag = TypeTag::new(ty.full_name());
        self.add_entity_type_as(ty, tag)
    }

    pub fn add_entity_type_as(mut self, ty: StructuredType, tag: impl Into<TypeTag>) -> Self {
        self.types.push((Type::Entity(ty), tag.into()));
        self
    }

    pub fn add_enum_type(self, ty: EnumType) -> Self {
        let tag = TypeTag::new(ty.full_name());
        self.add_enum_type_as(ty, tag)
    }

    pub fn add_enum_type_as(mut self, ty: EnumType, tag: impl Into<TypeTag>) -> Self {
        self.types.push((Type::Enum(ty), tag.into()));
        self
    }

    pub fn add_entity_set(
        mut self,
        name: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        self.entity_sets.push(EntitySet {
            name: name.into(),
            entity_type: entity_type.into(),
        });
        self
    }

    /// Validate all declarations and freeze them into a model.
    ///
    /// # Errors
    /// - `EdmError::DuplicateType` / `DuplicateTypeTag` / `DuplicateEntitySet`
    ///   when a name or tag is registered twice
    /// - `EdmError::UnknownPropertyType` when a structural property references
    ///   an unregistered type
    /// - `EdmError::UnknownType` / `NotEntityType` when an entity set does not
    ///   reference a registered entity type
    pub fn build(self) -> Result<EntityDataModel, EdmError> {
        let mut types: HashMap<String, Type> = HashMap::new();
        let mut tags: HashMap<TypeTag, String> = HashMap::new();

        let primitives = PrimitiveType::ALL
            .iter()
            .map(|p| (Type::Primitive(*p), TypeTag::from_static(p.full_name())));

        for (ty, tag) in primitives.chain(self.types) {
            let name = ty.full_name().to_owned();
            if types.contains_key(&name) {
                return Err(EdmError::DuplicateType(name));
            }
            if let Some(existing) = tags.get(&tag) {
                return Err(EdmError::DuplicateTypeTag {
                    tag,
                    type_name: existing.clone(),
                });
            }
            tags.insert(tag, name.clone());
            types.insert(name, ty);
        }

        for ty in types.values() {
            let Some(structured) = ty.as_structured() else {
                continue;
            };
            for property in structured.properties() {
                if !types.contains_key(&property.type_name) {
                    return Err(EdmError::UnknownPropertyType {
                        owner: structured.full_name().to_owned(),
                        property: property.name.clone(),
                        type_name: property.type_name.clone(),
                    });
                }
            }
        }

        let mut entity_sets = HashMap::new();
        for set in self.entity_sets {
            match types.get(set.entity_type()) {
                Some(Type::Entity(_)) => {}
                Some(_) => {
                    return Err(EdmError::NotEntityType {
                        entity_set: set.name,
                        type_name: set.entity_type,
                    });
                }
                None => return Err(EdmError::UnknownType(set.entity_type)),
            }
            if entity_sets.contains_key(set.name()) {
                return Err(EdmError::DuplicateEntitySet(set.name));
            }
            entity_sets.insert(set.name.clone(), set);
        }

        debug!(
            types = types.len(),
            entity_sets = entity_sets.len(),
            "Built entity data model"
        );

        Ok(EntityDataModel {
            types,
            tags,
            entity_sets,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::StructuralProperty;
    use crate::value::{StructuredValue, Value};

    fn address() -> StructuredType {
        StructuredType::new("Model", "Address")
            .with_property(StructuralProperty::new("City", "Edm.String"))
    }

    #[test]
    fn primitives_are_registered_implicitly() {
        let model = EntityDataModel::builder().build().unwrap();
        let ty = model.get_type("Edm.String").unwrap();
        assert_eq!(ty, &Type::Primitive(PrimitiveType::String));
        assert_eq!(
            model.type_for_tag(&TypeTag::from_static("Edm.Int64")).unwrap(),
            &Type::Primitive(PrimitiveType::Int64)
        );
    }

    #[test]
    fn explicit_tag_maps_back_to_type() {
        let model = EntityDataModel::builder()
            .add_complex_type_as(address(), "address")
            .build()
            .unwrap();

        let value = PropertyValue::from(StructuredValue::new("address"));
        assert_eq!(model.type_for_shape(&value).unwrap().full_name(), "Model.Address");

        let untagged = PropertyValue::from(StructuredValue::new("Model.Address"));
        assert_eq!(
            model.type_for_shape(&untagged),
            Err(EdmError::UnmappedShape(TypeTag::from_static("Model.Address")))
        );
    }

    #[test]
    fn empty_collection_has_no_shape() {
        let model = EntityDataModel::builder().build().unwrap();
        let empty = PropertyValue::Collection(Vec::<Value>::new());
        assert_eq!(model.type_for_shape(&empty), Err(EdmError::EmptyCollection));
    }

    #[test]
    fn duplicate_type_is_rejected() {
        let err = EntityDataModel::builder()
            .add_complex_type(address())
            .add_complex_type(address())
            .build()
            .unwrap_err();
        assert_eq!(err, EdmError::DuplicateType("Model.Address".to_owned()));
    }

    #[test]
    fn duplicate_tag_is_rejected() {
        let err = EntityDataModel::builder()
            .add_complex_type_as(address(), "Edm.String")
            .build()
            .unwrap_err();
        assert!(matches!(err, EdmError::DuplicateTypeTag { type_name, .. } if type_name == "Edm.String"));
    }

    #[test]
    fn unknown_property_type_is_rejected() {
        let broken = StructuredType::new("Model", "Broken")
            .with_property(StructuralProperty::new("Where", "Model.Nowhere"));
        let err = EntityDataModel::builder()
            .add_complex_type(broken)
            .build()
            .unwrap_err();
        assert!(matches!(err, EdmError::UnknownPropertyType { property, .. } if property == "Where"));
    }

    #[test]
    fn entity_set_must_reference_entity_type() {
        let err = EntityDataModel::builder()
            .add_complex_type(address())
            .add_entity_set("Addresses", "Model.Address")
            .build()
            .unwrap_err();
        assert!(matches!(err, EdmError::NotEntityType { .. }));

        let err = EntityDataModel::builder()
            .add_entity_set("Ghosts", "Model.Ghost")
            .build()
            .unwrap_err();
        assert_eq!(err, EdmError::UnknownType("Model.Ghost".to_owned()));
    }

    #[test]
    fn structured_type_lookup_rejects_primitives() {
        let model = EntityDataModel::builder()
            .add_complex_type(address())
            .build()
            .unwrap();
        assert!(model.structured_type("Model.Address").is_ok());
        assert_eq!(
            model.structured_type("Edm.String"),
            Err(EdmError::NotStructured("Edm.String".to_owned()))
        );
    }
}
