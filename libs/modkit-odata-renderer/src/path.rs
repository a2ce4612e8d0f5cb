//! Segmented resource paths: `EntitySet(key)/Property/Property`.
//!
//! Parsing URI text into segments is the router's job; this type only walks
//! already split segments through the model.

use modkit_odata_edm::EntityDataModel;

use crate::target::{RequestContext, TargetType};

#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct ResourcePath {
    entity_set: String,
    key: Option<String>,
    properties: Vec<String>,
}

impl ResourcePath {
    pub fn entity_set(name: impl Into<String>) -> Self {
        Self {
            entity_set: name.into(),
            key: None,
            properties: Vec::new(),
        }
    }

    /// Address a single entity by its key literal, e.g. `1` or `'ALFKI'`.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Append a property segment.
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(name.into());
        self
    }

    #[must_use]
    pub fn entity_set_name(&self) -> &str {
        &self.entity_set
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    #[must_use]
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Path as used in the fragment of a context URL: `Customers(1)/Address`.
    #[must_use]
    pub fn context_fragment(&self) -> String {
        let mut out = self.entity_set.clone();
        if let Some(key) = &self.key {
            out.push('(');
            out.push_str(key);
            out.push(')');
        }
        for segment in &self.properties {
            out.push('/');
            out.push_str(segment);
        }
        out
    }
}

impl RequestContext for ResourcePath {
    fn resolve_target_type(&self, model: &EntityDataModel) -> Option<TargetType> {
        let set = model.entity_set(&self.entity_set)?;
        let mut current = TargetType::new(set.entity_type(), self.key.is_none());

        for segment in &self.properties {
            // Properties are only addressable on a single instance.
            if current.is_collection() {
                return None;
            }
            let owner = model.structured_type(current.type_name()).ok()?;
            let property = owner.property(segment)?;
            current = TargetType::new(property.type_name.clone(), property.is_collection);
        }

        Some(current)
    }
}
