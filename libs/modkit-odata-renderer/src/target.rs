//! Target type resolution.
//!
//! The target type is what the request path declares the property to be. It
//! is resolved once per request and never recomputed.

use std::fmt;

use modkit_odata_edm::EntityDataModel;
use tracing::debug;

use crate::error::Error;

/// Declared type and cardinality of the addressed property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TargetType {
    type_name: String,
    is_collection: bool,
}

impl TargetType {
    #[must_use]
    pub fn new(type_name: impl Into<String>, is_collection: bool) -> Self {
        Self {
            type_name: type_name.into(),
            is_collection,
        }
    }

    #[must_use]
    pub fn single(type_name: impl Into<String>) -> Self {
        Self::new(type_name, false)
    }

    #[must_use]
    pub fn collection(type_name: impl Into<String>) -> Self {
        Self::new(type_name, true)
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.is_collection
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collection {
            write!(f, "Collection({})", self.type_name)
        } else {
            f.write_str(&self.type_name)
        }
    }
}

/// Request-side source of the target type.
pub trait RequestContext: Send + Sync {
    /// The type addressed by the request, or `None` if the request does not
    /// address a property.
    fn resolve_target_type(&self, model: &EntityDataModel) -> Option<TargetType>;
}

impl<F> RequestContext for F
where
    F: Fn(&EntityDataModel) -> Option<TargetType> + Send + Sync,
{
    fn resolve_target_type(&self, model: &EntityDataModel) -> Option<TargetType> {
        self(model)
    }
}

/// Resolve the target type of a request and check it against the model.
///
/// # Errors
/// Returns `Error::Configuration` if the request yields no target type and
/// `Error::Schema` if the resolved type is not registered.
pub fn resolve_target_type(
    request: &dyn RequestContext,
    model: &EntityDataModel,
) -> Result<TargetType, Error> {
    let target = request
        .resolve_target_type(model)
        .ok_or_else(|| Error::configuration("request does not address a typed property"))?;
    model.get_type(target.type_name())?;
    debug!(target_type = %target, "Resolved target type");
    Ok(target)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use modkit_odata_edm::EdmError;

    #[test]
    fn test_display() {
        assert_eq!(TargetType::single("Edm.String").to_string(), "Edm.String");
        assert_eq!(
            TargetType::collection("Model.Address").to_string(),
            "Collection(Model.Address)"
        );
    }

    #[test]
    fn test_resolve_from_closure() {
        let model = EntityDataModel::builder().build().unwrap();
        let request = |_: &EntityDataModel| Some(TargetType::single("Edm.String"));
        let target = resolve_target_type(&request, &model).unwrap();
        assert_eq!(target, TargetType::single("Edm.String"));
    }

    #[test]
    fn test_unresolved_request_is_configuration_error() {
        let model = EntityDataModel::builder().build().unwrap();
        let request = |_: &EntityDataModel| -> Option<TargetType> { None };
        let err = resolve_target_type(&request, &model).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_unknown_target_type_is_schema_error() {
        let model = EntityDataModel::builder().build().unwrap();
        let request = |_: &EntityDataModel| Some(TargetType::single("Model.Ghost"));
        let err = resolve_target_type(&request, &model).unwrap_err();
        assert!(matches!(err, Error::Schema(EdmError::UnknownType(name)) if name == "Model.Ghost"));
    }
}
